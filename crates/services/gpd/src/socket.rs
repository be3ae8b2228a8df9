//! WebSocket result sessions.
//!
//! A widget opens one socket and keeps it for its whole life. It submits code,
//! forwards every update it gets from the execution service and receives the
//! reconciled presentation in return, one reply per message.

use std::net::SocketAddr;

use axum::extract::ws::{Message, WebSocket};
use gp_result::{ReconciledPresentation, ResultSession, ResultUpdate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{api::ReconcileResponse, prelude::*};

/// Messages sent by the widget.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionMessage {
    /// New code was submitted. `expected` replaces the configured expected
    /// output when given.
    Submit {
        #[serde(default)]
        expected: Option<String>,
    },
    /// Update reported by the execution service.
    Update { update: ResultUpdate },
}

/// Messages sent back to the widget.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionReply {
    Submitted {
        id: Uuid,
        #[serde(flatten)]
        response: ReconcileResponse,
    },
    Presentation {
        #[serde(flatten)]
        response: ReconcileResponse,
    },
    Error {
        error: serde_json::Value,
    },
}

fn handle_message(session: &mut ResultSession, payload: &str) -> Result<SessionReply> {
    let message: SessionMessage = serde_json::from_str(payload)?;
    let reply = match message {
        SessionMessage::Submit { expected } => {
            if expected.is_some() {
                session.set_expected(expected);
            }
            let id = session.submit();
            SessionReply::Submitted {
                id,
                response: session.presentation().into(),
            }
        }
        SessionMessage::Update { update } => {
            let presentation: ReconciledPresentation = session.apply(update)?;
            SessionReply::Presentation {
                response: presentation.into(),
            }
        }
    };
    Ok(reply)
}

async fn next_message(socket: &mut WebSocket) -> Result<Option<Message>> {
    Ok(socket.recv().await.transpose()?)
}

/// Runs one session until the widget closes the socket.
pub async fn handle_socket(mut socket: WebSocket, who: SocketAddr, mut session: ResultSession) {
    loop {
        let message = match next_message(&mut socket).await {
            Ok(Some(message)) => message,
            Ok(None) => break,
            Err(err) => {
                warn!("Failed to receive message from {who}: {err}");
                break;
            }
        };

        let reply = match message {
            Message::Text(text) => handle_message(&mut session, text.as_str()),
            Message::Binary(_) => Err(Error::InvalidWsMessage),
            Message::Close(c) => {
                if let Some(cf) = c {
                    info!(
                        ">>> {} sent close with code {} and reason `{}`",
                        who, cf.code, cf.reason
                    );
                } else {
                    info!(">>> {who} sent close without CloseFrame");
                }
                break;
            }
            Message::Ping(_) | Message::Pong(_) => continue,
        };

        let reply = reply.unwrap_or_else(|err| {
            warn!("Rejected message from {who}: {err}");
            SessionReply::Error {
                error: err.error_object(),
            }
        });

        let payload = match serde_json::to_string(&reply) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("Failed to serialize reply for {who}: {err}");
                break;
            }
        };
        if socket.send(Message::Text(payload.into())).await.is_err() {
            debug!("Socket of {who} closed while replying");
            break;
        }
    }
    info!("Websocket context {who} destroyed");
}
