//! HTTP routes of the gp service.

use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    body::Bytes,
    extract::{State, connect_info::ConnectInfo, ws::WebSocketUpgrade},
    response::IntoResponse,
    routing::{any, get, post},
};
use gp_result::{
    ExecutionResult, GpConfig, ReconciledPresentation, ReconciliationInput, ResultSession,
    presentation::{ResultIcon, opacity},
    reconcile,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::info;

use crate::{prelude::*, socket::handle_socket};

/// Shared state of the service.
#[derive(Clone)]
pub struct ApiState {
    config: Arc<GpConfig>,
}

impl ApiState {
    pub fn new(config: GpConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Body of a reconcile request.
#[derive(Debug, Deserialize)]
pub struct ReconcileRequest {
    /// Execution result in the wire format of the execution service.
    pub result: serde_json::Value,
    /// Rendering parameters; the configured widget settings when missing.
    #[serde(default)]
    pub input: Option<ReconciliationInput>,
}

/// Presentation together with the rendering hints derived from it.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReconcileResponse {
    pub presentation: ReconciledPresentation,
    pub icon: Option<ResultIcon>,
    pub opacity: f32,
}

impl From<ReconciledPresentation> for ReconcileResponse {
    fn from(presentation: ReconciledPresentation) -> Self {
        Self {
            icon: ResultIcon::for_presentation(&presentation),
            opacity: opacity(&presentation),
            presentation,
        }
    }
}

fn v1(path: &str) -> String {
    format!("/v1/{path}")
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route(&v1("health"), get(health))
        .route(&v1("reconcile"), post(post_reconcile))
        .route(&v1("session/ws"), any(session_handler))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the API on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: ApiState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!("listening on {}", listener.local_addr()?);
    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await?;
    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

#[axum::debug_handler]
async fn post_reconcile(
    State(state): State<ApiState>,
    body: Bytes,
) -> Result<Json<ReconcileResponse>> {
    let payload: ReconcileRequest = serde_json::from_slice(&body)?;
    let result = ExecutionResult::from_value(payload.result)?;
    let input = payload
        .input
        .unwrap_or_else(|| state.config.widget.input(false));
    Ok(Json(reconcile(&result, &input).into()))
}

/// Upgrades to a WebSocket carrying one result session.
#[axum::debug_handler]
async fn session_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<ApiState>,
) -> impl IntoResponse {
    info!("Widget at {addr} connected.");
    let session = ResultSession::new(state.config.widget.input(false));
    ws.on_upgrade(move |socket| handle_socket(socket, addr, session))
}
