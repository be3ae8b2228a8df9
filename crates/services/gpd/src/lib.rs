//! gp service (gpd)
//!
//! Exposes the result reconciler to playground widgets that cannot link the
//! library directly:
//!
//! - **`POST /v1/reconcile`**: reconcile one execution result snapshot
//! - **`/v1/session/ws`**: WebSocket session that merges streamed updates of
//!   a widget's submissions and replies with a presentation per update
//! - **`GET /v1/health`**: liveness probe

pub mod api;
pub mod cli;
pub mod error;
pub mod prelude;
pub mod socket;
