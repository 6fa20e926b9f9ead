//! HTTP API for transcript access
//!
//! Read-side companion to the NATS ingest channel:
//! - POST /session/save - (re)initialize a transcript header
//! - GET /session/download - download a transcript
//! - GET /session/list - known session storage keys
//! - GET /session/:id/status - pipeline stats
//! - GET /health - health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
