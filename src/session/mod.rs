//! Session ingestion and transcription pipeline
//!
//! This module owns the hard logic of the server:
//! - `SessionStore`: durable per-session segment directory + append-only
//!   transcript file
//! - `SessionPipeline`: the per-session state machine driving segment
//!   ingestion and the stop-triggered ordered processing pass
//! - `SessionRegistry`: shared session-id -> pipeline map used by both
//!   transports
//! - `EventSink` / `SessionEvent`: the outbound half of the real-time channel

mod events;
mod pipeline;
mod registry;
mod status;
mod store;

pub use events::{EventSink, SessionEvent};
pub use pipeline::SessionPipeline;
pub use registry::SessionRegistry;
pub use status::{SessionStats, SessionStatus};
pub use store::{SessionStore, StoreError, SEGMENT_EXTENSION};
