pub mod client;
pub mod ingest;
pub mod messages;

pub use client::{NatsClient, EVENT_SUBJECT_PREFIX, INGEST_SUBJECT_PREFIX};
pub use ingest::run_ingest_loop;
pub use messages::{SegmentMessage, SessionControlMessage};
