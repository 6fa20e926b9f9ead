use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Outbound events emitted by the pipeline over the real-time channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum SessionEvent {
    SegmentAck {
        session_id: String,
        ordinal: u32,
    },
    Paused {
        session_id: String,
    },
    Resumed {
        session_id: String,
    },
    ProcessingStarted {
        session_id: String,
    },
    PartialTranscript {
        session_id: String,
        ordinal: u32,
        text: String,
    },
    Completed {
        session_id: String,
        summary: String,
    },
    ProcessingError {
        session_id: String,
        message: String,
    },
}

impl SessionEvent {
    /// Event kind as it appears on the wire (subject suffix)
    pub fn kind(&self) -> &'static str {
        match self {
            SessionEvent::SegmentAck { .. } => "segment-ack",
            SessionEvent::Paused { .. } => "paused",
            SessionEvent::Resumed { .. } => "resumed",
            SessionEvent::ProcessingStarted { .. } => "processing-started",
            SessionEvent::PartialTranscript { .. } => "partial-transcript",
            SessionEvent::Completed { .. } => "completed",
            SessionEvent::ProcessingError { .. } => "processing-error",
        }
    }
}

/// Where the pipeline publishes its outbound events.
///
/// Production uses the NATS client; tests use a channel-backed sink.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: SessionEvent) -> anyhow::Result<()>;
}
