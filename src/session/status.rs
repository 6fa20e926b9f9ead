use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a session's active pipeline instance.
///
/// `Completed` and `Error` are terminal for one processing pass; a later
/// segment or stop for the same identifier starts a fresh, additive pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    Recording,
    Paused,
    Processing,
    Completed,
    Error,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Recording => "recording",
            SessionStatus::Paused => "paused",
            SessionStatus::Processing => "processing",
            SessionStatus::Completed => "completed",
            SessionStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// Point-in-time statistics about a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    pub session_id: String,

    pub status: SessionStatus,

    /// When the pipeline instance was created
    pub started_at: DateTime<Utc>,

    /// Seconds since the pipeline instance was created
    pub duration_secs: f64,

    /// Number of segment arrivals accepted so far
    pub segments_received: usize,
}
