use super::client::{NatsClient, INGEST_SUBJECT_PREFIX};
use super::messages::{SegmentMessage, SessionControlMessage};
use crate::session::SessionRegistry;
use anyhow::Result;
use futures::stream::StreamExt;
use tracing::{debug, warn};

/// Drain the ingest subscription, dispatching each message on its own task
/// so sessions are processed concurrently. Ordering within a session is not
/// needed at this layer: segment storage is last-write-wins per ordinal and
/// the processing pass itself is serialized by the pipeline.
pub async fn run_ingest_loop(client: &NatsClient, registry: SessionRegistry) -> Result<()> {
    let mut subscriber = client.subscribe_ingest().await?;

    while let Some(message) = subscriber.next().await {
        let registry = registry.clone();
        tokio::spawn(async move {
            dispatch(&registry, message).await;
        });
    }

    Ok(())
}

/// Route one inbound message by its subject suffix. Malformed or incomplete
/// payloads are logged and dropped; the client receives no explicit error.
async fn dispatch(registry: &SessionRegistry, message: async_nats::Message) {
    let subject = message.subject.as_str();
    let Some(op) = subject.strip_prefix(INGEST_SUBJECT_PREFIX) else {
        return;
    };

    match op.trim_start_matches('.') {
        "segment" => {
            let parsed: SegmentMessage = match serde_json::from_slice(&message.payload) {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!("Dropping malformed segment message: {}", e);
                    return;
                }
            };

            if parsed.session_id.is_empty() {
                warn!("Dropping segment message without session id");
                return;
            }

            let bytes = match parsed.decode_data() {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(
                        "Dropping segment {} for session {}: invalid base64 payload: {}",
                        parsed.ordinal, parsed.session_id, e
                    );
                    return;
                }
            };

            let pipeline = registry.get_or_create(&parsed.session_id).await;
            pipeline.handle_segment(parsed.ordinal, &bytes).await;
        }
        op @ ("pause" | "resume" | "stop") => {
            let parsed: SessionControlMessage = match serde_json::from_slice(&message.payload) {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!("Dropping malformed {} message: {}", op, e);
                    return;
                }
            };

            if parsed.session_id.is_empty() {
                warn!("Dropping {} message without session id", op);
                return;
            }

            let pipeline = registry.get_or_create(&parsed.session_id).await;
            match op {
                "pause" => pipeline.handle_pause().await,
                "resume" => pipeline.handle_resume().await,
                _ => pipeline.handle_stop().await,
            }
        }
        other => {
            debug!("Ignoring message on unknown ingest subject {}", other);
        }
    }
}
