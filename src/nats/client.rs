use crate::session::{EventSink, SessionEvent};
use anyhow::{Context, Result};
use async_nats::Client;
use async_trait::async_trait;
use tracing::{debug, info};

/// Inbound subjects: `scribe.ingest.segment`, `.pause`, `.resume`, `.stop`
pub const INGEST_SUBJECT_PREFIX: &str = "scribe.ingest";

/// Outbound subjects: `scribe.event.<kind>`, one subject per event kind
pub const EVENT_SUBJECT_PREFIX: &str = "scribe.event";

/// NATS side of the bidirectional event channel: wildcard ingest
/// subscription in, per-kind event publication out.
pub struct NatsClient {
    client: Client,
}

impl NatsClient {
    pub async fn connect(url: &str) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self { client })
    }

    /// Subscribe to all inbound ingestion subjects
    pub async fn subscribe_ingest(&self) -> Result<async_nats::Subscriber> {
        let subject = format!("{}.>", INGEST_SUBJECT_PREFIX);

        info!("Subscribing to ingest subjects on {}", subject);

        let subscriber = self
            .client
            .subscribe(subject)
            .await
            .context("Failed to subscribe to ingest subjects")?;

        Ok(subscriber)
    }

    /// Publish one outbound session event
    pub async fn publish_event(&self, event: &SessionEvent) -> Result<()> {
        let subject = format!("{}.{}", EVENT_SUBJECT_PREFIX, event.kind());
        let payload = serde_json::to_vec(event)?;

        self.client
            .publish(subject.clone(), payload.into())
            .await
            .context("Failed to publish session event")?;

        debug!("Published {} event", subject);

        Ok(())
    }
}

#[async_trait]
impl EventSink for NatsClient {
    async fn emit(&self, event: SessionEvent) -> Result<()> {
        self.publish_event(&event).await
    }
}
