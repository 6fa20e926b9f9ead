use super::events::EventSink;
use super::pipeline::SessionPipeline;
use super::store::SessionStore;
use crate::providers::{SummarizationChain, TranscriptionChain};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared map of active session pipelines, keyed by the client-supplied
/// session identifier. Pipelines are created lazily on the first event for a
/// session; every pipeline shares the store, the provider chains, and the
/// event sink handed in at startup.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, Arc<SessionPipeline>>>>,
    store: SessionStore,
    transcription: Arc<TranscriptionChain>,
    summarization: Arc<SummarizationChain>,
    events: Arc<dyn EventSink>,
}

impl SessionRegistry {
    pub fn new(
        store: SessionStore,
        transcription: Arc<TranscriptionChain>,
        summarization: Arc<SummarizationChain>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            store,
            transcription,
            summarization,
            events,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub async fn get(&self, session_id: &str) -> Option<Arc<SessionPipeline>> {
        self.sessions.read().await.get(session_id).cloned()
    }

    pub async fn get_or_create(&self, session_id: &str) -> Arc<SessionPipeline> {
        {
            let sessions = self.sessions.read().await;
            if let Some(pipeline) = sessions.get(session_id) {
                return Arc::clone(pipeline);
            }
        }

        let mut sessions = self.sessions.write().await;
        // Re-check under the write lock; another task may have won the race
        if let Some(pipeline) = sessions.get(session_id) {
            return Arc::clone(pipeline);
        }

        let pipeline = Arc::new(SessionPipeline::new(
            session_id.to_string(),
            self.store.clone(),
            Arc::clone(&self.transcription),
            Arc::clone(&self.summarization),
            Arc::clone(&self.events),
        ));

        sessions.insert(session_id.to_string(), Arc::clone(&pipeline));
        pipeline
    }
}
