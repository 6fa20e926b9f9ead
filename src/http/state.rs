use crate::session::{SessionRegistry, SessionStore};

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Session pipelines, shared with the NATS ingest loop
    pub registry: SessionRegistry,
}

impl AppState {
    pub fn new(registry: SessionRegistry) -> Self {
        Self { registry }
    }

    pub fn store(&self) -> &SessionStore {
        self.registry.store()
    }
}
