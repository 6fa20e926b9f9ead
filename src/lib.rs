pub mod audio;
pub mod config;
pub mod http;
pub mod nats;
pub mod providers;
pub mod session;

pub use audio::{decode_segment, waveform_to_wav, DecodeError, Waveform};
pub use config::Config;
pub use http::{create_router, AppState};
pub use nats::{NatsClient, SegmentMessage, SessionControlMessage};
pub use providers::{
    ProviderError, SummarizationChain, SummarizationProvider, TranscriptionChain,
    TranscriptionProvider,
};
pub use session::{
    EventSink, SessionEvent, SessionPipeline, SessionRegistry, SessionStats, SessionStatus,
    SessionStore, StoreError,
};
