//! Transcription and summarization providers
//!
//! Both capabilities follow the same pattern: an ordered list of hosted
//! providers built from configuration at startup, tried in preference order
//! (Groq, then Gemini), with a deterministic local fallback that terminates
//! the chain. A chain call never returns an error to its caller.

mod gemini;
mod groq;
mod local;

pub use gemini::GeminiClient;
pub use groq::GroqClient;
pub use local::{LocalSummarizer, LocalTranscriber};

use crate::config::ProviderConfig;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("unexpected response shape: {0}")]
    Parse(String),
}

/// A backend capable of transcribing one canonical waveform segment
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Transcribe a WAV-encoded segment identified by its ordinal
    async fn transcribe(&self, wav: &[u8], ordinal: u32) -> Result<String, ProviderError>;
}

/// A backend capable of summarizing accumulated transcript text
#[async_trait]
pub trait SummarizationProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Produce a short synthesized summary of the full transcript
    async fn summarize(&self, transcript: &str) -> Result<String, ProviderError>;
}

/// Ordered transcription fallback chain.
///
/// Hosted providers are tried in order under a bounded timeout; any failure
/// falls through to the next. The local fallback is a separate field rather
/// than a list entry, so the chain cannot be constructed without it.
pub struct TranscriptionChain {
    providers: Vec<Arc<dyn TranscriptionProvider>>,
    fallback: LocalTranscriber,
    request_timeout: Duration,
}

impl TranscriptionChain {
    pub fn new(providers: Vec<Arc<dyn TranscriptionProvider>>, request_timeout: Duration) -> Self {
        Self {
            providers,
            fallback: LocalTranscriber,
            request_timeout,
        }
    }

    /// Build the chain from configuration and environment credentials.
    ///
    /// A provider joins the chain only when its API key is present, so the
    /// per-call path never probes for configuration.
    pub fn from_config(cfg: &ProviderConfig) -> Self {
        let mut providers: Vec<Arc<dyn TranscriptionProvider>> = Vec::new();

        if let Some(key) = env_key("GROQ_API_KEY") {
            providers.push(Arc::new(GroqClient::new(key, cfg)));
        }
        if let Some(key) = env_key("GEMINI_API_KEY") {
            providers.push(Arc::new(GeminiClient::new(key, cfg)));
        }

        info!(
            "Transcription chain: [{}] + local fallback",
            providers
                .iter()
                .map(|p| p.name())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Self::new(providers, Duration::from_secs(cfg.request_timeout_secs))
    }

    /// Transcribe a segment. Never fails: exhausting the hosted providers
    /// lands on the deterministic local placeholder.
    pub async fn transcribe(&self, wav: &[u8], ordinal: u32) -> String {
        for provider in &self.providers {
            match tokio::time::timeout(self.request_timeout, provider.transcribe(wav, ordinal))
                .await
            {
                Ok(Ok(text)) => return text,
                Ok(Err(e)) => {
                    warn!("{} transcription attempt failed: {}", provider.name(), e);
                }
                Err(_) => {
                    warn!(
                        "{} transcription timed out after {:?}",
                        provider.name(),
                        self.request_timeout
                    );
                }
            }
        }

        self.fallback.placeholder(wav.len(), ordinal)
    }
}

/// Ordered summarization fallback chain, same discipline as transcription
pub struct SummarizationChain {
    providers: Vec<Arc<dyn SummarizationProvider>>,
    fallback: LocalSummarizer,
    request_timeout: Duration,
}

impl SummarizationChain {
    pub fn new(providers: Vec<Arc<dyn SummarizationProvider>>, request_timeout: Duration) -> Self {
        Self {
            providers,
            fallback: LocalSummarizer,
            request_timeout,
        }
    }

    pub fn from_config(cfg: &ProviderConfig) -> Self {
        let mut providers: Vec<Arc<dyn SummarizationProvider>> = Vec::new();

        if let Some(key) = env_key("GROQ_API_KEY") {
            providers.push(Arc::new(GroqClient::new(key, cfg)));
        }
        if let Some(key) = env_key("GEMINI_API_KEY") {
            providers.push(Arc::new(GeminiClient::new(key, cfg)));
        }

        info!(
            "Summarization chain: [{}] + local fallback",
            providers
                .iter()
                .map(|p| p.name())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Self::new(providers, Duration::from_secs(cfg.request_timeout_secs))
    }

    /// Summarize the transcript. Never fails: the local excerpt summarizer
    /// terminates the chain.
    pub async fn summarize(&self, transcript: &str) -> String {
        let trimmed = transcript.trim();
        if trimmed.is_empty() {
            return self.fallback.excerpt(trimmed);
        }

        for provider in &self.providers {
            match tokio::time::timeout(self.request_timeout, provider.summarize(trimmed)).await {
                Ok(Ok(summary)) => return summary,
                Ok(Err(e)) => {
                    warn!("{} summarize attempt failed: {}", provider.name(), e);
                }
                Err(_) => {
                    warn!(
                        "{} summarize timed out after {:?}",
                        provider.name(),
                        self.request_timeout
                    );
                }
            }
        }

        self.fallback.excerpt(trimmed)
    }
}

fn env_key(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(key) if !key.trim().is_empty() => Some(key),
        _ => None,
    }
}
