use super::{ProviderError, SummarizationProvider, TranscriptionProvider};
use crate::config::ProviderConfig;
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Gemini client using the generateContent endpoint. Audio travels inline as
/// base64 WAV alongside the instruction text.
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum Part {
    Text(String),
    InlineData { mime_type: String, data: String },
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: String, cfg: &ProviderConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            http_client,
            api_key,
            base_url: cfg.gemini_base_url.trim_end_matches('/').to_string(),
            model: cfg.gemini_model.clone(),
        }
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ProviderError::Parse(
                "response contained no text candidates".to_string(),
            ));
        }

        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl TranscriptionProvider for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn transcribe(&self, wav: &[u8], ordinal: u32) -> Result<String, ProviderError> {
        debug!(ordinal, bytes = wav.len(), "Gemini transcription request");

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text(
                        "Transcribe this audio segment verbatim. Return only the spoken text."
                            .to_string(),
                    ),
                    Part::InlineData {
                        mime_type: "audio/wav".to_string(),
                        data: base64::engine::general_purpose::STANDARD.encode(wav),
                    },
                ],
            }],
        };

        self.generate(&request).await
    }
}

#[async_trait]
impl SummarizationProvider for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn summarize(&self, transcript: &str) -> Result<String, ProviderError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part::Text(format!(
                    "Summarize this transcript in 2-6 lines, capturing key points, \
action items and decisions.\n\nTranscript:\n\n{}",
                    transcript
                ))],
            }],
        };

        self.generate(&request).await
    }
}
