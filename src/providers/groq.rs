use super::{ProviderError, SummarizationProvider, TranscriptionProvider};
use crate::config::ProviderConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const SUMMARY_SYSTEM_PROMPT: &str = "You are a concise summarizer. Produce a short summary \
(2-6 lines) capturing key points, action items and decisions.";

/// Groq client using the OpenAI-compatible endpoints: Whisper-style audio
/// transcription plus chat-completion summarization.
pub struct GroqClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    transcription_model: String,
    summary_model: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl GroqClient {
    pub fn new(api_key: String, cfg: &ProviderConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            http_client,
            api_key,
            base_url: cfg.groq_base_url.trim_end_matches('/').to_string(),
            transcription_model: cfg.groq_transcription_model.clone(),
            summary_model: cfg.groq_summary_model.clone(),
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl TranscriptionProvider for GroqClient {
    fn name(&self) -> &'static str {
        "groq"
    }

    async fn transcribe(&self, wav: &[u8], ordinal: u32) -> Result<String, ProviderError> {
        let url = format!("{}/openai/v1/audio/transcriptions", self.base_url);

        debug!(ordinal, bytes = wav.len(), "Groq transcription request");

        let part = reqwest::multipart::Part::bytes(wav.to_vec())
            .file_name(format!("segment-{:06}.wav", ordinal))
            .mime_str("audio/wav")
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.transcription_model.clone());

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let response = Self::check_status(response).await?;

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(parsed.text.trim().to_string())
    }
}

#[async_trait]
impl SummarizationProvider for GroqClient {
    fn name(&self) -> &'static str {
        "groq"
    }

    async fn summarize(&self, transcript: &str) -> Result<String, ProviderError> {
        let url = format!("{}/openai/v1/chat/completions", self.base_url);

        let request = ChatRequest {
            model: self.summary_model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SUMMARY_SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: format!(
                        "Transcript:\n\n{}\n\nGive a brief summary and 1-3 action items.",
                        transcript
                    ),
                },
            ],
            temperature: 0.2,
            max_tokens: 400,
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let response = Self::check_status(response).await?;

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ProviderError::Parse("response contained no choices".to_string()))?;

        Ok(content.trim().to_string())
    }
}
