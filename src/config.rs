use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub nats: NatsConfig,
    pub storage: StorageConfig,
    pub audio: AudioConfig,
    pub providers: ProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NatsConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory for raw received segments (one subdirectory per session)
    pub segments_dir: PathBuf,
    /// Root directory for transcript files (one file per session)
    pub sessions_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Canonical waveform sample rate (Whisper-style STT expects 16kHz)
    pub sample_rate: u32,
    /// Canonical channel count (1 = mono)
    pub channels: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Upper bound on a single hosted provider call; expiry falls through the chain
    pub request_timeout_secs: u64,
    pub groq_base_url: String,
    pub groq_transcription_model: String,
    pub groq_summary_model: String,
    pub gemini_base_url: String,
    pub gemini_model: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "scribe-server".to_string(),
            http: HttpConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 4000,
        }
    }
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            url: "nats://localhost:4222".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let tmp = std::env::temp_dir();
        Self {
            segments_dir: tmp.join("scribe_segments"),
            sessions_dir: tmp.join("scribe_sessions"),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 60,
            groq_base_url: "https://api.groq.com".to_string(),
            groq_transcription_model: "whisper-large-v3".to_string(),
            groq_summary_model: "llama-3.3-70b-versatile".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            gemini_model: "gemini-2.0-flash".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            nats: NatsConfig::default(),
            storage: StorageConfig::default(),
            audio: AudioConfig::default(),
            providers: ProviderConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from an optional TOML file plus `SCRIBE_*`
    /// environment overrides (e.g. `SCRIBE_NATS__URL`).
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("SCRIBE").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
