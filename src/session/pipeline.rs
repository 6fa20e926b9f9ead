use super::events::{EventSink, SessionEvent};
use super::status::{SessionStats, SessionStatus};
use super::store::SessionStore;
use crate::audio::{decode_segment, waveform_to_wav};
use crate::providers::{SummarizationChain, TranscriptionChain};
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, warn};

/// Per-session orchestrator: accepts inbound segments and lifecycle events,
/// and drives the stop-triggered decode -> transcribe -> append pass.
///
/// Segment arrival only persists bytes; transcription happens exclusively
/// during the processing pass, which scans the whole segment directory in
/// ordinal order. The pass is strictly sequential so transcript entries land
/// in recording order regardless of arrival order or provider latency.
pub struct SessionPipeline {
    session_id: String,
    storage_key: String,

    store: SessionStore,
    transcription: Arc<TranscriptionChain>,
    summarization: Arc<SummarizationChain>,
    events: Arc<dyn EventSink>,

    status: RwLock<SessionStatus>,
    started_at: chrono::DateTime<Utc>,
    segments_received: AtomicUsize,

    /// Serializes processing passes; nothing else prevents a double-stop race
    pass_lock: Mutex<()>,
}

impl SessionPipeline {
    pub fn new(
        session_id: String,
        store: SessionStore,
        transcription: Arc<TranscriptionChain>,
        summarization: Arc<SummarizationChain>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        let storage_key = SessionStore::storage_key(&session_id);

        info!("Creating session pipeline: {} ({})", session_id, storage_key);

        Self {
            session_id,
            storage_key,
            store,
            transcription,
            summarization,
            events,
            status: RwLock::new(SessionStatus::Idle),
            started_at: Utc::now(),
            segments_received: AtomicUsize::new(0),
            pass_lock: Mutex::new(()),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub async fn status(&self) -> SessionStatus {
        *self.status.read().await
    }

    pub async fn stats(&self) -> SessionStats {
        let duration = Utc::now().signed_duration_since(self.started_at);

        SessionStats {
            session_id: self.session_id.clone(),
            status: self.status().await,
            started_at: self.started_at,
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            segments_received: self.segments_received.load(Ordering::SeqCst),
        }
    }

    /// Accept one inbound segment: persist it and acknowledge.
    ///
    /// Ingestion is at-most-once and best-effort: an empty payload or a disk
    /// failure is logged and the arrival dropped without a nack. A repeated
    /// ordinal overwrites the previously stored bytes.
    pub async fn handle_segment(&self, ordinal: u32, bytes: &[u8]) {
        if bytes.is_empty() {
            warn!(
                "Dropping empty segment {} for session {}",
                ordinal, self.session_id
            );
            return;
        }

        match self
            .store
            .write_segment(&self.storage_key, ordinal, bytes)
            .await
        {
            Ok(path) => {
                info!(
                    "Saved segment {} for session {} -> {} ({} bytes)",
                    ordinal,
                    self.session_id,
                    path.display(),
                    bytes.len()
                );

                self.segments_received.fetch_add(1, Ordering::SeqCst);

                {
                    let mut status = self.status.write().await;
                    // A segment after completion starts a fresh recording pass;
                    // pause deliberately does not gate ingestion
                    if matches!(
                        *status,
                        SessionStatus::Idle | SessionStatus::Completed | SessionStatus::Error
                    ) {
                        *status = SessionStatus::Recording;
                    }
                }

                self.emit(SessionEvent::SegmentAck {
                    session_id: self.session_id.clone(),
                    ordinal,
                })
                .await;
            }
            Err(e) => {
                warn!(
                    "Failed to persist segment {} for session {}: {} (dropped)",
                    ordinal, self.session_id, e
                );
            }
        }
    }

    /// Pure status transition; segments keep being accepted while paused
    pub async fn handle_pause(&self) {
        {
            let mut status = self.status.write().await;
            if *status != SessionStatus::Processing {
                *status = SessionStatus::Paused;
            }
        }

        self.emit(SessionEvent::Paused {
            session_id: self.session_id.clone(),
        })
        .await;
    }

    pub async fn handle_resume(&self) {
        {
            let mut status = self.status.write().await;
            if *status != SessionStatus::Processing {
                *status = SessionStatus::Recording;
            }
        }

        self.emit(SessionEvent::Resumed {
            session_id: self.session_id.clone(),
        })
        .await;
    }

    /// Run the ordered transcription pass and summarize.
    ///
    /// Passes for one session are serialized; a second stop waits for the
    /// first and then appends its own clearly delimited pass.
    pub async fn handle_stop(&self) {
        let _pass = self.pass_lock.lock().await;

        *self.status.write().await = SessionStatus::Processing;
        self.emit(SessionEvent::ProcessingStarted {
            session_id: self.session_id.clone(),
        })
        .await;

        match self.run_processing_pass().await {
            Ok(summary) => {
                *self.status.write().await = SessionStatus::Completed;
                info!("Session {} processing complete", self.session_id);

                self.emit(SessionEvent::Completed {
                    session_id: self.session_id.clone(),
                    summary,
                })
                .await;
            }
            Err(e) => {
                error!("Session {} processing failed: {:#}", self.session_id, e);
                *self.status.write().await = SessionStatus::Error;

                self.emit(SessionEvent::ProcessingError {
                    session_id: self.session_id.clone(),
                    message: format!("{:#}", e),
                })
                .await;
            }
        }
    }

    /// Idempotent transcript header (re)initialization; returns the stored
    /// file name. Does not touch segment storage.
    pub async fn handle_save(&self, title: Option<&str>) -> Result<String> {
        let title = title.unwrap_or(&self.session_id);
        let file = self
            .store
            .init_transcript(&self.storage_key, title)
            .await
            .context("Failed to initialize transcript")?;

        Ok(file)
    }

    /// The ordered pass: scan stored segments sorted by filename and, for
    /// each in strict ascending order, decode, transcribe, and append its cue
    /// block. A failing segment gets an error marker and the pass continues.
    /// Ends by appending exactly one summary block for this pass.
    async fn run_processing_pass(&self) -> Result<String> {
        let segments = self
            .store
            .list_segments(&self.storage_key)
            .await
            .context("Failed to enumerate stored segments")?;

        if segments.is_empty() {
            warn!("No segments found for session {}", self.session_id);
            self.store
                .append_empty_note(&self.storage_key, &self.session_id)
                .await
                .context("Failed to record empty-session note")?;
        } else {
            self.store
                .begin_pass(&self.storage_key, &self.session_id)
                .await
                .context("Failed to start transcript pass")?;

            for (index, path) in segments.iter().enumerate() {
                let ordinal = index as u32;
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();

                match self.process_segment(path, ordinal).await {
                    Ok(text) => {
                        self.store
                            .append_cue(&self.storage_key, ordinal, &file_name, &text)
                            .await
                            .context("Failed to append transcript entry")?;

                        self.emit(SessionEvent::PartialTranscript {
                            session_id: self.session_id.clone(),
                            ordinal,
                            text,
                        })
                        .await;

                        info!("Processed segment {} for {}", ordinal, self.session_id);
                    }
                    Err(e) => {
                        warn!(
                            "Failed processing segment {} ({}): {:#}",
                            ordinal,
                            path.display(),
                            e
                        );
                        self.store
                            .append_error_marker(&self.storage_key, ordinal, &format!("{:#}", e))
                            .await
                            .context("Failed to append error marker")?;
                    }
                }
            }
        }

        let transcript = self
            .store
            .read_transcript(&self.storage_key)
            .await
            .unwrap_or_default();

        let summary = self.summarization.summarize(&transcript).await;

        // A summary that cannot be persisted still completes the session
        if let Err(e) = self.store.append_summary(&self.storage_key, &summary).await {
            warn!(
                "Failed to append summary for session {}: {}",
                self.session_id, e
            );
        }

        Ok(summary)
    }

    /// One segment: read back, decode to the canonical waveform, re-encode as
    /// WAV, and run the transcription chain. Never parallelized with its
    /// neighbors.
    async fn process_segment(&self, path: &Path, ordinal: u32) -> Result<String> {
        let bytes = self
            .store
            .read_segment(path)
            .await
            .context("Failed to read stored segment")?;

        let waveform = decode_segment(&bytes).context("Failed to decode segment")?;
        let wav = waveform_to_wav(&waveform).context("Failed to encode waveform")?;

        Ok(self.transcription.transcribe(&wav, ordinal).await)
    }

    async fn emit(&self, event: SessionEvent) {
        if let Err(e) = self.events.emit(event).await {
            warn!("Failed to emit event for session {}: {}", self.session_id, e);
        }
    }
}
