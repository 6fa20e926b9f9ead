use base64::Engine;
use chrono::Utc;
use sha1::{Digest, Sha1};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::config::StorageConfig;

/// Raw segments keep their original container format on disk
pub const SEGMENT_EXTENSION: &str = "webm";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no transcript stored for session")]
    TranscriptMissing,
}

/// Durable per-session storage: a directory of raw received segments plus an
/// append-only transcript file. The store is the only writer of these bytes.
#[derive(Debug, Clone)]
pub struct SessionStore {
    segments_root: PathBuf,
    sessions_root: PathBuf,
}

impl SessionStore {
    pub fn new(segments_root: PathBuf, sessions_root: PathBuf) -> Self {
        Self {
            segments_root,
            sessions_root,
        }
    }

    pub fn from_config(cfg: &StorageConfig) -> Self {
        Self::new(cfg.segments_dir.clone(), cfg.sessions_dir.clone())
    }

    /// Derive the filesystem-safe storage key for a client-supplied session
    /// identifier: a reversible base64url encoding plus a short content hash
    /// suffix. Stable, collision-resistant, no central registry needed.
    pub fn storage_key(session_id: &str) -> String {
        let id = if session_id.is_empty() {
            "unnamed"
        } else {
            session_id
        };

        let encoded = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(id.as_bytes());
        let digest = Sha1::digest(id.as_bytes());
        let short: String = digest
            .iter()
            .take(4)
            .map(|b| format!("{:02x}", b))
            .collect();

        format!("{}_{}", encoded, short)
    }

    /// Fixed-width zero-padded segment file name, so lexicographic order
    /// equals numeric ordinal order
    pub fn segment_file_name(ordinal: u32) -> String {
        format!("segment-{:06}.{}", ordinal, SEGMENT_EXTENSION)
    }

    pub fn segment_dir(&self, storage_key: &str) -> PathBuf {
        self.segments_root.join(storage_key)
    }

    pub fn transcript_file_name(storage_key: &str) -> String {
        format!("{}.txt", storage_key)
    }

    pub fn transcript_path(&self, storage_key: &str) -> PathBuf {
        self.sessions_root
            .join(Self::transcript_file_name(storage_key))
    }

    /// Persist one raw segment. A repeated ordinal overwrites the previous
    /// bytes (last write wins).
    pub async fn write_segment(
        &self,
        storage_key: &str,
        ordinal: u32,
        bytes: &[u8],
    ) -> Result<PathBuf, StoreError> {
        let dir = self.segment_dir(storage_key);
        fs::create_dir_all(&dir).await.map_err(|e| io_err(&dir, e))?;

        let path = dir.join(Self::segment_file_name(ordinal));
        fs::write(&path, bytes)
            .await
            .map_err(|e| io_err(&path, e))?;

        Ok(path)
    }

    pub async fn read_segment(&self, path: &Path) -> Result<Vec<u8>, StoreError> {
        fs::read(path).await.map_err(|e| io_err(path, e))
    }

    /// Enumerate stored segments in ascending ordinal order. A session with
    /// no directory simply has no segments.
    pub async fn list_segments(&self, storage_key: &str) -> Result<Vec<PathBuf>, StoreError> {
        let dir = self.segment_dir(storage_key);

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_err(&dir, e)),
        };

        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_err(&dir, e))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some(SEGMENT_EXTENSION) {
                paths.push(path);
            }
        }

        paths.sort();
        Ok(paths)
    }

    /// (Re)initialize the transcript with a fresh header. Idempotent; used by
    /// the save endpoint.
    pub async fn init_transcript(
        &self,
        storage_key: &str,
        title: &str,
    ) -> Result<String, StoreError> {
        self.ensure_sessions_root().await?;

        let path = self.transcript_path(storage_key);
        fs::write(&path, header(title))
            .await
            .map_err(|e| io_err(&path, e))?;

        info!("Initialized transcript {}", path.display());
        Ok(Self::transcript_file_name(storage_key))
    }

    /// Prepare the transcript for a processing pass: write the header when
    /// the file is new, append a visible pass separator when it is not.
    /// Repeated passes are additive, never destructive.
    pub async fn begin_pass(&self, storage_key: &str, title: &str) -> Result<(), StoreError> {
        self.ensure_sessions_root().await?;

        let path = self.transcript_path(storage_key);
        if fs::try_exists(&path).await.map_err(|e| io_err(&path, e))? {
            self.append(
                storage_key,
                &format!("\n\n--- new processing pass: {} ---\n", Utc::now().to_rfc3339()),
            )
            .await
        } else {
            fs::write(&path, header(title))
                .await
                .map_err(|e| io_err(&path, e))
        }
    }

    /// Append one segment's cue block: ordinal tag, source file name, text
    pub async fn append_cue(
        &self,
        storage_key: &str,
        ordinal: u32,
        file_name: &str,
        text: &str,
    ) -> Result<(), StoreError> {
        self.append(
            storage_key,
            &format!("\n[segment {} - {}]\n{}\n", ordinal, file_name, text),
        )
        .await
    }

    /// Append an error marker in place of a failed segment's transcript
    pub async fn append_error_marker(
        &self,
        storage_key: &str,
        ordinal: u32,
        message: &str,
    ) -> Result<(), StoreError> {
        self.append(
            storage_key,
            &format!("\n[segment {} processing error] {}\n", ordinal, message),
        )
        .await
    }

    /// Append the note recorded when a stop arrives with no stored segments
    pub async fn append_empty_note(
        &self,
        storage_key: &str,
        title: &str,
    ) -> Result<(), StoreError> {
        self.ensure_sessions_root().await?;
        self.append(
            storage_key,
            &format!("{}(No audio segments found)\n", header(title)),
        )
        .await
    }

    /// Append the pass-terminating summary block
    pub async fn append_summary(&self, storage_key: &str, summary: &str) -> Result<(), StoreError> {
        self.append(storage_key, &format!("\n\n{}\n", summary)).await
    }

    pub async fn read_transcript(&self, storage_key: &str) -> Result<String, StoreError> {
        let path = self.transcript_path(storage_key);
        match fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::TranscriptMissing)
            }
            Err(e) => Err(io_err(&path, e)),
        }
    }

    /// Known session storage keys: the entries of the segments root
    pub async fn list_sessions(&self) -> Result<Vec<String>, StoreError> {
        let mut entries = match fs::read_dir(&self.segments_root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_err(&self.segments_root, e)),
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_err(&self.segments_root, e))?
        {
            keys.push(entry.file_name().to_string_lossy().into_owned());
        }

        keys.sort();
        Ok(keys)
    }

    async fn ensure_sessions_root(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.sessions_root)
            .await
            .map_err(|e| io_err(&self.sessions_root, e))
    }

    async fn append(&self, storage_key: &str, text: &str) -> Result<(), StoreError> {
        let path = self.transcript_path(storage_key);

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| io_err(&path, e))?;

        file.write_all(text.as_bytes())
            .await
            .map_err(|e| io_err(&path, e))?;

        Ok(())
    }
}

fn header(title: &str) -> String {
    format!("Session: {}\nSaved: {}\n\n", title, Utc::now().to_rfc3339())
}

fn io_err(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}
