use super::state::AppState;
use crate::session::{SessionStore, StoreError};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    pub session_id: Option<String>,

    /// Optional display title written into the transcript header
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub ok: bool,
    pub file: String,
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub session_id: Option<String>,

    /// Download file extension (default: txt); the transcript bytes are the
    /// same plain text either way
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub items: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /session/save
/// (Re)initialize the transcript header for a session
pub async fn save_session(
    State(state): State<AppState>,
    Json(req): Json<SaveRequest>,
) -> impl IntoResponse {
    let Some(session_id) = req.session_id.filter(|id| !id.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "session_id missing".to_string(),
            }),
        )
            .into_response();
    };

    let pipeline = state.registry.get_or_create(&session_id).await;

    match pipeline.handle_save(req.title.as_deref()).await {
        Ok(file) => {
            info!("Saved transcript header for session {}", session_id);
            (StatusCode::OK, Json(SaveResponse { ok: true, file })).into_response()
        }
        Err(e) => {
            error!("Session save error: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("save failed: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// GET /session/download?session_id=...&format=txt
/// Download the transcript as an attachment
pub async fn download_session(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> impl IntoResponse {
    let Some(session_id) = query.session_id.filter(|id| !id.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "session_id missing").into_response();
    };

    let format = query.format.unwrap_or_else(|| "txt".to_string());
    let storage_key = SessionStore::storage_key(&session_id);

    match state.store().read_transcript(&storage_key).await {
        Ok(transcript) => {
            let disposition = format!("attachment; filename=\"{}.{}\"", session_id, format);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                transcript,
            )
                .into_response()
        }
        Err(StoreError::TranscriptMissing) => {
            warn!(
                "Download requested but no transcript for session {}",
                session_id
            );
            (StatusCode::NOT_FOUND, "No transcript found").into_response()
        }
        Err(e) => {
            error!("Session download error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "download failed").into_response()
        }
    }
}

/// GET /session/list
/// Known session storage keys
pub async fn list_sessions(State(state): State<AppState>) -> impl IntoResponse {
    match state.store().list_sessions().await {
        Ok(items) => (StatusCode::OK, Json(ListResponse { items })).into_response(),
        Err(e) => {
            error!("Session list error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("list failed: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// GET /session/:session_id/status
/// Stats for an active session pipeline
pub async fn get_session_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match state.registry.get(&session_id).await {
        Some(pipeline) => (StatusCode::OK, Json(pipeline.stats().await)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Session {} not found", session_id),
            }),
        )
            .into_response(),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
