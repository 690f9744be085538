//! Transcript endpoints
//!
//! - POST /api/processTranscript
//! - GET /api/history
//! - GET /api/transcript/:id
//! - DELETE /api/transcript/:id

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use minutes_common::db::{ActionItem, HistoryEntry};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::json_body;
use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::extraction::ExtractionPipeline;
use crate::validation::{parse_id, validate_transcript_request};
use crate::AppState;

const PROCESS_FAILED: &str = "An error occurred while parsing the transcript";
const HISTORY_FAILED: &str = "An error occurred while accessing the history";
const ITEMS_FAILED: &str = "An error occurred while accessing the transcript items";
const DELETE_FAILED: &str = "An error occurred while deleting the transcript";

/// Successful transcript processing
#[derive(Debug, Serialize)]
pub struct ProcessTranscriptResponse {
    pub message: String,
    pub transcript_id: i64,
    pub data: Vec<ActionItem>,
}

/// `{data: [...]}` wrapper used by list endpoints
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// `{deleted_id: id}` body of delete endpoints
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted_id: i64,
}

/// POST /api/processTranscript
///
/// Validates, extracts, then stores the transcript with its items. Nothing is
/// stored unless extraction succeeds.
pub async fn process_transcript(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<ProcessTranscriptResponse>> {
    let body = json_body(payload)?;
    let request = validate_transcript_request(&body)?;

    // Detached so a client disconnect does not abort the model call or the insert
    let transcript = tokio::spawn(async move {
        let pipeline = ExtractionPipeline::new(state.llm.as_ref(), &state.models.extraction);
        let items = pipeline
            .extract(&request.transcript)
            .await
            .map_err(|e| ApiError::internal(PROCESS_FAILED, e))?;

        db::create_transcript_with_items(&state.db, &request.transcript, &items)
            .await
            .map_err(|e| ApiError::internal(PROCESS_FAILED, e))
    })
    .await
    .map_err(|e| ApiError::internal(PROCESS_FAILED, e))??;

    info!(
        transcript_id = transcript.id,
        item_count = transcript.action_items.len(),
        "Transcript processed"
    );

    Ok(Json(ProcessTranscriptResponse {
        message: "Transcript processed successfully".to_string(),
        transcript_id: transcript.id,
        data: transcript.action_items,
    }))
}

/// GET /api/history
pub async fn get_history(
    State(state): State<AppState>,
) -> ApiResult<Json<DataResponse<Vec<HistoryEntry>>>> {
    let data = db::list_recent_transcripts(&state.db, db::DEFAULT_HISTORY_LIMIT)
        .await
        .map_err(|e| ApiError::internal(HISTORY_FAILED, e))?;

    Ok(Json(DataResponse { data }))
}

/// GET /api/transcript/:id
///
/// Unknown transcripts answer with an empty list.
pub async fn get_transcript_items(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<DataResponse<Vec<ActionItem>>>> {
    let id = parse_id(&raw_id)?;

    let data = db::list_items_for_transcript(&state.db, id)
        .await
        .map_err(|e| ApiError::internal(ITEMS_FAILED, e))?;

    Ok(Json(DataResponse { data }))
}

/// DELETE /api/transcript/:id
///
/// Removes the transcript together with all of its action items.
pub async fn delete_transcript(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<DeletedResponse>> {
    let id = parse_id(&raw_id)?;

    db::delete_transcript(&state.db, id)
        .await
        .map_err(|e| ApiError::storage(DELETE_FAILED, e))?;

    info!(transcript_id = id, "Transcript deleted");
    Ok(Json(DeletedResponse { deleted_id: id }))
}
