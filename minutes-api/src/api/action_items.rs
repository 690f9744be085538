//! Action item endpoints
//!
//! - PATCH /api/action-items/:id
//! - DELETE /api/action-items/:id

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use minutes_common::db::ActionItem;
use serde_json::Value;
use tracing::info;

use super::json_body;
use super::transcripts::{DataResponse, DeletedResponse};
use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::validation::{parse_id, validate_action_item_update};
use crate::AppState;

const UPDATE_FAILED: &str = "An error occurred while updating the item";
const DELETE_FAILED: &str = "An error occurred while deleting the item";

/// PATCH /api/action-items/:id
///
/// Both the id and the body are validated before storage is touched.
pub async fn update_action_item(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<DataResponse<ActionItem>>> {
    let id = parse_id(&raw_id)?;
    let body = json_body(payload)?;
    let patch = validate_action_item_update(&body)?;

    let data = db::update_item(&state.db, id, &patch)
        .await
        .map_err(|e| ApiError::storage(UPDATE_FAILED, e))?;

    Ok(Json(DataResponse { data }))
}

/// DELETE /api/action-items/:id
pub async fn delete_action_item(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<DeletedResponse>> {
    let id = parse_id(&raw_id)?;

    db::delete_item(&state.db, id)
        .await
        .map_err(|e| ApiError::storage(DELETE_FAILED, e))?;

    info!(action_item_id = id, "Action item deleted");
    Ok(Json(DeletedResponse { deleted_id: id }))
}
