//! `/api/settings` handlers: whole-document CRUD keyed by the owning user,
//! plus the per-key routes under `/keys/:key`.

use api::models::{CreateUserSettings, SettingValue, SettingsDoc};
use api::services::settings;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use super::ListQuery;
use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/settings`
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let records = settings::list(&state.pool, query.page())
        .await
        .map_err(ApiError::internal("Failed to fetch settings"))?;
    Ok(Json(records))
}

/// `POST /api/settings`
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserSettings>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(data) = payload.map_err(ApiError::internal("Failed to create settings"))?;
    let record = settings::create(&state.pool, data)
        .await
        .map_err(ApiError::internal("Failed to create settings"))?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /api/settings/:userId`
pub async fn get(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let record = settings::get_by_user(&state.pool, user_id)
        .await
        .map_err(ApiError::not_found_or(
            "Settings not found",
            "Failed to fetch settings",
        ))?;
    Ok(Json(record))
}

/// `PUT /api/settings/:userId`
///
/// Replaces the whole document; a user without a settings row gets one
/// created.
pub async fn update(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    payload: Result<Json<SettingsDoc>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(doc) = payload.map_err(ApiError::internal("Failed to update settings"))?;
    let record = settings::upsert(&state.pool, user_id, doc)
        .await
        .map_err(ApiError::internal("Failed to update settings"))?;
    Ok(Json(record))
}

/// `DELETE /api/settings/:userId`
pub async fn delete(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    settings::delete_by_user(&state.pool, user_id)
        .await
        .map_err(ApiError::internal("Failed to delete settings"))?;
    Ok(Json(json!({ "message": "Settings deleted successfully" })))
}

/// `GET /api/settings/:userId/keys/:key`
///
/// Responds with the bare JSON value bound to the key.
pub async fn get_key(
    State(state): State<AppState>,
    Path((user_id, key)): Path<(i64, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let value = settings::get_key(&state.pool, user_id, &key)
        .await
        .map_err(ApiError::internal("Failed to fetch setting"))?
        .ok_or(ApiError::NotFound("Setting not found"))?;
    Ok(Json(value))
}

/// `PUT /api/settings/:userId/keys/:key`
///
/// The request body is the bare JSON value to bind. Creates the settings
/// row on first write.
pub async fn set_key(
    State(state): State<AppState>,
    Path((user_id, key)): Path<(i64, String)>,
    payload: Result<Json<SettingValue>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(value) = payload.map_err(ApiError::internal("Failed to update setting"))?;
    let record = settings::set_key(&state.pool, user_id, &key, value)
        .await
        .map_err(ApiError::internal("Failed to update setting"))?;
    Ok(Json(record))
}

/// `DELETE /api/settings/:userId/keys/:key`
///
/// Responds with the refreshed record; deleting an absent key succeeds.
pub async fn delete_key(
    State(state): State<AppState>,
    Path((user_id, key)): Path<(i64, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let record = settings::delete_key(&state.pool, user_id, &key)
        .await
        .map_err(ApiError::internal("Failed to delete setting"))?;
    Ok(Json(record))
}
