//! `/api/profiles` handlers. Everything after creation is keyed by the
//! owning user's id, not the profile row id.

use api::models::{CreateUserProfile, UpdateUserProfile};
use api::services::profiles;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::ApiError;
use crate::state::AppState;

/// `POST /api/profiles`
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserProfile>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(data) = payload.map_err(ApiError::internal("Failed to create profile"))?;
    let profile = profiles::create(&state.pool, data)
        .await
        .map_err(ApiError::internal("Failed to create profile"))?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// `GET /api/profiles/:userId`
pub async fn get(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = profiles::get_by_user(&state.pool, user_id)
        .await
        .map_err(ApiError::not_found_or(
            "Profile not found",
            "Failed to fetch profile",
        ))?;
    Ok(Json(profile))
}

/// `PUT /api/profiles/:userId`
///
/// Upsert: a user without a profile gets one created from the payload.
pub async fn update(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    payload: Result<Json<UpdateUserProfile>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(data) = payload.map_err(ApiError::internal("Failed to update profile"))?;
    let profile = profiles::upsert(&state.pool, user_id, data)
        .await
        .map_err(ApiError::internal("Failed to update profile"))?;
    Ok(Json(profile))
}

/// `DELETE /api/profiles/:userId`
pub async fn delete(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    profiles::delete_by_user(&state.pool, user_id)
        .await
        .map_err(ApiError::internal("Failed to delete profile"))?;
    Ok(Json(json!({ "message": "Profile deleted successfully" })))
}
