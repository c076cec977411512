//! `/api/users` handlers.

use api::models::{CreateUser, UpdateUser};
use api::services::users;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use super::ListQuery;
use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/users`
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let users = users::list(&state.pool, query.page())
        .await
        .map_err(ApiError::internal("Failed to fetch users"))?;
    Ok(Json(users))
}

/// `POST /api/users`
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateUser>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(data) = payload.map_err(ApiError::internal("Failed to create user"))?;
    let user = users::create(&state.pool, data)
        .await
        .map_err(ApiError::internal("Failed to create user"))?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /api/users/:id`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user = users::get(&state.pool, id)
        .await
        .map_err(ApiError::not_found_or(
            "User not found",
            "Failed to fetch user",
        ))?;
    Ok(Json(user))
}

/// `PUT /api/users/:id`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateUser>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(data) = payload.map_err(ApiError::internal("Failed to update user"))?;
    let user = users::update(&state.pool, id, data)
        .await
        .map_err(ApiError::internal("Failed to update user"))?;
    Ok(Json(user))
}

/// `DELETE /api/users/:id`
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    users::delete(&state.pool, id)
        .await
        .map_err(ApiError::internal("Failed to delete user"))?;
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
