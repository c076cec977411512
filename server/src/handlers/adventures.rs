//! `/api/adventures` handlers.

use api::models::{CreateAdventure, UpdateAdventure};
use api::services::{adventures, Page};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::state::AppState;

/// Query string for the adventure list: the usual skip/take window plus an
/// optional name search.
#[derive(Debug, Default, Deserialize)]
pub struct AdventuresQuery {
    pub name: Option<String>,
    pub skip: Option<i64>,
    pub take: Option<i64>,
}

/// `GET /api/adventures`
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<AdventuresQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = Page {
        skip: query.skip,
        take: query.take,
    };
    let adventures = match query.name.as_deref() {
        Some(name) => adventures::search_by_name(&state.pool, name).await,
        None => adventures::list(&state.pool, page).await,
    }
    .map_err(ApiError::internal("Failed to fetch adventures"))?;
    Ok(Json(adventures))
}

/// `POST /api/adventures`
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateAdventure>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(data) = payload.map_err(ApiError::internal("Failed to create adventure"))?;
    let adventure = adventures::create(&state.pool, data)
        .await
        .map_err(ApiError::internal("Failed to create adventure"))?;
    Ok((StatusCode::CREATED, Json(adventure)))
}

/// `GET /api/adventures/:id`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let adventure = adventures::get(&state.pool, id)
        .await
        .map_err(ApiError::not_found_or(
            "Adventure not found",
            "Failed to fetch adventure",
        ))?;
    Ok(Json(adventure))
}

/// `PUT /api/adventures/:id`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateAdventure>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(data) = payload.map_err(ApiError::internal("Failed to update adventure"))?;
    let adventure = adventures::update(&state.pool, id, data)
        .await
        .map_err(ApiError::internal("Failed to update adventure"))?;
    Ok(Json(adventure))
}

/// `DELETE /api/adventures/:id`
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    adventures::delete(&state.pool, id)
        .await
        .map_err(ApiError::internal("Failed to delete adventure"))?;
    Ok(Json(json!({ "message": "Adventure deleted successfully" })))
}
