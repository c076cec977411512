//! `/api/user-adventures` handlers.

use api::models::{CreateUserAdventure, UpdateUserAdventure};
use api::services::{user_adventures, Page};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::state::AppState;

/// Query string for the link list. `userId` narrows to one user (optionally
/// by `status`), `adventureId` narrows to one adventure, and with neither
/// the full listing is paged by skip/take.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAdventuresQuery {
    pub user_id: Option<i64>,
    pub adventure_id: Option<i64>,
    pub status: Option<String>,
    pub skip: Option<i64>,
    pub take: Option<i64>,
}

/// `GET /api/user-adventures`
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<UserAdventuresQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let links = match (query.user_id, query.adventure_id, query.status.as_deref()) {
        (Some(user_id), _, Some(status)) => {
            user_adventures::list_by_status(&state.pool, user_id, status).await
        }
        (Some(user_id), _, None) => user_adventures::list_by_user(&state.pool, user_id).await,
        (None, Some(adventure_id), _) => {
            user_adventures::list_by_adventure(&state.pool, adventure_id).await
        }
        (None, None, _) => {
            let page = Page {
                skip: query.skip,
                take: query.take,
            };
            user_adventures::list(&state.pool, page).await
        }
    }
    .map_err(ApiError::internal("Failed to fetch user adventures"))?;
    Ok(Json(links))
}

/// `POST /api/user-adventures`
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserAdventure>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(data) = payload.map_err(ApiError::internal("Failed to create user adventure"))?;
    let link = user_adventures::create(&state.pool, data)
        .await
        .map_err(ApiError::internal("Failed to create user adventure"))?;
    Ok((StatusCode::CREATED, Json(link)))
}

/// `GET /api/user-adventures/:id`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let link = user_adventures::get(&state.pool, id)
        .await
        .map_err(ApiError::not_found_or(
            "User adventure not found",
            "Failed to fetch user adventure",
        ))?;
    Ok(Json(link))
}

/// `PUT /api/user-adventures/:id`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateUserAdventure>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(data) = payload.map_err(ApiError::internal("Failed to update user adventure"))?;
    let link = user_adventures::update(&state.pool, id, data)
        .await
        .map_err(ApiError::internal("Failed to update user adventure"))?;
    Ok(Json(link))
}

/// `POST /api/user-adventures/:id/complete`
pub async fn complete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let link = user_adventures::complete(&state.pool, id)
        .await
        .map_err(ApiError::internal("Failed to complete user adventure"))?;
    Ok(Json(link))
}

/// `DELETE /api/user-adventures/:id`
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    user_adventures::delete(&state.pool, id)
        .await
        .map_err(ApiError::internal("Failed to delete user adventure"))?;
    Ok(Json(
        json!({ "message": "User adventure deleted successfully" }),
    ))
}
