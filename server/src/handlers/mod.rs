//! HTTP handlers, one module per entity.
//!
//! Every handler parses the request, makes exactly one service call, and
//! maps the outcome onto the fixed response contract: a 2xx JSON body on
//! success, `{"error": <fixed message>}` with 404 or 500 otherwise. A
//! malformed JSON payload is folded into the same 500 message as a store
//! failure rather than reported separately.

pub mod adventures;
pub mod profiles;
pub mod settings;
pub mod user_adventures;
pub mod users;

use api::services::Page;
use axum::extract::State;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Optional skip/take window accepted by every list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub skip: Option<i64>,
    pub take: Option<i64>,
}

impl ListQuery {
    pub fn page(&self) -> Page {
        Page {
            skip: self.skip,
            take: self.take,
        }
    }
}

/// Process liveness probe.
pub async fn healthz() -> &'static str {
    "ok"
}

/// Store readiness probe; round-trips a trivial query.
pub async fn readyz(State(state): State<AppState>) -> Result<&'static str, ApiError> {
    api::db::ping(&state.pool)
        .await
        .map_err(ApiError::internal("Database unavailable"))?;
    Ok("ok")
}
