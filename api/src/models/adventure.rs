//! Adventure catalog entries and their response shapes.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::user_adventure::UserAdventureDetail;

/// Full adventure record from the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Adventure {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Payload for `POST /api/adventures`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdventure {
    pub name: String,
    pub description: Option<String>,
}

/// Payload for `PUT /api/adventures/:id`. Omitted fields keep their stored
/// value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdventure {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Adventure row plus every user link (newest first), each carrying the
/// linked user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdventureDetail {
    #[serde(flatten)]
    pub adventure: Adventure,
    pub user_adventures: Vec<UserAdventureDetail>,
}
