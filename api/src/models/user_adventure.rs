//! Join records linking users to the adventures they have started.
//!
//! `(user_id, adventure_id)` carries no uniqueness constraint; only
//! application convention keeps it to one row per pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::adventure::Adventure;
use super::user::User;

/// Full user-adventure link from the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserAdventure {
    pub id: i64,
    pub user_id: i64,
    pub adventure_id: i64,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Payload for `POST /api/user-adventures`. `status` falls back to
/// `"in-progress"` when omitted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserAdventure {
    pub user_id: i64,
    pub adventure_id: i64,
    pub status: Option<String>,
}

/// Payload for `PUT /api/user-adventures/:id`. Omitted fields keep their
/// stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserAdventure {
    pub status: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Link row with whichever sides of the relation the endpoint loads.
///
/// A link listed under a user carries only the adventure, a link listed
/// under an adventure carries only the user, and the user-adventure
/// endpoints themselves carry both. Absent sides are omitted from the JSON
/// entirely rather than serialized as null.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAdventureDetail {
    #[serde(flatten)]
    pub link: UserAdventure,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adventure: Option<Adventure>,
}
