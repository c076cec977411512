//! Per-user profile records (display name, avatar, bio). One row per user,
//! enforced by a unique constraint on `user_id`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::user::UserSummary;

/// Full profile record from the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub user_id: i64,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}

/// Payload for `POST /api/profiles`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserProfile {
    pub user_id: i64,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}

/// Payload for `PUT /api/profiles/:userId`. Omitted fields keep their
/// stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserProfile {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}

/// Profile row plus the owning user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileDetail {
    #[serde(flatten)]
    pub record: UserProfile,
    pub user: Option<UserSummary>,
}
