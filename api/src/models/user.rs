//! # User model
//!
//! Defines the representations of a Thunderbolts player account:
//!
//! ## [`User`]
//!
//! The complete database row from the `users` table. It derives
//! [`sqlx::FromRow`] so it can be loaded directly from queries and contains
//! every column:
//!
//! - `id` - primary key (`BIGSERIAL`).
//! - `username`, `email` - unique identity fields, immutable after creation.
//! - `phone_number` - contact field captured at registration.
//! - `level`, `star_score`, `gems`, `penalty_bar` - game-state counters.
//! - `created_at` - audit timestamp, set by the database.
//!
//! ## [`UserSummary`]
//!
//! A trimmed projection embedded inside profile and settings responses,
//! where repeating the full row would bloat the payload.
//!
//! ## [`UserDetail`]
//!
//! A [`User`] together with its eagerly loaded relations: the optional
//! profile, the optional settings row, and every adventure link (newest
//! first) with its adventure attached. This is the shape the user endpoints
//! respond with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::profile::UserProfile;
use super::settings::UserSettings;
use super::user_adventure::UserAdventureDetail;

/// Full user record from the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub phone_number: String,
    pub email: String,
    pub level: i32,
    pub star_score: i32,
    pub gems: i32,
    pub penalty_bar: i32,
    pub created_at: DateTime<Utc>,
}

/// Short user projection embedded in related records.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub level: i32,
    pub star_score: i32,
}

/// Payload for `POST /api/users`. Counters fall back to their column
/// defaults when omitted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub username: String,
    pub phone_number: String,
    pub email: String,
    pub level: Option<i32>,
    pub star_score: Option<i32>,
    pub gems: Option<i32>,
    pub penalty_bar: Option<i32>,
}

/// Payload for `PUT /api/users/:id`. Identity fields (`username`,
/// `phone_number`, `email`) cannot be changed here; omitted counters keep
/// their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    pub level: Option<i32>,
    pub star_score: Option<i32>,
    pub gems: Option<i32>,
    pub penalty_bar: Option<i32>,
}

/// User row plus its eagerly loaded relations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    pub profile: Option<UserProfile>,
    pub settings: Option<UserSettings>,
    pub user_adventures: Vec<UserAdventureDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Adventure, UserAdventure};
    use chrono::TimeZone;
    use serde_json::json;

    fn sample_user() -> User {
        User {
            id: 7,
            username: "ace".into(),
            phone_number: "555-0100".into(),
            email: "ace@example.com".into(),
            level: 2,
            star_score: 30,
            gems: 5,
            penalty_bar: 0,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn user_serializes_with_camel_case_keys() {
        let value = serde_json::to_value(sample_user()).unwrap();
        assert_eq!(value["phoneNumber"], json!("555-0100"));
        assert_eq!(value["starScore"], json!(30));
        assert_eq!(value["penaltyBar"], json!(0));
        assert!(value.get("phone_number").is_none());
    }

    #[test]
    fn detail_flattens_the_row_and_keeps_relation_keys() {
        let user = sample_user();
        let link = UserAdventure {
            id: 1,
            user_id: user.id,
            adventure_id: 3,
            status: "in-progress".into(),
            started_at: user.created_at,
            completed_at: None,
        };
        let detail = UserDetail {
            user,
            profile: None,
            settings: None,
            user_adventures: vec![UserAdventureDetail {
                link,
                user: None,
                adventure: Some(Adventure {
                    id: 3,
                    name: "Crystal Cavern".into(),
                    description: None,
                }),
            }],
        };

        let value = serde_json::to_value(&detail).unwrap();
        // The row's columns sit at the top level next to the relations.
        assert_eq!(value["id"], json!(7));
        assert_eq!(value["username"], json!("ace"));
        assert_eq!(value["profile"], json!(null));
        assert_eq!(value["settings"], json!(null));

        let links = value["userAdventures"].as_array().unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0]["adventureId"], json!(3));
        assert_eq!(links[0]["adventure"]["name"], json!("Crystal Cavern"));
        // The unloaded side is omitted entirely, not serialized as null.
        assert!(links[0].get("user").is_none());
        assert_eq!(links[0]["completedAt"], json!(null));
    }
}
