//! # Entity services
//!
//! One module per entity, each a set of free functions over the store:
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`users`] | Account CRUD plus game-counter updates |
//! | [`adventures`] | Adventure catalog CRUD and name search |
//! | [`user_adventures`] | User/adventure links, status filters, completion |
//! | [`profiles`] | One-to-one profile records with upsert semantics |
//! | [`settings`] | Whole-document and per-key settings operations |
//!
//! Every function takes the pool as its first argument; no service holds
//! connection state of its own. Single-record lookups return
//! [`Error::NotFound`](crate::error::Error::NotFound) when the row is
//! absent, and the HTTP layer decides what that means per endpoint.

pub mod adventures;
pub mod profiles;
pub mod settings;
pub mod user_adventures;
pub mod users;

use std::collections::HashMap;

use sqlx::PgPool;

use crate::error::Result;
use crate::models::UserSummary;

/// Optional skip/take window applied to list queries. Both sides default
/// to "unbounded".
#[derive(Debug, Clone, Copy, Default)]
pub struct Page {
    pub skip: Option<i64>,
    pub take: Option<i64>,
}

/// Load the short projection of one user, if it exists.
pub(crate) async fn user_summary(pool: &PgPool, user_id: i64) -> Result<Option<UserSummary>> {
    let user: Option<UserSummary> = sqlx::query_as(
        "SELECT id, username, email, level, star_score FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Load the short projections of a batch of users, keyed by id.
pub(crate) async fn user_summaries(
    pool: &PgPool,
    user_ids: &[i64],
) -> Result<HashMap<i64, UserSummary>> {
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let users: Vec<UserSummary> = sqlx::query_as(
        "SELECT id, username, email, level, star_score FROM users WHERE id = ANY($1)",
    )
    .bind(user_ids)
    .fetch_all(pool)
    .await?;
    Ok(users.into_iter().map(|u| (u.id, u)).collect())
}
