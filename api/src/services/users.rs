//! User account operations.
//!
//! Every read returns a [`UserDetail`]: the row plus its profile, settings,
//! and adventure links in one shape. Relations are loaded in batches
//! (`WHERE user_id = ANY($1)`) so listing N users costs four queries, not
//! 3N+1.

use std::collections::HashMap;

use sqlx::PgPool;

use super::Page;
use crate::error::{Error, Result};
use crate::models::{
    Adventure, CreateUser, UpdateUser, User, UserAdventure, UserAdventureDetail, UserDetail,
    UserProfile, UserSettings,
};

/// Insert a new user. Counters left out of the payload start at their
/// column defaults (level 1, everything else 0).
pub async fn create(pool: &PgPool, data: CreateUser) -> Result<UserDetail> {
    let user: User = sqlx::query_as(
        "INSERT INTO users (username, phone_number, email, level, star_score, gems, penalty_bar)
         VALUES ($1, $2, $3, COALESCE($4, 1), COALESCE($5, 0), COALESCE($6, 0), COALESCE($7, 0))
         RETURNING *",
    )
    .bind(&data.username)
    .bind(&data.phone_number)
    .bind(&data.email)
    .bind(data.level)
    .bind(data.star_score)
    .bind(data.gems)
    .bind(data.penalty_bar)
    .fetch_one(pool)
    .await?;
    load_detail(pool, user).await
}

/// List users, newest first.
pub async fn list(pool: &PgPool, page: Page) -> Result<Vec<UserDetail>> {
    let users: Vec<User> =
        sqlx::query_as("SELECT * FROM users ORDER BY created_at DESC OFFSET $1 LIMIT $2")
            .bind(page.skip.unwrap_or(0))
            .bind(page.take)
            .fetch_all(pool)
            .await?;
    load_details(pool, users).await
}

/// Fetch one user by primary key.
pub async fn get(pool: &PgPool, id: i64) -> Result<UserDetail> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let user = user.ok_or(Error::NotFound("user"))?;
    load_detail(pool, user).await
}

/// Fetch one user by unique username.
pub async fn get_by_username(pool: &PgPool, username: &str) -> Result<UserDetail> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    let user = user.ok_or(Error::NotFound("user"))?;
    load_detail(pool, user).await
}

/// Fetch one user by unique email.
pub async fn get_by_email(pool: &PgPool, email: &str) -> Result<UserDetail> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    let user = user.ok_or(Error::NotFound("user"))?;
    load_detail(pool, user).await
}

/// Update the mutable counters of a user. Identity fields are not
/// touchable through this call.
pub async fn update(pool: &PgPool, id: i64, data: UpdateUser) -> Result<UserDetail> {
    let user: Option<User> = sqlx::query_as(
        "UPDATE users
         SET level = COALESCE($2, level),
             star_score = COALESCE($3, star_score),
             gems = COALESCE($4, gems),
             penalty_bar = COALESCE($5, penalty_bar)
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(data.level)
    .bind(data.star_score)
    .bind(data.gems)
    .bind(data.penalty_bar)
    .fetch_optional(pool)
    .await?;
    let user = user.ok_or(Error::NotFound("user"))?;
    load_detail(pool, user).await
}

/// Delete a user. Fails with a constraint violation while profile,
/// settings, or adventure rows still reference it.
pub async fn delete(pool: &PgPool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(Error::NotFound("user"));
    }
    Ok(())
}

/// Set the star score counter, returning the bare row.
pub async fn update_star_score(pool: &PgPool, id: i64, star_score: i32) -> Result<User> {
    let user: Option<User> =
        sqlx::query_as("UPDATE users SET star_score = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(star_score)
            .fetch_optional(pool)
            .await?;
    user.ok_or(Error::NotFound("user"))
}

/// Set the gems counter, returning the bare row.
pub async fn update_gems(pool: &PgPool, id: i64, gems: i32) -> Result<User> {
    let user: Option<User> = sqlx::query_as("UPDATE users SET gems = $2 WHERE id = $1 RETURNING *")
        .bind(id)
        .bind(gems)
        .fetch_optional(pool)
        .await?;
    user.ok_or(Error::NotFound("user"))
}

/// Set the level counter, returning the bare row.
pub async fn update_level(pool: &PgPool, id: i64, level: i32) -> Result<User> {
    let user: Option<User> = sqlx::query_as("UPDATE users SET level = $2 WHERE id = $1 RETURNING *")
        .bind(id)
        .bind(level)
        .fetch_optional(pool)
        .await?;
    user.ok_or(Error::NotFound("user"))
}

async fn load_detail(pool: &PgPool, user: User) -> Result<UserDetail> {
    load_details(pool, vec![user])
        .await?
        .into_iter()
        .next()
        .ok_or(Error::NotFound("user"))
}

/// Attach profiles, settings, and adventure links to a batch of users,
/// preserving the input order.
async fn load_details(pool: &PgPool, users: Vec<User>) -> Result<Vec<UserDetail>> {
    if users.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i64> = users.iter().map(|u| u.id).collect();

    let profiles: Vec<UserProfile> =
        sqlx::query_as("SELECT * FROM user_profiles WHERE user_id = ANY($1)")
            .bind(&ids)
            .fetch_all(pool)
            .await?;
    let settings: Vec<UserSettings> =
        sqlx::query_as("SELECT * FROM user_settings WHERE user_id = ANY($1)")
            .bind(&ids)
            .fetch_all(pool)
            .await?;
    let links: Vec<UserAdventure> = sqlx::query_as(
        "SELECT * FROM user_adventures WHERE user_id = ANY($1) ORDER BY started_at DESC",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut adventure_ids: Vec<i64> = links.iter().map(|l| l.adventure_id).collect();
    adventure_ids.sort_unstable();
    adventure_ids.dedup();
    let adventures: Vec<Adventure> = if adventure_ids.is_empty() {
        Vec::new()
    } else {
        sqlx::query_as("SELECT * FROM adventures WHERE id = ANY($1)")
            .bind(&adventure_ids)
            .fetch_all(pool)
            .await?
    };

    let mut profiles: HashMap<i64, UserProfile> =
        profiles.into_iter().map(|p| (p.user_id, p)).collect();
    let mut settings: HashMap<i64, UserSettings> =
        settings.into_iter().map(|s| (s.user_id, s)).collect();
    let adventures: HashMap<i64, Adventure> =
        adventures.into_iter().map(|a| (a.id, a)).collect();
    let mut links_by_user: HashMap<i64, Vec<UserAdventure>> = HashMap::new();
    for link in links {
        links_by_user.entry(link.user_id).or_default().push(link);
    }

    let details = users
        .into_iter()
        .map(|user| {
            let user_adventures = links_by_user
                .remove(&user.id)
                .unwrap_or_default()
                .into_iter()
                .map(|link| UserAdventureDetail {
                    adventure: adventures.get(&link.adventure_id).cloned(),
                    user: None,
                    link,
                })
                .collect();
            UserDetail {
                profile: profiles.remove(&user.id),
                settings: settings.remove(&user.id),
                user_adventures,
                user,
            }
        })
        .collect();
    Ok(details)
}
