//! Operations on user/adventure links.
//!
//! Which sides of the relation get attached depends on the caller: links
//! fetched through a user carry only the adventure, links fetched through
//! an adventure carry only the user, and the link endpoints themselves
//! carry both. All listings come back newest first.

use std::collections::HashMap;

use sqlx::PgPool;

use super::Page;
use crate::error::{Error, Result};
use crate::models::{
    Adventure, CreateUserAdventure, UpdateUserAdventure, User, UserAdventure, UserAdventureDetail,
};

/// Status written when a link is created without one.
pub const STATUS_IN_PROGRESS: &str = "in-progress";
/// Status written by [`complete`].
pub const STATUS_COMPLETED: &str = "completed";

/// Which relation sides to attach to a loaded link.
#[derive(Clone, Copy)]
enum Include {
    Both,
    Adventure,
    User,
}

/// Insert a new link. `status` falls back to `"in-progress"`; `started_at`
/// is set by the database.
pub async fn create(pool: &PgPool, data: CreateUserAdventure) -> Result<UserAdventureDetail> {
    let link: UserAdventure = sqlx::query_as(
        "INSERT INTO user_adventures (user_id, adventure_id, status)
         VALUES ($1, $2, COALESCE($3, 'in-progress'))
         RETURNING *",
    )
    .bind(data.user_id)
    .bind(data.adventure_id)
    .bind(data.status)
    .fetch_one(pool)
    .await?;
    load_detail(pool, link, Include::Both).await
}

/// List links across all users, newest first.
pub async fn list(pool: &PgPool, page: Page) -> Result<Vec<UserAdventureDetail>> {
    let links: Vec<UserAdventure> = sqlx::query_as(
        "SELECT * FROM user_adventures ORDER BY started_at DESC OFFSET $1 LIMIT $2",
    )
    .bind(page.skip.unwrap_or(0))
    .bind(page.take)
    .fetch_all(pool)
    .await?;
    load_details(pool, links, Include::Both).await
}

/// Fetch one link by primary key.
pub async fn get(pool: &PgPool, id: i64) -> Result<UserAdventureDetail> {
    let link: Option<UserAdventure> = sqlx::query_as("SELECT * FROM user_adventures WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let link = link.ok_or(Error::NotFound("user adventure"))?;
    load_detail(pool, link, Include::Both).await
}

/// List one user's links, adventure attached.
pub async fn list_by_user(pool: &PgPool, user_id: i64) -> Result<Vec<UserAdventureDetail>> {
    let links: Vec<UserAdventure> = sqlx::query_as(
        "SELECT * FROM user_adventures WHERE user_id = $1 ORDER BY started_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    load_details(pool, links, Include::Adventure).await
}

/// List one adventure's links, user attached.
pub async fn list_by_adventure(
    pool: &PgPool,
    adventure_id: i64,
) -> Result<Vec<UserAdventureDetail>> {
    let links: Vec<UserAdventure> = sqlx::query_as(
        "SELECT * FROM user_adventures WHERE adventure_id = $1 ORDER BY started_at DESC",
    )
    .bind(adventure_id)
    .fetch_all(pool)
    .await?;
    load_details(pool, links, Include::User).await
}

/// List one user's links with the given status, adventure attached.
pub async fn list_by_status(
    pool: &PgPool,
    user_id: i64,
    status: &str,
) -> Result<Vec<UserAdventureDetail>> {
    let links: Vec<UserAdventure> = sqlx::query_as(
        "SELECT * FROM user_adventures
         WHERE user_id = $1 AND status = $2
         ORDER BY started_at DESC",
    )
    .bind(user_id)
    .bind(status)
    .fetch_all(pool)
    .await?;
    load_details(pool, links, Include::Adventure).await
}

/// List one user's completed links.
pub async fn list_completed(pool: &PgPool, user_id: i64) -> Result<Vec<UserAdventureDetail>> {
    list_by_status(pool, user_id, STATUS_COMPLETED).await
}

/// List one user's in-progress links.
pub async fn list_in_progress(pool: &PgPool, user_id: i64) -> Result<Vec<UserAdventureDetail>> {
    list_by_status(pool, user_id, STATUS_IN_PROGRESS).await
}

/// Update status and/or completion timestamp. Omitted fields keep their
/// stored value.
pub async fn update(
    pool: &PgPool,
    id: i64,
    data: UpdateUserAdventure,
) -> Result<UserAdventureDetail> {
    let link: Option<UserAdventure> = sqlx::query_as(
        "UPDATE user_adventures
         SET status = COALESCE($2, status),
             completed_at = COALESCE($3, completed_at)
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(data.status)
    .bind(data.completed_at)
    .fetch_optional(pool)
    .await?;
    let link = link.ok_or(Error::NotFound("user adventure"))?;
    load_detail(pool, link, Include::Both).await
}

/// Mark a link completed now.
pub async fn complete(pool: &PgPool, id: i64) -> Result<UserAdventureDetail> {
    let link: Option<UserAdventure> = sqlx::query_as(
        "UPDATE user_adventures
         SET status = 'completed', completed_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    let link = link.ok_or(Error::NotFound("user adventure"))?;
    load_detail(pool, link, Include::Both).await
}

/// Delete a link.
pub async fn delete(pool: &PgPool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM user_adventures WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(Error::NotFound("user adventure"));
    }
    Ok(())
}

async fn load_detail(
    pool: &PgPool,
    link: UserAdventure,
    include: Include,
) -> Result<UserAdventureDetail> {
    load_details(pool, vec![link], include)
        .await?
        .into_iter()
        .next()
        .ok_or(Error::NotFound("user adventure"))
}

/// Attach the requested relation sides to a batch of links, preserving the
/// input order.
async fn load_details(
    pool: &PgPool,
    links: Vec<UserAdventure>,
    include: Include,
) -> Result<Vec<UserAdventureDetail>> {
    if links.is_empty() {
        return Ok(Vec::new());
    }

    let users: HashMap<i64, User> = match include {
        Include::Adventure => HashMap::new(),
        Include::Both | Include::User => {
            let mut ids: Vec<i64> = links.iter().map(|l| l.user_id).collect();
            ids.sort_unstable();
            ids.dedup();
            let users: Vec<User> = sqlx::query_as("SELECT * FROM users WHERE id = ANY($1)")
                .bind(&ids)
                .fetch_all(pool)
                .await?;
            users.into_iter().map(|u| (u.id, u)).collect()
        }
    };

    let adventures: HashMap<i64, Adventure> = match include {
        Include::User => HashMap::new(),
        Include::Both | Include::Adventure => {
            let mut ids: Vec<i64> = links.iter().map(|l| l.adventure_id).collect();
            ids.sort_unstable();
            ids.dedup();
            let adventures: Vec<Adventure> =
                sqlx::query_as("SELECT * FROM adventures WHERE id = ANY($1)")
                    .bind(&ids)
                    .fetch_all(pool)
                    .await?;
            adventures.into_iter().map(|a| (a.id, a)).collect()
        }
    };

    let details = links
        .into_iter()
        .map(|link| UserAdventureDetail {
            user: users.get(&link.user_id).cloned(),
            adventure: adventures.get(&link.adventure_id).cloned(),
            link,
        })
        .collect();
    Ok(details)
}
