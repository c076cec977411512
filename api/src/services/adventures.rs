//! Adventure catalog operations.
//!
//! Reads return an [`AdventureDetail`]: the row plus every user link with
//! the linked user attached. Listing is ordered by name; search is a
//! case-insensitive substring match.

use std::collections::HashMap;

use sqlx::PgPool;

use super::Page;
use crate::error::{Error, Result};
use crate::models::{
    Adventure, AdventureDetail, CreateAdventure, UpdateAdventure, User, UserAdventure,
    UserAdventureDetail,
};

/// Insert a new adventure.
pub async fn create(pool: &PgPool, data: CreateAdventure) -> Result<AdventureDetail> {
    let adventure: Adventure =
        sqlx::query_as("INSERT INTO adventures (name, description) VALUES ($1, $2) RETURNING *")
            .bind(&data.name)
            .bind(&data.description)
            .fetch_one(pool)
            .await?;
    load_detail(pool, adventure).await
}

/// List adventures ordered by name.
pub async fn list(pool: &PgPool, page: Page) -> Result<Vec<AdventureDetail>> {
    let adventures: Vec<Adventure> =
        sqlx::query_as("SELECT * FROM adventures ORDER BY name ASC OFFSET $1 LIMIT $2")
            .bind(page.skip.unwrap_or(0))
            .bind(page.take)
            .fetch_all(pool)
            .await?;
    load_details(pool, adventures).await
}

/// Case-insensitive substring search over adventure names.
pub async fn search_by_name(pool: &PgPool, name: &str) -> Result<Vec<AdventureDetail>> {
    let adventures: Vec<Adventure> = sqlx::query_as(
        "SELECT * FROM adventures WHERE name ILIKE '%' || $1 || '%' ORDER BY name ASC",
    )
    .bind(name)
    .fetch_all(pool)
    .await?;
    load_details(pool, adventures).await
}

/// Fetch one adventure by primary key.
pub async fn get(pool: &PgPool, id: i64) -> Result<AdventureDetail> {
    let adventure: Option<Adventure> = sqlx::query_as("SELECT * FROM adventures WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let adventure = adventure.ok_or(Error::NotFound("adventure"))?;
    load_detail(pool, adventure).await
}

/// Update name and/or description. Omitted fields keep their stored value.
pub async fn update(pool: &PgPool, id: i64, data: UpdateAdventure) -> Result<AdventureDetail> {
    let adventure: Option<Adventure> = sqlx::query_as(
        "UPDATE adventures
         SET name = COALESCE($2, name),
             description = COALESCE($3, description)
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(data.name)
    .bind(data.description)
    .fetch_optional(pool)
    .await?;
    let adventure = adventure.ok_or(Error::NotFound("adventure"))?;
    load_detail(pool, adventure).await
}

/// Delete an adventure. Fails with a constraint violation while links
/// still reference it.
pub async fn delete(pool: &PgPool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM adventures WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(Error::NotFound("adventure"));
    }
    Ok(())
}

async fn load_detail(pool: &PgPool, adventure: Adventure) -> Result<AdventureDetail> {
    load_details(pool, vec![adventure])
        .await?
        .into_iter()
        .next()
        .ok_or(Error::NotFound("adventure"))
}

/// Attach user links (newest first, each with its user) to a batch of
/// adventures, preserving the input order.
async fn load_details(pool: &PgPool, adventures: Vec<Adventure>) -> Result<Vec<AdventureDetail>> {
    if adventures.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i64> = adventures.iter().map(|a| a.id).collect();

    let links: Vec<UserAdventure> = sqlx::query_as(
        "SELECT * FROM user_adventures WHERE adventure_id = ANY($1) ORDER BY started_at DESC",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut user_ids: Vec<i64> = links.iter().map(|l| l.user_id).collect();
    user_ids.sort_unstable();
    user_ids.dedup();
    let users: HashMap<i64, User> = if user_ids.is_empty() {
        HashMap::new()
    } else {
        let users: Vec<User> = sqlx::query_as("SELECT * FROM users WHERE id = ANY($1)")
            .bind(&user_ids)
            .fetch_all(pool)
            .await?;
        users.into_iter().map(|u| (u.id, u)).collect()
    };

    let mut links_by_adventure: HashMap<i64, Vec<UserAdventure>> = HashMap::new();
    for link in links {
        links_by_adventure
            .entry(link.adventure_id)
            .or_default()
            .push(link);
    }

    let details = adventures
        .into_iter()
        .map(|adventure| {
            let user_adventures = links_by_adventure
                .remove(&adventure.id)
                .unwrap_or_default()
                .into_iter()
                .map(|link| UserAdventureDetail {
                    user: users.get(&link.user_id).cloned(),
                    adventure: None,
                    link,
                })
                .collect();
            AdventureDetail {
                user_adventures,
                adventure,
            }
        })
        .collect();
    Ok(details)
}
