//! Settings operations: whole-document upsert plus key-level reads and
//! writes.
//!
//! Key-level writes rewrite the entire document, so two concurrent writers
//! for the same user would race if the read and the write ran as separate
//! statements. [`set_key`] and [`delete_key`] therefore run the whole
//! read-modify-write inside one transaction: the row is created first if
//! missing, then read under `FOR UPDATE` so a second writer blocks until
//! the first commits. Both keys always survive interleaved writes.
//!
//! A user without a settings row is treated as owning an empty document:
//! reads of any key return nothing, and the first write creates the row.

use sqlx::types::Json;
use sqlx::PgPool;

use super::Page;
use crate::error::{Error, Result};
use crate::models::{
    CreateUserSettings, SettingValue, SettingsDoc, UserSettings, UserSettingsDetail,
};

/// Insert a settings row for a user that has none. An omitted document
/// starts empty.
pub async fn create(pool: &PgPool, data: CreateUserSettings) -> Result<UserSettingsDetail> {
    let record: UserSettings = sqlx::query_as(
        "INSERT INTO user_settings (user_id, settings)
         VALUES ($1, COALESCE($2, '{}'::jsonb))
         RETURNING *",
    )
    .bind(data.user_id)
    .bind(data.settings.map(Json))
    .fetch_one(pool)
    .await?;
    detail(pool, record).await
}

/// List settings rows in insertion order.
pub async fn list(pool: &PgPool, page: Page) -> Result<Vec<UserSettingsDetail>> {
    let records: Vec<UserSettings> =
        sqlx::query_as("SELECT * FROM user_settings ORDER BY id OFFSET $1 LIMIT $2")
            .bind(page.skip.unwrap_or(0))
            .bind(page.take)
            .fetch_all(pool)
            .await?;

    let user_ids: Vec<i64> = records.iter().map(|r| r.user_id).collect();
    let mut users = super::user_summaries(pool, &user_ids).await?;
    Ok(records
        .into_iter()
        .map(|record| UserSettingsDetail {
            user: users.remove(&record.user_id),
            record,
        })
        .collect())
}

/// Fetch one settings row by row id.
pub async fn get(pool: &PgPool, id: i64) -> Result<UserSettingsDetail> {
    let record: Option<UserSettings> = sqlx::query_as("SELECT * FROM user_settings WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let record = record.ok_or(Error::NotFound("settings"))?;
    detail(pool, record).await
}

/// Fetch the settings row owned by `user_id`.
pub async fn get_by_user(pool: &PgPool, user_id: i64) -> Result<UserSettingsDetail> {
    let record: Option<UserSettings> =
        sqlx::query_as("SELECT * FROM user_settings WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    let record = record.ok_or(Error::NotFound("settings"))?;
    detail(pool, record).await
}

/// Replace the whole document for `user_id`, creating the row if missing.
pub async fn upsert(pool: &PgPool, user_id: i64, doc: SettingsDoc) -> Result<UserSettingsDetail> {
    let record: UserSettings = sqlx::query_as(
        "INSERT INTO user_settings (user_id, settings) VALUES ($1, $2)
         ON CONFLICT (user_id) DO UPDATE SET settings = EXCLUDED.settings
         RETURNING *",
    )
    .bind(user_id)
    .bind(Json(doc))
    .fetch_one(pool)
    .await?;
    detail(pool, record).await
}

/// Delete the settings row owned by `user_id`.
pub async fn delete_by_user(pool: &PgPool, user_id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM user_settings WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(Error::NotFound("settings"));
    }
    Ok(())
}

/// Read one key from a user's document. A missing row reads as an empty
/// document, so the result is `None` either way.
pub async fn get_key(pool: &PgPool, user_id: i64, key: &str) -> Result<Option<SettingValue>> {
    let doc: Option<Json<SettingsDoc>> =
        sqlx::query_scalar("SELECT settings FROM user_settings WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    Ok(doc.and_then(|doc| doc.0.get(key).cloned()))
}

/// Bind `key` to `value` in a user's document, overwriting any prior
/// value. Creates the row on first write.
pub async fn set_key(
    pool: &PgPool,
    user_id: i64,
    key: &str,
    value: SettingValue,
) -> Result<UserSettingsDetail> {
    let record = mutate_doc(pool, user_id, |doc| {
        doc.insert(key.to_string(), value);
    })
    .await?;
    detail(pool, record).await
}

/// Remove `key` from a user's document. Removing an absent key still
/// succeeds and returns the refreshed record.
pub async fn delete_key(pool: &PgPool, user_id: i64, key: &str) -> Result<UserSettingsDetail> {
    let record = mutate_doc(pool, user_id, |doc| {
        doc.remove(key);
    })
    .await?;
    detail(pool, record).await
}

/// Run one read-modify-write of a user's document inside a transaction.
///
/// The insert guarantees the row exists, so the `SELECT ... FOR UPDATE`
/// always finds something to lock. Concurrent callers for the same user
/// serialize on that row lock.
async fn mutate_doc<F>(pool: &PgPool, user_id: i64, mutate: F) -> Result<UserSettings>
where
    F: FnOnce(&mut SettingsDoc),
{
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO user_settings (user_id, settings) VALUES ($1, '{}'::jsonb)
         ON CONFLICT (user_id) DO NOTHING",
    )
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    let doc: Json<SettingsDoc> =
        sqlx::query_scalar("SELECT settings FROM user_settings WHERE user_id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
    let mut doc = doc.0;
    mutate(&mut doc);

    let record: UserSettings =
        sqlx::query_as("UPDATE user_settings SET settings = $2 WHERE user_id = $1 RETURNING *")
            .bind(user_id)
            .bind(Json(doc))
            .fetch_one(&mut *tx)
            .await?;

    tx.commit().await?;
    Ok(record)
}

async fn detail(pool: &PgPool, record: UserSettings) -> Result<UserSettingsDetail> {
    let user = super::user_summary(pool, record.user_id).await?;
    Ok(UserSettingsDetail { record, user })
}
