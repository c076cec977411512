//! Profile operations, keyed by the owning user.
//!
//! Profiles are one-to-one with users, so everything after creation is
//! addressed by `user_id`. The update path is an upsert: writing to a user
//! without a profile creates one.

use sqlx::PgPool;

use crate::error::{Error, Result};
use crate::models::{CreateUserProfile, UpdateUserProfile, UserProfile, UserProfileDetail};

/// Insert a new profile for a user that has none.
pub async fn create(pool: &PgPool, data: CreateUserProfile) -> Result<UserProfileDetail> {
    let record: UserProfile = sqlx::query_as(
        "INSERT INTO user_profiles (user_id, display_name, avatar_url, bio)
         VALUES ($1, $2, $3, $4)
         RETURNING *",
    )
    .bind(data.user_id)
    .bind(&data.display_name)
    .bind(&data.avatar_url)
    .bind(&data.bio)
    .fetch_one(pool)
    .await?;
    detail(pool, record).await
}

/// Fetch one profile by row id.
pub async fn get(pool: &PgPool, id: i64) -> Result<UserProfileDetail> {
    let record: Option<UserProfile> = sqlx::query_as("SELECT * FROM user_profiles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let record = record.ok_or(Error::NotFound("profile"))?;
    detail(pool, record).await
}

/// Fetch the profile owned by `user_id`.
pub async fn get_by_user(pool: &PgPool, user_id: i64) -> Result<UserProfileDetail> {
    let record: Option<UserProfile> =
        sqlx::query_as("SELECT * FROM user_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    let record = record.ok_or(Error::NotFound("profile"))?;
    detail(pool, record).await
}

/// Create or update the profile owned by `user_id`. Omitted fields keep
/// their stored value on update and start NULL on create.
pub async fn upsert(
    pool: &PgPool,
    user_id: i64,
    data: UpdateUserProfile,
) -> Result<UserProfileDetail> {
    let record: UserProfile = sqlx::query_as(
        "INSERT INTO user_profiles (user_id, display_name, avatar_url, bio)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (user_id) DO UPDATE SET
             display_name = COALESCE(EXCLUDED.display_name, user_profiles.display_name),
             avatar_url = COALESCE(EXCLUDED.avatar_url, user_profiles.avatar_url),
             bio = COALESCE(EXCLUDED.bio, user_profiles.bio)
         RETURNING *",
    )
    .bind(user_id)
    .bind(&data.display_name)
    .bind(&data.avatar_url)
    .bind(&data.bio)
    .fetch_one(pool)
    .await?;
    detail(pool, record).await
}

/// Delete the profile owned by `user_id`.
pub async fn delete_by_user(pool: &PgPool, user_id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM user_profiles WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(Error::NotFound("profile"));
    }
    Ok(())
}

/// Set just the display name of an existing profile.
pub async fn update_display_name(
    pool: &PgPool,
    user_id: i64,
    display_name: &str,
) -> Result<UserProfileDetail> {
    let record: Option<UserProfile> = sqlx::query_as(
        "UPDATE user_profiles SET display_name = $2 WHERE user_id = $1 RETURNING *",
    )
    .bind(user_id)
    .bind(display_name)
    .fetch_optional(pool)
    .await?;
    let record = record.ok_or(Error::NotFound("profile"))?;
    detail(pool, record).await
}

/// Set just the avatar URL of an existing profile.
pub async fn update_avatar(
    pool: &PgPool,
    user_id: i64,
    avatar_url: &str,
) -> Result<UserProfileDetail> {
    let record: Option<UserProfile> =
        sqlx::query_as("UPDATE user_profiles SET avatar_url = $2 WHERE user_id = $1 RETURNING *")
            .bind(user_id)
            .bind(avatar_url)
            .fetch_optional(pool)
            .await?;
    let record = record.ok_or(Error::NotFound("profile"))?;
    detail(pool, record).await
}

/// Set just the bio of an existing profile.
pub async fn update_bio(pool: &PgPool, user_id: i64, bio: &str) -> Result<UserProfileDetail> {
    let record: Option<UserProfile> =
        sqlx::query_as("UPDATE user_profiles SET bio = $2 WHERE user_id = $1 RETURNING *")
            .bind(user_id)
            .bind(bio)
            .fetch_optional(pool)
            .await?;
    let record = record.ok_or(Error::NotFound("profile"))?;
    detail(pool, record).await
}

async fn detail(pool: &PgPool, record: UserProfile) -> Result<UserProfileDetail> {
    let user = super::user_summary(pool, record.user_id).await?;
    Ok(UserProfileDetail { record, user })
}
