//! # PostgreSQL connection handling
//!
//! Opens the connection pool and applies the embedded migrations from
//! `api/migrations`. The pool is created once at startup and handed to every
//! service call explicitly; nothing in this crate keeps a global handle.

use sqlx::postgres::PgPoolOptions;

pub use sqlx::PgPool;

use crate::error::Result;

/// Open a connection pool against `url` with at most `max_connections`
/// connections.
pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await?;
    Ok(pool)
}

/// Apply any pending migrations.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Cheap round-trip used by the readiness probe.
pub async fn ping(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
