//! # HTTP server for the Thunderbolts admin backend
//!
//! Wires the service layer in [`api`] to an axum router and runs it.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`error`] | The fixed 404/500 response contract |
//! | [`handlers`] | One handler module per entity |
//! | [`settings`] | Layered configuration (defaults, `config.toml`, env) |
//! | [`state`] | Shared [`AppState`] holding the connection pool |
//!
//! Startup order: load `.env`, install the tracing subscriber, load
//! [`Settings`], open the pool, run migrations, then serve until Ctrl+C or
//! SIGTERM.

use std::time::Duration;

use anyhow::Context;
use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod error;
pub mod handlers;
pub mod settings;
pub mod state;

pub use error::ApiError;
pub use settings::Settings;
pub use state::AppState;

/// Build the full route table over `state`.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .allow_origin(Any)
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        .route(
            "/api/users",
            get(handlers::users::list).post(handlers::users::create),
        )
        .route(
            "/api/users/:id",
            get(handlers::users::get)
                .put(handlers::users::update)
                .delete(handlers::users::delete),
        )
        .route(
            "/api/adventures",
            get(handlers::adventures::list).post(handlers::adventures::create),
        )
        .route(
            "/api/adventures/:id",
            get(handlers::adventures::get)
                .put(handlers::adventures::update)
                .delete(handlers::adventures::delete),
        )
        .route(
            "/api/user-adventures",
            get(handlers::user_adventures::list).post(handlers::user_adventures::create),
        )
        .route(
            "/api/user-adventures/:id",
            get(handlers::user_adventures::get)
                .put(handlers::user_adventures::update)
                .delete(handlers::user_adventures::delete),
        )
        .route(
            "/api/user-adventures/:id/complete",
            post(handlers::user_adventures::complete),
        )
        .route("/api/profiles", post(handlers::profiles::create))
        .route(
            "/api/profiles/:user_id",
            get(handlers::profiles::get)
                .put(handlers::profiles::update)
                .delete(handlers::profiles::delete),
        )
        .route(
            "/api/settings",
            get(handlers::settings::list).post(handlers::settings::create),
        )
        .route(
            "/api/settings/:user_id",
            get(handlers::settings::get)
                .put(handlers::settings::update)
                .delete(handlers::settings::delete),
        )
        .route(
            "/api/settings/:user_id/keys/:key",
            get(handlers::settings::get_key)
                .put(handlers::settings::set_key)
                .delete(handlers::settings::delete_key),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Load configuration, connect to the store, and serve until shutdown.
pub async fn start_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let settings = Settings::new().context("Failed to load configuration")?;

    let pool = api::db::connect(&settings.database.url(), settings.pool.size)
        .await
        .context("Failed to connect to Postgres")?;
    api::db::migrate(&pool)
        .await
        .context("Failed to run migrations")?;

    let app = build_router(AppState { pool });

    let address = settings.server.address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
