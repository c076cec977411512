use api::PgPool;

/// Shared state handed to every handler. Cloning is cheap; the pool is
/// internally reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}
