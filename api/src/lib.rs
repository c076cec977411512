//! # API crate - store access for the Thunderbolts admin backend
//!
//! Everything between the HTTP layer and PostgreSQL lives here: the
//! connection pool, the embedded migrations, the table models, and one
//! service module per entity.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`db`] | Connection pool setup, migrations, readiness ping |
//! | [`error`] | The crate-wide [`Error`] type and [`Result`] alias |
//! | [`models`] | Table rows, request payloads, and response shapes |
//! | [`services`] | CRUD and query operations, one module per entity |
//!
//! ## Conventions
//!
//! Every service function takes a `&PgPool` as its first argument; the
//! caller owns the pool and decides its lifetime. There is no global
//! connection state anywhere in the crate. Single-record lookups report a
//! missing row as [`Error::NotFound`] instead of succeeding with nothing,
//! which the HTTP layer maps to 404 where the endpoint calls for it.

pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use db::PgPool;
pub use error::{Error, Result};
