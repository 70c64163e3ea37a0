//! # Encore DB
//!
//! Persistence for the Encore API.
//!
//! - [`init_db_pool`]: PostgreSQL connection pool from `DATABASE_URL`
//! - [`UserRepository`]: the store interface used by the HTTP layer
//! - [`PgUserRepository`]: sqlx-backed implementation
//! - [`InMemoryUserRepository`]: process-local implementation for tests and
//!   local runs without a database
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use encore_db::{init_db_pool, PgUserRepository, UserRepository};
//!
//! let pool = init_db_pool().await?;
//! let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool));
//! ```

mod memory;
mod postgres;
mod repository;

use std::env;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;
pub use repository::{UserCredentials, UserRepository};

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Connects to the database named by `DATABASE_URL`.
///
/// Call once at startup; the pool is cheaply cloneable.
pub async fn init_db_pool() -> anyhow::Result<PgPool> {
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")
}
