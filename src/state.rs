use std::env;
use std::sync::Arc;

use anyhow::Context;
use encore_config::{CorsConfig, JwtConfig, PasswordConfig, UploadConfig};
use encore_core::{FileStorage, LocalFileStorage};
use encore_db::{InMemoryUserRepository, PgUserRepository, UserRepository, init_db_pool};

/// Shared, read-only application context handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub storage: Arc<dyn FileStorage>,
    pub jwt_config: JwtConfig,
    pub password_config: PasswordConfig,
    pub upload_config: UploadConfig,
    pub cors_config: CorsConfig,
}

impl AppState {
    /// Builds the state around an explicit repository, with local file
    /// storage rooted at `upload_config.upload_dir`.
    pub fn new(
        users: Arc<dyn UserRepository>,
        jwt_config: JwtConfig,
        password_config: PasswordConfig,
        upload_config: UploadConfig,
        cors_config: CorsConfig,
    ) -> Self {
        let storage = LocalFileStorage::with_max_size(
            upload_config.upload_dir.clone(),
            upload_config.public_url(),
            upload_config.max_file_size,
        );

        Self {
            users,
            storage: Arc::new(storage),
            jwt_config,
            password_config,
            upload_config,
            cors_config,
        }
    }
}

/// Loads configuration from the environment and connects the user store.
///
/// `STORAGE_BACKEND=memory` skips PostgreSQL entirely; anything else
/// connects to `DATABASE_URL` and applies pending migrations.
pub async fn init_app_state() -> anyhow::Result<AppState> {
    let users: Arc<dyn UserRepository> = match env::var("STORAGE_BACKEND").as_deref() {
        Ok("memory") => {
            tracing::warn!("using in-memory user store; data is lost on restart");
            Arc::new(InMemoryUserRepository::new())
        }
        _ => {
            let pool = init_db_pool().await?;
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
            Arc::new(PgUserRepository::new(pool))
        }
    };

    Ok(AppState::new(
        users,
        JwtConfig::from_env(),
        PasswordConfig::from_env(),
        UploadConfig::from_env(),
        CorsConfig::from_env(),
    ))
}
