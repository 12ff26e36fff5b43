//! User Registry
//!
//! Stores user identities (generated id, username, email) through a
//! persistence collaborator:
//! - Explicit schema descriptor instead of annotation metadata
//! - In-memory and PostgreSQL repositories
//! - Config-driven backend selection and migrations

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use domain::{DomainError, UserRepository};
use infrastructure::storage::{PostgresConfig, StorageConfig, StorageFactory, StorageType};
use infrastructure::user::UserService;

/// Resolve the configured backend into a storage configuration
pub fn build_storage_config(config: &AppConfig) -> Result<StorageConfig, DomainError> {
    match config.storage.backend.parse::<StorageType>()? {
        StorageType::InMemory => Ok(StorageConfig::InMemory),
        StorageType::Postgres => {
            let url = config.database.url.clone().ok_or_else(|| {
                DomainError::configuration(
                    "database.url (or DATABASE_URL) is required for the postgres backend",
                )
            })?;

            Ok(StorageConfig::Postgres(PostgresConfig::from_settings(
                url,
                &config.database,
            )))
        }
    }
}

/// Create the user service on the backend selected by `config`
pub async fn create_user_service_with_config(
    config: &AppConfig,
) -> anyhow::Result<UserService<dyn UserRepository>> {
    let storage = build_storage_config(config)?;
    info!(backend = ?storage.storage_type(), "Storage backend selected");

    let repository: Arc<dyn UserRepository> =
        StorageFactory::create_user_repository(&storage).await?;

    Ok(UserService::new(repository))
}
