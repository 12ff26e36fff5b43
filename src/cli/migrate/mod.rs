//! Migrate command - applies or reverts the user schema

use anyhow::bail;
use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::storage::{
    connect_pool, user_migrations, Migrator, PostgresMigrator, StorageConfig,
};

#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Revert the latest applied migration instead
    #[arg(long)]
    pub revert: bool,
}

/// Run migrations against the configured database
pub async fn run(config: &AppConfig, args: MigrateArgs) -> anyhow::Result<()> {
    let StorageConfig::Postgres(pg_config) = crate::build_storage_config(config)? else {
        bail!("Migrations require the postgres storage backend");
    };

    let pool = connect_pool(&pg_config).await?;
    let migrator = PostgresMigrator::new(pool, user_migrations());

    if args.revert {
        match migrator.revert().await? {
            Some(version) => info!(version, "Reverted migration"),
            None => info!("No migrations to revert"),
        }
    } else {
        let applied = migrator.run().await?;
        info!(applied, "Migrations complete");
    }

    let version = migrator.version().await?;
    println!("{}", serde_json::json!({ "schema_version": version }));

    Ok(())
}
