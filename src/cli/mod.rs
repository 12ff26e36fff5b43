//! CLI module for the user registry
//!
//! Provides subcommands for managing user records:
//! - `migrate`: apply (or revert) the PostgreSQL schema
//! - `add`, `show`, `list`, `count`, `update`, `remove`: record management

pub mod migrate;
pub mod users;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// User registry - stores user identities through a pluggable persistence backend
#[derive(Parser)]
#[command(name = "user-registry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Storage backend, overriding configuration (`memory` or `postgres`)
    #[arg(long, global = true)]
    pub backend: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply pending database migrations
    Migrate(migrate::MigrateArgs),

    #[command(flatten)]
    Users(users::UserCommand),
}

/// Load configuration and install logging
pub fn bootstrap(backend: Option<String>) -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = resolve_config(AppConfig::load(), backend)?;
    logging::init_logging(&config.logging);
    Ok(config)
}

/// Apply the `--backend` override on top of loaded configuration
///
/// Load errors are fatal; they never fall back to defaults.
fn resolve_config(
    loaded: Result<AppConfig, ::config::ConfigError>,
    backend: Option<String>,
) -> anyhow::Result<AppConfig> {
    let mut config = loaded.context("Failed to load configuration")?;
    if let Some(backend) = backend {
        config.storage.backend = backend;
    }
    Ok(config)
}

/// Dispatch a parsed command line
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = bootstrap(cli.backend)?;

    match cli.command {
        Command::Migrate(args) => migrate::run(&config, args).await,
        Command::Users(command) => users::run(&config, command).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from(["user-registry", "add", "alice", "alice@example.com"])
            .unwrap();

        match cli.command {
            Command::Users(users::UserCommand::Add { username, email }) => {
                assert_eq!(username, "alice");
                assert_eq!(email, "alice@example.com");
            }
            _ => panic!("Expected add command"),
        }
        assert!(cli.backend.is_none());
    }

    #[test]
    fn test_parse_update_with_backend() {
        let cli = Cli::try_parse_from([
            "user-registry",
            "update",
            "7",
            "--email",
            "new@example.com",
            "--backend",
            "postgres",
        ])
        .unwrap();

        assert_eq!(cli.backend.as_deref(), Some("postgres"));
        match cli.command {
            Command::Users(users::UserCommand::Update {
                id,
                username,
                email,
            }) => {
                assert_eq!(id.value(), 7);
                assert!(username.is_none());
                assert_eq!(email.as_deref(), Some("new@example.com"));
            }
            _ => panic!("Expected update command"),
        }
    }

    #[test]
    fn test_parse_count() {
        let cli = Cli::try_parse_from(["user-registry", "count"]).unwrap();
        assert!(matches!(cli.command, Command::Users(users::UserCommand::Count)));
    }

    #[test]
    fn test_parse_rejects_invalid_id() {
        assert!(Cli::try_parse_from(["user-registry", "show", "0"]).is_err());
        assert!(Cli::try_parse_from(["user-registry", "remove", "abc"]).is_err());
    }

    fn load_with(overrides: &[(&str, &str)]) -> Result<AppConfig, ::config::ConfigError> {
        overrides
            .iter()
            .try_fold(::config::Config::builder(), |builder, (key, value)| {
                builder.set_override(*key, *value)
            })?
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let loaded = load_with(&[
            ("storage.backend", "postgres"),
            ("database.url", "postgres://db/users"),
            ("logging.format", "xml"),
        ]);
        assert!(loaded.is_err());

        let err = resolve_config(loaded, None).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.starts_with("Failed to load configuration"));
        assert!(message.contains("xml"));
    }

    #[test]
    fn test_backend_flag_does_not_mask_invalid_config() {
        let loaded = load_with(&[("logging.format", "xml")]);

        assert!(resolve_config(loaded, Some("memory".to_string())).is_err());
    }

    #[test]
    fn test_backend_flag_overrides_loaded_config() {
        let loaded = load_with(&[
            ("storage.backend", "postgres"),
            ("database.url", "postgres://db/users"),
        ]);

        let config = resolve_config(loaded, Some("memory".to_string())).unwrap();
        assert_eq!(config.storage.backend, "memory");
        assert_eq!(config.database.url.as_deref(), Some("postgres://db/users"));
    }

    #[test]
    fn test_parse_migrate_revert() {
        let cli = Cli::try_parse_from(["user-registry", "migrate", "--revert"]).unwrap();

        match cli.command {
            Command::Migrate(args) => assert!(args.revert),
            _ => panic!("Expected migrate command"),
        }
    }
}
