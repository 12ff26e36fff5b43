//! Record management commands

use clap::Subcommand;
use serde::Serialize;

use crate::config::AppConfig;
use crate::domain::UserId;
use crate::infrastructure::user::{CreateUserRequest, UpdateUserRequest};

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Register a new user
    Add { username: String, email: String },

    /// Show a user by id
    Show { id: UserId },

    /// List all users
    List,

    /// Print the number of stored users
    Count,

    /// Change a user's username and/or email
    Update {
        id: UserId,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },

    /// Remove a user by id
    Remove { id: UserId },
}

/// Run a record management command and print the result as JSON
pub async fn run(config: &AppConfig, command: UserCommand) -> anyhow::Result<()> {
    let service = crate::create_user_service_with_config(config).await?;

    match command {
        UserCommand::Add { username, email } => {
            let user = service
                .register(CreateUserRequest { username, email })
                .await?;
            print_json(&user)?;
        }
        UserCommand::Show { id } => match service.get(id).await? {
            Some(user) => print_json(&user)?,
            None => anyhow::bail!("User '{}' not found", id),
        },
        UserCommand::List => {
            for user in service.list().await? {
                print_json(&user)?;
            }
        }
        UserCommand::Count => {
            let count = service.count().await?;
            print_json(&serde_json::json!({ "count": count }))?;
        }
        UserCommand::Update {
            id,
            username,
            email,
        } => {
            let user = service
                .update(id, UpdateUserRequest { username, email })
                .await?;
            print_json(&user)?;
        }
        UserCommand::Remove { id } => {
            let removed = service.delete(id).await?;
            print_json(&serde_json::json!({ "id": id.value(), "removed": removed }))?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
