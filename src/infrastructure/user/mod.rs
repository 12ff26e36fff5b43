//! User infrastructure module
//!
//! Persistence collaborators for user records (in-memory and PostgreSQL)
//! and the service that registers and manages users through them.

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::{CreateUserRequest, UpdateUserRequest, UserService};
