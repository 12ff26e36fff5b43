//! User domain
//!
//! This module provides the user record entity, its storage schema, field
//! validation and the repository trait persistence collaborators implement.

mod entity;
mod repository;
mod validation;

pub use entity::{RecordId, UserId, UserRecord, USER_SCHEMA};
pub use repository::UserRepository;
pub use validation::{validate_email, validate_user_id, validate_username, UserValidationError};

#[cfg(test)]
pub use repository::MockUserRepository;
