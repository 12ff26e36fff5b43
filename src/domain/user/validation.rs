//! User field validation

use thiserror::Error;

use crate::domain::DomainError;

/// Errors that can occur while validating user fields
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("User ID must be a positive integer, got {0}")]
    NonPositiveId(i64),

    #[error("User ID '{0}' is not an integer")]
    MalformedId(String),

    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Email cannot be empty")]
    EmptyEmail,
}

impl From<UserValidationError> for DomainError {
    fn from(err: UserValidationError) -> Self {
        DomainError::invalid_argument(err.to_string())
    }
}

/// Validate a persisted user identifier
pub fn validate_user_id(id: i64) -> Result<(), UserValidationError> {
    if id <= 0 {
        return Err(UserValidationError::NonPositiveId(id));
    }

    Ok(())
}

/// Validate a username
///
/// Only presence is checked; whitespace-only values count as empty.
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    if username.trim().is_empty() {
        return Err(UserValidationError::EmptyUsername);
    }

    Ok(())
}

/// Validate an email address
///
/// Only presence is checked, the address shape is left to callers.
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.trim().is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }

    Ok(())
}
