//! User repository trait
//!
//! This is the persistence collaborator contract for [`UserRecord`]. An
//! implementation owns identity generation, the `users` table mapping and
//! enforcement of [`USER_SCHEMA`](super::USER_SCHEMA) at save time.

use async_trait::async_trait;

use super::entity::{UserId, UserRecord};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository trait for user record storage
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a record
    ///
    /// An unassigned record is inserted and returned with its new id; an
    /// assigned one overwrites the stored row with the same id. Fails with
    /// `ConstraintViolation` when a required field is blank, and `NotFound`
    /// when updating an id that is not stored.
    async fn save(&self, record: UserRecord) -> Result<UserRecord, DomainError>;

    /// Get a record by its id
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, DomainError>;

    /// List every record, ordered by id
    async fn find_all(&self) -> Result<Vec<UserRecord>, DomainError>;

    /// Count stored records
    async fn count(&self) -> Result<usize, DomainError>;

    /// Delete a record, returning whether one was removed
    async fn delete(&self, id: &UserId) -> Result<bool, DomainError>;

    /// Check if a record with this id exists
    async fn exists(&self, id: &UserId) -> Result<bool, DomainError> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}
