//! User service for registering and managing user records

use std::sync::Arc;

use tracing::{info, instrument};

use crate::domain::user::{UserId, UserRecord, UserRepository};
use crate::domain::DomainError;

/// Request for registering a new user
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
}

/// Partial update of an existing user; `None` leaves the field as is
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none()
    }
}

/// User service on top of a persistence collaborator
pub struct UserService<R: UserRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: UserRepository + ?Sized> std::fmt::Debug for UserService<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService").finish_non_exhaustive()
    }
}

impl<R: UserRepository + ?Sized> UserService<R> {
    /// Create a new user service
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Register a new user and return it with its assigned id
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: CreateUserRequest) -> Result<UserRecord, DomainError> {
        let record = UserRecord::new(request.username, request.email)?;
        let saved = self.repository.save(record).await?;

        if let Some(id) = saved.id().assigned() {
            info!(user_id = %id, "Registered user");
        }

        Ok(saved)
    }

    /// Get a user by id
    pub async fn get(&self, id: UserId) -> Result<Option<UserRecord>, DomainError> {
        self.repository.find_by_id(&id).await
    }

    /// List all users
    pub async fn list(&self) -> Result<Vec<UserRecord>, DomainError> {
        self.repository.find_all().await
    }

    /// Count users
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }

    /// Apply a partial update to a stored user
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: UserId,
        request: UpdateUserRequest,
    ) -> Result<UserRecord, DomainError> {
        if request.is_empty() {
            return Err(DomainError::invalid_argument(
                "Update must change at least one field",
            ));
        }

        let mut record = self
            .repository
            .find_by_id(&id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        if let Some(username) = request.username {
            record.set_username(username)?;
        }

        if let Some(email) = request.email {
            record.set_email(email)?;
        }

        self.repository.save(record).await
    }

    /// Delete a user, returning whether it existed
    pub async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        let removed = self.repository.delete(&id).await?;

        if removed {
            info!(user_id = %id, "Removed user");
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{MockUserRepository, RecordId};
    use crate::infrastructure::user::repository::InMemoryUserRepository;
    use mockall::predicate::eq;

    fn create_service() -> UserService<InMemoryUserRepository> {
        UserService::new(Arc::new(InMemoryUserRepository::new()))
    }

    fn alice() -> CreateUserRequest {
        CreateUserRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_example_scenario() {
        let service = create_service();

        let user = service.register(alice()).await.unwrap();

        assert!(user.id().is_assigned());
        assert_eq!(user.username(), "alice");
        assert_eq!(user.email(), "alice@example.com");
    }

    #[tokio::test]
    async fn test_register_rejects_empty_username_before_saving() {
        let mut repo = MockUserRepository::new();
        repo.expect_save().never();
        let service = UserService::new(Arc::new(repo));

        let result = service
            .register(CreateUserRequest {
                username: String::new(),
                email: "alice@example.com".to_string(),
            })
            .await;

        assert!(matches!(result, Err(DomainError::InvalidArgument { .. })));
    }

    #[tokio::test]
    async fn test_register_propagates_constraint_violation() {
        let mut repo = MockUserRepository::new();
        repo.expect_save()
            .times(1)
            .returning(|_| Err(DomainError::constraint_violation("users.email is taken")));
        let service = UserService::new(Arc::new(repo));

        let result = service.register(alice()).await;

        assert!(matches!(
            result,
            Err(DomainError::ConstraintViolation { .. })
        ));
    }

    #[tokio::test]
    async fn test_register_hands_unassigned_record_to_repository() {
        let mut repo = MockUserRepository::new();
        repo.expect_save()
            .withf(|record| record.id() == RecordId::Unassigned && record.username() == "alice")
            .times(1)
            .returning(|mut record| {
                record.assign_id(UserId::new(10).unwrap())?;
                Ok(record)
            });
        let service = UserService::new(Arc::new(repo));

        let user = service.register(alice()).await.unwrap();
        assert_eq!(user.id().assigned().unwrap().value(), 10);
    }

    #[tokio::test]
    async fn test_get_and_list() {
        let service = create_service();
        let first = service.register(alice()).await.unwrap();
        service
            .register(CreateUserRequest {
                username: "bob".to_string(),
                email: "bob@example.com".to_string(),
            })
            .await
            .unwrap();

        let id = first.id().assigned().unwrap();
        let loaded = service.get(id).await.unwrap().unwrap();
        assert_eq!(loaded, first);

        assert_eq!(service.list().await.unwrap().len(), 2);
        assert_eq!(service.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update_fields() {
        let service = create_service();
        let user = service.register(alice()).await.unwrap();
        let id = user.id().assigned().unwrap();

        let updated = service
            .update(
                id,
                UpdateUserRequest {
                    email: Some("alice@example.org".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id(), user.id());
        assert_eq!(updated.username(), "alice");
        assert_eq!(updated.email(), "alice@example.org");
    }

    #[tokio::test]
    async fn test_update_rejects_blank_values() {
        let service = create_service();
        let user = service.register(alice()).await.unwrap();
        let id = user.id().assigned().unwrap();

        let result = service
            .update(
                id,
                UpdateUserRequest {
                    username: Some(" ".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::InvalidArgument { .. })));

        let stored = service.get(id).await.unwrap().unwrap();
        assert_eq!(stored.username(), "alice");
    }

    #[tokio::test]
    async fn test_update_requires_a_change() {
        let service = create_service();
        let result = service
            .update(UserId::new(1).unwrap(), UpdateUserRequest::default())
            .await;

        assert!(matches!(result, Err(DomainError::InvalidArgument { .. })));
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .with(eq(UserId::new(3).unwrap()))
            .returning(|_| Ok(None));
        let service = UserService::new(Arc::new(repo));

        let result = service
            .update(
                UserId::new(3).unwrap(),
                UpdateUserRequest {
                    username: Some("zed".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete() {
        let service = create_service();
        let user = service.register(alice()).await.unwrap();
        let id = user.id().assigned().unwrap();

        assert!(service.delete(id).await.unwrap());
        assert!(!service.delete(id).await.unwrap());
        assert!(service.get(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_works_with_trait_objects() {
        let repo: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
        let service = UserService::new(repo);

        let user = service.register(alice()).await.unwrap();
        assert!(user.is_persisted());
    }
}
