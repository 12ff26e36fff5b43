//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::error::ErrorKind;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::{debug, info};

use super::repository::ensure_required_fields;
use crate::domain::user::{RecordId, UserId, UserRecord, UserRepository};
use crate::domain::DomainError;

/// PostgreSQL implementation of UserRepository
///
/// Expects the `users` table created by the user migrations; ids come from
/// its identity column.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn save(&self, mut record: UserRecord) -> Result<UserRecord, DomainError> {
        ensure_required_fields(&record)?;

        match record.id() {
            RecordId::Unassigned => {
                let id: i64 = sqlx::query_scalar(
                    r#"
                    INSERT INTO users (username, email)
                    VALUES ($1, $2)
                    RETURNING id
                    "#,
                )
                .bind(record.username())
                .bind(record.email())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("insert user", e))?;

                let id = UserId::new(id).map_err(|e| {
                    DomainError::storage(format!("Invalid user ID returned by database: {}", e))
                })?;
                record.assign_id(id)?;

                info!(user_id = %id, "Inserted user record");
            }
            RecordId::Assigned(id) => {
                let result = sqlx::query(
                    r#"
                    UPDATE users
                    SET username = $2, email = $3
                    WHERE id = $1
                    "#,
                )
                .bind(id.value())
                .bind(record.username())
                .bind(record.email())
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("update user", e))?;

                if result.rows_affected() == 0 {
                    return Err(DomainError::not_found(format!("User '{}' not found", id)));
                }

                info!(user_id = %id, "Updated user record");
            }
        }

        Ok(record)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, DomainError> {
        debug!(user_id = %id, "Looking up user record");

        let row = sqlx::query("SELECT id, username, email FROM users WHERE id = $1")
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get user", e))?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn find_all(&self) -> Result<Vec<UserRecord>, DomainError> {
        let rows = sqlx::query("SELECT id, username, email FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list users", e))?;

        rows.iter().map(row_to_record).collect()
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("count users", e))?;

        usize::try_from(count)
            .map_err(|_| DomainError::storage(format!("Invalid user count: {}", count)))
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete user", e))?;

        let removed = result.rows_affected() > 0;
        if removed {
            info!(user_id = %id, "Deleted user record");
        }

        Ok(removed)
    }

    async fn exists(&self, id: &UserId) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id.value())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("check user", e))
    }
}

fn row_to_record(row: &PgRow) -> Result<UserRecord, DomainError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| DomainError::storage(format!("Failed to read user id: {}", e)))?;
    let username: String = row
        .try_get("username")
        .map_err(|e| DomainError::storage(format!("Failed to read username: {}", e)))?;
    let email: String = row
        .try_get("email")
        .map_err(|e| DomainError::storage(format!("Failed to read email: {}", e)))?;

    let user_id = UserId::new(id)
        .map_err(|e| DomainError::storage(format!("Invalid user ID in database: {}", e)))?;

    UserRecord::restore(user_id, username, email)
        .map_err(|e| DomainError::storage(format!("Invalid user row {}: {}", id, e)))
}

/// Constraint failures reported by Postgres surface as constraint violations,
/// everything else is a storage error
fn map_sqlx_error(action: &str, err: sqlx::Error) -> DomainError {
    if let Some(db_err) = err.as_database_error() {
        match db_err.kind() {
            ErrorKind::UniqueViolation | ErrorKind::NotNullViolation | ErrorKind::CheckViolation => {
                return DomainError::constraint_violation(format!(
                    "Failed to {}: {}",
                    action,
                    db_err.message()
                ));
            }
            _ => {}
        }
    }

    DomainError::storage(format!("Failed to {}: {}", action, err))
}
