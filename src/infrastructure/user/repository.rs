//! In-memory user repository implementation

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::user::{RecordId, UserId, UserRecord, UserRepository, USER_SCHEMA};
use crate::domain::DomainError;

/// Reject records whose required columns are blank before they reach storage
pub(super) fn ensure_required_fields(record: &UserRecord) -> Result<(), DomainError> {
    USER_SCHEMA.check_required(record).inspect_err(|e| {
        warn!(error = %e, "Rejected user record at save");
    })
}

/// In-memory implementation of UserRepository
///
/// Ids come from a monotonically increasing sequence starting at 1 and are
/// never reused, even after deletes.
#[derive(Debug)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<BTreeMap<UserId, UserRecord>>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: AtomicI64::new(1),
        }
    }

    fn allocate_id(&self) -> Result<UserId, DomainError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(UserId::new(id)?)
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, mut record: UserRecord) -> Result<UserRecord, DomainError> {
        ensure_required_fields(&record)?;

        let mut users = self.users.write().await;

        match record.id() {
            RecordId::Unassigned => {
                let id = self.allocate_id()?;
                record.assign_id(id)?;
                users.insert(id, record.clone());
                info!(user_id = %id, "Inserted user record");
            }
            RecordId::Assigned(id) => {
                if !users.contains_key(&id) {
                    return Err(DomainError::not_found(format!("User '{}' not found", id)));
                }
                users.insert(id, record.clone());
                info!(user_id = %id, "Updated user record");
            }
        }

        Ok(record)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, DomainError> {
        debug!(user_id = %id, "Looking up user record");
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<UserRecord>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().cloned().collect())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let users = self.users.read().await;
        Ok(users.len())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let mut users = self.users.write().await;
        let removed = users.remove(id).is_some();

        if removed {
            info!(user_id = %id, "Deleted user record");
        }

        Ok(removed)
    }
}
