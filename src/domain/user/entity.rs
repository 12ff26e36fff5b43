//! User record entity and related types

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::validation::{
    validate_email, validate_user_id, validate_username, UserValidationError,
};
use crate::domain::schema::{
    Constraint, EntitySchema, FieldKind, FieldSpec, FieldValue, SchemaEntity,
};
use crate::domain::DomainError;

const USER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        "id",
        FieldKind::Integer,
        &[Constraint::PrimaryKey, Constraint::Generated, Constraint::NotNull],
    ),
    FieldSpec::new("username", FieldKind::Text, &[Constraint::NotNull]),
    FieldSpec::new("email", FieldKind::Text, &[Constraint::NotNull]),
];

/// Storage mapping for [`UserRecord`]
pub const USER_SCHEMA: EntitySchema = EntitySchema::new("users", USER_FIELDS);

/// Persisted user identifier - a positive 64-bit integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    /// Create a new UserId after validation
    pub fn new(id: i64) -> Result<Self, UserValidationError> {
        validate_user_id(id)?;
        Ok(Self(id))
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for i64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl FromStr for UserId {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|_| UserValidationError::MalformedId(s.to_string()))?;
        Self::new(value)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity state of a record
///
/// Records start `Unassigned`; a persistence collaborator moves them to
/// `Assigned` exactly once, on the first successful save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<UserId>", into = "Option<UserId>")]
pub enum RecordId {
    #[default]
    Unassigned,
    Assigned(UserId),
}

impl RecordId {
    pub fn is_assigned(&self) -> bool {
        matches!(self, Self::Assigned(_))
    }

    pub fn assigned(&self) -> Option<UserId> {
        match self {
            Self::Assigned(id) => Some(*id),
            Self::Unassigned => None,
        }
    }
}

impl From<Option<UserId>> for RecordId {
    fn from(id: Option<UserId>) -> Self {
        id.map_or(Self::Unassigned, Self::Assigned)
    }
}

impl From<RecordId> for Option<UserId> {
    fn from(id: RecordId) -> Self {
        id.assigned()
    }
}

/// A user identity: generated id plus required username and email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserRecordData")]
pub struct UserRecord {
    id: RecordId,
    username: String,
    email: String,
}

/// Unvalidated wire shape of a record
#[derive(Deserialize)]
struct UserRecordData {
    #[serde(default)]
    id: Option<UserId>,
    username: String,
    email: String,
}

impl TryFrom<UserRecordData> for UserRecord {
    type Error = UserValidationError;

    fn try_from(data: UserRecordData) -> Result<Self, Self::Error> {
        validate_username(&data.username)?;
        validate_email(&data.email)?;

        Ok(Self {
            id: data.id.into(),
            username: data.username,
            email: data.email,
        })
    }
}

impl UserRecord {
    /// Create a new, not yet persisted record
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Result<Self, DomainError> {
        let username = username.into();
        let email = email.into();

        validate_username(&username)?;
        validate_email(&email)?;

        Ok(Self {
            id: RecordId::Unassigned,
            username,
            email,
        })
    }

    /// Rebuild a record read back from storage
    pub fn restore(
        id: UserId,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let mut record = Self::new(username, email)?;
        record.id = RecordId::Assigned(id);
        Ok(record)
    }

    // Getters

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_assigned()
    }

    // Mutators

    pub fn set_username(&mut self, username: impl Into<String>) -> Result<(), DomainError> {
        let username = username.into();
        validate_username(&username)?;
        self.username = username;
        Ok(())
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> Result<(), DomainError> {
        let email = email.into();
        validate_email(&email)?;
        self.email = email;
        Ok(())
    }

    /// Record the identifier handed out by a persistence collaborator
    ///
    /// Assigning the id the record already carries is a no-op; assigning a
    /// different one is rejected.
    pub fn assign_id(&mut self, id: UserId) -> Result<(), DomainError> {
        match self.id {
            RecordId::Unassigned => {
                self.id = RecordId::Assigned(id);
                Ok(())
            }
            RecordId::Assigned(current) if current == id => Ok(()),
            RecordId::Assigned(current) => Err(DomainError::constraint_violation(format!(
                "User id is already assigned ({}), cannot reassign to {}",
                current, id
            ))),
        }
    }
}

impl SchemaEntity for UserRecord {
    fn schema() -> &'static EntitySchema {
        &USER_SCHEMA
    }

    fn field_value(&self, name: &str) -> FieldValue<'_> {
        match name {
            "id" => self
                .id
                .assigned()
                .map_or(FieldValue::Null, |id| FieldValue::Integer(id.value())),
            "username" => FieldValue::Text(&self.username),
            "email" => FieldValue::Text(&self.email),
            _ => FieldValue::Null,
        }
    }
}
