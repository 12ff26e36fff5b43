//! Domain layer - Core entities, schema descriptors and persistence ports

pub mod error;
pub mod schema;
pub mod user;

pub use error::DomainError;
pub use schema::{Constraint, EntitySchema, FieldKind, FieldSpec, FieldValue, SchemaEntity};
pub use user::{RecordId, UserId, UserRecord, UserRepository, USER_SCHEMA};
