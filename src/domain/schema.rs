//! Entity schema descriptors
//!
//! A schema describes how an entity maps onto a storage table: the table
//! name, its ordered fields, and the constraints each field carries.
//! Persistence collaborators read the descriptor to render DDL and to
//! enforce required-field rules at save time.

use super::DomainError;

/// Semantic type of a stored field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 64-bit signed integer
    Integer,
    /// Unbounded text
    Text,
}

impl FieldKind {
    fn sql_type(self) -> &'static str {
        match self {
            Self::Integer => "BIGINT",
            Self::Text => "TEXT",
        }
    }
}

/// Constraint attached to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Unique primary identifier of the row
    PrimaryKey,
    /// Value is produced by the persistence collaborator
    Generated,
    /// Value must be present (and non-blank for text)
    NotNull,
    /// Value must be unique across rows
    Unique,
}

/// A single field of an entity schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub constraints: &'static [Constraint],
}

impl FieldSpec {
    pub const fn new(
        name: &'static str,
        kind: FieldKind,
        constraints: &'static [Constraint],
    ) -> Self {
        Self {
            name,
            kind,
            constraints,
        }
    }

    pub fn has(&self, constraint: Constraint) -> bool {
        self.constraints.contains(&constraint)
    }

    pub fn is_generated(&self) -> bool {
        self.has(Constraint::Generated)
    }

    /// Required fields are checked on save; generated ones are filled in by storage
    pub fn is_required(&self) -> bool {
        self.has(Constraint::NotNull) && !self.is_generated()
    }

    fn column_sql(&self) -> String {
        let mut column = format!("{} {}", self.name, self.kind.sql_type());

        if self.is_generated() && self.kind == FieldKind::Integer {
            column.push_str(" GENERATED BY DEFAULT AS IDENTITY");
        }

        if self.has(Constraint::PrimaryKey) {
            column.push_str(" PRIMARY KEY");
        } else {
            if self.has(Constraint::NotNull) {
                column.push_str(" NOT NULL");
            }
            if self.has(Constraint::Unique) {
                column.push_str(" UNIQUE");
            }
            // Blank text is rejected by `check_required`; the table agrees
            if self.is_required() && self.kind == FieldKind::Text {
                column.push_str(&format!(" CHECK ({} ~ '\\S')", self.name));
            }
        }

        column
    }
}

/// Value of an entity field as seen by the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Null,
    Integer(i64),
    Text(&'a str),
}

/// Table mapping for an entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    pub table: &'static str,
    pub fields: &'static [FieldSpec],
}

impl EntitySchema {
    pub const fn new(table: &'static str, fields: &'static [FieldSpec]) -> Self {
        Self { table, fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn primary_key(&self) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.has(Constraint::PrimaryKey))
    }

    pub fn create_table_sql(&self) -> String {
        let mut sql = format!("CREATE TABLE IF NOT EXISTS {} (\n", self.table);
        let columns: Vec<String> = self
            .fields
            .iter()
            .map(|f| format!("    {}", f.column_sql()))
            .collect();

        sql.push_str(&columns.join(",\n"));
        sql.push_str("\n)");
        sql
    }

    pub fn drop_table_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", self.table)
    }

    /// Enforce NOT NULL rules on every non-generated field of `entity`
    pub fn check_required<E: SchemaEntity>(&self, entity: &E) -> Result<(), DomainError> {
        for field in self.fields.iter().filter(|f| f.is_required()) {
            match entity.field_value(field.name) {
                FieldValue::Null => {
                    return Err(DomainError::constraint_violation(format!(
                        "{}.{} must not be null",
                        self.table, field.name
                    )));
                }
                FieldValue::Text(value) if value.trim().is_empty() => {
                    return Err(DomainError::constraint_violation(format!(
                        "{}.{} must not be empty",
                        self.table, field.name
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }
}

/// An entity that can be described by an [`EntitySchema`]
pub trait SchemaEntity {
    fn schema() -> &'static EntitySchema;

    /// Current value of the named field; unknown names read as `Null`
    fn field_value(&self, name: &str) -> FieldValue<'_>;
}
