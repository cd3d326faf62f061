//! Error types for descriptor registration and record migration.
//!
//! Registration problems (duplicate field names, a field kind that does not
//! describe the field's type, a second descriptor for one type, installing the
//! process-wide registry twice) and configuration
//! problems (migrating a type nobody registered) are reported before any
//! target field is written. A well-formed migration under the default
//! [`FallbackPolicy`](crate::config::FallbackPolicy) never fails.

use thiserror::Error;

use crate::engine::FallbackReason;

pub type MigrateResult<T> = Result<T, MigrateError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MigrateError {
    #[error("Record type `{type_name}` has no registered descriptor")]
    Unregistered { type_name: &'static str },

    #[error("Duplicate field `{field}` in descriptor of `{record}`")]
    DuplicateField { record: String, field: String },

    #[error("Field `{field}` of `{record}` reports a kind that does not describe its type")]
    FieldKindMismatch { record: String, field: String },

    #[error("Record type `{type_name}` already has a different descriptor")]
    DuplicateDescriptor { type_name: &'static str },

    #[error("The process-wide registry is already installed and frozen")]
    RegistryFrozen,

    #[error("The process-wide registry has not been installed")]
    RegistryNotInitialized,

    #[error("Field `{path}` would be default-filled ({reason})")]
    Fallback { path: String, reason: FallbackReason },

    #[error("Field `{path}` would be truncated from {source_len} to {target_len} elements")]
    Truncation {
        path: String,
        source_len: usize,
        target_len: usize,
    },

    #[error("Accessor for `{path}` does not match the value it was given")]
    AccessorMismatch { path: String },
}
