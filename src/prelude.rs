//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use shm_migrate::prelude::*;
//! ```
//!
//! # What's Included
//!
//! - [`Migratable`]: derive macro and trait for record types
//! - [`MigrateValue`]: field types the engine understands
//! - [`RegistryBuilder`] / [`MetadataRegistry`]: start-up registration and the
//!   frozen registry
//! - [`Migrator`]: the migration entry point, plus [`MigrationOptions`] and
//!   [`FallbackPolicy`]
//! - [`MigrationReport`] / [`MigrationPlan`]: what a migration did or would do
//! - [`MigrateError`] / [`MigrateResult`]

pub use crate::config::{FallbackPolicy, MigrationOptions, ScalarConversion};
pub use crate::descriptor::{FieldKind, ScalarType, StructDescriptor};
pub use crate::engine::{FallbackReason, MigrationPlan, MigrationReport, Migrator};
pub use crate::errors::{MigrateError, MigrateResult};
pub use crate::registry::{MetadataRegistry, RegistryBuilder};
pub use crate::traits::migration::{Migratable, MigrateValue};

pub use shm_migrate_macros::Migratable;
