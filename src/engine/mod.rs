//! The field-matching migration engine.
//!
//! [`Migrator::migrate`] copies an old-version record into a new-version
//! record by walking the new record's descriptor and matching every field by
//! name against the old one:
//!
//! - same-named scalars are assigned, widening losslessly where possible and
//!   otherwise casting like `as` (see [`ScalarConversion`](crate::config::ScalarConversion)),
//! - same-named fixed arrays copy their common prefix and zero the rest,
//! - same-named nested records migrate recursively by the same rules,
//! - everything else (missing, unconvertible or structurally different) is zeroed.
//!
//! # Example
//!
//! ```rust
//! use shm_migrate::prelude::*;
//!
//! #[derive(Migratable, Default)]
//! struct SlotV1 {
//!     id: u32,
//!     samples: [i16; 4],
//!     legacy: u8,
//! }
//!
//! #[derive(Migratable, Default, Debug, PartialEq)]
//! struct SlotV2 {
//!     id: u32,
//!     samples: [i32; 2],
//!     owner: u64,
//! }
//!
//! let registry = RegistryBuilder::new()
//!     .register::<SlotV1>()?
//!     .register::<SlotV2>()?
//!     .build();
//!
//! let old = SlotV1 { id: 7, samples: [1, -2, 3, -4], legacy: 9 };
//! let mut new = SlotV2::default();
//! let report = Migrator::new(&registry).migrate(&old, &mut new)?;
//!
//! assert_eq!(new, SlotV2 { id: 7, samples: [1, -2], owner: 0 });
//! assert_eq!(report.defaulted_paths().collect::<Vec<_>>(), vec!["owner"]);
//! assert_eq!(report.truncated.len(), 1);
//! # Ok::<(), shm_migrate::MigrateError>(())
//! ```

pub mod copier;
pub mod defaults;
pub mod plan;
pub mod report;
pub mod resolver;

use std::any::Any;

use log::debug;

use crate::config::MigrationOptions;
use crate::errors::MigrateResult;
use crate::registry::{self, MetadataRegistry};
use crate::traits::migration::Migratable;

use copier::Traversal;

pub use plan::{MigrationPlan, PlannedAction, PlannedField};
pub use report::{CastField, DefaultedField, FallbackReason, FieldPath, MigrationReport, TruncatedArray};

/// Migration entry point bound to a frozen registry.
#[derive(Debug, Clone, Copy)]
pub struct Migrator<'r> {
    registry: &'r MetadataRegistry,
    options: MigrationOptions,
}

impl<'r> Migrator<'r> {
    pub fn new(registry: &'r MetadataRegistry) -> Self {
        Self::with_options(registry, MigrationOptions::default())
    }

    pub fn with_options(registry: &'r MetadataRegistry, options: MigrationOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &'r MetadataRegistry {
        self.registry
    }

    pub fn options(&self) -> &MigrationOptions {
        &self.options
    }

    /// Computes what [`migrate`](Self::migrate) would do, without any values.
    pub fn plan<Old: Any, New: Any>(&self) -> MigrateResult<MigrationPlan> {
        let source = self.registry.require::<Old>()?;
        let target = self.registry.require::<New>()?;
        Ok(MigrationPlan::between_with(
            self.registry,
            self.options.conversion,
            source,
            target,
        ))
    }

    /// Overwrites every described field of `target` from `source`.
    ///
    /// Both types must be registered; that, and any option the static plan
    /// breaks, is checked before the first write. Afterwards the traversal
    /// always completes.
    pub fn migrate<Old: Any, New: Any>(
        &self,
        source: &Old,
        target: &mut New,
    ) -> MigrateResult<MigrationReport> {
        let source_descriptor = self.registry.require::<Old>()?;
        let target_descriptor = self.registry.require::<New>()?;

        if self.options.requires_plan() {
            MigrationPlan::between_with(
                self.registry,
                self.options.conversion,
                source_descriptor,
                target_descriptor,
            )
            .enforce(&self.options)?;
        }

        let mut report = MigrationReport::default();
        Traversal::new(self.registry, self.options.conversion, &mut report).migrate_record(
            source_descriptor,
            source,
            target_descriptor,
            target,
        )?;

        debug!(
            "Migrated {} -> {}: {} copied, {} converted, {} cast, {} defaulted, {} truncated",
            source_descriptor.name(),
            target_descriptor.name(),
            report.copied,
            report.converted,
            report.cast.len(),
            report.defaulted.len(),
            report.truncated.len()
        );
        Ok(report)
    }
}

impl Migrator<'static> {
    /// A migrator over the process-wide registry with default options.
    pub fn global() -> MigrateResult<Self> {
        Ok(Self::new(registry::global()?))
    }
}

/// Migrates through the process-wide registry with default options.
///
/// The `Migratable` bounds reject undescribed types at compile time; the
/// registry lookup rejects described but unregistered ones before any write.
pub fn migrate<Old: Migratable, New: Migratable>(
    source: &Old,
    target: &mut New,
) -> MigrateResult<MigrationReport> {
    Migrator::global()?.migrate(source, target)
}
