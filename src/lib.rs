//! # shm_migrate
//!
//! Name-matched migration of fixed-layout records between struct versions.
//!
//! A program that keeps records in a shared-memory segment or a persistent
//! fixed-size buffer eventually meets data written by an older build. This
//! crate copies such an old-version value into the new-version struct by
//! matching fields by *name*, so adding, removing or reordering fields,
//! resizing fixed arrays and evolving nested records need no hand-written
//! per-version conversion code.
//!
//! ## Features
//!
//! - **Declarative**: `#[derive(Migratable)]` builds each record's field
//!   descriptor; unsupported field types fail to compile
//! - **Frozen registry**: descriptors are registered once at start-up and are
//!   read-only afterwards, safe to share across threads
//! - **Recursive**: nested records and arrays of records migrate field by field
//! - **Explicit loss**: zeroed fields and truncated arrays are reported along
//!   with lossy numeric casts, and [`MigrationOptions::strict`] turns them
//!   into errors before any write
//! - **Dry run**: [`Migrator::plan`] shows the outcome from descriptors alone
//!
//! ## Quick Start
//!
//! ```rust
//! use shm_migrate::prelude::*;
//!
//! #[derive(Migratable, Default)]
//! struct OldB { id: i32, count: i32 }
//!
//! #[derive(Migratable, Default, Debug, PartialEq)]
//! struct NewB { id: i32, status: i32, count: i32 }
//!
//! #[derive(Migratable, Default)]
//! struct OldA { flag: i32, items: [OldB; 2], values: [i32; 3] }
//!
//! #[derive(Migratable, Default, Debug)]
//! struct NewA { flag: i32, items: [NewB; 3], values: [i32; 2], price: f64 }
//!
//! let registry = RegistryBuilder::new()
//!     .register::<OldA>()?
//!     .register::<NewA>()?
//!     .build();
//!
//! let old = OldA {
//!     flag: 1,
//!     items: [OldB { id: 10, count: 20 }, OldB { id: 11, count: 21 }],
//!     values: [7, 8, 9],
//! };
//! let mut new = NewA::default();
//! Migrator::new(&registry).migrate(&old, &mut new)?;
//!
//! assert_eq!(new.flag, 1);
//! assert_eq!(new.items[1], NewB { id: 11, status: 0, count: 21 });
//! assert_eq!(new.items[2], NewB::default());
//! assert_eq!(new.values, [7, 8]);
//! assert_eq!(new.price, 0.0);
//! # Ok::<(), shm_migrate::MigrateError>(())
//! ```

extern crate self as shm_migrate;

pub mod config;
pub mod descriptor;
pub mod engine;
pub mod errors;
pub mod prelude;
pub mod registry;
pub mod schema;
pub mod traits;

pub use config::{FallbackPolicy, MigrationOptions, ScalarConversion};
pub use descriptor::{
    ArrayKind, FieldDescriptor, FieldKind, RecordRef, ScalarType, ScalarValue, StructDescriptor,
    StructDescriptorBuilder,
};
pub use engine::{MigrationPlan, MigrationReport, Migrator, migrate};
pub use errors::{MigrateError, MigrateResult};
pub use registry::{MetadataRegistry, RegistryBuilder};
pub use traits::migration::{Migratable, MigrateValue};

pub use shm_migrate_macros::Migratable;
