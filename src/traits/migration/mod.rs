//! Migration traits for describable record types.
//!
//! Two traits tie a Rust type to the engine:
//!
//! - [`MigrateValue`] maps a field type to its structural
//!   [`FieldKind`](crate::descriptor::FieldKind) (scalar, fixed array or
//!   nested record).
//! - [`Migratable`] gives a record type its
//!   [`StructDescriptor`](crate::descriptor::StructDescriptor).
//!
//! # Example
//!
//! ```rust
//! use shm_migrate::prelude::*;
//!
//! #[derive(Migratable, Debug, Default, PartialEq)]
//! struct PointV1 {
//!     x: i32,
//!     y: i32,
//! }
//!
//! #[derive(Migratable, Debug, Default, PartialEq)]
//! struct PointV2 {
//!     x: i64,
//!     y: i64,
//!     z: i64,
//! }
//!
//! let registry = RegistryBuilder::new()
//!     .register::<PointV1>()?
//!     .register::<PointV2>()?
//!     .build();
//!
//! let mut point = PointV2::default();
//! Migrator::new(&registry).migrate(&PointV1 { x: 1, y: -2 }, &mut point)?;
//! assert_eq!(point, PointV2 { x: 1, y: -2, z: 0 });
//! # Ok::<(), shm_migrate::MigrateError>(())
//! ```

mod traits;

pub use traits::*;
