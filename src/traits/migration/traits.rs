//! Core traits connecting Rust types to their runtime descriptors.

use std::any::Any;

use crate::descriptor::{ArrayKind, FieldKind, StructDescriptor};

/// A type that can appear as a field of a migratable record.
///
/// Implemented for every primitive scalar, for `[T; N]` of any `T` that is
/// itself a `MigrateValue`, and by `#[derive(Migratable)]` for records.
/// A field whose type has no impl is rejected when the derive expands, so an
/// undescribable layout never reaches the engine.
///
/// `field_kind` must describe `Self` exactly: a scalar kind only for the
/// matching primitive, an array kind only for `[T; N]` and a record kind only
/// for `RecordRef::of::<Self>()`. The engine downcasts field values by their
/// reported kind, so [`StructDescriptorBuilder::build`](crate::descriptor::StructDescriptorBuilder::build)
/// rejects a field whose kind says otherwise with
/// [`FieldKindMismatch`](crate::errors::MigrateError::FieldKindMismatch).
///
/// ```
/// use shm_migrate::{FieldKind, MigrateValue, ScalarType};
///
/// assert_eq!(<u16 as MigrateValue>::field_kind(), FieldKind::Scalar(ScalarType::U16));
///
/// match <[[i8; 2]; 3] as MigrateValue>::field_kind() {
///     FieldKind::FixedArray(outer) => {
///         assert_eq!(outer.len(), 3);
///         assert!(matches!(outer.element(), FieldKind::FixedArray(inner) if inner.len() == 2));
///     }
///     _ => unreachable!(),
/// }
/// ```
pub trait MigrateValue: Any {
    fn field_kind() -> FieldKind;
}

impl<T: MigrateValue, const N: usize> MigrateValue for [T; N] {
    fn field_kind() -> FieldKind {
        ArrayKind::of::<T, N>().into()
    }
}

/// A record type with a descriptor.
///
/// Having an impl makes the type describable; it becomes *migratable* once
/// its descriptor is registered in a
/// [`MetadataRegistry`](crate::registry::MetadataRegistry).
///
/// # Example
///
/// Hand-written impls build the descriptor once and hand out a `'static`
/// reference, the same way the derive does:
///
/// ```
/// use std::sync::OnceLock;
/// use shm_migrate::{FieldKind, Migratable, MigrateValue, RecordRef, StructDescriptor};
///
/// struct Header {
///     magic: u32,
///     version: u16,
/// }
///
/// impl MigrateValue for Header {
///     fn field_kind() -> FieldKind {
///         RecordRef::of::<Self>().into()
///     }
/// }
///
/// impl Migratable for Header {
///     fn descriptor() -> &'static StructDescriptor {
///         static DESCRIPTOR: OnceLock<StructDescriptor> = OnceLock::new();
///         DESCRIPTOR.get_or_init(|| {
///             StructDescriptor::builder::<Header>("Header")
///                 .field::<u32>("magic", |h| &h.magic, |h| &mut h.magic)
///                 .field::<u16>("version", |h| &h.version, |h| &mut h.version)
///                 .build()
///                 .expect("unique field names")
///         })
///     }
/// }
///
/// assert_eq!(Header::descriptor().len(), 2);
/// ```
pub trait Migratable: MigrateValue {
    fn descriptor() -> &'static StructDescriptor;
}
