//! Runtime field descriptors.
//!
//! A [`StructDescriptor`] is the ordered list of named fields of one concrete
//! record type. Each [`FieldDescriptor`] carries the field's name, its
//! structural [`FieldKind`] and a type-erased accessor pair able to borrow the
//! field out of a `&dyn Any` / `&mut dyn Any` holding the record.
//!
//! Descriptors are normally produced by `#[derive(Migratable)]`, which calls
//! [`StructDescriptor::builder`] with one [`field`](StructDescriptorBuilder::field)
//! per struct field. The builder can also be used directly when implementing
//! [`Migratable`](crate::traits::migration::Migratable) by hand:
//!
//! ```
//! use shm_migrate::{FieldKind, ScalarType, StructDescriptor};
//!
//! struct Sample {
//!     id: u32,
//!     weights: [f32; 4],
//! }
//!
//! let descriptor = StructDescriptor::builder::<Sample>("Sample")
//!     .field::<u32>("id", |s| &s.id, |s| &mut s.id)
//!     .field::<[f32; 4]>("weights", |s| &s.weights, |s| &mut s.weights)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(descriptor.len(), 2);
//! assert_eq!(descriptor.fields()[0].kind(), &FieldKind::Scalar(ScalarType::U32));
//! ```

pub mod scalar;

use std::any::{Any, TypeId};
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;

use derive_more::From;

use crate::errors::{MigrateError, MigrateResult};
use crate::traits::migration::{MigrateValue, Migratable};

pub use scalar::{ScalarType, ScalarValue};

/// Structural kind of a field.
#[derive(Debug, Clone, PartialEq, From)]
pub enum FieldKind {
    Scalar(ScalarType),
    FixedArray(ArrayKind),
    Nested(RecordRef),
}

impl FieldKind {
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Scalar(_) => "scalar",
            FieldKind::FixedArray(_) => "array",
            FieldKind::Nested(_) => "record",
        }
    }

    /// True when this kind describes values of the type `type_id`, and for
    /// arrays, when the element kind describes the element type as well.
    pub fn describes(&self, type_id: TypeId) -> bool {
        match self {
            FieldKind::Scalar(scalar) => scalar.value_type_id() == type_id,
            FieldKind::FixedArray(array) => {
                array.type_id == type_id && array.element.describes(array.element_type_id)
            }
            FieldKind::Nested(record) => record.type_id() == type_id,
        }
    }
}

type ElementRef = fn(&dyn Any, usize) -> Option<&dyn Any>;
type ElementMut = fn(&mut dyn Any, usize) -> Option<&mut dyn Any>;

/// A fixed-length array field `[T; N]`.
#[derive(Clone)]
pub struct ArrayKind {
    element: Box<FieldKind>,
    len: usize,
    type_id: TypeId,
    element_type_id: TypeId,
    element_ref: ElementRef,
    element_mut: ElementMut,
}

impl ArrayKind {
    pub fn of<T: MigrateValue, const N: usize>() -> Self {
        Self {
            element: Box::new(T::field_kind()),
            len: N,
            type_id: TypeId::of::<[T; N]>(),
            element_type_id: TypeId::of::<T>(),
            element_ref: element_ref::<T, N>,
            element_mut: element_mut::<T, N>,
        }
    }

    pub fn element(&self) -> &FieldKind {
        &self.element
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Borrows element `index` of an array value of this kind.
    pub fn get<'a>(&self, array: &'a dyn Any, index: usize) -> Option<&'a dyn Any> {
        (self.element_ref)(array, index)
    }

    pub fn get_mut<'a>(&self, array: &'a mut dyn Any, index: usize) -> Option<&'a mut dyn Any> {
        (self.element_mut)(array, index)
    }
}

impl fmt::Debug for ArrayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayKind")
            .field("element", &self.element)
            .field("len", &self.len)
            .finish()
    }
}

impl PartialEq for ArrayKind {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.element == other.element
    }
}

fn element_ref<T: Any, const N: usize>(array: &dyn Any, index: usize) -> Option<&dyn Any> {
    let array = array.downcast_ref::<[T; N]>()?;
    array.get(index).map(|element| element as &dyn Any)
}

fn element_mut<T: Any, const N: usize>(array: &mut dyn Any, index: usize) -> Option<&mut dyn Any> {
    let array = array.downcast_mut::<[T; N]>()?;
    array.get_mut(index).map(|element| element as &mut dyn Any)
}

/// Reference to a record type used as a field (or array element) type.
#[derive(Clone, Copy)]
pub struct RecordRef {
    type_id: TypeId,
    type_name: &'static str,
    descriptor: fn() -> &'static StructDescriptor,
}

impl RecordRef {
    pub fn of<T: Migratable>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            descriptor: T::descriptor,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The record type's own descriptor, independent of any registry.
    pub fn descriptor(&self) -> &'static StructDescriptor {
        (self.descriptor)()
    }
}

impl fmt::Debug for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordRef").field(&self.type_name).finish()
    }
}

impl PartialEq for RecordRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for RecordRef {}

trait ErasedAccessor: Send + Sync {
    fn read<'a>(&self, record: &'a dyn Any) -> Option<&'a dyn Any>;
    fn write<'a>(&self, record: &'a mut dyn Any) -> Option<&'a mut dyn Any>;
}

struct TypedAccessor<T, F> {
    get: fn(&T) -> &F,
    get_mut: fn(&mut T) -> &mut F,
}

impl<T: Any, F: Any> ErasedAccessor for TypedAccessor<T, F> {
    fn read<'a>(&self, record: &'a dyn Any) -> Option<&'a dyn Any> {
        let record = record.downcast_ref::<T>()?;
        Some((self.get)(record) as &dyn Any)
    }

    fn write<'a>(&self, record: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        let record = record.downcast_mut::<T>()?;
        Some((self.get_mut)(record) as &mut dyn Any)
    }
}

/// One named field of a record.
pub struct FieldDescriptor {
    name: String,
    kind: FieldKind,
    accessor: Box<dyn ErasedAccessor>,
}

impl FieldDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Borrows this field out of `record`.
    ///
    /// Returns `None` if `record` is not the type this descriptor was built for.
    pub fn read<'a>(&self, record: &'a dyn Any) -> Option<&'a dyn Any> {
        self.accessor.read(record)
    }

    pub fn write<'a>(&self, record: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        self.accessor.write(record)
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Ordered field list of one concrete record type.
#[derive(Debug)]
pub struct StructDescriptor {
    name: String,
    type_id: TypeId,
    type_name: &'static str,
    fields: Vec<FieldDescriptor>,
}

impl StructDescriptor {
    pub fn builder<T: Any>(name: &str) -> StructDescriptorBuilder<T> {
        StructDescriptorBuilder {
            name: name.to_owned(),
            fields: Vec::new(),
            mismatched: None,
            _marker: PhantomData,
        }
    }

    /// Short record name, as written in the struct declaration.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

pub struct StructDescriptorBuilder<T> {
    name: String,
    fields: Vec<FieldDescriptor>,
    // First field whose reported kind does not describe its type
    mismatched: Option<String>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any> StructDescriptorBuilder<T> {
    /// Appends a field. Its kind is derived from `F`.
    pub fn field<F: MigrateValue>(
        mut self,
        name: &str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        let kind = F::field_kind();
        if self.mismatched.is_none() && !kind.describes(TypeId::of::<F>()) {
            self.mismatched = Some(name.to_owned());
        }
        self.fields.push(FieldDescriptor {
            name: name.to_owned(),
            kind,
            accessor: Box::new(TypedAccessor { get, get_mut }),
        });
        self
    }

    /// Finishes the descriptor, rejecting duplicate field names and fields
    /// whose [`MigrateValue::field_kind`] does not describe their type.
    pub fn build(self) -> MigrateResult<StructDescriptor> {
        if let Some(field) = self.mismatched {
            return Err(MigrateError::FieldKindMismatch {
                record: self.name,
                field,
            });
        }

        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(MigrateError::DuplicateField {
                    record: self.name.clone(),
                    field: field.name.clone(),
                });
            }
        }

        Ok(StructDescriptor {
            name: self.name,
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            fields: self.fields,
        })
    }
}
