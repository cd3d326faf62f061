//! Metadata registry: record type identity to descriptor.
//!
//! A registry is assembled with a [`RegistryBuilder`] during start-up and then
//! frozen into a [`MetadataRegistry`], which has no mutation API at all. The
//! frozen registry is `Send + Sync` and can be shared freely between threads.
//!
//! Registering a type also registers every record type reachable through its
//! nested and array-of-record fields, so a nested layout can never be left
//! out by accident.
//!
//! A process-wide registry can be installed exactly once with
//! [`RegistryBuilder::install`] and fetched with [`global`].

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::OnceLock;

use log::debug;

use crate::descriptor::{FieldKind, StructDescriptor};
use crate::errors::{MigrateError, MigrateResult};
use crate::schema::RegistrySchema;
use crate::traits::migration::Migratable;

static GLOBAL_REGISTRY: OnceLock<MetadataRegistry> = OnceLock::new();

/// Frozen mapping from record type to its descriptor.
#[derive(Debug, Default)]
pub struct MetadataRegistry {
    by_type: HashMap<TypeId, usize>,
    descriptors: Vec<&'static StructDescriptor>,
}

impl MetadataRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn lookup(&self, type_id: TypeId) -> Option<&'static StructDescriptor> {
        self.by_type.get(&type_id).map(|&index| self.descriptors[index])
    }

    pub fn lookup_type<T: Any>(&self) -> Option<&'static StructDescriptor> {
        self.lookup(TypeId::of::<T>())
    }

    pub fn is_migratable(&self, type_id: TypeId) -> bool {
        self.by_type.contains_key(&type_id)
    }

    pub fn is_migratable_type<T: Any>(&self) -> bool {
        self.is_migratable(TypeId::of::<T>())
    }

    /// Like [`lookup_type`](Self::lookup_type), but an unregistered type is a
    /// configuration error.
    pub fn require<T: Any>(&self) -> MigrateResult<&'static StructDescriptor> {
        self.lookup_type::<T>().ok_or(MigrateError::Unregistered {
            type_name: std::any::type_name::<T>(),
        })
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &'static StructDescriptor> + '_ {
        self.descriptors.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn schema(&self) -> RegistrySchema {
        RegistrySchema {
            records: self.descriptors().map(StructDescriptor::schema).collect(),
        }
    }
}

/// Start-up phase collector for a [`MetadataRegistry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    registry: MetadataRegistry,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` and every record type nested inside it.
    pub fn register<T: Migratable>(self) -> MigrateResult<Self> {
        self.register_descriptor(T::descriptor())
    }

    /// Registers a descriptor directly.
    ///
    /// Registering the same descriptor twice is a no-op; a different
    /// descriptor for an already registered type is rejected.
    pub fn register_descriptor(mut self, descriptor: &'static StructDescriptor) -> MigrateResult<Self> {
        self.insert(descriptor)?;
        Ok(self)
    }

    fn insert(&mut self, descriptor: &'static StructDescriptor) -> MigrateResult<()> {
        if let Some(&index) = self.registry.by_type.get(&descriptor.type_id()) {
            if std::ptr::eq(self.registry.descriptors[index], descriptor) {
                return Ok(());
            }
            return Err(MigrateError::DuplicateDescriptor {
                type_name: descriptor.type_name(),
            });
        }

        self.registry
            .by_type
            .insert(descriptor.type_id(), self.registry.descriptors.len());
        self.registry.descriptors.push(descriptor);

        for field in descriptor.fields() {
            self.insert_nested(field.kind())?;
        }
        Ok(())
    }

    fn insert_nested(&mut self, kind: &FieldKind) -> MigrateResult<()> {
        match kind {
            FieldKind::Scalar(_) => Ok(()),
            FieldKind::FixedArray(array) => self.insert_nested(array.element()),
            FieldKind::Nested(record) => self.insert(record.descriptor()),
        }
    }

    /// Freezes the registry.
    pub fn build(self) -> MetadataRegistry {
        debug!(
            "MetadataRegistry: frozen with {} record types",
            self.registry.len()
        );
        self.registry
    }

    /// Freezes the registry and installs it as the process-wide registry.
    ///
    /// Fails with [`MigrateError::RegistryFrozen`] if one is already installed.
    pub fn install(self) -> MigrateResult<&'static MetadataRegistry> {
        let registry = self.build();
        let mut installed = false;
        let global = GLOBAL_REGISTRY.get_or_init(|| {
            installed = true;
            registry
        });

        if installed {
            Ok(global)
        } else {
            Err(MigrateError::RegistryFrozen)
        }
    }
}

/// The process-wide registry installed by [`RegistryBuilder::install`].
pub fn global() -> MigrateResult<&'static MetadataRegistry> {
    GLOBAL_REGISTRY
        .get()
        .ok_or(MigrateError::RegistryNotInitialized)
}
