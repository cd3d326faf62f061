//! Value copier: the recursive per-field dispatch.
//!
//! For each pair of source and target slots [`classify`] picks one of
//! four outcomes from the two field kinds and the conversion rule alone:
//!
//! 1. both fixed arrays: reconcile lengths and copy element-wise,
//! 2. both records, both registered: migrate the nested record by name,
//! 3. both scalars and the target is assignable from the source: assign,
//!    widening losslessly or casting,
//! 4. anything else: default-fill the target.
//!
//! A target with no source at all is default-filled before classification.

use std::any::Any;

use log::trace;

use crate::config::ScalarConversion;
use crate::descriptor::{ArrayKind, FieldKind, ScalarType, StructDescriptor};
use crate::engine::defaults::{mismatch, set_default};
use crate::engine::report::{
    CastField, DefaultedField, FallbackReason, FieldPath, MigrationReport, TruncatedArray,
};
use crate::engine::resolver::resolve;
use crate::errors::MigrateResult;
use crate::registry::MetadataRegistry;

/// Decision for one source/target kind pair.
#[derive(Debug)]
pub(crate) enum Dispatch<'k> {
    Array {
        source: &'k ArrayKind,
        target: &'k ArrayKind,
    },
    Record {
        source: &'static StructDescriptor,
        target: &'static StructDescriptor,
    },
    /// Identity or lossless widening.
    Scalar {
        source: ScalarType,
        target: ScalarType,
    },
    /// `as` cast that may lose information.
    Cast {
        source: ScalarType,
        target: ScalarType,
    },
    Default(FallbackReason),
}

pub(crate) fn classify<'k>(
    registry: &MetadataRegistry,
    conversion: ScalarConversion,
    source: &'k FieldKind,
    target: &'k FieldKind,
) -> Dispatch<'k> {
    match (source, target) {
        (FieldKind::FixedArray(source), FieldKind::FixedArray(target)) => {
            Dispatch::Array { source, target }
        }
        (FieldKind::Nested(source), FieldKind::Nested(target)) => {
            match (
                registry.lookup(source.type_id()),
                registry.lookup(target.type_id()),
            ) {
                (Some(source), Some(target)) => Dispatch::Record { source, target },
                _ => Dispatch::Default(FallbackReason::UnregisteredRecord {
                    source: source.type_name(),
                    target: target.type_name(),
                }),
            }
        }
        (FieldKind::Scalar(source), FieldKind::Scalar(target)) => {
            if source.converts_to(*target) {
                Dispatch::Scalar {
                    source: *source,
                    target: *target,
                }
            } else if conversion == ScalarConversion::Assign && source.casts_to(*target) {
                Dispatch::Cast {
                    source: *source,
                    target: *target,
                }
            } else {
                Dispatch::Default(FallbackReason::IncompatibleScalar {
                    from: *source,
                    to: *target,
                })
            }
        }
        _ => Dispatch::Default(FallbackReason::KindMismatch {
            from: source.label(),
            to: target.label(),
        }),
    }
}

/// One migration call's traversal state.
pub(crate) struct Traversal<'a> {
    registry: &'a MetadataRegistry,
    conversion: ScalarConversion,
    report: &'a mut MigrationReport,
    path: FieldPath,
}

impl<'a> Traversal<'a> {
    pub(crate) fn new(
        registry: &'a MetadataRegistry,
        conversion: ScalarConversion,
        report: &'a mut MigrationReport,
    ) -> Self {
        Self {
            registry,
            conversion,
            report,
            path: FieldPath::default(),
        }
    }

    /// Walks the target descriptor in declaration order, resolving every
    /// field by name against the source descriptor.
    ///
    /// Source-only fields are never visited; each target field is written once.
    pub(crate) fn migrate_record(
        &mut self,
        source_descriptor: &StructDescriptor,
        source: &dyn Any,
        target_descriptor: &StructDescriptor,
        target: &mut dyn Any,
    ) -> MigrateResult<()> {
        for target_field in target_descriptor.fields() {
            self.path.push_field(target_field.name());

            let slot = target_field
                .write(target)
                .ok_or_else(|| mismatch(&self.path))?;

            let source_value = match resolve(target_field.name(), source_descriptor) {
                Some(source_field) => {
                    let value = source_field
                        .read(source)
                        .ok_or_else(|| mismatch(&self.path))?;
                    Some((source_field.kind(), value))
                }
                None => None,
            };

            self.copy_value(source_value, target_field.kind(), slot)?;
            self.path.pop();
        }
        Ok(())
    }

    pub(crate) fn copy_value(
        &mut self,
        source: Option<(&FieldKind, &dyn Any)>,
        target_kind: &FieldKind,
        target: &mut dyn Any,
    ) -> MigrateResult<()> {
        let Some((source_kind, source)) = source else {
            return self.fill_default(target_kind, target, FallbackReason::MissingSource);
        };

        match classify(self.registry, self.conversion, source_kind, target_kind) {
            Dispatch::Array {
                source: source_array,
                target: target_array,
            } => self.copy_array(source_array, source, target_array, target),
            Dispatch::Record {
                source: source_descriptor,
                target: target_descriptor,
            } => self.migrate_record(source_descriptor, source, target_descriptor, target),
            Dispatch::Scalar {
                source: source_type,
                target: target_type,
            } => self.copy_scalar(source_type, source, target_type, target),
            Dispatch::Cast {
                source: source_type,
                target: target_type,
            } => self.cast_scalar(source_type, source, target_type, target),
            Dispatch::Default(reason) => self.fill_default(target_kind, target, reason),
        }
    }

    /// Copies the overlapping prefix element-wise and zeroes the rest of the
    /// target. Source elements past the target length are never read.
    fn copy_array(
        &mut self,
        source_kind: &ArrayKind,
        source: &dyn Any,
        target_kind: &ArrayKind,
        target: &mut dyn Any,
    ) -> MigrateResult<()> {
        let shared = source_kind.len().min(target_kind.len());

        for index in 0..shared {
            self.path.push_index(index);
            let source_element = source_kind
                .get(source, index)
                .ok_or_else(|| mismatch(&self.path))?;
            let target_element = target_kind
                .get_mut(target, index)
                .ok_or_else(|| mismatch(&self.path))?;
            self.copy_value(
                Some((source_kind.element(), source_element)),
                target_kind.element(),
                target_element,
            )?;
            self.path.pop();
        }

        for index in shared..target_kind.len() {
            self.path.push_index(index);
            let target_element = target_kind
                .get_mut(target, index)
                .ok_or_else(|| mismatch(&self.path))?;
            set_default(target_kind.element(), target_element, &mut self.path)?;
            self.report.padded.push(self.path.to_string());
            self.path.pop();
        }

        if source_kind.len() > target_kind.len() {
            trace!(
                "Truncating `{}` from {} to {} elements",
                self.path,
                source_kind.len(),
                target_kind.len()
            );
            self.report.truncated.push(TruncatedArray {
                path: self.path.to_string(),
                source_len: source_kind.len(),
                target_len: target_kind.len(),
            });
        }
        Ok(())
    }

    fn copy_scalar(
        &mut self,
        source_type: ScalarType,
        source: &dyn Any,
        target_type: ScalarType,
        target: &mut dyn Any,
    ) -> MigrateResult<()> {
        let value = source_type
            .read(source)
            .and_then(|value| value.convert_to(target_type))
            .ok_or_else(|| mismatch(&self.path))?;

        if !value.write_into(target) {
            return Err(mismatch(&self.path));
        }

        if source_type == target_type {
            self.report.copied += 1;
        } else {
            self.report.converted += 1;
        }
        Ok(())
    }

    fn cast_scalar(
        &mut self,
        source_type: ScalarType,
        source: &dyn Any,
        target_type: ScalarType,
        target: &mut dyn Any,
    ) -> MigrateResult<()> {
        let value = source_type
            .read(source)
            .and_then(|value| value.cast_to(target_type))
            .ok_or_else(|| mismatch(&self.path))?;

        if !value.write_into(target) {
            return Err(mismatch(&self.path));
        }

        trace!("Casting `{}` from {} to {}", self.path, source_type, target_type);
        self.report.cast.push(CastField {
            path: self.path.to_string(),
            from: source_type,
            to: target_type,
        });
        Ok(())
    }

    fn fill_default(
        &mut self,
        kind: &FieldKind,
        target: &mut dyn Any,
        reason: FallbackReason,
    ) -> MigrateResult<()> {
        trace!("Default-filling `{}`: {}", self.path, reason);
        set_default(kind, target, &mut self.path)?;
        self.report.defaulted.push(DefaultedField {
            path: self.path.to_string(),
            reason,
        });
        Ok(())
    }
}
