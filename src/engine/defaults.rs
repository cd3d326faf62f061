//! Default initializer.

use std::any::Any;

use crate::descriptor::FieldKind;
use crate::engine::report::FieldPath;
use crate::errors::{MigrateError, MigrateResult};

/// Overwrites `slot` with the zero value of `kind`.
///
/// Arrays are zeroed element by element and records field by field through
/// their own descriptor, so the result never depends on a `Default` impl.
pub fn set_default(kind: &FieldKind, slot: &mut dyn Any, path: &mut FieldPath) -> MigrateResult<()> {
    match kind {
        FieldKind::Scalar(scalar) => {
            if scalar.zero().write_into(slot) {
                Ok(())
            } else {
                Err(mismatch(path))
            }
        }
        FieldKind::FixedArray(array) => {
            for index in 0..array.len() {
                path.push_index(index);
                let element = array.get_mut(slot, index).ok_or_else(|| mismatch(path))?;
                set_default(array.element(), element, path)?;
                path.pop();
            }
            Ok(())
        }
        FieldKind::Nested(record) => {
            for field in record.descriptor().fields() {
                path.push_field(field.name());
                let value = field.write(slot).ok_or_else(|| mismatch(path))?;
                set_default(field.kind(), value, path)?;
                path.pop();
            }
            Ok(())
        }
    }
}

pub(crate) fn mismatch(path: &FieldPath) -> MigrateError {
    MigrateError::AccessorMismatch {
        path: path.to_string(),
    }
}
