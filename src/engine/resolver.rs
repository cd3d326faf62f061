//! By-name field resolution.

use crate::descriptor::{FieldDescriptor, StructDescriptor};

/// Finds the first field of `source` named exactly `name`.
///
/// Scans in declaration order. Matching is case-sensitive string equality;
/// there is no renaming or fuzzy matching.
pub fn resolve<'d>(name: &str, source: &'d StructDescriptor) -> Option<&'d FieldDescriptor> {
    source.fields().iter().find(|field| field.name() == name)
}
