//! What a migration call did to the target.

use std::fmt;

use crate::descriptor::ScalarType;

/// Why a target field was default-filled instead of copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No source field has the target field's name.
    MissingSource,
    /// Both are scalars but the conversion rule has no way from one to the other.
    IncompatibleScalar { from: ScalarType, to: ScalarType },
    /// Structural kinds differ, e.g. scalar versus array.
    KindMismatch { from: &'static str, to: &'static str },
    /// Nested records where at least one side is not registered.
    UnregisteredRecord {
        source: &'static str,
        target: &'static str,
    },
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::MissingSource => write!(f, "no source field with this name"),
            FallbackReason::IncompatibleScalar { from, to } => {
                write!(f, "no conversion from {from} to {to}")
            }
            FallbackReason::KindMismatch { from, to } => {
                write!(f, "source is {from}, target is {to}")
            }
            FallbackReason::UnregisteredRecord { source, target } => {
                write!(f, "record {source} -> {target} is not registered on both sides")
            }
        }
    }
}

/// Dotted path to a field inside the target record, e.g. `items[2].status`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Field(String),
    Index(usize),
    AnyIndex,
}

impl FieldPath {
    pub fn push_field(&mut self, name: &str) {
        self.segments.push(Segment::Field(name.to_owned()));
    }

    pub fn push_index(&mut self, index: usize) {
        self.segments.push(Segment::Index(index));
    }

    /// Pushes `[*]`, standing for every element of an array.
    pub fn push_any_index(&mut self) {
        self.segments.push(Segment::AnyIndex);
    }

    pub fn pop(&mut self) {
        self.segments.pop();
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Field(name) if position == 0 => write!(f, "{name}")?,
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
                Segment::AnyIndex => write!(f, "[*]")?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultedField {
    pub path: String,
    pub reason: FallbackReason,
}

/// A scalar assigned across a type change with `as` semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastField {
    pub path: String,
    pub from: ScalarType,
    pub to: ScalarType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruncatedArray {
    pub path: String,
    pub source_len: usize,
    pub target_len: usize,
}

/// Outcome of one [`Migrator::migrate`](crate::engine::Migrator::migrate) call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Scalars copied with their type unchanged.
    pub copied: usize,
    /// Scalars widened to a different type.
    pub converted: usize,
    /// Scalars cast to a different type, possibly losing information.
    pub cast: Vec<CastField>,
    /// Target fields default-filled, outermost path only.
    pub defaulted: Vec<DefaultedField>,
    /// Extra target array elements default-filled because the source was shorter.
    pub padded: Vec<String>,
    /// Arrays whose source tail was dropped.
    pub truncated: Vec<TruncatedArray>,
}

impl MigrationReport {
    /// True when every source value reached the target unchanged and
    /// nothing was default-filled for lack of a source.
    pub fn is_lossless(&self) -> bool {
        self.defaulted.is_empty() && self.truncated.is_empty() && self.cast.is_empty()
    }

    pub fn defaulted_paths(&self) -> impl Iterator<Item = &str> {
        self.defaulted.iter().map(|d| d.path.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_display() {
        let mut path = FieldPath::default();
        assert_eq!(path.to_string(), "");

        path.push_field("items");
        path.push_index(2);
        path.push_field("status");
        assert_eq!(path.to_string(), "items[2].status");

        path.pop();
        path.pop();
        path.push_any_index();
        assert_eq!(path.to_string(), "items[*]");
    }

    #[test]
    fn test_reason_display() {
        let reason = FallbackReason::IncompatibleScalar {
            from: ScalarType::F64,
            to: ScalarType::I32,
        };
        assert_eq!(reason.to_string(), "no conversion from f64 to i32");
    }

    #[test]
    fn test_empty_report_is_lossless() {
        assert!(MigrationReport::default().is_lossless());
    }
}
