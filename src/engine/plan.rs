//! Static migration plan.
//!
//! Every decision the copier makes depends only on the two descriptors, never
//! on the values, so the full outcome of a migration can be computed ahead of
//! time. The plan backs the strict options (they are enforced before the
//! first target write) and doubles as a dry run for tooling and review.

use std::fmt;

use crate::config::{FallbackPolicy, MigrationOptions, ScalarConversion};
use crate::descriptor::{FieldKind, ScalarType, StructDescriptor};
use crate::engine::copier::{Dispatch, classify};
use crate::engine::report::{FallbackReason, FieldPath};
use crate::engine::resolver::resolve;
use crate::errors::{MigrateError, MigrateResult};
use crate::registry::MetadataRegistry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedAction {
    /// Scalar assigned unchanged.
    Copy(ScalarType),
    /// Scalar widened.
    Convert { from: ScalarType, to: ScalarType },
    /// Scalar cast with `as` semantics; the value may change.
    Cast { from: ScalarType, to: ScalarType },
    /// Nested record migrated by name; its fields follow in the plan.
    Record { source: String, target: String },
    /// Fixed array reconciled; element steps follow under `[*]`.
    Array { source_len: usize, target_len: usize },
    /// Target default-filled.
    Default(FallbackReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedField {
    pub path: String,
    pub action: PlannedAction,
}

impl PlannedField {
    pub fn is_truncation(&self) -> bool {
        matches!(
            self.action,
            PlannedAction::Array { source_len, target_len } if source_len > target_len
        )
    }

    pub fn is_cast(&self) -> bool {
        matches!(self.action, PlannedAction::Cast { .. })
    }

    pub fn fallback(&self) -> Option<&FallbackReason> {
        match &self.action {
            PlannedAction::Default(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Ordered list of what a migration between two record types will do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationPlan {
    source: String,
    target: String,
    steps: Vec<PlannedField>,
}

impl MigrationPlan {
    /// Plans under the default [`ScalarConversion::Assign`] rule.
    pub fn between(
        registry: &MetadataRegistry,
        source: &StructDescriptor,
        target: &StructDescriptor,
    ) -> Self {
        Self::between_with(registry, ScalarConversion::default(), source, target)
    }

    pub fn between_with(
        registry: &MetadataRegistry,
        conversion: ScalarConversion,
        source: &StructDescriptor,
        target: &StructDescriptor,
    ) -> Self {
        let mut planner = Planner {
            registry,
            conversion,
            path: FieldPath::default(),
            steps: Vec::new(),
        };
        planner.plan_record(source, target);

        Self {
            source: source.name().to_owned(),
            target: target.name().to_owned(),
            steps: planner.steps,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn steps(&self) -> &[PlannedField] {
        &self.steps
    }

    pub fn step(&self, path: &str) -> Option<&PlannedField> {
        self.steps.iter().find(|step| step.path == path)
    }

    pub fn fallbacks(&self) -> impl Iterator<Item = &PlannedField> {
        self.steps.iter().filter(|step| step.fallback().is_some())
    }

    pub fn truncations(&self) -> impl Iterator<Item = &PlannedField> {
        self.steps.iter().filter(|step| step.is_truncation())
    }

    pub fn casts(&self) -> impl Iterator<Item = &PlannedField> {
        self.steps.iter().filter(|step| step.is_cast())
    }

    /// True when no target field is default-filled for lack of a usable
    /// source, no scalar is cast and no array is truncated.
    pub fn is_lossless(&self) -> bool {
        self.fallbacks().next().is_none()
            && self.truncations().next().is_none()
            && self.casts().next().is_none()
    }

    /// Rejects the plan if it breaks `options`.
    pub fn enforce(&self, options: &MigrationOptions) -> MigrateResult<()> {
        if options.fallback == FallbackPolicy::Reject {
            if let Some(step) = self.fallbacks().next()
                && let PlannedAction::Default(reason) = &step.action
            {
                return Err(MigrateError::Fallback {
                    path: step.path.clone(),
                    reason: reason.clone(),
                });
            }
        }

        if !options.allow_truncation
            && let Some(step) = self.truncations().next()
            && let PlannedAction::Array {
                source_len,
                target_len,
            } = step.action
        {
            return Err(MigrateError::Truncation {
                path: step.path.clone(),
                source_len,
                target_len,
            });
        }

        Ok(())
    }
}

impl fmt::Display for MigrationPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} -> {}", self.source, self.target)?;
        for step in &self.steps {
            write!(f, "  {}: ", step.path)?;
            match &step.action {
                PlannedAction::Copy(ty) => writeln!(f, "copy {ty}")?,
                PlannedAction::Convert { from, to } => writeln!(f, "convert {from} -> {to}")?,
                PlannedAction::Cast { from, to } => writeln!(f, "cast {from} -> {to}")?,
                PlannedAction::Record { source, target } => {
                    writeln!(f, "record {source} -> {target}")?
                }
                PlannedAction::Array {
                    source_len,
                    target_len,
                } => writeln!(f, "array {source_len} -> {target_len}")?,
                PlannedAction::Default(reason) => writeln!(f, "default ({reason})")?,
            }
        }
        Ok(())
    }
}

struct Planner<'r> {
    registry: &'r MetadataRegistry,
    conversion: ScalarConversion,
    path: FieldPath,
    steps: Vec<PlannedField>,
}

impl Planner<'_> {
    fn push(&mut self, action: PlannedAction) {
        self.steps.push(PlannedField {
            path: self.path.to_string(),
            action,
        });
    }

    fn plan_record(&mut self, source: &StructDescriptor, target: &StructDescriptor) {
        for target_field in target.fields() {
            self.path.push_field(target_field.name());
            match resolve(target_field.name(), source) {
                Some(source_field) => self.plan_value(source_field.kind(), target_field.kind()),
                None => self.push(PlannedAction::Default(FallbackReason::MissingSource)),
            }
            self.path.pop();
        }
    }

    fn plan_value(&mut self, source: &FieldKind, target: &FieldKind) {
        match classify(self.registry, self.conversion, source, target) {
            Dispatch::Array { source, target } => {
                self.push(PlannedAction::Array {
                    source_len: source.len(),
                    target_len: target.len(),
                });
                if source.len().min(target.len()) > 0 {
                    self.path.push_any_index();
                    self.plan_value(source.element(), target.element());
                    self.path.pop();
                }
            }
            Dispatch::Record { source, target } => {
                self.push(PlannedAction::Record {
                    source: source.name().to_owned(),
                    target: target.name().to_owned(),
                });
                self.plan_record(source, target);
            }
            Dispatch::Scalar { source, target } if source == target => {
                self.push(PlannedAction::Copy(source))
            }
            Dispatch::Scalar { source, target } => self.push(PlannedAction::Convert {
                from: source,
                to: target,
            }),
            Dispatch::Cast { source, target } => self.push(PlannedAction::Cast {
                from: source,
                to: target,
            }),
            Dispatch::Default(reason) => self.push(PlannedAction::Default(reason)),
        }
    }
}
