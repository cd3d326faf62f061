//! Migration options.
//!
//! The defaults reproduce the classic behaviour: numeric fields are assigned
//! across type changes the way `as` casts do, anything that cannot be copied
//! is silently zeroed and longer source arrays are silently cut. Casts can be
//! restricted to lossless conversions, and fallbacks and truncation can be
//! turned into errors that are raised before any target field is written.

use strum::{AsRefStr, Display, EnumIter};
use typed_builder::TypedBuilder;

/// What to do with a target field that has no usable source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum FallbackPolicy {
    /// Zero the field and note it in the report.
    #[default]
    FillDefault,
    /// Refuse the migration.
    Reject,
}

/// Which scalar type changes carry the value over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ScalarConversion {
    /// Any numeric pair, with `as` semantics. Lossy casts are reported.
    #[default]
    Assign,
    /// Only identity and lossless `From` widening; other pairs fall back.
    Lossless,
}

/// Options for a [`Migrator`](crate::engine::Migrator).
///
/// # Examples
///
/// ```
/// use shm_migrate::config::{FallbackPolicy, MigrationOptions, ScalarConversion};
///
/// // Defaults: numeric casts, silent fallback, truncation allowed
/// let options = MigrationOptions::default();
/// assert_eq!(options.conversion, ScalarConversion::Assign);
/// assert_eq!(options.fallback, FallbackPolicy::FillDefault);
/// assert!(options.allow_truncation);
///
/// // Every value must arrive unchanged, arrays may only grow
/// let strict = MigrationOptions::builder()
///     .conversion(ScalarConversion::Lossless)
///     .fallback(FallbackPolicy::Reject)
///     .allow_truncation(false)
///     .build();
/// assert_eq!(strict, MigrationOptions::strict());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, TypedBuilder)]
#[builder(doc)]
pub struct MigrationOptions {
    /// Scalar conversion rule for same-named fields whose type changed
    #[builder(default)]
    pub conversion: ScalarConversion,

    /// Policy for missing, unconvertible or structurally different fields
    #[builder(default)]
    pub fallback: FallbackPolicy,

    /// Whether a source array longer than its target may lose its tail
    #[builder(default = true)]
    pub allow_truncation: bool,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            conversion: ScalarConversion::Assign,
            fallback: FallbackPolicy::FillDefault,
            allow_truncation: true,
        }
    }
}

impl MigrationOptions {
    /// Rejects every lossy cast, every fallback and every truncation.
    ///
    /// Under [`ScalarConversion::Lossless`] a lossy pair is a fallback, so the
    /// `Reject` policy refuses it too.
    pub fn strict() -> Self {
        Self {
            conversion: ScalarConversion::Lossless,
            fallback: FallbackPolicy::Reject,
            allow_truncation: false,
        }
    }

    pub(crate) fn requires_plan(&self) -> bool {
        self.fallback == FallbackPolicy::Reject || !self.allow_truncation
    }
}
