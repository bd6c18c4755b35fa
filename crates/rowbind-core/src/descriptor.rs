//! Field descriptor resolution.
//!
//! A [`FieldDescriptor`] is derived from a field's static [`FieldSpec`] and the
//! engine options. It never looks at row content. Numeric metadata is parsed
//! on demand, so a malformed `base` on a string field is never reported.

use crate::error::{Error, Result};
use crate::tag::{ColumnTag, FieldSpec, OMIT_EMPTY, SKIP_MISSING};

/// Default integer base.
pub const DEFAULT_BASE: u32 = 10;

/// What to do when a declared column is absent from the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Abort with [`Error::MissingColumn`].
    Fail,
    /// Leave the field untouched.
    Skip,
}

/// How a float is rendered on encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatStyle {
    /// Shortest fixed-point representation that round-trips.
    Shortest,
    /// Fixed-point with this many decimal places.
    Precision(usize),
    /// printf-style pattern such as `%9.2f`.
    Pattern(&'static str),
}

/// How a timestamp is parsed and rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    /// RFC 3339 (ISO 8601 with offset).
    Rfc3339,
    /// A chrono strftime pattern.
    Pattern(&'static str),
}

/// Resolved conversion settings for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    spec: FieldSpec,
    column: &'static str,
    missing: MissingPolicy,
    omit_empty: bool,
}

impl FieldDescriptor {
    /// Resolve a descriptor, or `None` when the field is excluded.
    pub fn resolve(spec: &FieldSpec, allow_missing_columns: bool) -> Option<Self> {
        let tag = ColumnTag::parse(spec.column);
        if tag.is_excluded() {
            return None;
        }

        let missing = if allow_missing_columns || tag.has_option(SKIP_MISSING) {
            MissingPolicy::Skip
        } else {
            MissingPolicy::Fail
        };

        Some(Self {
            spec: *spec,
            column: tag.name(),
            missing,
            omit_empty: tag.has_option(OMIT_EMPTY),
        })
    }

    /// Field identifier in the record.
    pub fn field(&self) -> &'static str {
        self.spec.name
    }

    /// Column name the field maps to.
    pub fn column(&self) -> &'static str {
        self.column
    }

    pub fn missing(&self) -> MissingPolicy {
        self.missing
    }

    /// Whether a nil value leaves the field untouched on decode.
    pub fn omit_empty(&self) -> bool {
        self.omit_empty
    }

    /// Integer base: 0 (prefix-inferred) or 2 through 36.
    pub fn base(&self) -> Result<u32> {
        let Some(raw) = self.spec.base else {
            return Ok(DEFAULT_BASE);
        };
        match raw.parse::<u32>() {
            Ok(base) if base == 0 || (2..=36).contains(&base) => Ok(base),
            _ => Err(Error::InvalidIntBase {
                field: self.field().to_string(),
                base: raw.to_string(),
            }),
        }
    }

    /// Float rendering style; a `format` pattern overrides `precision`.
    pub fn float_style(&self) -> Result<FloatStyle> {
        if let Some(pattern) = self.spec.format.filter(|p| !p.is_empty()) {
            return Ok(FloatStyle::Pattern(pattern));
        }
        let Some(raw) = self.spec.precision.filter(|p| !p.is_empty()) else {
            return Ok(FloatStyle::Shortest);
        };
        match raw.parse::<i32>() {
            Ok(precision) if precision < 0 => Ok(FloatStyle::Shortest),
            Ok(precision) => Ok(FloatStyle::Precision(precision as usize)),
            Err(_) => Err(Error::InvalidFloatPrecision {
                field: self.field().to_string(),
                precision: raw.to_string(),
            }),
        }
    }

    /// Whether decode should trim padding a float pattern may have added.
    pub fn has_float_pattern(&self) -> bool {
        self.spec.format.is_some_and(|p| !p.is_empty())
    }

    pub fn time_format(&self) -> TimeFormat {
        match self.spec.format {
            Some(pattern) if !pattern.is_empty() => TimeFormat::Pattern(pattern),
            _ => TimeFormat::Rfc3339,
        }
    }
}
