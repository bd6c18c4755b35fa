//! Field metadata mini-language.
//!
//! Each declared field carries a column tag (`name`, `name,omitempty`, `-`)
//! plus optional `base`, `precision` and `format` entries. Values are kept as
//! the raw strings the record declared, so malformed metadata surfaces as a
//! conversion error instead of being rejected when the record type is built.

/// Column name that excludes a field from mapping.
pub const EXCLUDE: &str = "-";

/// Tag option: an empty or nil value leaves the field untouched on decode.
pub const OMIT_EMPTY: &str = "omitempty";

/// Tag option: a column missing from the header is skipped instead of failing.
pub const SKIP_MISSING: &str = "skipmissing";

/// Static metadata declared on one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field identifier in the record, used in error messages.
    pub name: &'static str,
    /// Raw column tag: column name followed by comma-separated options.
    pub column: &'static str,
    /// Raw integer base.
    pub base: Option<&'static str>,
    /// Raw float precision.
    pub precision: Option<&'static str>,
    /// Raw float or timestamp format pattern.
    pub format: Option<&'static str>,
}

impl FieldSpec {
    pub const fn new(name: &'static str, column: &'static str) -> Self {
        Self {
            name,
            column,
            base: None,
            precision: None,
            format: None,
        }
    }

    pub const fn with_base(self, base: &'static str) -> Self {
        Self {
            base: Some(base),
            ..self
        }
    }

    pub const fn with_precision(self, precision: &'static str) -> Self {
        Self {
            precision: Some(precision),
            ..self
        }
    }

    pub const fn with_format(self, format: &'static str) -> Self {
        Self {
            format: Some(format),
            ..self
        }
    }
}

/// A parsed column tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnTag<'a> {
    name: &'a str,
    options: &'a str,
}

impl<'a> ColumnTag<'a> {
    /// Split a tag into the column name and its options.
    pub fn parse(tag: &'a str) -> Self {
        match tag.split_once(',') {
            Some((name, options)) => Self { name, options },
            None => Self {
                name: tag,
                options: "",
            },
        }
    }

    /// Column name (first segment of the tag).
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Whether the tag excludes its field from mapping.
    pub fn is_excluded(&self) -> bool {
        self.name.is_empty() || self.name == EXCLUDE
    }

    /// Whether an option is present after the column name.
    pub fn has_option(&self, option: &str) -> bool {
        !self.options.is_empty() && self.options.split(',').any(|o| o == option)
    }
}
