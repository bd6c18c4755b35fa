//! Header index: column name to position mapping.

use crate::error::{Error, Result};
use crate::record::Record;
use crate::tag::ColumnTag;
use std::collections::HashMap;
use std::fmt;

/// Ordered, name-unique mapping from column name to zero-based position.
///
/// Positions are always contiguous `0..len`. A header is immutable once built;
/// engines replace it as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Header {
    /// Build a header from an explicit list of column names.
    ///
    /// Duplicate names are rejected with [`Error::DuplicateColumn`].
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut header = Self::default();
        for name in names {
            let name = name.into();
            if header.positions.contains_key(&name) {
                return Err(Error::DuplicateColumn(name));
            }
            header.push(name);
        }
        Ok(header)
    }

    /// Derive a header from the declared columns of a record type.
    ///
    /// Excluded fields are skipped and repeated column names keep the position
    /// of their first appearance.
    pub fn from_fields<R: Record>() -> Self {
        let mut header = Self::default();
        for spec in R::fields() {
            let tag = ColumnTag::parse(spec.column);
            if tag.is_excluded() || header.positions.contains_key(tag.name()) {
                continue;
            }
            header.push(tag.name().to_string());
        }
        header
    }

    fn push(&mut self, name: String) {
        self.positions.insert(name.clone(), self.names.len());
        self.names.push(name);
    }

    /// Position of a column, if present.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Whether the header contains a column.
    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Column names in position order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the header has no columns.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The header as a row, ready to be written.
    pub fn to_row(&self) -> Vec<String> {
        self.names.clone()
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names.join(","))
    }
}

impl<'a> IntoIterator for &'a Header {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Slot, View};
    use crate::tag::FieldSpec;

    struct Declared;

    impl Record for Declared {
        fn fields() -> &'static [FieldSpec] {
            const FIELDS: &[FieldSpec] = &[
                FieldSpec::new("id", "id"),
                FieldSpec::new("hidden", "-"),
                FieldSpec::new("untagged", ""),
                FieldSpec::new("name", "name,omitempty"),
                FieldSpec::new("alias", "id"),
                FieldSpec::new("score", "score"),
            ];
            FIELDS
        }

        fn field_mut(&mut self, _index: usize) -> Slot<'_> {
            Slot::Unsupported("Declared")
        }

        fn field(&self, _index: usize) -> View<'_> {
            View::Unsupported("Declared")
        }
    }

    #[test]
    fn test_header_positions() {
        let header = Header::new(["str", "n"]).unwrap();
        assert_eq!(header.position("str"), Some(0));
        assert_eq!(header.position("n"), Some(1));
        assert_eq!(header.position("missing"), None);
        assert_eq!(header.len(), 2);
        assert_eq!(header.names(), &["str".to_string(), "n".to_string()]);
    }

    #[test]
    fn test_header_rejects_duplicates() {
        let err = Header::new(["a", "b", "a"]).unwrap_err();
        match err {
            Error::DuplicateColumn(name) => assert_eq!(name, "a"),
            other => panic!("Expected DuplicateColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_header_from_fields_declaration_order() {
        let header = Header::from_fields::<Declared>();
        assert_eq!(header.names(), &["id", "name", "score"]);
        assert_eq!(header.position("score"), Some(2));
    }

    #[test]
    fn test_header_display_and_iter() {
        let header = Header::new(vec!["a".to_string(), "b".to_string()]).unwrap();
        assert_eq!(header.to_string(), "a,b");
        let names: Vec<&String> = header.into_iter().collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(Header::default().is_empty());
    }
}
