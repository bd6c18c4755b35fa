//! Records: the structures rows are mapped to and from.

use crate::error::{Error, Result};
use crate::field::{Slot, View};
use crate::hooks::{MarshalMap, MarshalRow, UnmarshalMap, UnmarshalRow};
use crate::tag::FieldSpec;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// A flat record with declared, tagged fields.
///
/// Usually implemented through `#[derive(Record)]`. Field indices passed to
/// [`field_mut`](Record::field_mut) and [`field`](Record::field) follow the
/// order of [`fields`](Record::fields), which is declaration order.
///
/// The `as_*` accessors advertise the whole-record and map-based hooks. They
/// default to `None`; a type providing a hook overrides the matching accessor
/// to return `Some(self)`.
pub trait Record {
    /// Static metadata of every declared field, in declaration order.
    fn fields() -> &'static [FieldSpec];

    fn field_mut(&mut self, index: usize) -> Slot<'_>;

    fn field(&self, index: usize) -> View<'_>;

    fn as_unmarshal_row(&mut self) -> Option<&mut dyn UnmarshalRow> {
        None
    }

    fn as_unmarshal_map(&mut self) -> Option<&mut dyn UnmarshalMap> {
        None
    }

    fn as_marshal_row(&self) -> Option<&dyn MarshalRow> {
        None
    }

    fn as_marshal_map(&self) -> Option<&dyn MarshalMap> {
        None
    }

    /// The record itself, when it is a plain string map.
    fn as_string_map_mut(&mut self) -> Option<&mut dyn StringMap> {
        None
    }

    fn as_string_map(&self) -> Option<&dyn StringMap> {
        None
    }
}

/// A string-keyed, string-valued map populated directly from the header.
pub trait StringMap {
    fn get_value(&self, column: &str) -> Option<&str>;
    fn set_value(&mut self, column: String, value: String);
}

impl<S: BuildHasher> StringMap for HashMap<String, String, S> {
    fn get_value(&self, column: &str) -> Option<&str> {
        self.get(column).map(String::as_str)
    }

    fn set_value(&mut self, column: String, value: String) {
        self.insert(column, value);
    }
}

impl StringMap for BTreeMap<String, String> {
    fn get_value(&self, column: &str) -> Option<&str> {
        self.get(column).map(String::as_str)
    }

    fn set_value(&mut self, column: String, value: String) {
        self.insert(column, value);
    }
}

macro_rules! impl_string_map_record {
    ($([$($generics:tt)*] $ty:ty),* $(,)?) => {
        $(
            impl<$($generics)*> Record for $ty {
                fn fields() -> &'static [FieldSpec] {
                    &[]
                }

                fn field_mut(&mut self, _index: usize) -> Slot<'_> {
                    Slot::Unsupported(std::any::type_name::<Self>())
                }

                fn field(&self, _index: usize) -> View<'_> {
                    View::Unsupported(std::any::type_name::<Self>())
                }

                fn as_string_map_mut(&mut self) -> Option<&mut dyn StringMap> {
                    Some(self)
                }

                fn as_string_map(&self) -> Option<&dyn StringMap> {
                    Some(self)
                }
            }
        )*
    };
}

impl_string_map_record!(
    [S: BuildHasher] HashMap<String, String, S>,
    [] BTreeMap<String, String>,
);

/// A handle a decode target is passed through.
///
/// Only a mutable reference lets the engine write into the caller's record;
/// a shared reference is rejected with [`Error::InvalidType`].
pub trait DecodeTarget<'a> {
    type Record: Record + 'a;

    fn into_record(self) -> Result<&'a mut Self::Record>;
}

impl<'a, R: Record + 'a> DecodeTarget<'a> for &'a mut R {
    type Record = R;

    fn into_record(self) -> Result<&'a mut R> {
        Ok(self)
    }
}

impl<'a, R: Record + 'a> DecodeTarget<'a> for &'a R {
    type Record = R;

    fn into_record(self) -> Result<&'a mut R> {
        Err(Error::InvalidType)
    }
}
