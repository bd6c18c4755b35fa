//! Extension protocol.
//!
//! Three override layers, checked from most to least specific on both the
//! decode and the encode side:
//!
//! 1. Whole-record: [`UnmarshalRow`] / [`MarshalRow`] receive or produce the
//!    entire row; header and field metadata are bypassed.
//! 2. Map-based: [`UnmarshalMap`] / [`MarshalMap`] work on a column name to
//!    value map built from the header.
//! 3. Per-field: [`UnmarshalValue`] / [`MarshalValue`] replace the scalar
//!    conversion of a single field during normal field iteration.
//!
//! A record advertises layers 1 and 2 through the `as_*` accessors of
//! [`Record`](crate::Record). A field type advertises layer 3 by returning
//! [`Slot::Custom`](crate::Slot::Custom) and
//! [`View::Custom`](crate::View::Custom) from its [`Field`](crate::Field)
//! implementation.

use crate::error::HookError;
use std::collections::HashMap;

/// Decodes a whole row into a record.
pub trait UnmarshalRow {
    fn unmarshal_row(&mut self, row: &[String]) -> Result<(), HookError>;
}

/// Encodes a record into a whole row.
pub trait MarshalRow {
    fn marshal_row(&self) -> Result<Vec<String>, HookError>;
}

/// Decodes a record from column name to value pairs.
pub trait UnmarshalMap {
    fn unmarshal_map(&mut self, values: HashMap<String, String>) -> Result<(), HookError>;
}

/// Encodes a record into column name to value pairs.
///
/// Columns of the header missing from the map are written as empty strings.
pub trait MarshalMap {
    fn marshal_map(&self) -> Result<HashMap<String, String>, HookError>;
}

/// Decodes one field from its raw column value.
pub trait UnmarshalValue {
    fn unmarshal_value(&mut self, value: &str) -> Result<(), HookError>;
}

/// Renders one field as its raw column value.
pub trait MarshalValue {
    fn marshal_value(&self) -> String;
}
