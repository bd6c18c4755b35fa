//! Field mapping and type coercion between tabular rows and typed records.
//!
//! This crate provides the engine behind `rowbind`:
//!
//! - [`Header`] - Column name to position index
//! - [`Decoder`] - Reads rows from a [`RowSource`] into records
//! - [`Encoder`] - Renders records into rows for a [`RowSink`]
//! - [`Record`] / [`Field`] - How a type exposes its declared fields
//! - [`hooks`] - Whole-record, map-based and per-field conversion overrides
//! - [`MappingConfig`] - Engine options loaded from YAML or TOML
//!
//! # Architecture
//!
//! ```text
//! rowbind-core (this crate)
//!    │
//!    ├─── rowbind-derive  (generates Record impls targeting this crate)
//!    └─── rowbind-csv     (RowSource/RowSink over the csv crate)
//! ```
//!
//! Tokenizing text into rows is not this crate's concern; the engines only
//! see already-split string fields.
//!
//! # Example
//!
//! ```rust
//! use rowbind_core::{row, Decoder, Field, FieldSpec, Record, Row, Slot, View};
//! use std::collections::VecDeque;
//!
//! #[derive(Default)]
//! struct Point {
//!     x: i32,
//!     label: String,
//! }
//!
//! impl Record for Point {
//!     fn fields() -> &'static [FieldSpec] {
//!         const FIELDS: &[FieldSpec] = &[
//!             FieldSpec::new("x", "x").with_base("16"),
//!             FieldSpec::new("label", "label,omitempty"),
//!         ];
//!         FIELDS
//!     }
//!
//!     fn field_mut(&mut self, index: usize) -> Slot<'_> {
//!         match index {
//!             0 => self.x.slot(),
//!             1 => self.label.slot(),
//!             _ => Slot::Unsupported("Point"),
//!         }
//!     }
//!
//!     fn field(&self, index: usize) -> View<'_> {
//!         match index {
//!             0 => self.x.view(),
//!             1 => self.label.view(),
//!             _ => View::Unsupported("Point"),
//!         }
//!     }
//! }
//!
//! let rows: VecDeque<Row> = VecDeque::from(vec![row(["label", "x"]), row(["origin", "-ff"])]);
//! let mut decoder = Decoder::new(rows);
//! decoder.read_header()?;
//!
//! let mut point = Point::default();
//! decoder.decode(&mut point)?;
//! assert_eq!(point.x, -255);
//! assert_eq!(point.label, "origin");
//! # Ok::<(), rowbind_core::Error>(())
//! ```

pub mod decode;
pub mod descriptor;
pub mod encode;
pub mod error;
pub mod field;
pub mod header;
pub mod hooks;
mod numeric;
pub mod options;
mod printf;
pub mod record;
pub mod source;
pub mod tag;
mod timestamp;

// Re-exports for convenience
pub use decode::{decode_row, Decoder, Records};
pub use descriptor::{FieldDescriptor, FloatStyle, MissingPolicy, TimeFormat};
pub use encode::{encode_fields, Encoder};
pub use error::{BoxError, Error, HookError, Result};
pub use field::{Field, FloatSlot, IntSlot, OptionalSlot, Slot, TimeSlot, UintSlot, View};
pub use header::Header;
pub use hooks::{MarshalMap, MarshalRow, MarshalValue, UnmarshalMap, UnmarshalRow, UnmarshalValue};
pub use options::{ConfigError, DecoderOptions, EncoderOptions, MappingConfig};
pub use record::{DecodeTarget, Record, StringMap};
pub use source::{row, Row, RowSink, RowSource};
pub use tag::{ColumnTag, FieldSpec};
