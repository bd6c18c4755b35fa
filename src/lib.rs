//! rowbind
//!
//! Maps rows of string fields (as produced by a CSV reader) onto typed
//! records and renders records back into rows.
//!
//! # Features
//!
//! - Declarative field metadata: column name, `omitempty`, integer base,
//!   float precision or printf pattern, timestamp format
//! - Header-driven column lookup, read from the input or derived from the
//!   record type
//! - Scalar coercion for strings, booleans, sized integers, floats and
//!   timestamps, with `Option` fields filled only when a value is present
//! - Override hooks at the whole-record, map and per-field level
//! - CSV source and sink built on the `csv` crate
//!
//! # Crates
//!
//! - `rowbind_core` - Header index, decode/encode engines, hook traits
//! - `rowbind_derive` - `#[derive(Record)]`
//! - `rowbind_csv` - CSV row source and sink, re-exported as [`csv`]
//!
//! # Example
//!
//! ```rust
//! use rowbind::Record;
//!
//! #[derive(Debug, Default, PartialEq, Record)]
//! struct Reading {
//!     #[rowbind(column = "sensor")]
//!     sensor: String,
//!     #[rowbind(column = "raw", base = "16")]
//!     raw: u32,
//!     #[rowbind(column = "temp,omitempty", precision = "1")]
//!     temp: Option<f64>,
//! }
//!
//! let input = "sensor,raw,temp\nkitchen,ff,21.5\nattic,10,\n";
//! let readings: Vec<Reading> = rowbind::csv::read_all(input.as_bytes())?;
//! assert_eq!(readings[0].raw, 255);
//! assert_eq!(readings[1].temp, None);
//!
//! let output = rowbind::csv::write_all(Vec::new(), &readings)?;
//! assert_eq!(
//!     String::from_utf8(output).unwrap(),
//!     "sensor,raw,temp\nkitchen,ff,21.5\nattic,10,\n"
//! );
//! # Ok::<(), rowbind::Error>(())
//! ```

pub use rowbind_core::*;
pub use rowbind_derive::Record;

pub use rowbind_csv as csv;
