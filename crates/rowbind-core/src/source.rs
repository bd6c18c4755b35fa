//! Row collaborators.
//!
//! The engines never tokenize text themselves. They read already-split rows
//! from a [`RowSource`] and hand finished rows to a [`RowSink`]. In-memory
//! implementations are provided for queues and vectors of rows.

use crate::error::BoxError;
use std::collections::VecDeque;

/// One tabular record as an ordered list of string fields.
pub type Row = Vec<String>;

/// Supplies rows to a decoder.
pub trait RowSource {
    /// Read the next row; `Ok(None)` signals end of input.
    fn read_row(&mut self) -> Result<Option<Row>, BoxError>;
}

/// Accepts rows from an encoder.
pub trait RowSink {
    fn write_row(&mut self, row: &[String]) -> Result<(), BoxError>;
}

impl RowSource for VecDeque<Row> {
    fn read_row(&mut self) -> Result<Option<Row>, BoxError> {
        Ok(self.pop_front())
    }
}

impl RowSource for std::vec::IntoIter<Row> {
    fn read_row(&mut self) -> Result<Option<Row>, BoxError> {
        Ok(self.next())
    }
}

impl<T: RowSource + ?Sized> RowSource for &mut T {
    fn read_row(&mut self) -> Result<Option<Row>, BoxError> {
        (**self).read_row()
    }
}

impl<T: RowSource + ?Sized> RowSource for Box<T> {
    fn read_row(&mut self) -> Result<Option<Row>, BoxError> {
        (**self).read_row()
    }
}

impl RowSink for Vec<Row> {
    fn write_row(&mut self, row: &[String]) -> Result<(), BoxError> {
        self.push(row.to_vec());
        Ok(())
    }
}

impl<T: RowSink + ?Sized> RowSink for &mut T {
    fn write_row(&mut self, row: &[String]) -> Result<(), BoxError> {
        (**self).write_row(row)
    }
}

impl<T: RowSink + ?Sized> RowSink for Box<T> {
    fn write_row(&mut self, row: &[String]) -> Result<(), BoxError> {
        (**self).write_row(row)
    }
}

/// Build an owned row from string slices.
pub fn row<I, S>(values: I) -> Row
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}
