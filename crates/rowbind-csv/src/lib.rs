//! CSV row source and sink for rowbind.
//!
//! Wraps the `csv` crate's reader and writer so they can feed a
//! [`Decoder`] or receive rows from an [`Encoder`]. Quoting, delimiters and
//! line endings stay the csv crate's business; the header row is read and
//! written through the engines, so readers are built with `has_headers(false)`.
//!
//! # Example
//!
//! ```ignore
//! use rowbind::csv;
//!
//! #[derive(Default, rowbind::Record)]
//! struct Row {
//!     #[rowbind(column = "a")]
//!     a: String,
//!     #[rowbind(column = "b")]
//!     b: i32,
//! }
//!
//! let mut decoder = csv::reader("a,b\nx,1\n".as_bytes());
//! decoder.read_header()?;
//! let rows: Vec<Row> = decoder.records().collect::<Result<_, _>>()?;
//! ```

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use rowbind_core::{BoxError, Decoder, Encoder, Error, Record, Result, Row, RowSink, RowSource};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::debug;

/// A [`RowSource`] reading records from a `csv::Reader`.
pub struct CsvSource<R> {
    reader: csv::Reader<R>,
    record: StringRecord,
}

impl<R: Read> CsvSource<R> {
    /// Read CSV from any reader with the csv crate's default dialect.
    pub fn from_reader(rdr: R) -> Self {
        Self::new(ReaderBuilder::new().has_headers(false).from_reader(rdr))
    }

    /// Wrap a configured reader.
    ///
    /// The reader should be built with `has_headers(false)`; otherwise the
    /// csv crate consumes the first row before the decoder can see it.
    pub fn new(reader: csv::Reader<R>) -> Self {
        Self {
            reader,
            record: StringRecord::new(),
        }
    }

    pub fn into_inner(self) -> csv::Reader<R> {
        self.reader
    }
}

impl CsvSource<File> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> std::result::Result<Self, csv::Error> {
        let path = path.as_ref();
        debug!("Opening CSV source '{}'", path.display());
        let reader = ReaderBuilder::new().has_headers(false).from_path(path)?;
        Ok(Self::new(reader))
    }
}

impl<R: Read> RowSource for CsvSource<R> {
    fn read_row(&mut self) -> std::result::Result<Option<Row>, BoxError> {
        if !self.reader.read_record(&mut self.record)? {
            return Ok(None);
        }
        Ok(Some(self.record.iter().map(str::to_string).collect()))
    }
}

/// A [`RowSink`] writing records to a `csv::Writer`.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvSink<W> {
    pub fn from_writer(wtr: W) -> Self {
        Self::new(WriterBuilder::new().from_writer(wtr))
    }

    pub fn new(writer: csv::Writer<W>) -> Self {
        Self { writer }
    }

    /// Flush buffered rows to the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> std::result::Result<W, csv::IntoInnerError<csv::Writer<W>>> {
        self.writer.into_inner()
    }
}

impl CsvSink<File> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> std::result::Result<Self, csv::Error> {
        let path = path.as_ref();
        debug!("Creating CSV sink '{}'", path.display());
        Ok(Self::new(WriterBuilder::new().from_path(path)?))
    }
}

impl<W: Write> RowSink for CsvSink<W> {
    fn write_row(&mut self, row: &[String]) -> std::result::Result<(), BoxError> {
        self.writer.write_record(row)?;
        Ok(())
    }
}

/// A decoder reading CSV from `rdr`.
pub fn reader<R: Read>(rdr: R) -> Decoder<CsvSource<R>> {
    Decoder::new(CsvSource::from_reader(rdr))
}

/// An encoder writing CSV to `wtr`.
pub fn writer<W: Write>(wtr: W) -> Encoder<CsvSink<W>> {
    Encoder::new(CsvSink::from_writer(wtr))
}

/// Read the header row and decode every following row.
pub fn read_all<T, R>(rdr: R) -> Result<Vec<T>>
where
    T: Record + Default,
    R: Read,
{
    let mut decoder = reader(rdr);
    decoder.read_header()?;
    decoder.records().collect()
}

/// Write a header derived from `T` followed by one row per record, then
/// flush. Returns the underlying writer.
pub fn write_all<'a, T, W, I>(wtr: W, records: I) -> Result<W>
where
    T: Record + 'a,
    W: Write,
    I: IntoIterator<Item = &'a T>,
{
    let mut encoder = writer(wtr).with_header_from::<T>();
    encoder.write_header()?;
    let mut count = 0usize;
    for record in records {
        encoder.encode(record)?;
        count += 1;
    }
    debug!("Wrote {} CSV rows", count);
    encoder
        .into_inner()
        .into_inner()
        .map_err(|err| Error::Sink(Box::new(err.into_error())))
}
