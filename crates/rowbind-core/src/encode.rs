//! Encode engine: records into rows.

use crate::descriptor::{FieldDescriptor, FloatStyle, MissingPolicy};
use crate::error::{Error, Result};
use crate::field::View;
use crate::header::Header;
use crate::numeric::{format_signed, format_unsigned};
use crate::options::EncoderOptions;
use crate::printf::format_float;
use crate::record::Record;
use crate::source::{Row, RowSink};
use crate::timestamp::format_time;
use std::fmt::Display;
use tracing::{debug, trace};

/// Renders records as rows and hands them to a [`RowSink`].
///
/// When no header has been set, the first structured record establishes one
/// from its declared columns; that header governs every later call until it
/// is replaced.
pub struct Encoder<W> {
    sink: W,
    header: Option<Header>,
    options: EncoderOptions,
}

impl<W: RowSink> Encoder<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            header: None,
            options: EncoderOptions::default(),
        }
    }

    /// Use an explicit header for column positions.
    pub fn with_header(mut self, header: Header) -> Self {
        self.set_header(header);
        self
    }

    /// Establish the header from the declared columns of `R`.
    pub fn with_header_from<R: Record>(self) -> Self {
        self.with_header(Header::from_fields::<R>())
    }

    /// Set the text written for optional fields holding no value.
    pub fn with_nil_value(mut self, nil_value: impl Into<String>) -> Self {
        self.options.nil_value = nil_value.into();
        self
    }

    pub fn with_allow_missing_columns(mut self, allow: bool) -> Self {
        self.options.allow_missing_columns = allow;
        self
    }

    pub fn with_options(mut self, options: EncoderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    pub fn set_header(&mut self, header: Header) {
        debug!("Using header with {} columns: {}", header.len(), header);
        self.header = Some(header);
    }

    /// Write the active header as a row.
    pub fn write_header(&mut self) -> Result<()> {
        let header = self.header.as_ref().ok_or(Error::MissingHeader)?;
        self.sink.write_row(header.names()).map_err(Error::Sink)
    }

    /// Encode a record and write it to the sink.
    pub fn encode<R: Record>(&mut self, record: &R) -> Result<()> {
        let row = self.to_row(record)?;
        self.sink.write_row(&row).map_err(Error::Sink)
    }

    /// Encode a record into a row without writing it.
    ///
    /// May establish the header as a side effect.
    pub fn to_row<R: Record>(&mut self, record: &R) -> Result<Row> {
        if let Some(hook) = record.as_marshal_row() {
            trace!("Encoding record with MarshalRow");
            return hook.marshal_row().map_err(Error::Hook);
        }

        if let Some(hook) = record.as_marshal_map() {
            let header = self.map_header()?;
            trace!("Encoding record with MarshalMap");
            let values = hook.marshal_map().map_err(Error::Hook)?;
            return Ok(header
                .into_iter()
                .map(|name| values.get(name).cloned().unwrap_or_default())
                .collect());
        }

        if let Some(map) = record.as_string_map() {
            let header = self.map_header()?;
            return Ok(header
                .into_iter()
                .map(|name| map.get_value(name).unwrap_or_default().to_string())
                .collect());
        }

        if self.header.as_ref().map_or(true, Header::is_empty) {
            let header = Header::from_fields::<R>();
            debug!("Derived header with {} columns: {}", header.len(), header);
            self.header = Some(header);
        }
        let header = self.header.as_ref().ok_or(Error::MissingHeader)?;
        encode_fields(header, &self.options, record)
    }

    /// Header for map-shaped records; an empty header counts as missing.
    fn map_header(&self) -> Result<&Header> {
        self.header
            .as_ref()
            .filter(|header| !header.is_empty())
            .ok_or(Error::MissingHeader)
    }

    /// Consume the encoder and return its sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// Render the declared fields of a record into a header-width row.
///
/// Columns no field maps to are left empty.
pub fn encode_fields<R: Record>(
    header: &Header,
    options: &EncoderOptions,
    record: &R,
) -> Result<Row> {
    let mut row = vec![String::new(); header.len()];

    for (index, spec) in R::fields().iter().enumerate() {
        let Some(desc) = FieldDescriptor::resolve(spec, options.allow_missing_columns) else {
            continue;
        };

        let Some(position) = header.position(desc.column()) else {
            match desc.missing() {
                MissingPolicy::Fail => {
                    return Err(Error::MissingColumn {
                        column: desc.column().to_string(),
                    })
                }
                MissingPolicy::Skip => {
                    trace!(
                        "Not writing field '{}': column '{}' not in header",
                        desc.field(),
                        desc.column()
                    );
                    continue;
                }
            }
        };

        let text = render(&desc, record.field(index), &options.nil_value)?;
        if let Some(cell) = row.get_mut(position) {
            *cell = text;
        }
    }

    Ok(row)
}

fn render(desc: &FieldDescriptor, view: View<'_>, nil_value: &str) -> Result<String> {
    match view {
        View::Str(value) => Ok(value.to_string()),
        View::Bool(value) => Ok(value.to_string()),
        View::Int(value) => Ok(format_signed(value, desc.base()?)),
        View::Uint(value) => Ok(format_unsigned(value, desc.base()?)),
        View::F32(value) => render_float(desc, value, f64::from(value)),
        View::F64(value) => render_float(desc, value, value),
        View::Time(value) => {
            let format = desc.time_format();
            format_time(format, &value).ok_or_else(|| Error::InvalidFormat {
                field: desc.field().to_string(),
                value: value.to_rfc3339(),
                kind: "timestamp",
                reason: format!("unusable format {format:?}"),
            })
        }
        View::Absent => Ok(nil_value.to_string()),
        View::Custom(hook) => {
            trace!("Encoding field '{}' with MarshalValue", desc.field());
            Ok(hook.marshal_value())
        }
        View::Unsupported(type_name) => Err(Error::InvalidDestinationType {
            field: desc.field().to_string(),
            type_name,
        }),
    }
}

/// `value` keeps its own width for shortest and fixed output; `wide` feeds
/// printf patterns.
fn render_float<F: Display>(desc: &FieldDescriptor, value: F, wide: f64) -> Result<String> {
    match desc.float_style()? {
        FloatStyle::Shortest => Ok(value.to_string()),
        FloatStyle::Precision(precision) => Ok(format!("{value:.precision$}")),
        FloatStyle::Pattern(pattern) => {
            format_float(pattern, wide).ok_or_else(|| Error::InvalidFloatFormat {
                field: desc.field().to_string(),
                format: pattern.to_string(),
            })
        }
    }
}
