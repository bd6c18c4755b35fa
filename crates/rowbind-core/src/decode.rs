//! Decode engine: rows into records.

use crate::descriptor::{FieldDescriptor, MissingPolicy};
use crate::error::{Error, Result};
use crate::field::{FloatSlot, IntSlot, Slot, TimeSlot, UintSlot};
use crate::header::Header;
use crate::numeric::{names_infinity, parse_bool, parse_signed, parse_unsigned, NumberError};
use crate::options::DecoderOptions;
use crate::record::{DecodeTarget, Record};
use crate::source::{Row, RowSource};
use crate::timestamp::parse_time;
use chrono::Utc;
use std::collections::HashMap;
use std::marker::PhantomData;
use tracing::{debug, trace};

/// Reads rows from a [`RowSource`] and maps them onto records.
///
/// A header must be established, either read from the source with
/// [`read_header`](Decoder::read_header) or supplied with
/// [`with_header`](Decoder::with_header), before records can be decoded.
pub struct Decoder<S> {
    source: S,
    header: Option<Header>,
    options: DecoderOptions,
}

impl<S: RowSource> Decoder<S> {
    /// Create a decoder with default options and no header.
    pub fn new(source: S) -> Self {
        Self {
            source,
            header: None,
            options: DecoderOptions::default(),
        }
    }

    /// Use an explicit header instead of reading one from the source.
    pub fn with_header(mut self, header: Header) -> Self {
        self.set_header(header);
        self
    }

    /// Set the nil sentinel.
    pub fn with_nil_value(mut self, nil_value: impl Into<String>) -> Self {
        self.options.nil_value = nil_value.into();
        self
    }

    /// Skip declared columns that are absent from the header.
    pub fn with_allow_missing_columns(mut self, allow: bool) -> Self {
        self.options.allow_missing_columns = allow;
        self
    }

    pub fn with_options(mut self, options: DecoderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// The active header, if one has been established.
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    /// Replace the active header.
    pub fn set_header(&mut self, header: Header) {
        debug!("Using header with {} columns: {}", header.len(), header);
        self.header = Some(header);
    }

    /// Read one row from the source and make it the active header.
    ///
    /// On failure the previous header, if any, stays in place.
    pub fn read_header(&mut self) -> Result<&Header> {
        let row = self.next_row()?;
        let header = Header::new(row)?;
        debug!("Read header with {} columns: {}", header.len(), header);
        Ok(self.header.insert(header))
    }

    /// Read the next row from the source and decode it into `target`.
    ///
    /// `target` must be a mutable reference; a shared reference fails with
    /// [`Error::InvalidType`] whether or not a header is set. Without a header
    /// the call fails with [`Error::MissingHeader`] before touching the source.
    pub fn decode<'a, T: DecodeTarget<'a>>(&mut self, target: T) -> Result<()> {
        let record = target.into_record()?;
        if self.header.is_none() {
            return Err(Error::MissingHeader);
        }
        let row = self.next_row()?;
        let header = self.header.as_ref().ok_or(Error::MissingHeader)?;
        decode_row(header, &self.options, &row, record)
    }

    /// Iterate over the remaining rows, decoding each into a fresh record.
    ///
    /// A failed row yields its error and iteration continues with the next
    /// row; a missing header or a failing source ends the iteration.
    pub fn records<R: Record + Default>(&mut self) -> Records<'_, S, R> {
        Records {
            decoder: self,
            done: false,
            _record: PhantomData,
        }
    }

    /// Consume the decoder and return its source.
    pub fn into_inner(self) -> S {
        self.source
    }

    fn next_row(&mut self) -> Result<Row> {
        match self.source.read_row() {
            Ok(Some(row)) => Ok(row),
            Ok(None) => Err(Error::EndOfInput),
            Err(err) => Err(Error::Source(err)),
        }
    }
}

/// Iterator returned by [`Decoder::records`].
pub struct Records<'d, S, R> {
    decoder: &'d mut Decoder<S>,
    done: bool,
    _record: PhantomData<fn() -> R>,
}

impl<S: RowSource, R: Record + Default> Iterator for Records<'_, S, R> {
    type Item = Result<R>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut record = R::default();
        match self.decoder.decode(&mut record) {
            Ok(()) => Some(Ok(record)),
            Err(Error::EndOfInput) => {
                self.done = true;
                None
            }
            Err(err @ (Error::MissingHeader | Error::Source(_))) => {
                self.done = true;
                Some(Err(err))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

/// Decode one row into a record using `header` for column positions.
///
/// Hooks are tried first: [`UnmarshalRow`](crate::UnmarshalRow) receives the
/// whole row, then [`UnmarshalMap`](crate::UnmarshalMap) and plain string
/// maps receive the row keyed by header names. Otherwise every declared field
/// is converted from its column in declaration order.
pub fn decode_row<R: Record>(
    header: &Header,
    options: &DecoderOptions,
    row: &[String],
    record: &mut R,
) -> Result<()> {
    if let Some(hook) = record.as_unmarshal_row() {
        trace!("Decoding row of {} values with UnmarshalRow", row.len());
        return hook.unmarshal_row(row).map_err(Error::Hook);
    }

    if let Some(hook) = record.as_unmarshal_map() {
        trace!("Decoding row of {} values with UnmarshalMap", row.len());
        return hook.unmarshal_map(row_map(header, row)?).map_err(Error::Hook);
    }

    if let Some(map) = record.as_string_map_mut() {
        ensure_covers(header, row)?;
        for (name, value) in header.into_iter().zip(row) {
            map.set_value(name.clone(), value.clone());
        }
        return Ok(());
    }

    for (index, spec) in R::fields().iter().enumerate() {
        let Some(desc) = FieldDescriptor::resolve(spec, options.allow_missing_columns) else {
            trace!("Skipping excluded field '{}'", spec.name);
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
                        "Skipping field '{}': column '{}' not in header",
                        desc.field(),
                        desc.column()
                    );
                    continue;
                }
            }
        };

        let value = row.get(position).ok_or_else(|| Error::RowTooShort {
            column: desc.column().to_string(),
            position,
            len: row.len(),
        })?;

        if desc.omit_empty() && *value == options.nil_value {
            trace!("Leaving field '{}' untouched: nil value", desc.field());
            continue;
        }

        assign(&desc, record.field_mut(index), value)?;
    }

    Ok(())
}

/// Map paths reference every header column, so the row must reach the last one.
fn ensure_covers(header: &Header, row: &[String]) -> Result<()> {
    match header.names().get(row.len()) {
        Some(column) => Err(Error::RowTooShort {
            column: column.clone(),
            position: row.len(),
            len: row.len(),
        }),
        None => Ok(()),
    }
}

fn row_map(header: &Header, row: &[String]) -> Result<HashMap<String, String>> {
    ensure_covers(header, row)?;
    Ok(header
        .into_iter()
        .zip(row)
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect())
}

fn assign(desc: &FieldDescriptor, slot: Slot<'_>, value: &str) -> Result<()> {
    match slot {
        Slot::Str(target) => {
            target.clear();
            target.push_str(value);
        }
        Slot::Bool(target) => {
            *target = parse_bool(value).ok_or_else(|| {
                invalid(desc, value, "bool", "expected one of 1, t, true, 0, f, false".to_string())
            })?;
        }
        Slot::Int(target) => assign_int(desc, target, value)?,
        Slot::Uint(target) => assign_uint(desc, target, value)?,
        Slot::Float(target) => assign_float(desc, target, value)?,
        Slot::Time(target) => {
            let parsed = parse_time(desc.time_format(), value)
                .map_err(|e| invalid(desc, value, "timestamp", e.to_string()))?;
            match target {
                TimeSlot::Fixed(t) => *t = parsed,
                TimeSlot::Utc(t) => *t = parsed.with_timezone(&Utc),
            }
        }
        Slot::Optional(optional) => return assign(desc, optional.fill(), value),
        Slot::Custom(hook) => {
            trace!("Decoding field '{}' with UnmarshalValue", desc.field());
            hook.unmarshal_value(value).map_err(Error::Hook)?;
        }
        Slot::Shared(_) => {
            return Err(Error::NonPointerReceiver {
                field: desc.field().to_string(),
            })
        }
        Slot::Unsupported(type_name) => {
            return Err(Error::InvalidDestinationType {
                field: desc.field().to_string(),
                type_name,
            })
        }
    }
    Ok(())
}

fn assign_int(desc: &FieldDescriptor, target: IntSlot<'_>, value: &str) -> Result<()> {
    let kind = target.kind();
    let base = desc.base()?;
    let parsed = parse_signed(value, base).map_err(|e| number_error(desc, value, kind, e))?;
    match target {
        IntSlot::I8(t) => *t = narrow(desc, value, kind, parsed)?,
        IntSlot::I16(t) => *t = narrow(desc, value, kind, parsed)?,
        IntSlot::I32(t) => *t = narrow(desc, value, kind, parsed)?,
        IntSlot::I64(t) => *t = narrow(desc, value, kind, parsed)?,
        IntSlot::Isize(t) => *t = narrow(desc, value, kind, parsed)?,
    }
    Ok(())
}

fn assign_uint(desc: &FieldDescriptor, target: UintSlot<'_>, value: &str) -> Result<()> {
    let kind = target.kind();
    let base = desc.base()?;
    let parsed = parse_unsigned(value, base).map_err(|e| number_error(desc, value, kind, e))?;
    match target {
        UintSlot::U8(t) => *t = narrow(desc, value, kind, parsed)?,
        UintSlot::U16(t) => *t = narrow(desc, value, kind, parsed)?,
        UintSlot::U32(t) => *t = narrow(desc, value, kind, parsed)?,
        UintSlot::U64(t) => *t = narrow(desc, value, kind, parsed)?,
        UintSlot::Usize(t) => *t = narrow(desc, value, kind, parsed)?,
    }
    Ok(())
}

fn assign_float(desc: &FieldDescriptor, target: FloatSlot<'_>, value: &str) -> Result<()> {
    // Patterns may pad with spaces.
    let text = if desc.has_float_pattern() {
        value.trim()
    } else {
        value
    };
    match target {
        FloatSlot::F32(t) => {
            let parsed: f32 = text
                .parse()
                .map_err(|e: std::num::ParseFloatError| invalid(desc, value, "f32", e.to_string()))?;
            if parsed.is_infinite() && !names_infinity(text) {
                return Err(overflow(desc, value, "f32"));
            }
            *t = parsed;
        }
        FloatSlot::F64(t) => {
            let parsed: f64 = text
                .parse()
                .map_err(|e: std::num::ParseFloatError| invalid(desc, value, "f64", e.to_string()))?;
            if parsed.is_infinite() && !names_infinity(text) {
                return Err(overflow(desc, value, "f64"));
            }
            *t = parsed;
        }
    }
    Ok(())
}

fn narrow<N, T: TryFrom<N>>(
    desc: &FieldDescriptor,
    value: &str,
    kind: &'static str,
    parsed: N,
) -> Result<T> {
    T::try_from(parsed).map_err(|_| overflow(desc, value, kind))
}

fn number_error(desc: &FieldDescriptor, value: &str, kind: &'static str, err: NumberError) -> Error {
    match err {
        NumberError::Overflow => overflow(desc, value, kind),
        NumberError::Invalid(reason) => invalid(desc, value, kind, reason),
    }
}

fn invalid(desc: &FieldDescriptor, value: &str, kind: &'static str, reason: String) -> Error {
    Error::InvalidFormat {
        field: desc.field().to_string(),
        value: value.to_string(),
        kind,
        reason,
    }
}

fn overflow(desc: &FieldDescriptor, value: &str, kind: &'static str) -> Error {
    Error::Overflow {
        field: desc.field().to_string(),
        value: value.to_string(),
        kind,
    }
}
