//! Scalar text conversions shared by both engines.

use std::borrow::Cow;
use std::num::{IntErrorKind, ParseIntError};

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Why an integer failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NumberError {
    Invalid(String),
    Overflow,
}

impl From<ParseIntError> for NumberError {
    fn from(err: ParseIntError) -> Self {
        match err.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => Self::Overflow,
            _ => Self::Invalid(err.to_string()),
        }
    }
}

/// Resolve base 0 by looking at the value's prefix.
fn split_radix(value: &str, base: u32) -> Result<(Cow<'_, str>, u32), NumberError> {
    if base != 0 {
        return Ok((Cow::Borrowed(value), base));
    }

    let (sign, digits) = match value.as_bytes().first() {
        Some(b'+') | Some(b'-') => value.split_at(1),
        _ => ("", value),
    };
    let prefix = digits.get(..2).map(str::to_ascii_lowercase);
    let (radix, rest) = match prefix.as_deref() {
        Some("0x") => (16, &digits[2..]),
        Some("0o") => (8, &digits[2..]),
        Some("0b") => (2, &digits[2..]),
        _ if digits.len() > 1 && digits.starts_with('0') => (8, &digits[1..]),
        _ => (10, digits),
    };
    if rest.starts_with(['+', '-']) {
        return Err(NumberError::Invalid("sign after radix prefix".to_string()));
    }
    Ok((Cow::Owned(format!("{sign}{rest}")), radix))
}

pub(crate) fn parse_signed(value: &str, base: u32) -> Result<i128, NumberError> {
    let (digits, radix) = split_radix(value, base)?;
    Ok(i128::from_str_radix(&digits, radix)?)
}

pub(crate) fn parse_unsigned(value: &str, base: u32) -> Result<u128, NumberError> {
    let (digits, radix) = split_radix(value, base)?;
    Ok(u128::from_str_radix(&digits, radix)?)
}

pub(crate) fn format_unsigned(value: u64, base: u32) -> String {
    if base == 0 || base == 10 {
        return value.to_string();
    }

    let base = u64::from(base);
    let mut value = value;
    let mut buf = Vec::with_capacity(64);
    loop {
        buf.push(DIGITS[(value % base) as usize]);
        value /= base;
        if value == 0 {
            break;
        }
    }
    buf.iter().rev().map(|&b| b as char).collect()
}

pub(crate) fn format_signed(value: i64, base: u32) -> String {
    if value < 0 {
        format!("-{}", format_unsigned(value.unsigned_abs(), base))
    } else {
        format_unsigned(value as u64, base)
    }
}

/// Parse the case-insensitive `1/t/true` and `0/f/false` family.
pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Some(true),
        "0" | "f" | "false" => Some(false),
        _ => None,
    }
}

/// Whether float text spells out an infinity rather than overflowing into one.
pub(crate) fn names_infinity(value: &str) -> bool {
    value
        .trim_start_matches(['+', '-'])
        .to_ascii_lowercase()
        .starts_with("inf")
}
