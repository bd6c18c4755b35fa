//! Error types for row mapping.
//!
//! Every failure aborts the current decode or encode call. Errors raised by
//! the row source, the row sink, or a custom hook are carried unchanged so
//! callers can downcast them back to the collaborator's own error type.

use thiserror::Error;

/// Boxed error produced by a row collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Boxed error produced by a custom conversion hook.
pub type HookError = BoxError;

/// Errors that can occur while mapping rows to records and back.
#[derive(Debug, Error)]
pub enum Error {
    /// Decode or encode attempted before a header is known.
    #[error("Missing header; use with_header or read_header first")]
    MissingHeader,

    /// The target was not passed through a mutable handle.
    #[error("Invalid target type; records must be passed by mutable reference")]
    InvalidType,

    /// A declared column is absent from the header.
    #[error("Missing column '{column}' in header")]
    MissingColumn { column: String },

    /// A header list named the same column twice.
    #[error("Duplicate column '{0}' in header")]
    DuplicateColumn(String),

    /// The row ends before the position of a referenced column.
    #[error("Row has {len} values but column '{column}' is at position {position}")]
    RowTooShort {
        column: String,
        position: usize,
        len: usize,
    },

    /// A custom value hook is only reachable through a shared handle.
    #[error("Receiver for value unmarshaling on field '{field}' must be mutable")]
    NonPointerReceiver { field: String },

    /// The field type is not one of the supported scalar kinds.
    #[error("Invalid destination type {type_name} for field '{field}'; must be a simple type or timestamp")]
    InvalidDestinationType {
        field: String,
        type_name: &'static str,
    },

    /// The `base` metadata is not a usable integer base.
    #[error("Invalid int base '{base}' on field '{field}'")]
    InvalidIntBase { field: String, base: String },

    /// The `precision` metadata is not an integer.
    #[error("Invalid float precision '{precision}' on field '{field}'")]
    InvalidFloatPrecision { field: String, precision: String },

    /// The `format` metadata is not a usable float pattern.
    #[error("Invalid float format '{format}' on field '{field}'")]
    InvalidFloatFormat { field: String, format: String },

    /// The value does not parse as the declared type.
    #[error("Failed to parse '{value}' as {kind} for field '{field}': {reason}")]
    InvalidFormat {
        field: String,
        value: String,
        kind: &'static str,
        reason: String,
    },

    /// The value parses but does not fit the declared width.
    #[error("Value '{value}' out of range for {kind} field '{field}'")]
    Overflow {
        field: String,
        value: String,
        kind: &'static str,
    },

    /// The row source has no more rows.
    #[error("End of input")]
    EndOfInput,

    /// The row source failed.
    #[error(transparent)]
    Source(BoxError),

    /// The row sink failed.
    #[error(transparent)]
    Sink(BoxError),

    /// A custom conversion hook failed.
    #[error(transparent)]
    Hook(HookError),
}

impl Error {
    /// Whether this error marks the end of the row source.
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, Self::EndOfInput)
    }
}

/// Result type alias for row mapping operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collaborator_errors_display_verbatim() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = Error::Sink(Box::new(io));
        assert_eq!(err.to_string(), "pipe closed");

        let err = Error::Hook("i'm an error".into());
        assert_eq!(err.to_string(), "i'm an error");
    }

    #[test]
    fn test_source_error_downcasts() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated");
        match Error::Source(Box::new(io)) {
            Error::Source(inner) => {
                let io = inner.downcast_ref::<std::io::Error>().unwrap();
                assert_eq!(io.kind(), std::io::ErrorKind::UnexpectedEof);
            }
            other => panic!("Expected Source, got {other:?}"),
        }
    }

    #[test]
    fn test_end_of_input() {
        assert!(Error::EndOfInput.is_end_of_input());
        assert!(!Error::MissingHeader.is_end_of_input());
    }
}
