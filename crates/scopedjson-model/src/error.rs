//! Error taxonomy shared by the JSON and UBJSON readers/writers.
//!
//! Every error carries the byte/line/column position it was raised at (see
//! [`Location`]) plus a static debug tag naming the internal call site, so a
//! caller can report "what" and "where" without the crate needing a
//! `Backtrace`.

use thiserror::Error;

/// Position information attached to every error.
///
/// `line`/`column` are meaningful for the JSON side (1-based, columns count
/// UTF-8 characters); the UBJSON side only ever sets `byte_offset` and
/// leaves `line`/`column` at 1/1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    pub byte_offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn at_byte(byte_offset: usize) -> Self {
        Self {
            byte_offset,
            line: 1,
            column: 1,
        }
    }

    pub fn new(byte_offset: usize, line: usize, column: usize) -> Self {
        Self {
            byte_offset,
            line,
            column,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "byte {} (line {}, column {})",
            self.byte_offset, self.line, self.column
        )
    }
}

/// The four error categories named in the reader/writer contract.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScopedJsonError {
    /// Invalid token, unexpected token, unterminated string/comment, bad
    /// escape, malformed number.
    #[error("format error at {location}: {message} ({debug_location})")]
    Format {
        message: String,
        location: Location,
        debug_location: &'static str,
    },

    /// Unexpected end-of-document, wrong scope, mismatched container-end.
    #[error("structural error at {location}: {message} ({debug_location})")]
    Structural {
        message: String,
        location: Location,
        debug_location: &'static str,
    },

    /// `read<T>` called in the wrong state, value out of range for the
    /// target type, reading a non-string with `readBase64`.
    #[error("coercion error at {location}: {message} ({debug_location})")]
    Coercion {
        message: String,
        location: Location,
        debug_location: &'static str,
    },

    /// Writing a non-finite float with that option disabled, closing an
    /// optimized container with the wrong element count, changing options
    /// in an invalid state.
    #[error("configuration error: {message} ({debug_location})")]
    Configuration {
        message: String,
        debug_location: &'static str,
    },
}

impl ScopedJsonError {
    pub fn format(message: impl Into<String>, location: Location, debug_location: &'static str) -> Self {
        ScopedJsonError::Format {
            message: message.into(),
            location,
            debug_location,
        }
    }

    pub fn structural(message: impl Into<String>, location: Location, debug_location: &'static str) -> Self {
        ScopedJsonError::Structural {
            message: message.into(),
            location,
            debug_location,
        }
    }

    pub fn coercion(message: impl Into<String>, location: Location, debug_location: &'static str) -> Self {
        ScopedJsonError::Coercion {
            message: message.into(),
            location,
            debug_location,
        }
    }

    pub fn configuration(message: impl Into<String>, debug_location: &'static str) -> Self {
        ScopedJsonError::Configuration {
            message: message.into(),
            debug_location,
        }
    }

    pub fn location(&self) -> Option<Location> {
        match self {
            ScopedJsonError::Format { location, .. }
            | ScopedJsonError::Structural { location, .. }
            | ScopedJsonError::Coercion { location, .. } => Some(*location),
            ScopedJsonError::Configuration { .. } => None,
        }
    }
}

pub type ScopedJsonResult<T> = Result<T, ScopedJsonError>;
