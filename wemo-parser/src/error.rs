//! Error types for payload parsing

use thiserror::Error;

/// Errors that can occur while interpreting WEMO payloads
///
/// The engine treats most absent data as "device unreachable" rather than as
/// an error; these variants cover the cases where a caller asked for a
/// strict interpretation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Entity decoding failed
    #[error("Invalid XML escape sequence: {0}")]
    InvalidEscape(String),

    /// A numeric field did not hold a number in range
    #[error("Invalid value for {field}: {value:?}")]
    InvalidValue { field: &'static str, value: String },
}

/// Result type alias for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;
