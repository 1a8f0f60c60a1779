use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

/// Failure to turn one field value into its typed representation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoerceError {
    #[error("invalid integer: {0}")]
    Int(#[from] ParseIntError),

    #[error("invalid number: {0}")]
    Float(#[from] ParseFloatError),

    #[error("expected \"<number> <unit>\", got {0} token(s)")]
    TokenCount(usize),

    #[error("value out of range")]
    OutOfRange,
}

/// Errors raised while turning tool output into records.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("line {line}: malformed value {value:?} for field {field:?}: {source}")]
    MalformedValue {
        line:   usize,
        field:  String,
        value:  String,
        #[source]
        source: CoerceError,
    },

    #[error("{record} block is missing required field {field:?}")]
    MissingField { record: &'static str, field: &'static str },

    #[error("{record} field {field:?} holds {found}, expected {expected}")]
    UnexpectedType {
        record:   &'static str,
        field:    &'static str,
        expected: &'static str,
        found:    String,
    },

    #[error("no {0} block found in output")]
    NoRecords(&'static str),
}

/// Errors raised by the MegaCli façade.
#[derive(Error, Debug)]
pub enum MegaError {
    #[error("failed to execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source:  std::io::Error,
    },

    #[error("expected one match for {pattern}, got {found}. Input was {input}")]
    AmbiguousMatch { pattern: String, found: usize, input: String },

    #[error("invalid controller count {0:?}")]
    ControllerCount(String),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
