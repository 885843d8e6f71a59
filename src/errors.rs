use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for the schema, form, and report layers.
///
/// Every variant is a rejected precondition; an operation that returns one of
/// these has left the [`crate::form::FormState`] untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignoutError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    #[error("Unknown field `{field}` for category `{category}`")]
    UnknownField { category: String, field: String },
    #[error("Entry {index} out of range for `{category}` ({len} entries)")]
    IndexOutOfRange {
        category: String,
        index: usize,
        len: usize,
    },
    #[error("Invalid operation: {0}")]
    InvalidShapeOperation(String),
    #[error("`{value}` is not an option for `{field}` (choose one of: {options})")]
    InvalidOption {
        field: String,
        value: String,
        options: String,
    },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Persistence error: {0}")]
    Storage(String),
}

pub type Result<T> = StdResult<T, SignoutError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] SignoutError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<std::io::Error> for SignoutError {
    fn from(err: std::io::Error) -> Self {
        SignoutError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for SignoutError {
    fn from(err: serde_json::Error) -> Self {
        SignoutError::Config(err.to_string())
    }
}
