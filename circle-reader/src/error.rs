//! Reader errors

use crate::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReaderError {
    #[error("Invalid file identifier: expected {expected:?}, found {found:?}")]
    InvalidIdentifier { expected: String, found: String },

    #[error("Malformed buffer: {len} bytes at offset {offset} exceed buffer length {buffer_len}")]
    MalformedBuffer {
        offset: usize,
        len: usize,
        buffer_len: usize,
    },

    #[error("Invalid UTF-8 in string at offset {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("Not found: {what}")]
    NotFound { what: String },

    #[error("{what} index {index} out of range (length {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Invalid {what} value: {value}")]
    InvalidEnum { what: &'static str, value: i64 },

    #[error("{options} has no field named {field:?}")]
    UnknownOptionField {
        options: &'static str,
        field: String,
    },

    #[error("{options}.{field} is not a {expected} field")]
    OptionTypeMismatch {
        options: &'static str,
        field: &'static str,
        expected: &'static str,
    },

    #[error("Invalid decoder configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

impl ReaderError {
    /// Out-of-bounds access of `len` bytes at `offset`
    pub(crate) fn out_of_bounds(offset: usize, len: usize, buffer_len: usize) -> Self {
        ReaderError::MalformedBuffer {
            offset,
            len,
            buffer_len,
        }
    }

    /// True for errors caused by the buffer contents rather than the caller
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            ReaderError::MalformedBuffer { .. }
                | ReaderError::InvalidUtf8 { .. }
                | ReaderError::InvalidEnum { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ReaderError>;
