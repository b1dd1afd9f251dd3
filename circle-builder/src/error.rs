//! Builder errors

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuilderError {
    #[error("Field slot {slot} written twice in one table")]
    DuplicateField { slot: u16 },

    #[error("Vtable offset {voffset} does not name a field slot")]
    InvalidVOffset { voffset: u16 },

    #[error("{options} has no field named {field:?}")]
    UnknownOptionField {
        options: &'static str,
        field: String,
    },

    #[error("{options}.{field} cannot hold {value}")]
    OptionTypeMismatch {
        options: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Value {value} does not fit field {field}")]
    ValueOutOfRange { field: &'static str, value: i64 },

    #[error("{what} index {index} out of range (length {len})")]
    InvalidReference {
        what: &'static str,
        index: i64,
        len: usize,
    },

    #[error("Invalid file identifier {0:?}: expected 4 printable ASCII characters")]
    InvalidIdentifier(String),
}

pub type Result<T> = std::result::Result<T, BuilderError>;
