//! Tracer error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TracerError {
    #[error("Invalid direction: cannot trace from pass {at} forward to pass {target}")]
    InvalidDirection { at: usize, target: usize },

    #[error("Unregistered pass {pass} ({registered} registered)")]
    UnregisteredPass { pass: usize, registered: usize },

    #[error("Unknown node {node} in pass {pass}")]
    UnknownNode { node: String, pass: usize },

    #[error("Source graph already registered")]
    SourceAlreadyRegistered,

    #[error("Invalid pass record {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("Pass log error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("Model error: {0}")]
    Reader(#[from] circle_reader::ReaderError),
}

pub type Result<T> = std::result::Result<T, TracerError>;
