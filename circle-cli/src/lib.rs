//! # Circle CLI
//!
//! Library half of the `circle` binary: argument definitions, the backend
//! registry and the command handlers.

pub mod args;
pub mod backend;
pub mod commands;
pub mod error;
pub mod summary;

pub use args::{Cli, Commands, DecodeArgs};
pub use backend::{Backend, BackendRegistry, CircleBackend, CircleExecutor, Executor};
pub use commands::TraceQuery;
pub use error::{CliError, Result};
pub use summary::ModelSummary;
