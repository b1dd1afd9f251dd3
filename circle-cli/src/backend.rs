//! Backend and executor registry
//!
//! The registry is built once at startup and handed to whatever needs it.
//! A backend may contribute an executor, which is registered under the
//! backend's name.

use crate::error::{CliError, Result};
use crate::summary::ModelSummary;
use circle_reader::{decode_with, DecoderConfig};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Runs or inspects compiled model artifacts
pub trait Executor {
    fn name(&self) -> &str;

    /// File extensions (without the dot) this executor accepts
    fn extensions(&self) -> &[&str];

    fn inspect(&self, bytes: &[u8], config: &DecoderConfig) -> Result<ModelSummary>;
}

/// A toolchain backend, optionally providing an executor
pub trait Backend {
    fn name(&self) -> &str;

    fn executor(&self) -> Option<Box<dyn Executor>> {
        None
    }
}

/// Executor for `.circle` files backed by the zero-copy reader
#[derive(Debug, Clone, Copy, Default)]
pub struct CircleExecutor;

impl Executor for CircleExecutor {
    fn name(&self) -> &str {
        "circle"
    }

    fn extensions(&self) -> &[&str] {
        &["circle"]
    }

    fn inspect(&self, bytes: &[u8], config: &DecoderConfig) -> Result<ModelSummary> {
        let model = decode_with(bytes, config)?;
        Ok(ModelSummary::from_model(&model, bytes)?)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CircleBackend;

impl Backend for CircleBackend {
    fn name(&self) -> &str {
        "circle"
    }

    fn executor(&self) -> Option<Box<dyn Executor>> {
        Some(Box::new(CircleExecutor))
    }
}

#[derive(Default)]
pub struct BackendRegistry {
    backends: BTreeMap<String, Box<dyn Backend>>,
    executors: BTreeMap<String, Box<dyn Executor>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in circle backend
    pub fn with_builtin() -> Result<Self> {
        let mut registry = Self::new();
        registry.register_backend(Box::new(CircleBackend))?;
        Ok(registry)
    }

    /// Register a backend, replacing any backend of the same name
    pub fn register_backend(&mut self, backend: Box<dyn Backend>) -> Result<()> {
        let name = backend.name().to_string();
        if name.is_empty() {
            return Err(CliError::EmptyBackendName);
        }

        if let Some(executor) = backend.executor() {
            self.executors.insert(name.clone(), executor);
        }
        if self.backends.insert(name.clone(), backend).is_some() {
            info!(backend = %name, "replaced registered backend");
        } else {
            info!(backend = %name, "registered backend");
        }
        Ok(())
    }

    /// Register a standalone executor under its own name
    pub fn register_executor(&mut self, executor: Box<dyn Executor>) -> Result<()> {
        let name = executor.name().to_string();
        if name.is_empty() {
            return Err(CliError::EmptyExecutorName);
        }
        if self.executors.insert(name.clone(), executor).is_some() {
            info!(executor = %name, "replaced registered executor");
        }
        Ok(())
    }

    pub fn backend(&self, name: &str) -> Result<&dyn Backend> {
        self.backends
            .get(name)
            .map(|backend| backend.as_ref())
            .ok_or_else(|| CliError::UnknownBackend {
                name: name.to_string(),
            })
    }

    pub fn executor(&self, name: &str) -> Option<&dyn Executor> {
        self.executors.get(name).map(|executor| executor.as_ref())
    }

    pub fn backend_names(&self) -> impl Iterator<Item = &str> {
        self.backends.keys().map(String::as_str)
    }

    /// (registered name, executor) pairs in name order
    pub fn executors(&self) -> impl Iterator<Item = (&str, &dyn Executor)> {
        self.executors
            .iter()
            .map(|(name, executor)| (name.as_str(), executor.as_ref()))
    }

    /// First executor (in name order) accepting the file's extension
    pub fn executor_for_path(&self, path: &Path) -> Option<&dyn Executor> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        self.executors()
            .map(|(_, executor)| executor)
            .find(|executor| executor.extensions().iter().any(|e| *e == extension))
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}
