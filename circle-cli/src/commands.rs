//! Command handlers
//!
//! Handlers take file contents rather than paths so they can be driven
//! from tests; `main` does the I/O.

use crate::backend::{BackendRegistry, CircleExecutor, Executor};
use crate::error::Result;
use circle_reader::formatter::format_tensor;
use circle_reader::{decode_with, format_model, DecoderConfig, ModelView, ReaderError};
use circle_tracer::ProvenanceTracker;
use std::path::Path;

/// Summary through the executor registered for the file's extension
pub fn info(
    registry: &BackendRegistry,
    path: &Path,
    bytes: &[u8],
    config: &DecoderConfig,
) -> Result<String> {
    let builtin = CircleExecutor;
    let executor: &dyn Executor = registry.executor_for_path(path).unwrap_or(&builtin);
    let summary = executor.inspect(bytes, config)?;
    Ok(format!("{}\nexecutor:       {}", summary, executor.name()))
}

pub fn dump(bytes: &[u8], config: &DecoderConfig) -> Result<String> {
    let model = decode_with(bytes, config)?;
    Ok(format_model(&model)?)
}

pub fn json(bytes: &[u8], config: &DecoderConfig, pretty: bool) -> Result<String> {
    let model = decode_with(bytes, config)?;
    let view = ModelView::from_model(&model)?;
    let text = if pretty {
        serde_json::to_string_pretty(&view)?
    } else {
        serde_json::to_string(&view)?
    };
    Ok(text)
}

/// Every tensor named `name`, one line each
pub fn tensor(bytes: &[u8], config: &DecoderConfig, name: &str, subgraph: usize) -> Result<String> {
    let model = decode_with(bytes, config)?;
    let graph = model.subgraph(subgraph)?;
    let indices = graph.tensor_indices_by_name(name)?;
    if indices.is_empty() {
        return Err(ReaderError::NotFound {
            what: format!("tensor {:?}", name),
        }
        .into());
    }

    let mut lines = Vec::new();
    for index in indices {
        lines.push(format!("#{} {}", index, format_tensor(&graph.tensor(index)?)?));
    }
    Ok(lines.join("\n"))
}

pub struct TraceQuery<'q> {
    pub node: &'q str,
    pub at: usize,
    pub target: Option<usize>,
    pub descendants: bool,
}

/// Ancestor (or descendant) node ids, one per line, sorted
pub fn trace(tracker: &ProvenanceTracker<String>, query: &TraceQuery<'_>) -> Result<String> {
    let node = query.node.to_string();
    let nodes = if query.descendants {
        let target = query
            .target
            .or(tracker.latest_pass())
            .unwrap_or(query.at);
        tracker.descendants_at(&node, query.at, target)?
    } else {
        tracker.ancestors_at(&node, query.at, query.target.unwrap_or(0))?
    };
    Ok(nodes.into_iter().collect::<Vec<_>>().join("\n"))
}

pub fn backends(registry: &BackendRegistry, path: Option<&Path>) -> String {
    let mut lines = Vec::new();
    for name in registry.backend_names() {
        let executor = if registry.executor(name).is_some() {
            "executor"
        } else {
            "no executor"
        };
        lines.push(format!("backend {} ({})", name, executor));
    }
    for (name, executor) in registry.executors() {
        lines.push(format!("executor {} [.{}]", name, executor.extensions().join(", .")));
    }
    if let Some(path) = path {
        match registry.executor_for_path(path) {
            Some(executor) => lines.push(format!("{} -> {}", path.display(), executor.name())),
            None => lines.push(format!("{} -> no executor", path.display())),
        }
    }
    lines.join("\n")
}
