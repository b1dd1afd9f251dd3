//! Populate a tracker from decoded circle models

use crate::error::Result;
use crate::provenance::{PassIndex, ProvenanceTracker};
use circle_reader::{Model, SubGraph};
use std::collections::{BTreeMap, BTreeSet};

/// Node ids for the operators of a subgraph, in operator order
///
/// An operator is named after its first output tensor. Operators without a
/// named output fall back to `op#<index>`, as do repeated names. Every id in
/// the result is distinct.
pub fn operator_nodes(subgraph: &SubGraph<'_>) -> Result<Vec<String>> {
    let operators = subgraph.operators()?;
    let mut seen = BTreeSet::new();
    let mut nodes = Vec::with_capacity(operators.len());

    for (index, op) in operators.iter().enumerate() {
        let op = op?;
        let outputs = op.outputs()?;
        let named = match outputs.iter().next() {
            Some(first) => subgraph
                .tensor_at(first?)?
                .map(|tensor| tensor.name())
                .transpose()?
                .flatten()
                .filter(|name| !name.is_empty()),
            None => None,
        };
        let node = match named {
            Some(name) if !seen.contains(name) => name.to_string(),
            _ => fallback_node(index, &seen),
        };
        seen.insert(node.clone());
        nodes.push(node);
    }
    Ok(nodes)
}

/// `op#<index>`, suffixed until it does not clash with a tensor name
fn fallback_node(index: usize, seen: &BTreeSet<String>) -> String {
    let base = format!("op#{}", index);
    let mut node = base.clone();
    let mut suffix = 1;
    while seen.contains(&node) {
        node = format!("{}.{}", base, suffix);
        suffix += 1;
    }
    node
}

/// Map every node of `next` to the same-named node of `prev`, if any
pub fn identity_derivations(
    prev: &BTreeSet<String>,
    next: &BTreeSet<String>,
) -> BTreeMap<String, BTreeSet<String>> {
    next.iter()
        .filter(|node| prev.contains(*node))
        .map(|node| (node.clone(), BTreeSet::from([node.clone()])))
        .collect()
}

/// Register one subgraph of `model` as the next pass
///
/// The first call registers the source graph. Later calls derive nodes by
/// name from the previous pass; `extra` entries replace those derivations.
pub fn register_model_pass(
    tracker: &mut ProvenanceTracker<String>,
    name: &str,
    model: &Model<'_>,
    subgraph: usize,
    extra: BTreeMap<String, BTreeSet<String>>,
) -> Result<PassIndex> {
    let nodes: BTreeSet<String> = operator_nodes(&model.subgraph(subgraph)?)?
        .into_iter()
        .collect();

    let Some(latest) = tracker.latest_pass() else {
        return tracker.register_source(name, nodes);
    };
    let mut derivations = identity_derivations(tracker.nodes_at(latest)?, &nodes);
    derivations.extend(extra);
    tracker.register_pass(name, nodes, derivations)
}
