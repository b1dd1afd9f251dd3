//! Pass-by-pass provenance of graph nodes
//!
//! Pass 0 is the source graph. Each later pass records, for every node it
//! contains, the set of nodes of the previous pass it was derived from. An
//! ancestor query composes these one-step maps back to the requested pass.

use crate::error::{Result, TracerError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use tracing::debug;

/// Index of a registered pass (0 = source graph)
pub type PassIndex = usize;

/// One registered graph snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pass<N: Ord> {
    pub name: String,
    pub nodes: BTreeSet<N>,
    /// New node -> origins in the previous pass. Absent key = newly introduced.
    pub derivations: BTreeMap<N, BTreeSet<N>>,
}

/// Serialized pass log entry
///
/// ```json
/// {"name": "fuse", "nodes": ["C"], "derivations": {"C": ["A", "B"]}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassRecord<N: Ord> {
    pub name: String,
    pub nodes: Vec<N>,
    #[serde(default = "BTreeMap::new")]
    pub derivations: BTreeMap<N, Vec<N>>,
}

/// Tracks node ancestry across a chain of passes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceTracker<N: Ord> {
    passes: Vec<Pass<N>>,
}

impl<N: Ord> Default for ProvenanceTracker<N> {
    fn default() -> Self {
        Self { passes: Vec::new() }
    }
}

fn node_label<N: Debug>(node: &N) -> String {
    format!("{:?}", node)
}

impl<N: Ord + Clone + Debug> ProvenanceTracker<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the source graph as pass 0
    pub fn register_source(
        &mut self,
        name: impl Into<String>,
        nodes: impl IntoIterator<Item = N>,
    ) -> Result<PassIndex> {
        if !self.passes.is_empty() {
            return Err(TracerError::SourceAlreadyRegistered);
        }
        let pass = Pass {
            name: name.into(),
            nodes: nodes.into_iter().collect(),
            derivations: BTreeMap::new(),
        };
        debug!(pass = 0, name = %pass.name, nodes = pass.nodes.len(), "registered source graph");
        self.passes.push(pass);
        Ok(0)
    }

    /// Register the graph produced by the next transformation
    ///
    /// Every derivation key must be one of `nodes` and every origin a node
    /// of the previous pass. Nothing is recorded if validation fails.
    pub fn register_pass<D, O>(
        &mut self,
        name: impl Into<String>,
        nodes: impl IntoIterator<Item = N>,
        derivations: D,
    ) -> Result<PassIndex>
    where
        D: IntoIterator<Item = (N, O)>,
        O: IntoIterator<Item = N>,
    {
        let index = self.passes.len();
        let previous = match self.passes.last() {
            Some(pass) => pass,
            None => {
                return Err(TracerError::UnregisteredPass {
                    pass: 0,
                    registered: 0,
                })
            }
        };

        let nodes: BTreeSet<N> = nodes.into_iter().collect();
        let mut map: BTreeMap<N, BTreeSet<N>> = BTreeMap::new();
        for (node, origins) in derivations {
            if !nodes.contains(&node) {
                return Err(TracerError::UnknownNode {
                    node: node_label(&node),
                    pass: index,
                });
            }
            let entry = map.entry(node).or_default();
            for origin in origins {
                if !previous.nodes.contains(&origin) {
                    return Err(TracerError::UnknownNode {
                        node: node_label(&origin),
                        pass: index - 1,
                    });
                }
                entry.insert(origin);
            }
        }

        let pass = Pass {
            name: name.into(),
            nodes,
            derivations: map,
        };
        debug!(
            pass = index,
            name = %pass.name,
            nodes = pass.nodes.len(),
            derived = pass.derivations.len(),
            "registered pass"
        );
        self.passes.push(pass);
        Ok(index)
    }

    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Index of the most recent pass
    pub fn latest_pass(&self) -> Option<PassIndex> {
        self.passes.len().checked_sub(1)
    }

    pub fn pass(&self, index: PassIndex) -> Result<&Pass<N>> {
        self.passes.get(index).ok_or(TracerError::UnregisteredPass {
            pass: index,
            registered: self.passes.len(),
        })
    }

    pub fn pass_names(&self) -> impl Iterator<Item = &str> {
        self.passes.iter().map(|pass| pass.name.as_str())
    }

    pub fn nodes_at(&self, index: PassIndex) -> Result<&BTreeSet<N>> {
        Ok(&self.pass(index)?.nodes)
    }

    fn check_node(&self, node: &N, index: PassIndex) -> Result<&Pass<N>> {
        let pass = self.pass(index)?;
        if pass.nodes.contains(node) {
            Ok(pass)
        } else {
            Err(TracerError::UnknownNode {
                node: node_label(node),
                pass: index,
            })
        }
    }

    /// One-step origins of `node` in pass `index - 1` (empty for pass 0)
    pub fn direct_origins(&self, node: &N, index: PassIndex) -> Result<BTreeSet<N>> {
        let pass = self.check_node(node, index)?;
        Ok(pass.derivations.get(node).cloned().unwrap_or_default())
    }

    /// Nodes of `target_pass` that `node` (of `at_pass`) derives from
    pub fn ancestors_at(
        &self,
        node: &N,
        at_pass: PassIndex,
        target_pass: PassIndex,
    ) -> Result<BTreeSet<N>> {
        self.check_node(node, at_pass)?;
        if target_pass > at_pass {
            return Err(TracerError::InvalidDirection {
                at: at_pass,
                target: target_pass,
            });
        }

        let mut memo = BTreeMap::new();
        Ok(self.collect_ancestors(node, at_pass, target_pass, &mut memo))
    }

    fn collect_ancestors(
        &self,
        node: &N,
        at_pass: PassIndex,
        target_pass: PassIndex,
        memo: &mut BTreeMap<(PassIndex, N), BTreeSet<N>>,
    ) -> BTreeSet<N> {
        if at_pass == target_pass {
            return BTreeSet::from([node.clone()]);
        }
        let key = (at_pass, node.clone());
        if let Some(found) = memo.get(&key) {
            return found.clone();
        }

        let mut result = BTreeSet::new();
        if let Some(origins) = self.passes[at_pass].derivations.get(node) {
            for origin in origins {
                result.extend(self.collect_ancestors(origin, at_pass - 1, target_pass, memo));
            }
        }
        memo.insert(key, result.clone());
        result
    }

    /// Source-graph nodes that `node` derives from
    pub fn source_ancestors(&self, node: &N, at_pass: PassIndex) -> Result<BTreeSet<N>> {
        self.ancestors_at(node, at_pass, 0)
    }

    /// Nodes of `target_pass` derived (transitively) from `node` of `at_pass`
    pub fn descendants_at(
        &self,
        node: &N,
        at_pass: PassIndex,
        target_pass: PassIndex,
    ) -> Result<BTreeSet<N>> {
        self.check_node(node, at_pass)?;
        if target_pass < at_pass {
            return Err(TracerError::InvalidDirection {
                at: at_pass,
                target: target_pass,
            });
        }
        self.pass(target_pass)?;

        let mut frontier = BTreeSet::from([node.clone()]);
        for pass in &self.passes[at_pass + 1..=target_pass] {
            frontier = pass
                .derivations
                .iter()
                .filter(|(_, origins)| !origins.is_disjoint(&frontier))
                .map(|(derived, _)| derived.clone())
                .collect();
            if frontier.is_empty() {
                break;
            }
        }
        Ok(frontier)
    }

    /// Build a tracker from a pass log (first record is the source graph)
    pub fn from_records(records: impl IntoIterator<Item = PassRecord<N>>) -> Result<Self> {
        let mut tracker = Self::new();
        for (index, record) in records.into_iter().enumerate() {
            if index == 0 {
                if !record.derivations.is_empty() {
                    return Err(TracerError::InvalidRecord {
                        index,
                        reason: "source graph cannot have derivations".to_string(),
                    });
                }
                tracker.register_source(record.name, record.nodes)?;
            } else {
                tracker.register_pass(record.name, record.nodes, record.derivations)?;
            }
        }
        Ok(tracker)
    }

    pub fn to_records(&self) -> Vec<PassRecord<N>> {
        self.passes
            .iter()
            .map(|pass| PassRecord {
                name: pass.name.clone(),
                nodes: pass.nodes.iter().cloned().collect(),
                derivations: pass
                    .derivations
                    .iter()
                    .map(|(node, origins)| (node.clone(), origins.iter().cloned().collect()))
                    .collect(),
            })
            .collect()
    }
}

impl<N> ProvenanceTracker<N>
where
    N: Ord + Clone + Debug + Serialize + DeserializeOwned,
{
    /// Load a JSON pass log (`[{"name", "nodes", "derivations"}, ...]`)
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<PassRecord<N>> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_records())?)
    }

    /// Persist the tracker as a bincode snapshot
    pub fn to_snapshot(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&self.passes)?)
    }

    /// Restore a snapshot, re-validating every pass
    pub fn from_snapshot(bytes: &[u8]) -> Result<Self> {
        let passes: Vec<Pass<N>> = bincode::deserialize(bytes)?;
        let mut tracker = Self::new();
        for (index, pass) in passes.into_iter().enumerate() {
            if index == 0 {
                if !pass.derivations.is_empty() {
                    return Err(TracerError::InvalidRecord {
                        index,
                        reason: "source graph cannot have derivations".to_string(),
                    });
                }
                tracker.register_source(pass.name, pass.nodes)?;
            } else {
                tracker.register_pass(pass.name, pass.nodes, pass.derivations)?;
            }
        }
        Ok(tracker)
    }
}
