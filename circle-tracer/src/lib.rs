//! # Circle Tracer
//!
//! Records how graph nodes map across a chain of optimization passes and
//! answers ancestry queries: which source-graph nodes an optimized node came
//! from, and which optimized nodes a source node became.
//!
//! ## Example
//!
//! ```rust
//! use circle_tracer::ProvenanceTracker;
//! use std::collections::BTreeSet;
//!
//! let mut tracker = ProvenanceTracker::new();
//! tracker.register_source("source", ["A1", "A2"]).unwrap();
//! tracker.register_pass("fuse", ["B"], [("B", vec!["A1", "A2"])]).unwrap();
//! tracker.register_pass("rename", ["C"], [("C", vec!["B"])]).unwrap();
//!
//! let origins = tracker.ancestors_at(&"C", 2, 0).unwrap();
//! assert_eq!(origins, BTreeSet::from(["A1", "A2"]));
//! ```

pub mod error;
pub mod provenance;
pub mod population;

pub use error::{Result, TracerError};
pub use provenance::{Pass, PassIndex, PassRecord, ProvenanceTracker};
pub use population::{identity_derivations, operator_nodes, register_model_pass};
