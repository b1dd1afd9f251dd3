//! Tracking decoded models through simulated optimization passes

use circle_builder::{encode, ModelDef, OperatorDef, SubGraphDef, TensorDef};
use circle_reader::decode;
use circle_schema::{BuiltinOperator, TensorType};
use circle_tracer::{
    operator_nodes, register_model_pass, ProvenanceTracker, TracerError,
};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Linear graph with one operator per entry of `layers` (op, output name)
fn linear_model(layers: &[(BuiltinOperator, &str)]) -> Vec<u8> {
    let mut model = ModelDef::new();
    let mut graph = SubGraphDef::named("main");
    let mut prev = graph.add_tensor(TensorDef::new("input", TensorType::Float32, &[1, 16]));
    graph.inputs = vec![prev];
    for (op, output) in layers {
        let code = model.operator_code_index(*op);
        let out = graph.add_tensor(TensorDef::new(output, TensorType::Float32, &[1, 16]));
        graph.operators.push(OperatorDef::new(code, &[prev], &[out]));
        prev = out;
    }
    graph.outputs = vec![prev];
    model.subgraphs.push(graph);
    encode(&model).unwrap()
}

fn names(nodes: &[&str]) -> BTreeSet<String> {
    nodes.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_operator_nodes_use_output_names() {
    let bytes = linear_model(&[
        (BuiltinOperator::FULLY_CONNECTED, "fc"),
        (BuiltinOperator::ADD, "bias"),
        (BuiltinOperator::SOFTMAX, "probs"),
    ]);
    let model = decode(&bytes).unwrap();
    let nodes = operator_nodes(&model.subgraph(0).unwrap()).unwrap();
    assert_eq!(nodes, vec!["fc", "bias", "probs"]);
}

#[test]
fn test_operator_nodes_fallback() {
    let mut model = ModelDef::new();
    let add = model.operator_code_index(BuiltinOperator::ADD);
    let mut graph = SubGraphDef::named("main");
    let a = graph.add_tensor(TensorDef::new("a", TensorType::Float32, &[2]));
    let dup1 = graph.add_tensor(TensorDef::new("sum", TensorType::Float32, &[2]));
    let dup2 = graph.add_tensor(TensorDef::new("sum", TensorType::Float32, &[2]));
    let unnamed = graph.add_tensor(TensorDef::new("", TensorType::Float32, &[2]));
    graph.operators.push(OperatorDef::new(add, &[a, a], &[dup1]));
    graph.operators.push(OperatorDef::new(add, &[dup1, a], &[dup2]));
    graph.operators.push(OperatorDef::new(add, &[dup2, a], &[unnamed]));
    graph.operators.push(OperatorDef::new(add, &[a, a], &[]));
    model.subgraphs.push(graph);

    let bytes = encode(&model).unwrap();
    let decoded = decode(&bytes).unwrap();
    let nodes = operator_nodes(&decoded.subgraph(0).unwrap()).unwrap();
    assert_eq!(nodes, vec!["sum", "op#1", "op#2", "op#3"]);
}

#[test]
fn test_fallback_never_clashes_with_tensor_names() {
    let mut model = ModelDef::new();
    let add = model.operator_code_index(BuiltinOperator::ADD);
    let mut graph = SubGraphDef::named("main");
    let a = graph.add_tensor(TensorDef::new("a", TensorType::Float32, &[2]));
    let literal = graph.add_tensor(TensorDef::new("op#1", TensorType::Float32, &[2]));
    let unnamed = graph.add_tensor(TensorDef::new("", TensorType::Float32, &[2]));
    graph.operators.push(OperatorDef::new(add, &[a, a], &[literal]));
    graph.operators.push(OperatorDef::new(add, &[literal, a], &[unnamed]));
    model.subgraphs.push(graph);

    let bytes = encode(&model).unwrap();
    let decoded = decode(&bytes).unwrap();
    let nodes = operator_nodes(&decoded.subgraph(0).unwrap()).unwrap();
    assert_eq!(nodes, vec!["op#1", "op#1.1"]);

    // Both operators stay distinct provenance nodes
    let mut tracker = ProvenanceTracker::new();
    register_model_pass(&mut tracker, "source", &decoded, 0, BTreeMap::new()).unwrap();
    assert_eq!(tracker.nodes_at(0).unwrap().len(), 2);
}

#[test]
fn test_fusion_traced_to_source() {
    let source = linear_model(&[
        (BuiltinOperator::FULLY_CONNECTED, "fc"),
        (BuiltinOperator::ADD, "bias"),
        (BuiltinOperator::SOFTMAX, "probs"),
    ]);
    // fc + bias fused into one operator
    let fused = linear_model(&[
        (BuiltinOperator::FULLY_CONNECTED, "fc_bias"),
        (BuiltinOperator::SOFTMAX, "probs"),
    ]);
    let renamed = linear_model(&[
        (BuiltinOperator::FULLY_CONNECTED, "dense"),
        (BuiltinOperator::SOFTMAX, "probs"),
    ]);

    let mut tracker = ProvenanceTracker::new();
    let source = decode(&source).unwrap();
    let fused = decode(&fused).unwrap();
    let renamed = decode(&renamed).unwrap();

    register_model_pass(&mut tracker, "source", &source, 0, BTreeMap::new()).unwrap();
    register_model_pass(
        &mut tracker,
        "fuse_bias",
        &fused,
        0,
        BTreeMap::from([("fc_bias".to_string(), names(&["fc", "bias"]))]),
    )
    .unwrap();
    register_model_pass(
        &mut tracker,
        "rename",
        &renamed,
        0,
        BTreeMap::from([("dense".to_string(), names(&["fc_bias"]))]),
    )
    .unwrap();

    let dense = "dense".to_string();
    assert_eq!(tracker.source_ancestors(&dense, 2).unwrap(), names(&["fc", "bias"]));
    assert_eq!(
        tracker.source_ancestors(&"probs".to_string(), 2).unwrap(),
        names(&["probs"])
    );
    assert_eq!(
        tracker.descendants_at(&"bias".to_string(), 0, 2).unwrap(),
        names(&["dense"])
    );
    assert_eq!(
        tracker.pass_names().collect::<Vec<_>>(),
        vec!["source", "fuse_bias", "rename"]
    );
}

#[test]
fn test_extra_derivation_must_exist() {
    let bytes = linear_model(&[(BuiltinOperator::ADD, "a")]);
    let model = decode(&bytes).unwrap();
    let mut tracker = ProvenanceTracker::new();
    register_model_pass(&mut tracker, "source", &model, 0, BTreeMap::new()).unwrap();

    let err = register_model_pass(
        &mut tracker,
        "bad",
        &model,
        0,
        BTreeMap::from([("a".to_string(), names(&["missing"]))]),
    )
    .unwrap_err();
    assert!(matches!(err, TracerError::UnknownNode { pass: 0, .. }));
}

#[test]
fn test_missing_subgraph() {
    let bytes = linear_model(&[(BuiltinOperator::ADD, "a")]);
    let model = decode(&bytes).unwrap();
    let mut tracker = ProvenanceTracker::new();
    let err = register_model_pass(&mut tracker, "source", &model, 3, BTreeMap::new()).unwrap_err();
    assert!(matches!(err, TracerError::Reader(_)));
    assert!(tracker.is_empty());
}

/// Chain of `depth` passes where node `n{k}_{i}` derives from `n{k-1}_{i}`
/// and `n{k-1}_{i+1}` (when present)
fn ladder(width: usize, depth: usize) -> ProvenanceTracker<(usize, usize)> {
    let mut tracker = ProvenanceTracker::new();
    tracker
        .register_source("source", (0..width).map(|i| (0, i)))
        .unwrap();
    for pass in 1..=depth {
        let derivations: Vec<((usize, usize), Vec<(usize, usize)>)> = (0..width)
            .map(|i| {
                let mut origins = vec![(pass - 1, i)];
                if i + 1 < width {
                    origins.push((pass - 1, i + 1));
                }
                ((pass, i), origins)
            })
            .collect();
        tracker
            .register_pass(format!("p{}", pass), (0..width).map(|i| (pass, i)), derivations)
            .unwrap();
    }
    tracker
}

proptest! {
    #[test]
    fn test_ladder_ancestors(width in 1usize..12, depth in 1usize..12, node in 0usize..12) {
        prop_assume!(node < width);
        let tracker = ladder(width, depth);
        let ancestors = tracker.source_ancestors(&(depth, node), depth).unwrap();
        let expected: BTreeSet<(usize, usize)> =
            (node..=(node + depth).min(width - 1)).map(|i| (0, i)).collect();
        prop_assert_eq!(ancestors, expected);
    }

    #[test]
    fn test_identity_at_every_pass(width in 1usize..8, depth in 0usize..8, node in 0usize..8) {
        prop_assume!(node < width);
        let tracker = ladder(width, depth);
        for pass in 0..=depth {
            prop_assert_eq!(
                tracker.ancestors_at(&(pass, node), pass, pass).unwrap(),
                BTreeSet::from([(pass, node)])
            );
        }
    }

    #[test]
    fn test_descendants_mirror_ancestors(width in 1usize..8, depth in 1usize..6) {
        let tracker = ladder(width, depth);
        for source in 0..width {
            let descendants = tracker.descendants_at(&(0, source), 0, depth).unwrap();
            for (pass, i) in descendants {
                let back = tracker.source_ancestors(&(pass, i), depth).unwrap();
                prop_assert!(back.contains(&(0, source)));
            }
        }
    }
}
