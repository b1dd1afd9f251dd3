//! Decode models produced by circle-builder
//!
//! Everything written must read back; everything omitted must read back as
//! the schema default.

use circle_builder::{
    encode, encode_model, BufferDef, EncodeOptions, MetadataDef, ModelDef, OperatorCodeDef,
    OperatorDef, OptionsDef, QuantizationDef, SignatureDef, SubGraphDef, TensorDef, TensorMapDef,
};
use circle_reader::{
    decode, decode_with, format_model, DecoderConfig, ModelView, ReaderError,
};
use circle_schema::{BuiltinOperator, DataFormat, OptionValue, OptionsKind, TensorType};
use proptest::prelude::*;

/// "input" [1, 28, 28, 1] float32 -> TOPK_V2 -> values, indices
fn topk_model() -> ModelDef {
    let mut model = ModelDef::new().with_description("topk test model");
    let topk = model.operator_code_index(BuiltinOperator::TOPK_V2);

    let mut graph = SubGraphDef::named("main");
    let input = graph.add_tensor(TensorDef::new("input", TensorType::Float32, &[1, 28, 28, 1]));
    let k = graph.add_tensor(TensorDef::new("k", TensorType::Int32, &[]));
    let values = graph.add_tensor(TensorDef::new("values", TensorType::Float32, &[1, 28, 28, 1]));
    let indices = graph.add_tensor(TensorDef::new("indices", TensorType::Int32, &[1, 28, 28, 1]));
    graph.inputs = vec![input];
    graph.outputs = vec![values, indices];
    graph.operators.push(
        OperatorDef::new(topk, &[input, k], &[values, indices])
            .with_options(OptionsDef::new(OptionsKind::TopKV2Options)),
    );
    model.subgraphs.push(graph);
    model
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_topk_model() {
    let bytes = encode(&topk_model()).unwrap();
    let model = decode(&bytes).unwrap();

    assert_eq!(model.subgraphs().unwrap().len(), 1);
    assert_eq!(model.description().unwrap(), Some("topk test model"));

    let graph = model.subgraph(0).unwrap();
    assert_eq!(graph.name().unwrap(), Some("main"));
    assert_eq!(graph.data_format().unwrap(), DataFormat::ChannelsLast);

    let index = graph.tensor_index_by_name("input").unwrap();
    let tensor = graph.tensor(index).unwrap();
    assert_eq!(tensor.shape().unwrap().to_vec().unwrap(), vec![1, 28, 28, 1]);
    assert_eq!(tensor.tensor_type().unwrap(), TensorType::Float32);
    assert_eq!(tensor.element_count().unwrap(), Some(784));

    let op = graph.operator(0).unwrap();
    assert_eq!(model.operator_name(&op).unwrap(), "TOPK_V2");
    assert_eq!(op.builtin_options_type().unwrap(), OptionsKind::TopKV2Options);
    let options = op.builtin_options().unwrap().unwrap();
    assert!(options.decode().unwrap().fields.is_empty());
}

#[test]
fn test_foreign_identifier_rejected() {
    let options = EncodeOptions::with_identifier("XXXX").unwrap();
    let bytes = encode_model(&topk_model(), &options).unwrap();
    assert_eq!(
        decode(&bytes).unwrap_err(),
        ReaderError::InvalidIdentifier {
            expected: "CIR0".to_string(),
            found: "XXXX".to_string(),
        }
    );

    let config = DecoderConfig::with_identifier("XXXX").unwrap();
    assert!(decode_with(&bytes, &config).is_ok());
}

#[test]
fn test_size_prefixed_model() {
    let options = EncodeOptions::DEFAULT.size_prefixed(true);
    let bytes = encode_model(&topk_model(), &options).unwrap();

    assert!(decode(&bytes).is_err());

    let config = DecoderConfig::DEFAULT.size_prefixed(true).verify(true);
    let model = decode_with(&bytes, &config).unwrap();
    let graph = model.subgraph(0).unwrap();
    assert_eq!(graph.tensor_index_by_name("values").unwrap(), 2);
}

#[test]
fn test_tensor_lookup_errors() {
    let bytes = encode(&topk_model()).unwrap();
    let model = decode(&bytes).unwrap();
    let graph = model.subgraph(0).unwrap();

    assert!(matches!(
        graph.tensor_index_by_name("missing"),
        Err(ReaderError::NotFound { .. })
    ));
    assert!(matches!(
        graph.tensor(4),
        Err(ReaderError::IndexOutOfRange { what: "tensor", index: 4, len: 4 })
    ));
    assert!(matches!(
        model.subgraph(1),
        Err(ReaderError::IndexOutOfRange { what: "subgraph", .. })
    ));
}

#[test]
fn test_duplicate_tensor_names_first_wins() {
    let mut model = topk_model();
    model.subgraphs[0]
        .tensors
        .push(TensorDef::new("input", TensorType::Int8, &[4]));
    let bytes = encode(&model).unwrap();
    let decoded = decode(&bytes).unwrap();
    let graph = decoded.subgraph(0).unwrap();

    assert_eq!(graph.tensor_index_by_name("input").unwrap(), 0);
    assert_eq!(graph.tensor_indices_by_name("input").unwrap(), vec![0, 4]);
}

// ============================================================================
// Options
// ============================================================================

fn single_op_model(op: BuiltinOperator, options: OptionsDef) -> ModelDef {
    let mut model = ModelDef::new();
    let opcode = model.operator_code_index(op);
    let mut graph = SubGraphDef::named("main");
    let a = graph.add_tensor(TensorDef::new("a", TensorType::Float32, &[1, 4, 4, 8]));
    let b = graph.add_tensor(TensorDef::new("b", TensorType::Float32, &[1, 2, 2, 32]));
    graph.inputs = vec![a];
    graph.outputs = vec![b];
    graph
        .operators
        .push(OperatorDef::new(opcode, &[a], &[b]).with_options(options));
    model.subgraphs.push(graph);
    model
}

#[test]
fn test_batch_matmul_options() {
    let options = OptionsDef::new(OptionsKind::BatchMatMulOptions)
        .with("adjoint_lhs", OptionValue::Bool(false))
        .with("adjoint_rhs", OptionValue::Bool(true));
    let bytes = encode(&single_op_model(BuiltinOperator::BATCH_MATMUL, options)).unwrap();
    let model = decode(&bytes).unwrap();
    let op = model.subgraph(0).unwrap().operator(0).unwrap();

    let options = op.builtin_options().unwrap().unwrap();
    assert_eq!(options.kind(), OptionsKind::BatchMatMulOptions);
    assert!(!options.get_bool("adjoint_lhs").unwrap());
    assert!(options.get_bool("adjoint_rhs").unwrap());
    assert_eq!(model.operator_name(&op).unwrap(), "BATCH_MATMUL");
}

#[test]
fn test_space_to_depth_options() {
    let options = OptionsDef::new(OptionsKind::SpaceToDepthOptions)
        .with("block_size", OptionValue::Int(2));
    let bytes = encode(&single_op_model(BuiltinOperator::SPACE_TO_DEPTH, options)).unwrap();
    let model = decode(&bytes).unwrap();
    let op = model.subgraph(0).unwrap().operator(0).unwrap();

    let options = op.builtin_options().unwrap().unwrap();
    assert_eq!(options.get_int("block_size").unwrap(), 2);
}

#[test]
fn test_resize_nearest_neighbor_partial_options() {
    let options = OptionsDef::new(OptionsKind::ResizeNearestNeighborOptions)
        .with("align_corners", OptionValue::Bool(true));
    let bytes =
        encode(&single_op_model(BuiltinOperator::RESIZE_NEAREST_NEIGHBOR, options)).unwrap();
    let model = decode(&bytes).unwrap();
    let op = model.subgraph(0).unwrap().operator(0).unwrap();

    let decoded = op.builtin_options().unwrap().unwrap().decode().unwrap();
    assert_eq!(decoded.get("align_corners"), Some(&OptionValue::Bool(true)));
    assert_eq!(decoded.get("half_pixel_centers"), Some(&OptionValue::Bool(false)));
}

#[test]
fn test_omitted_options_use_non_zero_defaults() {
    let options = OptionsDef::new(OptionsKind::Conv2DOptions)
        .with("stride_w", OptionValue::Int(2))
        .with("fused_activation_function", OptionValue::Enum(3));
    let bytes = encode(&single_op_model(BuiltinOperator::CONV_2D, options)).unwrap();
    let model = decode(&bytes).unwrap();
    let op = model.subgraph(0).unwrap().operator(0).unwrap();
    let options = op.builtin_options().unwrap().unwrap();

    assert_eq!(options.get_int("stride_w").unwrap(), 2);
    assert_eq!(options.get_int("stride_h").unwrap(), 0);
    assert_eq!(options.get_int("dilation_w_factor").unwrap(), 1);
    assert_eq!(options.get("fused_activation_function").unwrap(), OptionValue::Enum(3));
    assert!(format_model(&model).unwrap().contains("fused_activation_function=RELU6"));
}

#[test]
fn test_reshape_new_shape_vector() {
    let options = OptionsDef::new(OptionsKind::ReshapeOptions)
        .with("new_shape", OptionValue::IntVector(vec![1, -1]));
    let bytes = encode(&single_op_model(BuiltinOperator::RESHAPE, options)).unwrap();
    let model = decode(&bytes).unwrap();
    let op = model.subgraph(0).unwrap().operator(0).unwrap();
    let options = op.builtin_options().unwrap().unwrap();
    assert_eq!(options.get_int_vector("new_shape").unwrap(), vec![1, -1]);
}

#[test]
fn test_operator_without_options() {
    let mut model = topk_model();
    model.subgraphs[0].operators[0].options = None;
    let bytes = encode(&model).unwrap();
    let decoded = decode(&bytes).unwrap();
    let op = decoded.subgraph(0).unwrap().operator(0).unwrap();
    assert_eq!(op.builtin_options_type().unwrap(), OptionsKind::None);
    assert!(op.builtin_options().unwrap().is_none());
}

// ============================================================================
// Operator Codes
// ============================================================================

#[test]
fn test_operator_code_resolution() {
    let mut model = ModelDef::new();
    model.operator_codes = vec![
        OperatorCodeDef::builtin(BuiltinOperator::CONV_2D),
        OperatorCodeDef::builtin(BuiltinOperator::CUMSUM),
        OperatorCodeDef::builtin(BuiltinOperator::BCQ_GATHER),
        OperatorCodeDef::custom("MyCustomOp"),
    ];
    let bytes = encode(&model).unwrap();
    let decoded = decode(&bytes).unwrap();

    let names = decoded
        .operator_codes()
        .unwrap()
        .iter()
        .map(|code| code.unwrap().name().unwrap().into_owned())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["CONV_2D", "CUMSUM", "BCQ_GATHER", "MyCustomOp"]);

    let cumsum = decoded.operator_code(1).unwrap();
    assert_eq!(cumsum.deprecated_builtin_code().unwrap(), 127);
    assert_eq!(cumsum.builtin_code().unwrap(), 128);
    assert_eq!(cumsum.version().unwrap(), 1);

    let custom = decoded.operator_code(3).unwrap();
    assert!(custom.is_custom().unwrap());
    assert_eq!(custom.custom_code().unwrap(), Some("MyCustomOp"));
}

#[test]
fn test_circle_extension_codes() {
    let mut model = ModelDef::new();
    model.operator_codes = vec![
        OperatorCodeDef::builtin(BuiltinOperator::from(-2)),
        OperatorCodeDef::builtin(BuiltinOperator::LEGACY_INSTANCE_NORM),
        OperatorCodeDef::builtin(BuiltinOperator::GRU),
    ];
    let bytes = encode(&model).unwrap();
    let decoded = decode(&bytes).unwrap();

    let norm = decoded.operator_code(0).unwrap();
    assert_eq!(norm.deprecated_builtin_code().unwrap(), 127);
    assert_eq!(norm.builtin_code().unwrap(), -2);
    assert_eq!(norm.builtin_operator().unwrap(), BuiltinOperator::INSTANCE_NORM);
    assert_eq!(norm.name().unwrap(), "INSTANCE_NORM");

    // Pre-0.4 files still name their extension operators
    let legacy = decoded.operator_code(1).unwrap();
    assert_eq!(legacy.builtin_code().unwrap(), 254);
    assert_eq!(legacy.name().unwrap(), "INSTANCE_NORM");

    assert_eq!(decoded.operator_code(2).unwrap().name().unwrap(), "GRU");
}

// ============================================================================
// Side Tables
// ============================================================================

#[test]
fn test_quantization_buffers_metadata_signatures() {
    let mut model = topk_model();
    model.buffers = vec![BufferDef::default(), BufferDef::with_data(&[1, 2, 3, 4])];
    model.metadata = vec![MetadataDef {
        name: "ONE_compiler_version".to_string(),
        buffer: 1,
    }];
    model.signature_defs = vec![SignatureDef {
        signature_key: Some("serving_default".to_string()),
        subgraph_index: 0,
        inputs: vec![TensorMapDef {
            name: "input".to_string(),
            tensor_index: 0,
        }],
        outputs: vec![TensorMapDef {
            name: "values".to_string(),
            tensor_index: 2,
        }],
    }];
    {
        let k = &mut model.subgraphs[0].tensors[1];
        k.buffer = 1;
        k.quantization = Some(QuantizationDef {
            scale: vec![0.5],
            zero_point: vec![-3],
            quantized_dimension: 0,
            ..QuantizationDef::default()
        });
    }
    model.subgraphs[0].data_format = DataFormat::ChannelsFirst;

    let bytes = encode(&model).unwrap();
    let decoded = decode_with(&bytes, &DecoderConfig::DEFAULT.verify(true)).unwrap();

    let buffer = decoded.buffer(1).unwrap();
    assert_eq!(buffer.data().unwrap(), &[1, 2, 3, 4]);
    assert!(decoded.buffer(0).unwrap().data().unwrap().is_empty());

    let meta = decoded.metadata_by_name("ONE_compiler_version").unwrap().unwrap();
    assert_eq!(meta.buffer().unwrap(), 1);
    assert!(decoded.metadata_by_name("other").unwrap().is_none());

    let signature = decoded.signature_defs().unwrap().get(0).unwrap();
    assert_eq!(signature.signature_key().unwrap(), Some("serving_default"));
    let output = signature.outputs().unwrap().get(0).unwrap();
    assert_eq!(output.name().unwrap(), Some("values"));
    assert_eq!(output.tensor_index().unwrap(), 2);

    let graph = decoded.subgraph(0).unwrap();
    assert_eq!(graph.data_format().unwrap(), DataFormat::ChannelsFirst);
    let k = graph.tensor(1).unwrap();
    assert_eq!(k.buffer().unwrap(), 1);
    let quant = k.quantization().unwrap().unwrap();
    assert_eq!(quant.scale().unwrap().to_vec().unwrap(), vec![0.5]);
    assert_eq!(quant.zero_point().unwrap().to_vec().unwrap(), vec![-3]);
    assert!(quant.min().unwrap().is_empty());
    assert!(graph.tensor(0).unwrap().quantization().unwrap().is_none());
}

#[test]
fn test_projection_matches_readers() {
    let bytes = encode(&topk_model()).unwrap();
    let model = decode(&bytes).unwrap();
    let view = ModelView::from_model(&model).unwrap();

    assert_eq!(view.operator_codes[0].name, "TOPK_V2");
    let graph = &view.subgraphs[0];
    assert_eq!(graph.tensors[0].name.as_deref(), Some("input"));
    assert_eq!(graph.tensors[0].shape, vec![1, 28, 28, 1]);
    assert_eq!(graph.operators[0].name, "TOPK_V2");
    assert_eq!(graph.operators[0].inputs, vec![0, 1]);
    assert_eq!(
        graph.operators[0].options.as_ref().map(|o| o.kind),
        Some(OptionsKind::TopKV2Options)
    );
}

#[test]
fn test_format_model_listing() {
    let bytes = encode(&topk_model()).unwrap();
    let model = decode(&bytes).unwrap();
    let text = format_model(&model).unwrap();

    assert!(text.contains("; 1 subgraph(s), 1 operator code(s), 0 buffer(s)"));
    assert!(text.contains("subgraph #0 \"main\" (CHANNELS_LAST)"));
    assert!(text.contains("input FLOAT32 [1, 28, 28, 1]"));
    assert!(text.contains("TOPK_V2 (v1) in=[0, 1] out=[2, 3] TopKV2Options"));
}

// ============================================================================
// Property Tests
// ============================================================================

fn tensor_type() -> impl Strategy<Value = TensorType> {
    (0i8..=17).prop_map(|raw| TensorType::from_i8(raw).unwrap_or_default())
}

proptest! {
    #[test]
    fn test_tensor_roundtrip(
        name in "[a-z_][a-z0-9_]{0,15}",
        shape in prop::collection::vec(-1i32..512, 0..6),
        ty in tensor_type(),
        is_variable in any::<bool>(),
    ) {
        let mut model = ModelDef::new();
        let mut graph = SubGraphDef::default();
        let mut tensor = TensorDef::new(&name, ty, &shape);
        tensor.is_variable = is_variable;
        graph.add_tensor(tensor);
        model.subgraphs.push(graph);

        let bytes = encode(&model).unwrap();
        let decoded = decode(&bytes).unwrap();
        let graph = decoded.subgraph(0).unwrap();
        let tensor = graph.tensor(0).unwrap();

        prop_assert_eq!(tensor.name().unwrap(), Some(name.as_str()));
        prop_assert_eq!(tensor.shape().unwrap().to_vec().unwrap(), shape);
        prop_assert_eq!(tensor.tensor_type().unwrap(), ty);
        prop_assert_eq!(tensor.is_variable().unwrap(), is_variable);
        prop_assert_eq!(tensor.buffer().unwrap(), 0);
        prop_assert!(graph.name().unwrap().is_none());
    }

    #[test]
    fn test_conv_options_roundtrip(
        stride_w in any::<i32>(),
        stride_h in any::<i32>(),
        dilation in 1i32..8,
        padding in 0i8..2,
    ) {
        let options = OptionsDef::new(OptionsKind::Conv2DOptions)
            .with("padding", OptionValue::Enum(padding))
            .with("stride_w", OptionValue::Int(stride_w as i64))
            .with("stride_h", OptionValue::Int(stride_h as i64))
            .with("dilation_h_factor", OptionValue::Int(dilation as i64));
        let bytes = encode(&single_op_model(BuiltinOperator::CONV_2D, options)).unwrap();
        let model = decode(&bytes).unwrap();
        let op = model.subgraph(0).unwrap().operator(0).unwrap();
        let options = op.builtin_options().unwrap().unwrap();

        prop_assert_eq!(options.get("padding").unwrap(), OptionValue::Enum(padding));
        prop_assert_eq!(options.get_int("stride_w").unwrap(), stride_w as i64);
        prop_assert_eq!(options.get_int("stride_h").unwrap(), stride_h as i64);
        prop_assert_eq!(options.get_int("dilation_h_factor").unwrap(), dilation as i64);
        prop_assert_eq!(options.get_int("dilation_w_factor").unwrap(), 1);
    }

    #[test]
    fn test_softmax_beta_roundtrip(beta in -1.0e6f32..1.0e6) {
        let options = OptionsDef::new(OptionsKind::SoftmaxOptions)
            .with("beta", OptionValue::Float(beta));
        let bytes = encode(&single_op_model(BuiltinOperator::SOFTMAX, options)).unwrap();
        let model = decode(&bytes).unwrap();
        let op = model.subgraph(0).unwrap().operator(0).unwrap();
        let options = op.builtin_options().unwrap().unwrap();
        prop_assert_eq!(options.get_float("beta").unwrap(), beta);
    }
}
