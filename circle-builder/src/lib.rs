//! # Circle Builder
//!
//! Encodes an owned [`ModelDef`] description into a circle buffer. Used by
//! tests and tools that need models without an external converter.
//!
//! ## Example
//!
//! ```rust
//! use circle_builder::{encode, ModelDef, OperatorDef, SubGraphDef, TensorDef};
//! use circle_schema::{BuiltinOperator, TensorType};
//!
//! let mut model = ModelDef::new();
//! let topk = model.operator_code_index(BuiltinOperator::TOPK_V2);
//!
//! let mut graph = SubGraphDef::named("main");
//! let input = graph.add_tensor(TensorDef::new("input", TensorType::Float32, &[1, 28, 28, 1]));
//! let output = graph.add_tensor(TensorDef::new("values", TensorType::Float32, &[1, 28, 28, 1]));
//! graph.inputs = vec![input];
//! graph.outputs = vec![output];
//! graph.operators.push(OperatorDef::new(topk, &[input], &[output]));
//! model.subgraphs.push(graph);
//!
//! let bytes = encode(&model).unwrap();
//! assert_eq!(&bytes[4..8], b"CIR0");
//! ```

pub mod error;
pub mod writer;
pub mod defs;
pub mod encoder;

pub use error::{BuilderError, Result};
pub use writer::{TableOffset, TableWriter};
pub use defs::{
    BufferDef, MetadataDef, ModelDef, OperatorCodeDef, OperatorDef, OptionsDef, QuantizationDef,
    SignatureDef, SubGraphDef, TensorDef, TensorMapDef,
};
pub use encoder::{encode, encode_model, encode_options, EncodeOptions};
