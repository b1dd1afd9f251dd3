//! # Circle Reader
//!
//! Zero-copy reader for circle model files.
//!
//! A decoded [`Model`] is a `(buffer, offset)` pair: nothing is parsed until
//! a getter is called, and every getter re-reads the vtable. Large models
//! therefore open in constant time, and a malformed region only fails the
//! reads that touch it (or the whole decode, with
//! [`DecoderConfig::verify`]).
//!
//! ## Example
//!
//! ```rust,no_run
//! use circle_reader::decode;
//!
//! let bytes = std::fs::read("model.circle").unwrap();
//! let model = decode(&bytes).unwrap();
//! let graph = model.subgraph(0).unwrap();
//!
//! for op in graph.operators().unwrap() {
//!     let op = op.unwrap();
//!     println!("{}", model.operator_name(&op).unwrap());
//! }
//!
//! let index = graph.tensor_index_by_name("input").unwrap();
//! println!("input is tensor #{}", index);
//! ```

pub mod buffer;
pub mod config;
pub mod error;
pub mod table;
pub mod model;
pub mod subgraph;
pub mod tensor;
pub mod operator;
pub mod options;
pub mod decoder;
pub mod formatter;
pub mod projection;

pub use buffer::ByteBuffer;
pub use config::{ConfigError, DecoderConfig};
pub use error::{ReaderError, Result};
pub use table::{Follow, Table, Vector, VectorIter};
pub use model::{Buffer, Metadata, Model, SignatureDef, TensorMap};
pub use subgraph::SubGraph;
pub use tensor::{QuantizationParameters, Tensor};
pub use operator::{Operator, OperatorCode};
pub use options::{DecodedOptions, OptionsTable};
pub use decoder::{decode, decode_with};
pub use formatter::format_model;
pub use projection::ModelView;
