//! Owned, serializable snapshot of a model for UI layers

use crate::error::Result;
use crate::model::{Model, TensorMap};
use crate::operator::Operator;
use crate::options::display_value;
use crate::subgraph::SubGraph;
use crate::table::Vector;
use crate::tensor::Tensor;
use circle_schema::{DataFormat, OptionValue, OptionsKind, TensorType};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelView {
    pub version: u32,
    pub description: Option<String>,
    pub operator_codes: Vec<OperatorCodeView>,
    pub subgraphs: Vec<SubGraphView>,
    pub buffers: Vec<BufferView>,
    pub metadata: Vec<MetadataView>,
    pub signature_defs: Vec<SignatureDefView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatorCodeView {
    pub name: String,
    pub builtin_code: i32,
    pub custom_code: Option<String>,
    pub version: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubGraphView {
    pub name: Option<String>,
    pub data_format: DataFormat,
    pub inputs: Vec<i32>,
    pub outputs: Vec<i32>,
    pub tensors: Vec<TensorView>,
    pub operators: Vec<OperatorView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TensorView {
    pub index: usize,
    pub name: Option<String>,
    pub tensor_type: TensorType,
    pub shape: Vec<i32>,
    pub shape_signature: Vec<i32>,
    pub buffer: u32,
    pub is_variable: bool,
    pub quantization: Option<QuantizationView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantizationView {
    pub min: Vec<f32>,
    pub max: Vec<f32>,
    pub scale: Vec<f32>,
    pub zero_point: Vec<i64>,
    pub quantized_dimension: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatorView {
    pub index: usize,
    pub opcode_index: u32,
    pub name: String,
    pub inputs: Vec<i32>,
    pub outputs: Vec<i32>,
    pub options: Option<OptionsView>,
    pub custom_options_len: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionsView {
    pub kind: OptionsKind,
    pub fields: Vec<OptionFieldView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionFieldView {
    pub name: &'static str,
    pub value: OptionValue,
    /// Value with enum variants spelled out
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BufferView {
    pub index: usize,
    /// Inline data length
    pub len: usize,
    pub offset: u64,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataView {
    pub name: Option<String>,
    pub buffer: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignatureDefView {
    pub signature_key: Option<String>,
    pub subgraph_index: u32,
    pub inputs: Vec<TensorMapView>,
    pub outputs: Vec<TensorMapView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TensorMapView {
    pub name: Option<String>,
    pub tensor_index: u32,
}

impl ModelView {
    /// Materialize every reachable table
    pub fn from_model(model: &Model<'_>) -> Result<Self> {
        let mut operator_codes = Vec::new();
        for code in model.operator_codes()? {
            let code = code?;
            operator_codes.push(OperatorCodeView {
                name: code.name()?.into_owned(),
                builtin_code: code.builtin_operator()?.code(),
                custom_code: code.custom_code()?.map(str::to_string),
                version: code.version()?,
            });
        }

        let mut subgraphs = Vec::new();
        for subgraph in model.subgraphs()? {
            subgraphs.push(SubGraphView::from_subgraph(model, &subgraph?)?);
        }

        let mut buffers = Vec::new();
        for (index, buffer) in model.buffers()?.iter().enumerate() {
            let buffer = buffer?;
            buffers.push(BufferView {
                index,
                len: buffer.data()?.len(),
                offset: buffer.offset()?,
                size: buffer.size()?,
            });
        }

        let mut metadata = Vec::new();
        for entry in model.metadata()? {
            let entry = entry?;
            metadata.push(MetadataView {
                name: entry.name()?.map(str::to_string),
                buffer: entry.buffer()?,
            });
        }

        let mut signature_defs = Vec::new();
        for signature in model.signature_defs()? {
            let signature = signature?;
            signature_defs.push(SignatureDefView {
                signature_key: signature.signature_key()?.map(str::to_string),
                subgraph_index: signature.subgraph_index()?,
                inputs: tensor_maps(signature.inputs()?)?,
                outputs: tensor_maps(signature.outputs()?)?,
            });
        }

        Ok(Self {
            version: model.version()?,
            description: model.description()?.map(str::to_string),
            operator_codes,
            subgraphs,
            buffers,
            metadata,
            signature_defs,
        })
    }
}

fn tensor_maps<'a>(maps: Vector<'a, TensorMap<'a>>) -> Result<Vec<TensorMapView>> {
    let mut views = Vec::with_capacity(maps.len());
    for map in maps {
        let map = map?;
        views.push(TensorMapView {
            name: map.name()?.map(str::to_string),
            tensor_index: map.tensor_index()?,
        });
    }
    Ok(views)
}

impl SubGraphView {
    pub fn from_subgraph(model: &Model<'_>, subgraph: &SubGraph<'_>) -> Result<Self> {
        let mut tensors = Vec::new();
        for (index, tensor) in subgraph.tensors()?.iter().enumerate() {
            tensors.push(TensorView::from_tensor(index, &tensor?)?);
        }

        let mut operators = Vec::new();
        for (index, op) in subgraph.operators()?.iter().enumerate() {
            operators.push(OperatorView::from_operator(model, index, &op?)?);
        }

        Ok(Self {
            name: subgraph.name()?.map(str::to_string),
            data_format: subgraph.data_format()?,
            inputs: subgraph.inputs()?.to_vec()?,
            outputs: subgraph.outputs()?.to_vec()?,
            tensors,
            operators,
        })
    }
}

impl TensorView {
    pub fn from_tensor(index: usize, tensor: &Tensor<'_>) -> Result<Self> {
        let quantization = match tensor.quantization()? {
            Some(quant) => Some(QuantizationView {
                min: quant.min()?.to_vec()?,
                max: quant.max()?.to_vec()?,
                scale: quant.scale()?.to_vec()?,
                zero_point: quant.zero_point()?.to_vec()?,
                quantized_dimension: quant.quantized_dimension()?,
            }),
            None => None,
        };

        Ok(Self {
            index,
            name: tensor.name()?.map(str::to_string),
            tensor_type: tensor.tensor_type()?,
            shape: tensor.shape()?.to_vec()?,
            shape_signature: tensor.shape_signature()?.to_vec()?,
            buffer: tensor.buffer()?,
            is_variable: tensor.is_variable()?,
            quantization,
        })
    }
}

impl OperatorView {
    pub fn from_operator(model: &Model<'_>, index: usize, op: &Operator<'_>) -> Result<Self> {
        let options = match op.builtin_options()? {
            Some(options) => {
                let mut fields = Vec::new();
                for decl in options.kind().fields() {
                    let value = options.read_field(decl)?;
                    fields.push(OptionFieldView {
                        name: decl.name,
                        text: display_value(decl, &value),
                        value,
                    });
                }
                Some(OptionsView {
                    kind: options.kind(),
                    fields,
                })
            }
            None => None,
        };

        Ok(Self {
            index,
            opcode_index: op.opcode_index()?,
            name: model.operator_name(op)?.into_owned(),
            inputs: op.inputs()?.to_vec()?,
            outputs: op.outputs()?.to_vec()?,
            options,
            custom_options_len: op.custom_options()?.len(),
        })
    }
}
