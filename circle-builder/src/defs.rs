//! Owned model description consumed by the encoder

use circle_schema::{
    BuiltinOperator, DataFormat, OptionValue, OptionsKind, TensorType, SCHEMA_VERSION,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ModelDef {
    pub version: u32,
    pub description: Option<String>,
    pub operator_codes: Vec<OperatorCodeDef>,
    pub subgraphs: Vec<SubGraphDef>,
    pub buffers: Vec<BufferDef>,
    pub metadata_buffer: Vec<i32>,
    pub metadata: Vec<MetadataDef>,
    pub signature_defs: Vec<SignatureDef>,
}

impl ModelDef {
    pub fn new() -> Self {
        Self {
            version: SCHEMA_VERSION,
            description: None,
            operator_codes: Vec::new(),
            subgraphs: Vec::new(),
            buffers: Vec::new(),
            metadata_buffer: Vec::new(),
            metadata: Vec::new(),
            signature_defs: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Index of the code for `op`, appending it if needed
    pub fn operator_code_index(&mut self, op: BuiltinOperator) -> u32 {
        if let Some(index) = self
            .operator_codes
            .iter()
            .position(|code| code.builtin == op && code.custom_code.is_none())
        {
            return index as u32;
        }
        self.operator_codes.push(OperatorCodeDef::builtin(op));
        (self.operator_codes.len() - 1) as u32
    }
}

impl Default for ModelDef {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperatorCodeDef {
    pub builtin: BuiltinOperator,
    pub custom_code: Option<String>,
    pub version: i32,
}

impl OperatorCodeDef {
    pub fn builtin(op: BuiltinOperator) -> Self {
        Self {
            builtin: op,
            custom_code: None,
            version: 1,
        }
    }

    pub fn custom(code: &str) -> Self {
        Self {
            builtin: BuiltinOperator::CUSTOM,
            custom_code: Some(code.to_string()),
            version: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubGraphDef {
    pub name: Option<String>,
    pub tensors: Vec<TensorDef>,
    pub inputs: Vec<i32>,
    pub outputs: Vec<i32>,
    pub operators: Vec<OperatorDef>,
    pub data_format: DataFormat,
}

impl SubGraphDef {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    /// Append a tensor, returning its index
    pub fn add_tensor(&mut self, tensor: TensorDef) -> i32 {
        self.tensors.push(tensor);
        (self.tensors.len() - 1) as i32
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TensorDef {
    pub name: Option<String>,
    pub shape: Vec<i32>,
    pub tensor_type: TensorType,
    pub buffer: u32,
    pub quantization: Option<QuantizationDef>,
    pub is_variable: bool,
    pub shape_signature: Vec<i32>,
}

impl TensorDef {
    pub fn new(name: &str, tensor_type: TensorType, shape: &[i32]) -> Self {
        Self {
            name: Some(name.to_string()),
            shape: shape.to_vec(),
            tensor_type,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuantizationDef {
    pub min: Vec<f32>,
    pub max: Vec<f32>,
    pub scale: Vec<f32>,
    pub zero_point: Vec<i64>,
    pub quantized_dimension: i32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperatorDef {
    pub opcode_index: u32,
    pub inputs: Vec<i32>,
    pub outputs: Vec<i32>,
    pub options: Option<OptionsDef>,
    pub custom_options: Vec<u8>,
    pub mutating_variable_inputs: Vec<bool>,
    pub intermediates: Vec<i32>,
}

impl OperatorDef {
    pub fn new(opcode_index: u32, inputs: &[i32], outputs: &[i32]) -> Self {
        Self {
            opcode_index,
            inputs: inputs.to_vec(),
            outputs: outputs.to_vec(),
            ..Self::default()
        }
    }

    pub fn with_options(mut self, options: OptionsDef) -> Self {
        self.options = Some(options);
        self
    }
}

/// Values for one options union member; unset fields are omitted
#[derive(Debug, Clone, PartialEq)]
pub struct OptionsDef {
    pub kind: OptionsKind,
    pub values: Vec<(String, OptionValue)>,
}

impl OptionsDef {
    pub fn new(kind: OptionsKind) -> Self {
        Self {
            kind,
            values: Vec::new(),
        }
    }

    pub fn with(mut self, field: &str, value: OptionValue) -> Self {
        self.values.push((field.to_string(), value));
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferDef {
    pub data: Vec<u8>,
    pub offset: u64,
    pub size: u64,
}

impl BufferDef {
    pub fn with_data(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetadataDef {
    pub name: String,
    pub buffer: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignatureDef {
    pub signature_key: Option<String>,
    pub subgraph_index: u32,
    pub inputs: Vec<TensorMapDef>,
    pub outputs: Vec<TensorMapDef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TensorMapDef {
    pub name: String,
    pub tensor_index: u32,
}
