//! # Model Encoder
//!
//! Serializes a [`ModelDef`] bottom-up: every table's strings, vectors and
//! child tables are created before the table itself is opened.

use crate::defs::{
    BufferDef, MetadataDef, ModelDef, OperatorCodeDef, OperatorDef, OptionsDef, QuantizationDef,
    SignatureDef, SubGraphDef, TensorDef, TensorMapDef,
};
use crate::error::{BuilderError, Result};
use crate::writer::{TableOffset, TableWriter};
use circle_schema::slots::{
    buffer, metadata, model, operator, operator_code, quantization, signature_def, sub_graph,
    tensor, tensor_map,
};
use circle_schema::{FieldDecl, FieldDefault, FieldKind, OptionValue, FILE_IDENTIFIER};
use flatbuffers::{FlatBufferBuilder, WIPOffset};
use tracing::debug;

/// Output framing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub identifier: [u8; 4],
    pub size_prefixed: bool,
}

impl EncodeOptions {
    pub const DEFAULT: Self = Self {
        identifier: FILE_IDENTIFIER,
        size_prefixed: false,
    };

    pub fn with_identifier(identifier: &str) -> Result<Self> {
        let bytes: [u8; 4] = identifier
            .as_bytes()
            .try_into()
            .map_err(|_| BuilderError::InvalidIdentifier(identifier.to_string()))?;
        let options = Self {
            identifier: bytes,
            ..Self::DEFAULT
        };
        options.identifier_str()?;
        Ok(options)
    }

    pub const fn size_prefixed(mut self, enabled: bool) -> Self {
        self.size_prefixed = enabled;
        self
    }

    fn identifier_str(&self) -> Result<&str> {
        std::str::from_utf8(&self.identifier)
            .ok()
            .filter(|id| id.bytes().all(|b| b.is_ascii_graphic()))
            .ok_or_else(|| {
                BuilderError::InvalidIdentifier(String::from_utf8_lossy(&self.identifier).into_owned())
            })
    }
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Encode with the circle identifier and no size prefix
pub fn encode(def: &ModelDef) -> Result<Vec<u8>> {
    encode_model(def, &EncodeOptions::DEFAULT)
}

/// Encode a model
pub fn encode_model(def: &ModelDef, options: &EncodeOptions) -> Result<Vec<u8>> {
    let identifier = options.identifier_str()?;
    check_references(def)?;

    let mut fbb = FlatBufferBuilder::with_capacity(1024);
    let root = encode_root(&mut fbb, def)?;
    if options.size_prefixed {
        fbb.finish_size_prefixed(root, Some(identifier));
    } else {
        fbb.finish(root, Some(identifier));
    }

    let bytes = fbb.finished_data().to_vec();
    debug!(
        len = bytes.len(),
        subgraphs = def.subgraphs.len(),
        identifier,
        "encoded model"
    );
    Ok(bytes)
}

/// Indices must point at existing entries so the reader never sees a
/// dangling reference produced by this crate
fn check_references(def: &ModelDef) -> Result<()> {
    let check = |what: &'static str, index: i64, len: usize| {
        if index < 0 || index as usize >= len {
            Err(BuilderError::InvalidReference { what, index, len })
        } else {
            Ok(())
        }
    };

    for subgraph in &def.subgraphs {
        let tensors = subgraph.tensors.len();
        for &index in subgraph.inputs.iter().chain(&subgraph.outputs) {
            check("tensor", index as i64, tensors)?;
        }
        for op in &subgraph.operators {
            check("operator code", op.opcode_index as i64, def.operator_codes.len())?;
            // -1 marks an omitted optional input
            for &index in op.inputs.iter().filter(|&&i| i != -1) {
                check("tensor", index as i64, tensors)?;
            }
            for &index in op.outputs.iter().chain(&op.intermediates) {
                check("tensor", index as i64, tensors)?;
            }
        }
        for t in &subgraph.tensors {
            if t.buffer != 0 {
                check("buffer", t.buffer as i64, def.buffers.len())?;
            }
        }
    }

    for signature in &def.signature_defs {
        check(
            "subgraph",
            signature.subgraph_index as i64,
            def.subgraphs.len(),
        )?;
    }
    Ok(())
}

fn encode_root(fbb: &mut FlatBufferBuilder<'_>, def: &ModelDef) -> Result<TableOffset> {
    let codes = def
        .operator_codes
        .iter()
        .map(|code| encode_operator_code(fbb, code))
        .collect::<Result<Vec<_>>>()?;
    let codes = fbb.create_vector(&codes);

    let mut subgraphs = Vec::with_capacity(def.subgraphs.len());
    for subgraph in &def.subgraphs {
        subgraphs.push(encode_subgraph(fbb, subgraph)?);
    }
    let subgraphs = fbb.create_vector(&subgraphs);

    let description = def.description.as_deref().map(|d| fbb.create_string(d));

    let buffers = def
        .buffers
        .iter()
        .map(|b| encode_buffer(fbb, b))
        .collect::<Result<Vec<_>>>()?;
    let buffers = fbb.create_vector(&buffers);

    let metadata_buffer = non_empty(fbb, &def.metadata_buffer);

    let metadata = def
        .metadata
        .iter()
        .map(|m| encode_metadata(fbb, m))
        .collect::<Result<Vec<_>>>()?;
    let metadata = (!metadata.is_empty()).then(|| fbb.create_vector(&metadata));

    let signatures = def
        .signature_defs
        .iter()
        .map(|s| encode_signature_def(fbb, s))
        .collect::<Result<Vec<_>>>()?;
    let signatures = (!signatures.is_empty()).then(|| fbb.create_vector(&signatures));

    let mut table = TableWriter::start(fbb);
    table.scalar::<u32>(model::VERSION, def.version, 0)?;
    table.offset(model::OPERATOR_CODES, codes)?;
    table.offset(model::SUBGRAPHS, subgraphs)?;
    table.optional_offset(model::DESCRIPTION, description)?;
    table.offset(model::BUFFERS, buffers)?;
    table.optional_offset(model::METADATA_BUFFER, metadata_buffer)?;
    table.optional_offset(model::METADATA, metadata)?;
    table.optional_offset(model::SIGNATURE_DEFS, signatures)?;
    Ok(table.finish())
}

fn encode_operator_code(fbb: &mut FlatBufferBuilder<'_>, def: &OperatorCodeDef) -> Result<TableOffset> {
    let custom_code = def.custom_code.as_deref().map(|c| fbb.create_string(c));

    let mut table = TableWriter::start(fbb);
    table.scalar::<i8>(
        operator_code::DEPRECATED_BUILTIN_CODE,
        def.builtin.deprecated_code(),
        0,
    )?;
    table.optional_offset(operator_code::CUSTOM_CODE, custom_code)?;
    table.scalar::<i32>(operator_code::VERSION, def.version, 1)?;
    table.scalar::<i32>(operator_code::BUILTIN_CODE, def.builtin.code(), 0)?;
    Ok(table.finish())
}

fn encode_subgraph(fbb: &mut FlatBufferBuilder<'_>, def: &SubGraphDef) -> Result<TableOffset> {
    let mut tensors = Vec::with_capacity(def.tensors.len());
    for t in &def.tensors {
        tensors.push(encode_tensor(fbb, t)?);
    }
    let tensors = fbb.create_vector(&tensors);

    let mut operators = Vec::with_capacity(def.operators.len());
    for op in &def.operators {
        operators.push(encode_operator(fbb, op)?);
    }
    let operators = fbb.create_vector(&operators);

    let inputs = fbb.create_vector(&def.inputs);
    let outputs = fbb.create_vector(&def.outputs);
    let name = def.name.as_deref().map(|n| fbb.create_string(n));

    let mut table = TableWriter::start(fbb);
    table.offset(sub_graph::TENSORS, tensors)?;
    table.offset(sub_graph::INPUTS, inputs)?;
    table.offset(sub_graph::OUTPUTS, outputs)?;
    table.offset(sub_graph::OPERATORS, operators)?;
    table.optional_offset(sub_graph::NAME, name)?;
    table.scalar::<i8>(sub_graph::DATA_FORMAT, def.data_format.to_i8(), 0)?;
    Ok(table.finish())
}

fn encode_tensor(fbb: &mut FlatBufferBuilder<'_>, def: &TensorDef) -> Result<TableOffset> {
    let shape = fbb.create_vector(&def.shape);
    let name = def.name.as_deref().map(|n| fbb.create_string(n));
    let quant = match &def.quantization {
        Some(q) => Some(encode_quantization(fbb, q)?),
        None => None,
    };
    let shape_signature = non_empty(fbb, &def.shape_signature);

    let mut table = TableWriter::start(fbb);
    table.offset(tensor::SHAPE, shape)?;
    table.scalar::<i8>(tensor::TYPE, def.tensor_type.to_i8(), 0)?;
    table.scalar::<u32>(tensor::BUFFER, def.buffer, 0)?;
    table.optional_offset(tensor::NAME, name)?;
    table.optional_offset(tensor::QUANTIZATION, quant)?;
    table.scalar::<bool>(tensor::IS_VARIABLE, def.is_variable, false)?;
    table.optional_offset(tensor::SHAPE_SIGNATURE, shape_signature)?;
    Ok(table.finish())
}

fn encode_quantization(fbb: &mut FlatBufferBuilder<'_>, def: &QuantizationDef) -> Result<TableOffset> {
    let min = non_empty(fbb, &def.min);
    let max = non_empty(fbb, &def.max);
    let scale = non_empty(fbb, &def.scale);
    let zero_point = non_empty(fbb, &def.zero_point);

    let mut table = TableWriter::start(fbb);
    table.optional_offset(quantization::MIN, min)?;
    table.optional_offset(quantization::MAX, max)?;
    table.optional_offset(quantization::SCALE, scale)?;
    table.optional_offset(quantization::ZERO_POINT, zero_point)?;
    table.scalar::<i32>(quantization::QUANTIZED_DIMENSION, def.quantized_dimension, 0)?;
    Ok(table.finish())
}

fn encode_operator(fbb: &mut FlatBufferBuilder<'_>, def: &OperatorDef) -> Result<TableOffset> {
    let options = match &def.options {
        Some(options) => Some((options.kind.to_u8(), encode_options(fbb, options)?)),
        None => None,
    };
    let inputs = fbb.create_vector(&def.inputs);
    let outputs = fbb.create_vector(&def.outputs);
    let custom_options = non_empty(fbb, &def.custom_options);
    let mutating = non_empty(fbb, &def.mutating_variable_inputs);
    let intermediates = non_empty(fbb, &def.intermediates);

    let mut table = TableWriter::start(fbb);
    table.scalar::<u32>(operator::OPCODE_INDEX, def.opcode_index, 0)?;
    table.offset(operator::INPUTS, inputs)?;
    table.offset(operator::OUTPUTS, outputs)?;
    if let Some((kind, options)) = options {
        table.scalar::<u8>(operator::BUILTIN_OPTIONS_TYPE, kind, 0)?;
        table.offset(operator::BUILTIN_OPTIONS, options)?;
    }
    table.optional_offset(operator::CUSTOM_OPTIONS, custom_options)?;
    table.optional_offset(operator::MUTATING_VARIABLE_INPUTS, mutating)?;
    table.optional_offset(operator::INTERMEDIATES, intermediates)?;
    Ok(table.finish())
}

/// Encode any options member from its field table
pub fn encode_options(fbb: &mut FlatBufferBuilder<'_>, def: &OptionsDef) -> Result<TableOffset> {
    let options = def.kind.name();

    let mut fields = Vec::with_capacity(def.values.len());
    for (name, value) in &def.values {
        let decl = def
            .kind
            .field(name)
            .ok_or_else(|| BuilderError::UnknownOptionField {
                options,
                field: name.clone(),
            })?;
        if !decl.kind.accepts(value) {
            return Err(BuilderError::OptionTypeMismatch {
                options,
                field: decl.name,
                value: format!("{:?}", value),
            });
        }
        fields.push((decl, value));
    }

    let vectors = fields
        .iter()
        .filter_map(|(decl, value)| match value {
            // Empty is the declared default, so it is omitted like any other default
            OptionValue::IntVector(items) if !items.is_empty() => {
                Some((decl.voffset(), fbb.create_vector(items)))
            }
            _ => None,
        })
        .collect::<Vec<_>>();

    let mut table = TableWriter::start(fbb);
    for (decl, value) in &fields {
        write_scalar_field(&mut table, options, decl, value)?;
    }
    for (voffset, vector) in vectors {
        table.offset(voffset, vector)?;
    }
    Ok(table.finish())
}

fn write_scalar_field(
    table: &mut TableWriter<'_, '_>,
    options: &'static str,
    decl: &FieldDecl,
    value: &OptionValue,
) -> Result<()> {
    let voffset = decl.voffset();
    let default_int = match decl.default {
        FieldDefault::Int(v) => v,
        _ => 0,
    };

    match (decl.kind, value) {
        (FieldKind::Bool, OptionValue::Bool(b)) => {
            table.scalar(voffset, *b, decl.default == FieldDefault::Bool(true))
        }
        (FieldKind::Int8, OptionValue::Int(v)) => {
            table.scalar::<i8>(voffset, narrow(decl, *v)?, default_int as i8)
        }
        (FieldKind::Int32, OptionValue::Int(v)) => {
            table.scalar::<i32>(voffset, narrow(decl, *v)?, default_int as i32)
        }
        (FieldKind::UInt32, OptionValue::Int(v)) => {
            table.scalar::<u32>(voffset, narrow(decl, *v)?, default_int as u32)
        }
        (FieldKind::Int64, OptionValue::Int(v)) => table.scalar::<i64>(voffset, *v, default_int),
        (FieldKind::Float32, OptionValue::Float(v)) => {
            let default = match decl.default {
                FieldDefault::Float(d) => d,
                _ => 0.0,
            };
            table.scalar::<f32>(voffset, *v, default)
        }
        (FieldKind::Enum(_), OptionValue::Enum(v)) => table.scalar::<i8>(voffset, *v, default_int as i8),
        // Omitted when empty but still claimed; otherwise written after the scalars
        (FieldKind::IntVector, OptionValue::IntVector(items)) if items.is_empty() => table.claim(voffset),
        (FieldKind::IntVector, OptionValue::IntVector(_)) => Ok(()),
        _ => Err(BuilderError::OptionTypeMismatch {
            options,
            field: decl.name,
            value: format!("{:?}", value),
        }),
    }
}

fn narrow<T: TryFrom<i64>>(decl: &FieldDecl, value: i64) -> Result<T> {
    T::try_from(value).map_err(|_| BuilderError::ValueOutOfRange {
        field: decl.name,
        value,
    })
}

fn encode_buffer(fbb: &mut FlatBufferBuilder<'_>, def: &BufferDef) -> Result<TableOffset> {
    let data = non_empty(fbb, &def.data);

    let mut table = TableWriter::start(fbb);
    table.optional_offset(buffer::DATA, data)?;
    table.scalar::<u64>(buffer::OFFSET, def.offset, 0)?;
    table.scalar::<u64>(buffer::SIZE, def.size, 0)?;
    Ok(table.finish())
}

fn encode_metadata(fbb: &mut FlatBufferBuilder<'_>, def: &MetadataDef) -> Result<TableOffset> {
    let name = fbb.create_string(&def.name);

    let mut table = TableWriter::start(fbb);
    table.offset(metadata::NAME, name)?;
    table.scalar::<u32>(metadata::BUFFER, def.buffer, 0)?;
    Ok(table.finish())
}

fn encode_signature_def(fbb: &mut FlatBufferBuilder<'_>, def: &SignatureDef) -> Result<TableOffset> {
    let inputs = encode_tensor_maps(fbb, &def.inputs)?;
    let outputs = encode_tensor_maps(fbb, &def.outputs)?;
    let key = def.signature_key.as_deref().map(|k| fbb.create_string(k));

    let mut table = TableWriter::start(fbb);
    table.offset(signature_def::INPUTS, inputs)?;
    table.offset(signature_def::OUTPUTS, outputs)?;
    table.optional_offset(signature_def::SIGNATURE_KEY, key)?;
    table.scalar::<u32>(signature_def::SUBGRAPH_INDEX, def.subgraph_index, 0)?;
    Ok(table.finish())
}

fn encode_tensor_maps<'fbb>(
    fbb: &mut FlatBufferBuilder<'fbb>,
    maps: &[TensorMapDef],
) -> Result<WIPOffset<flatbuffers::Vector<'fbb, flatbuffers::ForwardsUOffset<flatbuffers::TableFinishedWIPOffset>>>> {
    let mut offsets = Vec::with_capacity(maps.len());
    for map in maps {
        let name = fbb.create_string(&map.name);
        let mut table = TableWriter::start(fbb);
        table.offset(tensor_map::NAME, name)?;
        table.scalar::<u32>(tensor_map::TENSOR_INDEX, map.tensor_index, 0)?;
        offsets.push(table.finish());
    }
    Ok(fbb.create_vector(&offsets))
}

/// Vector offset, `None` for an empty slice so the field stays absent
fn non_empty<'fbb, T>(
    fbb: &mut FlatBufferBuilder<'fbb>,
    items: &[T],
) -> Option<WIPOffset<flatbuffers::Vector<'fbb, T::Output>>>
where
    T: flatbuffers::Push + Copy,
{
    (!items.is_empty()).then(|| fbb.create_vector(items))
}
