//! Model decoder: framing checks and root resolution

use crate::buffer::ByteBuffer;
use crate::config::DecoderConfig;
use crate::error::{ReaderError, Result};
use crate::model::Model;
use crate::subgraph::SubGraph;
use crate::table::Table;
use circle_schema::{FILE_IDENTIFIER_LENGTH, OFFSET_SIZE, SIZE_PREFIX_LENGTH};
use tracing::debug;

/// Decode a circle model with the default configuration
pub fn decode(bytes: &[u8]) -> Result<Model<'_>> {
    decode_with(bytes, &DecoderConfig::DEFAULT)
}

/// Decode a model
///
/// Checks run in order: header length, file identifier, size prefix, root
/// table. On an identifier mismatch nothing else is parsed.
pub fn decode_with<'a>(bytes: &'a [u8], config: &DecoderConfig) -> Result<Model<'a>> {
    config.validate()?;

    let mut buf = ByteBuffer::new(bytes);
    if buf.len() < config.header_len() {
        return Err(ReaderError::out_of_bounds(0, config.header_len(), buf.len()));
    }

    let root_pos = config.root_offset_position();
    let identifier = buf.slice(root_pos + OFFSET_SIZE, FILE_IDENTIFIER_LENGTH)?;
    if identifier != config.identifier {
        return Err(ReaderError::InvalidIdentifier {
            expected: config.identifier_str(),
            found: String::from_utf8_lossy(identifier).into_owned(),
        });
    }

    if config.size_prefixed {
        let declared = buf.read_u32(0)? as usize;
        let total = declared
            .checked_add(SIZE_PREFIX_LENGTH)
            .ok_or_else(|| ReaderError::out_of_bounds(0, declared, buf.len()))?;
        buf = buf.truncate(total)?;
        if buf.len() < config.header_len() {
            return Err(ReaderError::out_of_bounds(0, config.header_len(), buf.len()));
        }
    }

    let root = buf.read_uoffset(root_pos)?;
    let table = Table::new(buf, root);
    let vtable = table.vtable()?;
    buf.slice(vtable, table.vtable_len()? as usize)?;

    let model = Model::new(table);
    debug!(
        root,
        vtable,
        len = buf.len(),
        identifier = %config.identifier_str(),
        "decoded model root"
    );

    if config.verify {
        verify(&model)?;
    }
    Ok(model)
}

/// Touch every field of every table reachable from the root
fn verify(model: &Model<'_>) -> Result<()> {
    model.version()?;
    model.description()?;
    model.metadata_buffer()?.to_vec()?;

    let codes = model.operator_codes()?;
    for code in codes {
        let code = code?;
        code.version()?;
        code.name()?;
    }

    let mut operators = 0;
    for subgraph in model.subgraphs()? {
        operators += verify_subgraph(model, &subgraph?)?;
    }

    for buffer in model.buffers()? {
        let buffer = buffer?;
        buffer.data()?;
        buffer.offset()?;
        buffer.size()?;
    }

    for entry in model.metadata()? {
        let entry = entry?;
        entry.name()?;
        entry.buffer()?;
    }

    for signature in model.signature_defs()? {
        let signature = signature?;
        signature.signature_key()?;
        signature.subgraph_index()?;
        for map in signature.inputs()?.iter().chain(signature.outputs()?.iter()) {
            let map = map?;
            map.name()?;
            map.tensor_index()?;
        }
    }

    debug!(
        subgraphs = model.subgraphs()?.len(),
        operator_codes = codes.len(),
        operators,
        "verified model"
    );
    Ok(())
}

fn verify_subgraph(model: &Model<'_>, subgraph: &SubGraph<'_>) -> Result<usize> {
    subgraph.name()?;
    subgraph.data_format()?;
    subgraph.inputs()?.to_vec()?;
    subgraph.outputs()?.to_vec()?;

    for tensor in subgraph.tensors()? {
        let tensor = tensor?;
        tensor.shape()?.to_vec()?;
        tensor.tensor_type()?;
        tensor.buffer()?;
        tensor.name()?;
        tensor.is_variable()?;
        tensor.shape_signature()?.to_vec()?;
        if let Some(quant) = tensor.quantization()? {
            quant.min()?.to_vec()?;
            quant.max()?.to_vec()?;
            quant.scale()?.to_vec()?;
            quant.zero_point()?.to_vec()?;
            quant.quantized_dimension()?;
        }
    }

    let operators = subgraph.operators()?;
    for op in operators {
        let op = op?;
        model.operator_code_of(&op)?;
        op.inputs()?.to_vec()?;
        op.outputs()?.to_vec()?;
        op.custom_options()?;
        op.custom_options_format()?;
        op.mutating_variable_inputs()?.to_vec()?;
        op.intermediates()?.to_vec()?;
        if let Some(options) = op.builtin_options()? {
            options.decode()?;
        }
    }
    Ok(operators.len())
}
