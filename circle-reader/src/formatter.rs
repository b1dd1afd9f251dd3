//! Human-readable model listing

use crate::error::Result;
use crate::model::Model;
use crate::operator::Operator;
use crate::options::display_value;
use crate::subgraph::SubGraph;
use crate::table::{Follow, Vector};
use crate::tensor::Tensor;
use std::fmt::Display;

/// Render the whole model
pub fn format_model(model: &Model<'_>) -> Result<String> {
    let mut output = String::new();

    output.push_str(&format!("; circle model, schema version {}\n", model.version()?));
    if let Some(description) = model.description()? {
        output.push_str(&format!("; description: {}\n", description));
    }
    let subgraphs = model.subgraphs()?;
    output.push_str(&format!(
        "; {} subgraph(s), {} operator code(s), {} buffer(s)\n",
        subgraphs.len(),
        model.operator_codes()?.len(),
        model.buffers()?.len(),
    ));

    for entry in model.metadata()? {
        let entry = entry?;
        output.push_str(&format!(
            "; metadata {} -> buffer {}\n",
            entry.name()?.unwrap_or("<unnamed>"),
            entry.buffer()?
        ));
    }

    for (index, subgraph) in subgraphs.iter().enumerate() {
        output.push('\n');
        output.push_str(&format_subgraph(model, index, &subgraph?)?);
    }

    Ok(output)
}

/// Render one subgraph
pub fn format_subgraph(model: &Model<'_>, index: usize, subgraph: &SubGraph<'_>) -> Result<String> {
    let mut output = String::new();

    output.push_str(&format!(
        "subgraph #{} {:?} ({})\n",
        index,
        subgraph.name()?.unwrap_or(""),
        subgraph.data_format()?.name()
    ));
    output.push_str(&format!("  inputs: {}\n", format_vector(subgraph.inputs()?)?));
    output.push_str(&format!("  outputs: {}\n", format_vector(subgraph.outputs()?)?));

    output.push_str("  tensors:\n");
    for (i, tensor) in subgraph.tensors()?.iter().enumerate() {
        output.push_str(&format!("    #{:<4} {}\n", i, format_tensor(&tensor?)?));
    }

    output.push_str("  operators:\n");
    for (i, op) in subgraph.operators()?.iter().enumerate() {
        output.push_str(&format!("    #{:<4} {}\n", i, format_operator(model, &op?)?));
    }

    Ok(output)
}

/// One-line tensor summary
pub fn format_tensor(tensor: &Tensor<'_>) -> Result<String> {
    let mut line = format!(
        "{} {} {}",
        tensor.name()?.unwrap_or("<unnamed>"),
        tensor.tensor_type()?.name(),
        format_vector(tensor.shape()?)?
    );
    if tensor.buffer()? != 0 {
        line.push_str(&format!(" buffer={}", tensor.buffer()?));
    }
    if tensor.is_variable()? {
        line.push_str(" variable");
    }
    if let Some(quant) = tensor.quantization()? {
        let scale = quant.scale()?;
        if !scale.is_empty() {
            line.push_str(&format!(
                " scale={} zero_point={}",
                format_vector(scale)?,
                format_vector(quant.zero_point()?)?
            ));
        }
    }
    Ok(line)
}

/// One-line operator summary with its options
pub fn format_operator(model: &Model<'_>, op: &Operator<'_>) -> Result<String> {
    let code = model.operator_code_of(op)?;
    let mut line = format!(
        "{} (v{}) in={} out={}",
        code.name()?,
        code.version()?,
        format_vector(op.inputs()?)?,
        format_vector(op.outputs()?)?
    );

    if let Some(options) = op.builtin_options()? {
        let kind = options.kind();
        let mut fields = Vec::new();
        for decl in kind.fields() {
            let value = options.read_field(decl)?;
            fields.push(format!("{}={}", decl.name, display_value(decl, &value)));
        }
        if fields.is_empty() {
            line.push_str(&format!(" {}", kind));
        } else {
            line.push_str(&format!(" {}{{{}}}", kind, fields.join(", ")));
        }
    }

    let custom = op.custom_options()?;
    if !custom.is_empty() {
        line.push_str(&format!(" custom_options={}B", custom.len()));
    }
    Ok(line)
}

fn format_vector<'a, T: Follow<'a> + Display>(vector: Vector<'a, T>) -> Result<String> {
    let items = vector
        .iter()
        .map(|item| item.map(|v| v.to_string()))
        .collect::<Result<Vec<_>>>()?;
    Ok(format!("[{}]", items.join(", ")))
}
