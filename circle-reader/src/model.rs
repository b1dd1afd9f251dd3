//! Model root and the small side tables

use crate::error::{ReaderError, Result};
use crate::operator::{Operator, OperatorCode};
use crate::subgraph::SubGraph;
use crate::table::{table_view, Vector};
use circle_schema::slots::{buffer, metadata, model, signature_def, tensor_map};
use std::borrow::Cow;

table_view! {
    /// Root `Model` table
    Model
}

impl<'a> Model<'a> {
    pub fn version(&self) -> Result<u32> {
        self.table.get(model::VERSION, 0)
    }

    pub fn operator_codes(&self) -> Result<Vector<'a, OperatorCode<'a>>> {
        self.table.get_vector_or_empty(model::OPERATOR_CODES)
    }

    pub fn subgraphs(&self) -> Result<Vector<'a, SubGraph<'a>>> {
        self.table.get_vector_or_empty(model::SUBGRAPHS)
    }

    pub fn description(&self) -> Result<Option<&'a str>> {
        self.table.get_str(model::DESCRIPTION)
    }

    pub fn buffers(&self) -> Result<Vector<'a, Buffer<'a>>> {
        self.table.get_vector_or_empty(model::BUFFERS)
    }

    /// Deprecated list of metadata buffer indices
    pub fn metadata_buffer(&self) -> Result<Vector<'a, i32>> {
        self.table.get_vector_or_empty(model::METADATA_BUFFER)
    }

    pub fn metadata(&self) -> Result<Vector<'a, Metadata<'a>>> {
        self.table.get_vector_or_empty(model::METADATA)
    }

    pub fn signature_defs(&self) -> Result<Vector<'a, SignatureDef<'a>>> {
        self.table.get_vector_or_empty(model::SIGNATURE_DEFS)
    }

    pub fn subgraph(&self, index: usize) -> Result<SubGraph<'a>> {
        checked_get(self.subgraphs()?, "subgraph", index)
    }

    pub fn operator_code(&self, index: usize) -> Result<OperatorCode<'a>> {
        checked_get(self.operator_codes()?, "operator code", index)
    }

    pub fn buffer(&self, index: usize) -> Result<Buffer<'a>> {
        checked_get(self.buffers()?, "buffer", index)
    }

    /// Operator code referenced by `op`
    pub fn operator_code_of(&self, op: &Operator<'_>) -> Result<OperatorCode<'a>> {
        self.operator_code(op.opcode_index()? as usize)
    }

    /// Resolved operator name of `op` (e.g. "CONV_2D")
    pub fn operator_name(&self, op: &Operator<'_>) -> Result<Cow<'a, str>> {
        self.operator_code_of(op)?.name()
    }

    /// Metadata entry called `name`
    pub fn metadata_by_name(&self, name: &str) -> Result<Option<Metadata<'a>>> {
        for entry in self.metadata()? {
            let entry = entry?;
            if entry.name()? == Some(name) {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }
}

fn checked_get<'a, T: crate::table::Follow<'a>>(
    vector: Vector<'a, T>,
    what: &'static str,
    index: usize,
) -> Result<T> {
    if index >= vector.len() {
        return Err(ReaderError::IndexOutOfRange {
            what,
            index,
            len: vector.len(),
        });
    }
    vector.get(index)
}

table_view! {
    /// `Buffer` table: raw constant data
    Buffer
}

impl<'a> Buffer<'a> {
    /// Inline bytes; empty for the sentinel buffer and for external data
    pub fn data(&self) -> Result<&'a [u8]> {
        Ok(self.table.get_vector_or_empty::<u8>(buffer::DATA)?.bytes())
    }

    /// Offset of externally stored data, 0 when inline
    pub fn offset(&self) -> Result<u64> {
        self.table.get(buffer::OFFSET, 0)
    }

    pub fn size(&self) -> Result<u64> {
        self.table.get(buffer::SIZE, 0)
    }
}

table_view! {
    /// `Metadata` table
    Metadata
}

impl<'a> Metadata<'a> {
    pub fn name(&self) -> Result<Option<&'a str>> {
        self.table.get_str(metadata::NAME)
    }

    pub fn buffer(&self) -> Result<u32> {
        self.table.get(metadata::BUFFER, 0)
    }
}

table_view! {
    /// `SignatureDef` table
    SignatureDef
}

impl<'a> SignatureDef<'a> {
    pub fn inputs(&self) -> Result<Vector<'a, TensorMap<'a>>> {
        self.table.get_vector_or_empty(signature_def::INPUTS)
    }

    pub fn outputs(&self) -> Result<Vector<'a, TensorMap<'a>>> {
        self.table.get_vector_or_empty(signature_def::OUTPUTS)
    }

    pub fn signature_key(&self) -> Result<Option<&'a str>> {
        self.table.get_str(signature_def::SIGNATURE_KEY)
    }

    pub fn subgraph_index(&self) -> Result<u32> {
        self.table.get(signature_def::SUBGRAPH_INDEX, 0)
    }
}

table_view! {
    /// `TensorMap` table
    TensorMap
}

impl<'a> TensorMap<'a> {
    pub fn name(&self) -> Result<Option<&'a str>> {
        self.table.get_str(tensor_map::NAME)
    }

    pub fn tensor_index(&self) -> Result<u32> {
        self.table.get(tensor_map::TENSOR_INDEX, 0)
    }
}
