//! SubGraph reader

use crate::error::{ReaderError, Result};
use crate::operator::Operator;
use crate::table::{table_view, Vector};
use crate::tensor::Tensor;
use circle_schema::slots::sub_graph;
use circle_schema::DataFormat;
use tracing::warn;

table_view! {
    /// `SubGraph` table
    SubGraph
}

impl<'a> SubGraph<'a> {
    pub fn tensors(&self) -> Result<Vector<'a, Tensor<'a>>> {
        self.table.get_vector_or_empty(sub_graph::TENSORS)
    }

    /// Graph input tensor indices
    pub fn inputs(&self) -> Result<Vector<'a, i32>> {
        self.table.get_vector_or_empty(sub_graph::INPUTS)
    }

    /// Graph output tensor indices
    pub fn outputs(&self) -> Result<Vector<'a, i32>> {
        self.table.get_vector_or_empty(sub_graph::OUTPUTS)
    }

    /// Operators in execution order
    pub fn operators(&self) -> Result<Vector<'a, Operator<'a>>> {
        self.table.get_vector_or_empty(sub_graph::OPERATORS)
    }

    pub fn name(&self) -> Result<Option<&'a str>> {
        self.table.get_str(sub_graph::NAME)
    }

    pub fn data_format(&self) -> Result<DataFormat> {
        let raw: i8 = self.table.get(sub_graph::DATA_FORMAT, 0)?;
        DataFormat::from_i8(raw).ok_or(ReaderError::InvalidEnum {
            what: "DataFormat",
            value: raw as i64,
        })
    }

    pub fn tensor(&self, index: usize) -> Result<Tensor<'a>> {
        let tensors = self.tensors()?;
        if index >= tensors.len() {
            return Err(ReaderError::IndexOutOfRange {
                what: "tensor",
                index,
                len: tensors.len(),
            });
        }
        tensors.get(index)
    }

    /// Tensor referenced by an operator or graph index list
    ///
    /// `-1` (omitted optional input) yields `None`.
    pub fn tensor_at(&self, index: i32) -> Result<Option<Tensor<'a>>> {
        if index < 0 {
            return Ok(None);
        }
        self.tensor(index as usize).map(Some)
    }

    pub fn operator(&self, index: usize) -> Result<Operator<'a>> {
        let operators = self.operators()?;
        if index >= operators.len() {
            return Err(ReaderError::IndexOutOfRange {
                what: "operator",
                index,
                len: operators.len(),
            });
        }
        operators.get(index)
    }

    /// Index of the first tensor called `name`
    ///
    /// Names are not required to be unique; later duplicates are reported
    /// with a warning and ignored.
    pub fn tensor_index_by_name(&self, name: &str) -> Result<usize> {
        let matches = self.tensor_indices_by_name(name)?;
        match matches.as_slice() {
            [] => Err(ReaderError::NotFound {
                what: format!("tensor {:?}", name),
            }),
            [first] => Ok(*first),
            [first, rest @ ..] => {
                warn!(
                    tensor = name,
                    first = *first,
                    duplicates = rest.len(),
                    "tensor name is not unique, using the first match"
                );
                Ok(*first)
            }
        }
    }

    /// Indices of every tensor called `name`, in order
    pub fn tensor_indices_by_name(&self, name: &str) -> Result<Vec<usize>> {
        let mut matches = Vec::new();
        for (index, tensor) in self.tensors()?.iter().enumerate() {
            if tensor?.name()? == Some(name) {
                matches.push(index);
            }
        }
        Ok(matches)
    }
}
