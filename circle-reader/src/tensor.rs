//! Tensor and quantization readers

use crate::error::{ReaderError, Result};
use crate::table::{table_view, Vector};
use circle_schema::slots::{quantization, tensor};
use circle_schema::TensorType;

table_view! {
    /// `Tensor` table
    Tensor
}

impl<'a> Tensor<'a> {
    /// Dimensions; `-1` marks a dynamic dimension
    pub fn shape(&self) -> Result<Vector<'a, i32>> {
        self.table.get_vector_or_empty(tensor::SHAPE)
    }

    /// Element type; unknown discriminants are an error
    pub fn tensor_type(&self) -> Result<TensorType> {
        let raw = self.tensor_type_raw()?;
        TensorType::from_i8(raw).ok_or(ReaderError::InvalidEnum {
            what: "TensorType",
            value: raw as i64,
        })
    }

    /// Element type byte as stored
    pub fn tensor_type_raw(&self) -> Result<i8> {
        self.table.get(tensor::TYPE, TensorType::Float32.to_i8())
    }

    /// Index into `Model.buffers`; 0 is the empty sentinel buffer
    pub fn buffer(&self) -> Result<u32> {
        self.table.get(tensor::BUFFER, 0)
    }

    pub fn name(&self) -> Result<Option<&'a str>> {
        self.table.get_str(tensor::NAME)
    }

    pub fn quantization(&self) -> Result<Option<QuantizationParameters<'a>>> {
        Ok(self
            .table
            .get_table(tensor::QUANTIZATION)?
            .map(QuantizationParameters::new))
    }

    pub fn is_variable(&self) -> Result<bool> {
        self.table.get(tensor::IS_VARIABLE, false)
    }

    /// True if a sparsity table is attached (its contents are not decoded)
    pub fn has_sparsity(&self) -> Result<bool> {
        self.table.has_field(tensor::SPARSITY)
    }

    pub fn shape_signature(&self) -> Result<Vector<'a, i32>> {
        self.table.get_vector_or_empty(tensor::SHAPE_SIGNATURE)
    }

    /// Number of elements, `None` if any dimension is dynamic
    pub fn element_count(&self) -> Result<Option<u64>> {
        let mut count: u64 = 1;
        for dim in self.shape()? {
            let dim = dim?;
            if dim < 0 {
                return Ok(None);
            }
            count = match count.checked_mul(dim as u64) {
                Some(count) => count,
                None => return Ok(None),
            };
        }
        Ok(Some(count))
    }
}

table_view! {
    /// `QuantizationParameters` table
    QuantizationParameters
}

impl<'a> QuantizationParameters<'a> {
    pub fn min(&self) -> Result<Vector<'a, f32>> {
        self.table.get_vector_or_empty(quantization::MIN)
    }

    pub fn max(&self) -> Result<Vector<'a, f32>> {
        self.table.get_vector_or_empty(quantization::MAX)
    }

    pub fn scale(&self) -> Result<Vector<'a, f32>> {
        self.table.get_vector_or_empty(quantization::SCALE)
    }

    pub fn zero_point(&self) -> Result<Vector<'a, i64>> {
        self.table.get_vector_or_empty(quantization::ZERO_POINT)
    }

    /// Raw `details_type` discriminant (custom quantization is not decoded)
    pub fn details_type(&self) -> Result<u8> {
        self.table.get(quantization::DETAILS_TYPE, 0)
    }

    pub fn quantized_dimension(&self) -> Result<i32> {
        self.table.get(quantization::QUANTIZED_DIMENSION, 0)
    }
}
