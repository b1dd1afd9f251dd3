//! # Tensor Element Types
//!
//! `TensorType` is stored as a signed byte in `Tensor.type` and in the
//! type-valued fields of a few options tables (Cast, ArgMax, Shape, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tensor element type
#[repr(i8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TensorType {
    Float32 = 0,
    Float16 = 1,
    Int32 = 2,
    UInt8 = 3,
    Int64 = 4,
    String = 5,
    Bool = 6,
    Int16 = 7,
    Complex64 = 8,
    Int8 = 9,
    Float64 = 10,
    Complex128 = 11,
    UInt64 = 12,
    Resource = 13,
    Variant = 14,
    UInt32 = 15,
    UInt16 = 16,
    Int4 = 17,
}

/// Schema names in discriminant order
pub const TENSOR_TYPE_NAMES: &[&str] = &[
    "FLOAT32",
    "FLOAT16",
    "INT32",
    "UINT8",
    "INT64",
    "STRING",
    "BOOL",
    "INT16",
    "COMPLEX64",
    "INT8",
    "FLOAT64",
    "COMPLEX128",
    "UINT64",
    "RESOURCE",
    "VARIANT",
    "UINT32",
    "UINT16",
    "INT4",
];

impl TensorType {
    /// Try to convert from the raw schema byte
    pub fn from_i8(value: i8) -> Option<Self> {
        match value {
            0 => Some(TensorType::Float32),
            1 => Some(TensorType::Float16),
            2 => Some(TensorType::Int32),
            3 => Some(TensorType::UInt8),
            4 => Some(TensorType::Int64),
            5 => Some(TensorType::String),
            6 => Some(TensorType::Bool),
            7 => Some(TensorType::Int16),
            8 => Some(TensorType::Complex64),
            9 => Some(TensorType::Int8),
            10 => Some(TensorType::Float64),
            11 => Some(TensorType::Complex128),
            12 => Some(TensorType::UInt64),
            13 => Some(TensorType::Resource),
            14 => Some(TensorType::Variant),
            15 => Some(TensorType::UInt32),
            16 => Some(TensorType::UInt16),
            17 => Some(TensorType::Int4),
            _ => None,
        }
    }

    /// Raw schema byte
    #[inline]
    pub const fn to_i8(self) -> i8 {
        self as i8
    }

    /// Schema name (e.g. "FLOAT32")
    pub fn name(self) -> &'static str {
        TENSOR_TYPE_NAMES[self as usize]
    }

    /// Size of one element in bytes, `None` for variable-size or sub-byte types
    pub const fn element_size(self) -> Option<usize> {
        match self {
            TensorType::Bool | TensorType::Int8 | TensorType::UInt8 => Some(1),
            TensorType::Float16 | TensorType::Int16 | TensorType::UInt16 => Some(2),
            TensorType::Float32 | TensorType::Int32 | TensorType::UInt32 => Some(4),
            TensorType::Float64
            | TensorType::Int64
            | TensorType::UInt64
            | TensorType::Complex64 => Some(8),
            TensorType::Complex128 => Some(16),
            TensorType::String
            | TensorType::Resource
            | TensorType::Variant
            | TensorType::Int4 => None,
        }
    }
}

impl Default for TensorType {
    fn default() -> Self {
        TensorType::Float32
    }
}

impl fmt::Display for TensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Circle-only subgraph data layout
#[repr(i8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataFormat {
    /// NHWC
    ChannelsLast = 0,
    /// NCHW
    ChannelsFirst = 1,
}

impl DataFormat {
    pub fn from_i8(value: i8) -> Option<Self> {
        match value {
            0 => Some(DataFormat::ChannelsLast),
            1 => Some(DataFormat::ChannelsFirst),
            _ => None,
        }
    }

    #[inline]
    pub const fn to_i8(self) -> i8 {
        self as i8
    }

    pub fn name(self) -> &'static str {
        match self {
            DataFormat::ChannelsLast => "CHANNELS_LAST",
            DataFormat::ChannelsFirst => "CHANNELS_FIRST",
        }
    }
}

impl Default for DataFormat {
    fn default() -> Self {
        DataFormat::ChannelsLast
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
