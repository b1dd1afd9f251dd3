//! # Vtable Slot Table
//!
//! Byte offsets of every field inside its table's vtable.
//!
//! A vtable starts with two `u16` header entries (vtable length, table
//! length); slot `i` sits right after them, so its byte offset is `4 + 2 * i`.

/// Byte offset inside a vtable (`voffset_t`)
pub type VOffset = u16;

/// Vtable byte offset of field slot `slot`
#[inline]
pub const fn voffset(slot: u16) -> VOffset {
    4 + 2 * slot
}

/// Slot index of a vtable byte offset
///
/// `None` for offsets inside the vtable header or between slots.
#[inline]
pub const fn slot_of(voffset: VOffset) -> Option<u16> {
    if voffset < 4 || voffset % 2 != 0 {
        None
    } else {
        Some((voffset - 4) / 2)
    }
}

pub mod model {
    use super::{voffset, VOffset};

    pub const VERSION: VOffset = voffset(0);
    pub const OPERATOR_CODES: VOffset = voffset(1);
    pub const SUBGRAPHS: VOffset = voffset(2);
    pub const DESCRIPTION: VOffset = voffset(3);
    pub const BUFFERS: VOffset = voffset(4);
    pub const METADATA_BUFFER: VOffset = voffset(5);
    pub const METADATA: VOffset = voffset(6);
    pub const SIGNATURE_DEFS: VOffset = voffset(7);
}

pub mod sub_graph {
    use super::{voffset, VOffset};

    pub const TENSORS: VOffset = voffset(0);
    pub const INPUTS: VOffset = voffset(1);
    pub const OUTPUTS: VOffset = voffset(2);
    pub const OPERATORS: VOffset = voffset(3);
    pub const NAME: VOffset = voffset(4);
    /// Circle extension
    pub const DATA_FORMAT: VOffset = voffset(5);
}

pub mod tensor {
    use super::{voffset, VOffset};

    pub const SHAPE: VOffset = voffset(0);
    pub const TYPE: VOffset = voffset(1);
    pub const BUFFER: VOffset = voffset(2);
    pub const NAME: VOffset = voffset(3);
    pub const QUANTIZATION: VOffset = voffset(4);
    pub const IS_VARIABLE: VOffset = voffset(5);
    pub const SPARSITY: VOffset = voffset(6);
    pub const SHAPE_SIGNATURE: VOffset = voffset(7);
}

pub mod quantization {
    use super::{voffset, VOffset};

    pub const MIN: VOffset = voffset(0);
    pub const MAX: VOffset = voffset(1);
    pub const SCALE: VOffset = voffset(2);
    pub const ZERO_POINT: VOffset = voffset(3);
    pub const DETAILS_TYPE: VOffset = voffset(4);
    pub const DETAILS: VOffset = voffset(5);
    pub const QUANTIZED_DIMENSION: VOffset = voffset(6);
}

pub mod operator_code {
    use super::{voffset, VOffset};

    pub const DEPRECATED_BUILTIN_CODE: VOffset = voffset(0);
    pub const CUSTOM_CODE: VOffset = voffset(1);
    pub const VERSION: VOffset = voffset(2);
    pub const BUILTIN_CODE: VOffset = voffset(3);
}

pub mod operator {
    use super::{voffset, VOffset};

    pub const OPCODE_INDEX: VOffset = voffset(0);
    pub const INPUTS: VOffset = voffset(1);
    pub const OUTPUTS: VOffset = voffset(2);
    /// Union discriminant, stored one slot before the union value
    pub const BUILTIN_OPTIONS_TYPE: VOffset = voffset(3);
    pub const BUILTIN_OPTIONS: VOffset = voffset(4);
    pub const CUSTOM_OPTIONS: VOffset = voffset(5);
    pub const CUSTOM_OPTIONS_FORMAT: VOffset = voffset(6);
    pub const MUTATING_VARIABLE_INPUTS: VOffset = voffset(7);
    pub const INTERMEDIATES: VOffset = voffset(8);
}

pub mod buffer {
    use super::{voffset, VOffset};

    pub const DATA: VOffset = voffset(0);
    pub const OFFSET: VOffset = voffset(1);
    pub const SIZE: VOffset = voffset(2);
}

pub mod metadata {
    use super::{voffset, VOffset};

    pub const NAME: VOffset = voffset(0);
    pub const BUFFER: VOffset = voffset(1);
}

pub mod signature_def {
    use super::{voffset, VOffset};

    pub const INPUTS: VOffset = voffset(0);
    pub const OUTPUTS: VOffset = voffset(1);
    pub const SIGNATURE_KEY: VOffset = voffset(2);
    /// Slot 3 (`deprecated_tag`) is never read
    pub const SUBGRAPH_INDEX: VOffset = voffset(4);
}

pub mod tensor_map {
    use super::{voffset, VOffset};

    pub const NAME: VOffset = voffset(0);
    pub const TENSOR_INDEX: VOffset = voffset(1);
}
