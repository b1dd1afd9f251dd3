//! # Circle Schema
//!
//! Format-level definitions shared by the reader, the builder and the tracer.
//!
//! Circle is a FlatBuffers encoding of the TFLite model schema with a few
//! extra operators and a per-subgraph data format.
//!
//! ## Buffer Framing
//!
//! ```text
//! Offset  Size  Field
//! ──────────────────────────────────
//! 0x00    4     root table offset (u32, relative to 0x00)
//! 0x04    4     file identifier ("CIR0")
//! ```
//!
//! A size-prefixed buffer carries an extra `u32` length in front of both.

pub mod slots;
pub mod tensor_type;
pub mod opcode;
pub mod options;

pub use tensor_type::{DataFormat, TensorType};
pub use opcode::BuiltinOperator;
pub use options::{EnumDomain, FieldDecl, FieldDefault, FieldKind, OptionValue, OptionsKind};
pub use slots::{voffset, VOffset};

/// File identifier of circle models: "CIR0"
pub const FILE_IDENTIFIER: [u8; 4] = *b"CIR0";

/// File identifier of TFLite models: "TFL3"
pub const TFLITE_FILE_IDENTIFIER: [u8; 4] = *b"TFL3";

/// Length of the identifier field in bytes
pub const FILE_IDENTIFIER_LENGTH: usize = 4;

/// Length of the optional size prefix in bytes
pub const SIZE_PREFIX_LENGTH: usize = 4;

/// Size of a relative offset (`uoffset_t` / `soffset_t`)
pub const OFFSET_SIZE: usize = 4;

/// Size of a vtable entry (`voffset_t`)
pub const VOFFSET_SIZE: usize = 2;

/// Schema version written into `Model.version` by the builder
pub const SCHEMA_VERSION: u32 = 0;

/// Raw `deprecated_builtin_code` telling readers to use `builtin_code`
pub const PLACEHOLDER_FOR_GREATER_OP_CODES: i8 = 127;
