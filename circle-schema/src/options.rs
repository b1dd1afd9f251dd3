//! # Builtin Options Field Tables
//!
//! Every `Operator.builtin_options` union member is described by a static
//! list of [`FieldDecl`]s. The reader decodes any member with one generic
//! routine driven by these lists, and the builder encodes with the same
//! lists, so both sides agree on slots, widths and defaults.
//!
//! Discriminants follow the TFLite `BuiltinOptions` union; circle appends
//! its own members at 252-254.

use crate::slots::{voffset, VOffset};
use crate::tensor_type::TENSOR_TYPE_NAMES;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Enum Domains
// ============================================================================

/// Names of a byte-sized schema enum, indexed by value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnumDomain {
    pub name: &'static str,
    pub variants: &'static [&'static str],
}

impl EnumDomain {
    /// Schema name of `value`, `None` if out of range
    pub fn variant_name(&self, value: i8) -> Option<&'static str> {
        usize::try_from(value)
            .ok()
            .and_then(|idx| self.variants.get(idx).copied())
    }
}

pub const PADDING: EnumDomain = EnumDomain {
    name: "Padding",
    variants: &["SAME", "VALID"],
};

pub const ACTIVATION: EnumDomain = EnumDomain {
    name: "ActivationFunctionType",
    variants: &["NONE", "RELU", "RELU_N1_TO_1", "RELU6", "TANH", "SIGN_BIT"],
};

pub const LSH_PROJECTION_TYPE: EnumDomain = EnumDomain {
    name: "LSHProjectionType",
    variants: &["UNKNOWN", "SPARSE", "DENSE"],
};

pub const WEIGHTS_FORMAT: EnumDomain = EnumDomain {
    name: "FullyConnectedOptionsWeightsFormat",
    variants: &["DEFAULT", "SHUFFLED4x16INT8"],
};

pub const LSTM_KERNEL_TYPE: EnumDomain = EnumDomain {
    name: "LSTMKernelType",
    variants: &["FULL", "BASIC"],
};

pub const COMBINER_TYPE: EnumDomain = EnumDomain {
    name: "CombinerType",
    variants: &["SUM", "MEAN", "SQRTN"],
};

pub const MIRROR_PAD_MODE: EnumDomain = EnumDomain {
    name: "MirrorPadMode",
    variants: &["REFLECT", "SYMMETRIC"],
};

pub const TENSOR_TYPE: EnumDomain = EnumDomain {
    name: "TensorType",
    variants: TENSOR_TYPE_NAMES,
};

// ============================================================================
// Field Declarations
// ============================================================================

/// Wire type of one options field
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    Int8,
    Int32,
    UInt32,
    Int64,
    Float32,
    /// Byte-sized enum
    Enum(&'static EnumDomain),
    /// Offset to a `[int]` vector
    IntVector,
}

impl FieldKind {
    /// Inline payload width in bytes
    pub const fn width(&self) -> usize {
        match self {
            FieldKind::Bool | FieldKind::Int8 | FieldKind::Enum(_) => 1,
            FieldKind::Int32 | FieldKind::UInt32 | FieldKind::Float32 | FieldKind::IntVector => 4,
            FieldKind::Int64 => 8,
        }
    }

    /// True if `value` can be stored in a field of this kind
    pub fn accepts(&self, value: &OptionValue) -> bool {
        matches!(
            (self, value),
            (FieldKind::Bool, OptionValue::Bool(_))
                | (FieldKind::Int8, OptionValue::Int(_))
                | (FieldKind::Int32, OptionValue::Int(_))
                | (FieldKind::UInt32, OptionValue::Int(_))
                | (FieldKind::Int64, OptionValue::Int(_))
                | (FieldKind::Float32, OptionValue::Float(_))
                | (FieldKind::Enum(_), OptionValue::Enum(_))
                | (FieldKind::IntVector, OptionValue::IntVector(_))
        )
    }
}

/// Declared default of a field
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldDefault {
    Bool(bool),
    Int(i64),
    Float(f32),
    /// Vectors default to empty
    Empty,
}

/// One field of an options table
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldDecl {
    pub name: &'static str,
    pub slot: u16,
    pub kind: FieldKind,
    pub default: FieldDefault,
}

impl FieldDecl {
    /// Vtable byte offset of this field
    #[inline]
    pub const fn voffset(&self) -> VOffset {
        voffset(self.slot)
    }

    /// Value a reader reports when the field is absent
    pub fn default_value(&self) -> OptionValue {
        match (self.kind, self.default) {
            (FieldKind::IntVector, _) | (_, FieldDefault::Empty) => OptionValue::IntVector(Vec::new()),
            (FieldKind::Enum(_), FieldDefault::Int(v)) => OptionValue::Enum(v as i8),
            (_, FieldDefault::Bool(b)) => OptionValue::Bool(b),
            (_, FieldDefault::Int(v)) => OptionValue::Int(v),
            (_, FieldDefault::Float(v)) => OptionValue::Float(v),
        }
    }
}

/// Decoded value of an options field
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f32),
    Enum(i8),
    IntVector(Vec<i32>),
}

impl OptionValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer payload; enum fields report their raw value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            OptionValue::Int(v) => Some(*v),
            OptionValue::Enum(v) => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            OptionValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int_vector(&self) -> Option<&[i32]> {
        match self {
            OptionValue::IntVector(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Int(v) => write!(f, "{}", v),
            OptionValue::Float(v) => write!(f, "{}", v),
            OptionValue::Enum(v) => write!(f, "{}", v),
            OptionValue::IntVector(v) => write!(f, "{:?}", v),
        }
    }
}

const fn decl(name: &'static str, slot: u16, kind: FieldKind, default: FieldDefault) -> FieldDecl {
    FieldDecl { name, slot, kind, default }
}

const fn boolean(name: &'static str, slot: u16) -> FieldDecl {
    decl(name, slot, FieldKind::Bool, FieldDefault::Bool(false))
}

const fn int32(name: &'static str, slot: u16) -> FieldDecl {
    decl(name, slot, FieldKind::Int32, FieldDefault::Int(0))
}

const fn float32(name: &'static str, slot: u16) -> FieldDecl {
    decl(name, slot, FieldKind::Float32, FieldDefault::Float(0.0))
}

const fn enum8(name: &'static str, slot: u16, domain: &'static EnumDomain) -> FieldDecl {
    decl(name, slot, FieldKind::Enum(domain), FieldDefault::Int(0))
}

const fn int_vector(name: &'static str, slot: u16) -> FieldDecl {
    decl(name, slot, FieldKind::IntVector, FieldDefault::Empty)
}

const fn activation(slot: u16) -> FieldDecl {
    enum8("fused_activation_function", slot, &ACTIVATION)
}

const fn padding(slot: u16) -> FieldDecl {
    enum8("padding", slot, &PADDING)
}

// ============================================================================
// Per-Member Tables
// ============================================================================

const EMPTY: &[FieldDecl] = &[];

const CONV_2D: &[FieldDecl] = &[
    padding(0),
    int32("stride_w", 1),
    int32("stride_h", 2),
    activation(3),
    decl("dilation_w_factor", 4, FieldKind::Int32, FieldDefault::Int(1)),
    decl("dilation_h_factor", 5, FieldKind::Int32, FieldDefault::Int(1)),
];

const DEPTHWISE_CONV_2D: &[FieldDecl] = &[
    padding(0),
    int32("stride_w", 1),
    int32("stride_h", 2),
    int32("depth_multiplier", 3),
    activation(4),
    decl("dilation_w_factor", 5, FieldKind::Int32, FieldDefault::Int(1)),
    decl("dilation_h_factor", 6, FieldKind::Int32, FieldDefault::Int(1)),
];

const CONCAT_EMBEDDINGS: &[FieldDecl] = &[
    int32("num_channels", 0),
    int_vector("num_columns_per_channel", 1),
    int_vector("embedding_dim_per_channel", 2),
];

const LSH_PROJECTION: &[FieldDecl] = &[enum8("type", 0, &LSH_PROJECTION_TYPE)];

const POOL_2D: &[FieldDecl] = &[
    padding(0),
    int32("stride_w", 1),
    int32("stride_h", 2),
    int32("filter_width", 3),
    int32("filter_height", 4),
    activation(5),
];

const SVDF: &[FieldDecl] = &[
    int32("rank", 0),
    activation(1),
    boolean("asymmetric_quantize_inputs", 2),
];

const RNN: &[FieldDecl] = &[activation(0), boolean("asymmetric_quantize_inputs", 1)];

const FULLY_CONNECTED: &[FieldDecl] = &[
    activation(0),
    enum8("weights_format", 1, &WEIGHTS_FORMAT),
    boolean("keep_num_dims", 2),
    boolean("asymmetric_quantize_inputs", 3),
];

const SOFTMAX: &[FieldDecl] = &[float32("beta", 0)];

const CONCATENATION: &[FieldDecl] = &[int32("axis", 0), activation(1)];

const ADD_SUB: &[FieldDecl] = &[
    activation(0),
    decl("pot_scale_int16", 1, FieldKind::Bool, FieldDefault::Bool(true)),
];

const ACTIVATION_ONLY: &[FieldDecl] = &[activation(0)];

const LOCAL_RESPONSE_NORMALIZATION: &[FieldDecl] = &[
    int32("radius", 0),
    float32("bias", 1),
    float32("alpha", 2),
    float32("beta", 3),
];

const LSTM: &[FieldDecl] = &[
    activation(0),
    float32("cell_clip", 1),
    float32("proj_clip", 2),
    enum8("kernel_type", 3, &LSTM_KERNEL_TYPE),
    boolean("asymmetric_quantize_inputs", 4),
];

const RESIZE_BILINEAR: &[FieldDecl] = &[
    int32("new_height", 0),
    int32("new_width", 1),
    boolean("align_corners", 2),
    boolean("half_pixel_centers", 3),
];

const CALL: &[FieldDecl] = &[decl("subgraph", 0, FieldKind::UInt32, FieldDefault::Int(0))];

const RESHAPE: &[FieldDecl] = &[int_vector("new_shape", 0)];

const SKIP_GRAM: &[FieldDecl] = &[
    int32("ngram_size", 0),
    int32("max_skip_size", 1),
    boolean("include_all_ngrams", 2),
];

const BLOCK_SIZE: &[FieldDecl] = &[int32("block_size", 0)];

const EMBEDDING_LOOKUP_SPARSE: &[FieldDecl] = &[enum8("combiner", 0, &COMBINER_TYPE)];

const GATHER: &[FieldDecl] = &[int32("axis", 0), int32("batch_dims", 1)];

const REDUCER: &[FieldDecl] = &[boolean("keep_dims", 0)];

const SQUEEZE: &[FieldDecl] = &[int_vector("squeeze_dims", 0)];

const SEQUENCE_RNN: &[FieldDecl] = &[
    boolean("time_major", 0),
    activation(1),
    boolean("asymmetric_quantize_inputs", 2),
];

const STRIDED_SLICE: &[FieldDecl] = &[
    int32("begin_mask", 0),
    int32("end_mask", 1),
    int32("ellipsis_mask", 2),
    int32("new_axis_mask", 3),
    int32("shrink_axis_mask", 4),
];

const NUM_SPLITS: &[FieldDecl] = &[int32("num_splits", 0)];

const CAST: &[FieldDecl] = &[
    enum8("in_data_type", 0, &TENSOR_TYPE),
    enum8("out_data_type", 1, &TENSOR_TYPE),
];

const OUTPUT_TYPE: &[FieldDecl] = &[enum8("output_type", 0, &TENSOR_TYPE)];

const TRANSPOSE_CONV: &[FieldDecl] = &[
    padding(0),
    int32("stride_w", 1),
    int32("stride_h", 2),
    activation(3),
];

const SPARSE_TO_DENSE: &[FieldDecl] = &[boolean("validate_indices", 0)];

const SHAPE: &[FieldDecl] = &[enum8("out_type", 0, &TENSOR_TYPE)];

const FAKE_QUANT: &[FieldDecl] = &[
    float32("min", 0),
    float32("max", 1),
    int32("num_bits", 2),
    boolean("narrow_range", 3),
];

const PACK: &[FieldDecl] = &[int32("values_count", 0), int32("axis", 1)];

const AXIS: &[FieldDecl] = &[int32("axis", 0)];

const UNPACK: &[FieldDecl] = &[int32("num", 0), int32("axis", 1)];

const BIDIRECTIONAL_SEQUENCE_LSTM: &[FieldDecl] = &[
    activation(0),
    float32("cell_clip", 1),
    float32("proj_clip", 2),
    boolean("merge_outputs", 3),
    decl("time_major", 4, FieldKind::Bool, FieldDefault::Bool(true)),
    boolean("asymmetric_quantize_inputs", 5),
];

const BIDIRECTIONAL_SEQUENCE_RNN: &[FieldDecl] = &[
    boolean("time_major", 0),
    activation(1),
    boolean("merge_outputs", 2),
    boolean("asymmetric_quantize_inputs", 3),
];

const UNIDIRECTIONAL_SEQUENCE_LSTM: &[FieldDecl] = &[
    activation(0),
    float32("cell_clip", 1),
    float32("proj_clip", 2),
    boolean("time_major", 3),
    boolean("asymmetric_quantize_inputs", 4),
];

const RESIZE_NEAREST_NEIGHBOR: &[FieldDecl] = &[
    boolean("align_corners", 0),
    boolean("half_pixel_centers", 1),
];

const LEAKY_RELU: &[FieldDecl] = &[float32("alpha", 0)];

const MIRROR_PAD: &[FieldDecl] = &[enum8("mode", 0, &MIRROR_PAD_MODE)];

const UNIQUE: &[FieldDecl] = &[decl(
    "idx_out_type",
    0,
    FieldKind::Enum(&TENSOR_TYPE),
    FieldDefault::Int(2),
)];

const REVERSE_SEQUENCE: &[FieldDecl] = &[int32("seq_dim", 0), int32("batch_dim", 1)];

const IF: &[FieldDecl] = &[
    int32("then_subgraph_index", 0),
    int32("else_subgraph_index", 1),
];

const WHILE: &[FieldDecl] = &[
    int32("cond_subgraph_index", 0),
    int32("body_subgraph_index", 1),
];

const BATCH_MATMUL: &[FieldDecl] = &[boolean("adjoint_lhs", 0), boolean("adjoint_rhs", 1)];

const BCQ_GATHER: &[FieldDecl] = &[int32("input_hidden_size", 0), int32("axis", 1)];

const BCQ_FULLY_CONNECTED: &[FieldDecl] = &[int32("weights_hidden_size", 0), activation(1)];

const INSTANCE_NORM: &[FieldDecl] = &[float32("epsilon", 0), activation(1)];

// ============================================================================
// Union Discriminant
// ============================================================================

macro_rules! options_kinds {
    ($( $value:literal => $variant:ident($fields:expr) ),* $(,)?) => {
        /// `Operator.builtin_options_type` discriminant
        #[repr(u8)]
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum OptionsKind {
            #[default]
            None = 0,
            $( $variant = $value, )*
        }

        impl OptionsKind {
            /// Every member except `None`, in discriminant order
            pub const ALL: &'static [OptionsKind] = &[ $( OptionsKind::$variant, )* ];

            /// Try to convert from the raw discriminant byte
            pub fn from_u8(value: u8) -> Option<Self> {
                match value {
                    0 => Some(OptionsKind::None),
                    $( $value => Some(OptionsKind::$variant), )*
                    _ => None,
                }
            }

            /// Schema table name (e.g. "BatchMatMulOptions")
            pub fn name(self) -> &'static str {
                match self {
                    OptionsKind::None => "NONE",
                    $( OptionsKind::$variant => stringify!($variant), )*
                }
            }

            /// Field table of this member
            pub fn fields(self) -> &'static [FieldDecl] {
                match self {
                    OptionsKind::None => EMPTY,
                    $( OptionsKind::$variant => $fields, )*
                }
            }
        }
    };
}

options_kinds! {
    1 => Conv2DOptions(CONV_2D),
    2 => DepthwiseConv2DOptions(DEPTHWISE_CONV_2D),
    3 => ConcatEmbeddingsOptions(CONCAT_EMBEDDINGS),
    4 => LSHProjectionOptions(LSH_PROJECTION),
    5 => Pool2DOptions(POOL_2D),
    6 => SVDFOptions(SVDF),
    7 => RNNOptions(RNN),
    8 => FullyConnectedOptions(FULLY_CONNECTED),
    9 => SoftmaxOptions(SOFTMAX),
    10 => ConcatenationOptions(CONCATENATION),
    11 => AddOptions(ADD_SUB),
    12 => L2NormOptions(ACTIVATION_ONLY),
    13 => LocalResponseNormalizationOptions(LOCAL_RESPONSE_NORMALIZATION),
    14 => LSTMOptions(LSTM),
    15 => ResizeBilinearOptions(RESIZE_BILINEAR),
    16 => CallOptions(CALL),
    17 => ReshapeOptions(RESHAPE),
    18 => SkipGramOptions(SKIP_GRAM),
    19 => SpaceToDepthOptions(BLOCK_SIZE),
    20 => EmbeddingLookupSparseOptions(EMBEDDING_LOOKUP_SPARSE),
    21 => MulOptions(ACTIVATION_ONLY),
    22 => PadOptions(EMPTY),
    23 => GatherOptions(GATHER),
    24 => BatchToSpaceNDOptions(EMPTY),
    25 => SpaceToBatchNDOptions(EMPTY),
    26 => TransposeOptions(EMPTY),
    27 => ReducerOptions(REDUCER),
    28 => SubOptions(ADD_SUB),
    29 => DivOptions(ACTIVATION_ONLY),
    30 => SqueezeOptions(SQUEEZE),
    31 => SequenceRNNOptions(SEQUENCE_RNN),
    32 => StridedSliceOptions(STRIDED_SLICE),
    33 => ExpOptions(EMPTY),
    34 => TopKV2Options(EMPTY),
    35 => SplitOptions(NUM_SPLITS),
    36 => LogSoftmaxOptions(EMPTY),
    37 => CastOptions(CAST),
    38 => DequantizeOptions(EMPTY),
    39 => MaximumMinimumOptions(EMPTY),
    40 => ArgMaxOptions(OUTPUT_TYPE),
    41 => LessOptions(EMPTY),
    42 => NegOptions(EMPTY),
    43 => PadV2Options(EMPTY),
    44 => GreaterOptions(EMPTY),
    45 => GreaterEqualOptions(EMPTY),
    46 => LessEqualOptions(EMPTY),
    47 => SelectOptions(EMPTY),
    48 => SliceOptions(EMPTY),
    49 => TransposeConvOptions(TRANSPOSE_CONV),
    50 => SparseToDenseOptions(SPARSE_TO_DENSE),
    51 => TileOptions(EMPTY),
    52 => ExpandDimsOptions(EMPTY),
    53 => EqualOptions(EMPTY),
    54 => NotEqualOptions(EMPTY),
    55 => ShapeOptions(SHAPE),
    56 => PowOptions(EMPTY),
    57 => ArgMinOptions(OUTPUT_TYPE),
    58 => FakeQuantOptions(FAKE_QUANT),
    59 => PackOptions(PACK),
    60 => LogicalOrOptions(EMPTY),
    61 => OneHotOptions(AXIS),
    62 => LogicalAndOptions(EMPTY),
    63 => LogicalNotOptions(EMPTY),
    64 => UnpackOptions(UNPACK),
    65 => FloorDivOptions(EMPTY),
    66 => SquareOptions(EMPTY),
    67 => ZerosLikeOptions(EMPTY),
    68 => FillOptions(EMPTY),
    69 => BidirectionalSequenceLSTMOptions(BIDIRECTIONAL_SEQUENCE_LSTM),
    70 => BidirectionalSequenceRNNOptions(BIDIRECTIONAL_SEQUENCE_RNN),
    71 => UnidirectionalSequenceLSTMOptions(UNIDIRECTIONAL_SEQUENCE_LSTM),
    72 => FloorModOptions(EMPTY),
    73 => RangeOptions(EMPTY),
    74 => ResizeNearestNeighborOptions(RESIZE_NEAREST_NEIGHBOR),
    75 => LeakyReluOptions(LEAKY_RELU),
    76 => SquaredDifferenceOptions(EMPTY),
    77 => MirrorPadOptions(MIRROR_PAD),
    78 => AbsOptions(EMPTY),
    79 => SplitVOptions(NUM_SPLITS),
    80 => UniqueOptions(UNIQUE),
    81 => ReverseV2Options(EMPTY),
    82 => AddNOptions(EMPTY),
    83 => GatherNdOptions(EMPTY),
    84 => CosOptions(EMPTY),
    85 => WhereOptions(EMPTY),
    86 => RankOptions(EMPTY),
    87 => ReverseSequenceOptions(REVERSE_SEQUENCE),
    88 => MatrixDiagOptions(EMPTY),
    89 => QuantizeOptions(EMPTY),
    90 => MatrixSetDiagOptions(EMPTY),
    91 => HardSwishOptions(EMPTY),
    92 => IfOptions(IF),
    93 => WhileOptions(WHILE),
    94 => DepthToSpaceOptions(BLOCK_SIZE),
    95 => NonMaxSuppressionV4Options(EMPTY),
    96 => NonMaxSuppressionV5Options(EMPTY),
    97 => ScatterNdOptions(EMPTY),
    98 => SelectV2Options(EMPTY),
    99 => DensifyOptions(EMPTY),
    100 => SegmentSumOptions(EMPTY),
    101 => BatchMatMulOptions(BATCH_MATMUL),
    252 => BCQGatherOptions(BCQ_GATHER),
    253 => BCQFullyConnectedOptions(BCQ_FULLY_CONNECTED),
    254 => InstanceNormOptions(INSTANCE_NORM),
}

impl OptionsKind {
    /// Raw discriminant byte
    #[inline]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Look up a member by schema table name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Declaration of the field called `name`
    pub fn field(self, name: &str) -> Option<&'static FieldDecl> {
        self.fields().iter().find(|decl| decl.name == name)
    }

    /// Number of slots the table reserves (highest slot + 1)
    pub fn slot_count(self) -> u16 {
        self.fields()
            .iter()
            .map(|decl| decl.slot + 1)
            .max()
            .unwrap_or(0)
    }

    /// True for marker members with no fields (e.g. TopKV2Options)
    pub fn is_empty(self) -> bool {
        self.fields().is_empty()
    }
}

impl fmt::Display for OptionsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_u8_roundtrip() {
        for &kind in OptionsKind::ALL {
            assert_eq!(OptionsKind::from_u8(kind.to_u8()), Some(kind));
        }
        assert_eq!(OptionsKind::from_u8(0), Some(OptionsKind::None));
        assert_eq!(OptionsKind::from_u8(102), None);
        assert_eq!(OptionsKind::from_u8(255), None);
    }

    #[test]
    fn test_default_is_none() {
        assert_eq!(OptionsKind::default(), OptionsKind::None);
        assert_eq!(OptionsKind::default().to_u8(), 0);
    }

    #[test]
    fn test_known_members() {
        assert_eq!(OptionsKind::from_u8(34), Some(OptionsKind::TopKV2Options));
        assert_eq!(OptionsKind::from_u8(19), Some(OptionsKind::SpaceToDepthOptions));
        assert_eq!(OptionsKind::from_u8(74), Some(OptionsKind::ResizeNearestNeighborOptions));
        assert_eq!(OptionsKind::from_u8(101), Some(OptionsKind::BatchMatMulOptions));
        assert_eq!(OptionsKind::BatchMatMulOptions.name(), "BatchMatMulOptions");
    }

    #[test]
    fn test_batch_matmul_table() {
        let fields = OptionsKind::BatchMatMulOptions.fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "adjoint_lhs");
        assert_eq!(fields[0].voffset(), 4);
        assert_eq!(fields[1].name, "adjoint_rhs");
        assert_eq!(fields[1].voffset(), 6);
        assert_eq!(fields[1].default_value(), OptionValue::Bool(false));
    }

    #[test]
    fn test_space_to_depth_table() {
        let decl = OptionsKind::SpaceToDepthOptions.field("block_size").unwrap();
        assert_eq!(decl.kind, FieldKind::Int32);
        assert_eq!(decl.default_value(), OptionValue::Int(0));
    }

    #[test]
    fn test_top_k_is_empty_marker() {
        assert!(OptionsKind::TopKV2Options.is_empty());
        assert_eq!(OptionsKind::TopKV2Options.slot_count(), 0);
    }

    #[test]
    fn test_non_zero_defaults() {
        let conv = OptionsKind::Conv2DOptions;
        assert_eq!(
            conv.field("dilation_w_factor").unwrap().default_value(),
            OptionValue::Int(1)
        );
        assert_eq!(
            OptionsKind::AddOptions.field("pot_scale_int16").unwrap().default_value(),
            OptionValue::Bool(true)
        );
        assert_eq!(
            OptionsKind::UniqueOptions.field("idx_out_type").unwrap().default_value(),
            OptionValue::Enum(2)
        );
    }

    #[test]
    fn test_slots_unique_within_table() {
        for &kind in OptionsKind::ALL {
            let fields = kind.fields();
            for (i, a) in fields.iter().enumerate() {
                for b in &fields[i + 1..] {
                    assert_ne!(a.slot, b.slot, "{} reuses slot {}", kind, a.slot);
                    assert_ne!(a.name, b.name, "{} reuses name {}", kind, a.name);
                }
            }
        }
    }

    #[test]
    fn test_enum_domain_names() {
        assert_eq!(PADDING.variant_name(1), Some("VALID"));
        assert_eq!(ACTIVATION.variant_name(3), Some("RELU6"));
        assert_eq!(TENSOR_TYPE.variant_name(2), Some("INT32"));
        assert_eq!(ACTIVATION.variant_name(-1), None);
        assert_eq!(ACTIVATION.variant_name(42), None);
    }

    #[test]
    fn test_field_kind_accepts() {
        assert!(FieldKind::Bool.accepts(&OptionValue::Bool(true)));
        assert!(!FieldKind::Bool.accepts(&OptionValue::Int(1)));
        assert!(FieldKind::Enum(&PADDING).accepts(&OptionValue::Enum(1)));
        assert!(FieldKind::IntVector.accepts(&OptionValue::IntVector(vec![1, 2])));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(
            OptionsKind::from_name("InstanceNormOptions"),
            Some(OptionsKind::InstanceNormOptions)
        );
        assert_eq!(OptionsKind::from_name("None"), None);
    }
}
