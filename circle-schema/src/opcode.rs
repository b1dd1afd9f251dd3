//! # Builtin Operator Codes
//!
//! Operator codes are `i32` values. TFLite assigns 0..=156; circle adds its
//! own operators below zero.
//!
//! ## Code Ranges
//!
//! - -5..=-2: circle extensions (GRU, BCQ_GATHER, BCQ_FULLY_CONNECTED, INSTANCE_NORM)
//! - 0x00-0x7E: TFLite builtins that fit `deprecated_builtin_code`
//! - 0x7F: placeholder, the real code lives in `builtin_code`
//! - 0x80-0x9C: newer TFLite builtins
//! - 0xFC-0xFE: legacy circle extension codes from pre-0.4 schemas

use serde::{Deserialize, Serialize};
use std::fmt;

/// Builtin operator code
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuiltinOperator(pub i32);

/// `(code, name)` pairs sorted by code
pub const BUILTIN_OPERATORS: &[(i32, &str)] = &[
    (-5, "GRU"),
    (-4, "BCQ_GATHER"),
    (-3, "BCQ_FULLY_CONNECTED"),
    (-2, "INSTANCE_NORM"),
    (0, "ADD"),
    (1, "AVERAGE_POOL_2D"),
    (2, "CONCATENATION"),
    (3, "CONV_2D"),
    (4, "DEPTHWISE_CONV_2D"),
    (5, "DEPTH_TO_SPACE"),
    (6, "DEQUANTIZE"),
    (7, "EMBEDDING_LOOKUP"),
    (8, "FLOOR"),
    (9, "FULLY_CONNECTED"),
    (10, "HASHTABLE_LOOKUP"),
    (11, "L2_NORMALIZATION"),
    (12, "L2_POOL_2D"),
    (13, "LOCAL_RESPONSE_NORMALIZATION"),
    (14, "LOGISTIC"),
    (15, "LSH_PROJECTION"),
    (16, "LSTM"),
    (17, "MAX_POOL_2D"),
    (18, "MUL"),
    (19, "RELU"),
    (20, "RELU_N1_TO_1"),
    (21, "RELU6"),
    (22, "RESHAPE"),
    (23, "RESIZE_BILINEAR"),
    (24, "RNN"),
    (25, "SOFTMAX"),
    (26, "SPACE_TO_DEPTH"),
    (27, "SVDF"),
    (28, "TANH"),
    (29, "CONCAT_EMBEDDINGS"),
    (30, "SKIP_GRAM"),
    (31, "CALL"),
    (32, "CUSTOM"),
    (33, "EMBEDDING_LOOKUP_SPARSE"),
    (34, "PAD"),
    (35, "UNIDIRECTIONAL_SEQUENCE_RNN"),
    (36, "GATHER"),
    (37, "BATCH_TO_SPACE_ND"),
    (38, "SPACE_TO_BATCH_ND"),
    (39, "TRANSPOSE"),
    (40, "MEAN"),
    (41, "SUB"),
    (42, "DIV"),
    (43, "SQUEEZE"),
    (44, "UNIDIRECTIONAL_SEQUENCE_LSTM"),
    (45, "STRIDED_SLICE"),
    (46, "BIDIRECTIONAL_SEQUENCE_RNN"),
    (47, "EXP"),
    (48, "TOPK_V2"),
    (49, "SPLIT"),
    (50, "LOG_SOFTMAX"),
    (51, "DELEGATE"),
    (52, "BIDIRECTIONAL_SEQUENCE_LSTM"),
    (53, "CAST"),
    (54, "PRELU"),
    (55, "MAXIMUM"),
    (56, "ARG_MAX"),
    (57, "MINIMUM"),
    (58, "LESS"),
    (59, "NEG"),
    (60, "PADV2"),
    (61, "GREATER"),
    (62, "GREATER_EQUAL"),
    (63, "LESS_EQUAL"),
    (64, "SELECT"),
    (65, "SLICE"),
    (66, "SIN"),
    (67, "TRANSPOSE_CONV"),
    (68, "SPARSE_TO_DENSE"),
    (69, "TILE"),
    (70, "EXPAND_DIMS"),
    (71, "EQUAL"),
    (72, "NOT_EQUAL"),
    (73, "LOG"),
    (74, "SUM"),
    (75, "SQRT"),
    (76, "RSQRT"),
    (77, "SHAPE"),
    (78, "POW"),
    (79, "ARG_MIN"),
    (80, "FAKE_QUANT"),
    (81, "REDUCE_PROD"),
    (82, "REDUCE_MAX"),
    (83, "PACK"),
    (84, "LOGICAL_OR"),
    (85, "ONE_HOT"),
    (86, "LOGICAL_AND"),
    (87, "LOGICAL_NOT"),
    (88, "UNPACK"),
    (89, "REDUCE_MIN"),
    (90, "FLOOR_DIV"),
    (91, "REDUCE_ANY"),
    (92, "SQUARE"),
    (93, "ZEROS_LIKE"),
    (94, "FILL"),
    (95, "FLOOR_MOD"),
    (96, "RANGE"),
    (97, "RESIZE_NEAREST_NEIGHBOR"),
    (98, "LEAKY_RELU"),
    (99, "SQUARED_DIFFERENCE"),
    (100, "MIRROR_PAD"),
    (101, "ABS"),
    (102, "SPLIT_V"),
    (103, "UNIQUE"),
    (104, "CEIL"),
    (105, "REVERSE_V2"),
    (106, "ADD_N"),
    (107, "GATHER_ND"),
    (108, "COS"),
    (109, "WHERE"),
    (110, "RANK"),
    (111, "ELU"),
    (112, "REVERSE_SEQUENCE"),
    (113, "MATRIX_DIAG"),
    (114, "QUANTIZE"),
    (115, "MATRIX_SET_DIAG"),
    (116, "ROUND"),
    (117, "HARD_SWISH"),
    (118, "IF"),
    (119, "WHILE"),
    (120, "NON_MAX_SUPPRESSION_V4"),
    (121, "NON_MAX_SUPPRESSION_V5"),
    (122, "SCATTER_ND"),
    (123, "SELECT_V2"),
    (124, "DENSIFY"),
    (125, "SEGMENT_SUM"),
    (126, "BATCH_MATMUL"),
    (127, "PLACEHOLDER_FOR_GREATER_OP_CODES"),
    (128, "CUMSUM"),
    (129, "CALL_ONCE"),
    (130, "BROADCAST_TO"),
    (131, "RFFT2D"),
    (132, "CONV_3D"),
    (133, "IMAG"),
    (134, "REAL"),
    (135, "COMPLEX_ABS"),
    (136, "HASHTABLE"),
    (137, "HASHTABLE_FIND"),
    (138, "HASHTABLE_IMPORT"),
    (139, "HASHTABLE_SIZE"),
    (140, "REDUCE_ALL"),
    (141, "CONV_3D_TRANSPOSE"),
    (142, "VAR_HANDLE"),
    (143, "READ_VARIABLE"),
    (144, "ASSIGN_VARIABLE"),
    (145, "BROADCAST_ARGS"),
    (146, "RANDOM_STANDARD_NORMAL"),
    (147, "BUCKETIZE"),
    (148, "RANDOM_UNIFORM"),
    (149, "MULTINOMIAL"),
    (150, "GELU"),
    (151, "DYNAMIC_UPDATE_SLICE"),
    (152, "RELU_0_TO_1"),
    (153, "UNSORTED_SEGMENT_PROD"),
    (154, "UNSORTED_SEGMENT_MAX"),
    (155, "UNSORTED_SEGMENT_SUM"),
    (156, "ATAN2"),
    (252, "BCQ_GATHER"),
    (253, "BCQ_FULLY_CONNECTED"),
    (254, "INSTANCE_NORM"),
];

impl BuiltinOperator {
    pub const ADD: Self = Self(0);
    pub const CONV_2D: Self = Self(3);
    pub const FULLY_CONNECTED: Self = Self(9);
    pub const RESHAPE: Self = Self(22);
    pub const SOFTMAX: Self = Self(25);
    pub const SPACE_TO_DEPTH: Self = Self(26);
    pub const CUSTOM: Self = Self(32);
    pub const TOPK_V2: Self = Self(48);
    pub const RESIZE_NEAREST_NEIGHBOR: Self = Self(97);
    pub const BATCH_MATMUL: Self = Self(126);
    pub const PLACEHOLDER_FOR_GREATER_OP_CODES: Self = Self(127);
    pub const CUMSUM: Self = Self(128);
    pub const GRU: Self = Self(-5);
    pub const BCQ_GATHER: Self = Self(-4);
    pub const BCQ_FULLY_CONNECTED: Self = Self(-3);
    pub const INSTANCE_NORM: Self = Self(-2);
    pub const LEGACY_BCQ_GATHER: Self = Self(252);
    pub const LEGACY_BCQ_FULLY_CONNECTED: Self = Self(253);
    pub const LEGACY_INSTANCE_NORM: Self = Self(254);

    /// Raw code
    #[inline]
    pub const fn code(self) -> i32 {
        self.0
    }

    /// Schema name, `None` for codes this table does not know
    pub fn name(self) -> Option<&'static str> {
        BUILTIN_OPERATORS
            .binary_search_by_key(&self.0, |&(code, _)| code)
            .ok()
            .map(|idx| BUILTIN_OPERATORS[idx].1)
    }

    /// Look up a code by schema name
    ///
    /// Circle extensions resolve to their current negative codes.
    pub fn from_name(name: &str) -> Option<Self> {
        BUILTIN_OPERATORS
            .iter()
            .find(|&&(_, n)| n == name)
            .map(|&(code, _)| Self(code))
    }

    /// True if the code fits in `deprecated_builtin_code`
    #[inline]
    pub const fn fits_deprecated_code(self) -> bool {
        self.0 >= 0 && self.0 < Self::PLACEHOLDER_FOR_GREATER_OP_CODES.0
    }

    /// Value to write into `deprecated_builtin_code` for this operator
    pub const fn deprecated_code(self) -> i8 {
        if self.fits_deprecated_code() {
            self.0 as i8
        } else {
            Self::PLACEHOLDER_FOR_GREATER_OP_CODES.0 as i8
        }
    }

    /// Combine the two code fields of an OperatorCode table
    pub const fn resolve(deprecated_builtin_code: i8, builtin_code: i32) -> Self {
        if deprecated_builtin_code == Self::PLACEHOLDER_FOR_GREATER_OP_CODES.0 as i8
            || builtin_code != 0
        {
            Self(builtin_code)
        } else {
            Self(deprecated_builtin_code as i32)
        }
    }
}

impl From<i32> for BuiltinOperator {
    fn from(code: i32) -> Self {
        Self(code)
    }
}

impl fmt::Display for BuiltinOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "UNKNOWN({})", self.0),
        }
    }
}
