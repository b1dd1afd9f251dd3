//! # Decoder Configuration
//!
//! Selects which file identifier is accepted, whether the buffer carries a
//! size prefix, and whether the whole graph is walked eagerly at decode time.

use circle_schema::{FILE_IDENTIFIER, TFLITE_FILE_IDENTIFIER};
use std::fmt;

/// Decoder configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecoderConfig {
    /// Identifier expected at bytes [4..8) (after the size prefix, if any)
    pub identifier: [u8; 4],
    /// Buffer starts with a `u32` length
    pub size_prefixed: bool,
    /// Walk every table at decode time instead of failing lazily on access
    pub verify: bool,
}

impl DecoderConfig {
    /// Default configuration: circle identifier, no size prefix, lazy reads
    pub const DEFAULT: Self = Self {
        identifier: FILE_IDENTIFIER,
        size_prefixed: false,
        verify: false,
    };

    /// TFLite files share the schema but carry "TFL3"
    pub const TFLITE: Self = Self {
        identifier: TFLITE_FILE_IDENTIFIER,
        size_prefixed: false,
        verify: false,
    };

    /// Create a configuration with a custom identifier
    pub fn with_identifier(identifier: &str) -> Result<Self, ConfigError> {
        let bytes: [u8; 4] = identifier
            .as_bytes()
            .try_into()
            .map_err(|_| ConfigError::IdentifierLength(identifier.len()))?;
        let config = Self {
            identifier: bytes,
            ..Self::DEFAULT
        };
        config.validate()?;
        Ok(config)
    }

    /// Builder-style toggle for size-prefixed buffers
    pub const fn size_prefixed(mut self, enabled: bool) -> Self {
        self.size_prefixed = enabled;
        self
    }

    /// Builder-style toggle for eager verification
    pub const fn verify(mut self, enabled: bool) -> Self {
        self.verify = enabled;
        self
    }

    /// Offset of the root table pointer
    #[inline]
    pub const fn root_offset_position(&self) -> usize {
        if self.size_prefixed {
            circle_schema::SIZE_PREFIX_LENGTH
        } else {
            0
        }
    }

    /// Minimum buffer length: prefix + root offset + identifier
    #[inline]
    pub const fn header_len(&self) -> usize {
        self.root_offset_position()
            + circle_schema::OFFSET_SIZE
            + circle_schema::FILE_IDENTIFIER_LENGTH
    }

    /// Identifier rendered for messages
    pub fn identifier_str(&self) -> String {
        String::from_utf8_lossy(&self.identifier).into_owned()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Identifiers are printable ASCII in every known producer
        if !self.identifier.iter().all(|b| b.is_ascii_graphic()) {
            return Err(ConfigError::NonAsciiIdentifier);
        }
        Ok(())
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for DecoderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DecoderConfig {{ identifier: {:?}, size_prefixed: {}, verify: {} }}",
            self.identifier_str(),
            self.size_prefixed,
            self.verify,
        )
    }
}

/// Configuration error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Identifier must be exactly 4 bytes
    IdentifierLength(usize),
    /// Identifier must be printable ASCII
    NonAsciiIdentifier,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IdentifierLength(len) => {
                write!(f, "identifier must be 4 bytes, got {}", len)
            }
            ConfigError::NonAsciiIdentifier => {
                write!(f, "identifier must be printable ASCII")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
