//! Error types for WAV decoding.

use std::fmt;

use thiserror::Error;

/// Result type for decoding operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Why the RIFF/WAVE envelope was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormatReason {
    /// Fewer than 12 bytes were available.
    Truncated,
    /// The first four bytes are not `RIFF`.
    BadMagic,
    /// The declared size cannot cover the type tag.
    InvalidSize,
    /// The type tag is not `WAVE`.
    BadType,
}

impl fmt::Display for ContainerFormatReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ContainerFormatReason::Truncated => "stream shorter than the 12-byte RIFF header",
            ContainerFormatReason::BadMagic => "missing RIFF magic",
            ContainerFormatReason::InvalidSize => "zero or invalid declared size",
            ContainerFormatReason::BadType => "container type is not WAVE",
        };
        f.write_str(text)
    }
}

/// Errors that abort decoding of a single file.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The outer envelope is not a RIFF/WAVE container.
    #[error("invalid container: {reason}")]
    ContainerFormat {
        /// Which envelope check failed.
        reason: ContainerFormatReason,
    },

    /// The stream ended inside an 8-byte chunk header.
    #[error("truncated chunk header: got {available} of 8 bytes")]
    TruncatedChunkHeader {
        /// Bytes that were available.
        available: usize,
    },

    /// The stream ended before a chunk body was fully consumed.
    #[error("truncated '{tag}' chunk body: needed {expected} bytes, got {actual}")]
    TruncatedChunkBody {
        /// Printable chunk tag.
        tag: String,
        /// Bytes the handler needed.
        expected: u64,
        /// Bytes actually available.
        actual: u64,
    },

    /// The format chunk has a size other than 16, 18 or 40.
    #[error("unsupported format chunk size {size} (expected 16, 18 or 40)")]
    UnsupportedFormatChunkSize {
        /// Declared chunk size.
        size: u32,
    },

    /// The format extension size is not 0 or 22, or does not fit in the chunk.
    #[error("invalid format extension size {size} in a {chunk_size}-byte format chunk")]
    InvalidExtensionSize {
        /// Declared extension size.
        size: u16,
        /// Declared format chunk size.
        chunk_size: u32,
    },

    /// A data chunk appeared before any format chunk.
    #[error("data chunk found before format chunk")]
    ChunkOrder,

    /// A second format chunk tried to replace the descriptor.
    #[error("duplicate format chunk")]
    DuplicateFormatChunk,

    /// The format code is not PCM.
    #[error("unsupported codec: format code {format_code} (only PCM/1 supported)")]
    UnsupportedCodec {
        /// The format code found.
        format_code: u16,
    },

    /// Bits per sample is neither 8 nor 16.
    #[error("unsupported bit depth: {bits} bits per sample (only 8 and 16 supported)")]
    UnsupportedBitDepth {
        /// The bit depth found.
        bits: u16,
    },

    /// Block alignment cannot hold one sample for every channel.
    #[error("invalid block alignment {block_align}: at least {required} bytes required")]
    InvalidBlockAlignment {
        /// Declared block alignment.
        block_align: u16,
        /// Minimum size needed.
        required: u32,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// Creates a container error for the given reason.
    pub fn container(reason: ContainerFormatReason) -> Self {
        Self::ContainerFormat { reason }
    }

    /// Creates a truncated body error for a chunk tag.
    pub fn truncated_body(tag: &[u8; 4], expected: u64, actual: u64) -> Self {
        Self::TruncatedChunkBody {
            tag: tag.escape_ascii().to_string(),
            expected,
            actual,
        }
    }

    /// Stable error code for reports.
    pub fn code(&self) -> &'static str {
        match self {
            DecodeError::ContainerFormat { .. } => "WAV_001",
            DecodeError::TruncatedChunkHeader { .. } => "WAV_002",
            DecodeError::TruncatedChunkBody { .. } => "WAV_003",
            DecodeError::UnsupportedFormatChunkSize { .. } => "WAV_004",
            DecodeError::InvalidExtensionSize { .. } => "WAV_005",
            DecodeError::ChunkOrder => "WAV_006",
            DecodeError::DuplicateFormatChunk => "WAV_007",
            DecodeError::UnsupportedCodec { .. } => "WAV_008",
            DecodeError::UnsupportedBitDepth { .. } => "WAV_009",
            DecodeError::InvalidBlockAlignment { .. } => "WAV_010",
            DecodeError::Io(_) => "WAV_011",
        }
    }

    /// Broad category of the failure.
    pub fn category(&self) -> &'static str {
        match self {
            DecodeError::ContainerFormat { .. }
            | DecodeError::TruncatedChunkHeader { .. }
            | DecodeError::TruncatedChunkBody { .. }
            | DecodeError::ChunkOrder
            | DecodeError::DuplicateFormatChunk => "container",
            DecodeError::UnsupportedFormatChunkSize { .. }
            | DecodeError::InvalidExtensionSize { .. }
            | DecodeError::UnsupportedCodec { .. }
            | DecodeError::UnsupportedBitDepth { .. }
            | DecodeError::InvalidBlockAlignment { .. } => "format",
            DecodeError::Io(_) => "io",
        }
    }
}
