//! Format descriptor chunk (`fmt `).

use std::io::Read;

use serde::Serialize;
use tracing::debug;

use crate::bytes::{u16_at, u32_at};
use crate::chunk::{ChunkBody, ChunkHeader};
use crate::error::{DecodeError, DecodeResult};

/// Format code for uncompressed PCM.
pub const FORMAT_PCM: u16 = 1;

/// Size of the core descriptor fields.
const CORE_LEN: usize = 16;

/// Extension sizes accepted after the core fields.
const EXTENSION_SIZES: [u16; 2] = [0, 22];

/// Parsed contents of a `fmt ` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormatDescriptor {
    /// Codec identifier (1 = PCM).
    pub format_code: u16,
    /// Number of interleaved channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Average bytes per second.
    pub byte_rate: u32,
    /// Bytes per sample frame across all channels.
    pub block_align: u16,
    /// Bits per sample (8 or 16 are decodable).
    pub bits_per_sample: u16,
}

impl FormatDescriptor {
    /// Parses the 16 core bytes of a format chunk.
    pub fn from_bytes(core: &[u8; CORE_LEN]) -> Self {
        Self {
            format_code: u16_at(core, 0),
            channels: u16_at(core, 2),
            sample_rate: u32_at(core, 4),
            byte_rate: u32_at(core, 8),
            block_align: u16_at(core, 12),
            bits_per_sample: u16_at(core, 14),
        }
    }

    /// Whether the codec is uncompressed PCM.
    pub fn is_pcm(&self) -> bool {
        self.format_code == FORMAT_PCM
    }
}

/// Returns true for the chunk sizes the format handler accepts.
pub fn is_supported_chunk_size(size: u32) -> bool {
    matches!(size, 16 | 18 | 40)
}

/// Parses a format chunk, consuming exactly `header.size` bytes.
///
/// The optional extension block is consumed but not interpreted.
pub fn read_format_chunk<R: Read>(
    reader: &mut R,
    header: &ChunkHeader,
    verbose: bool,
) -> DecodeResult<FormatDescriptor> {
    if !is_supported_chunk_size(header.size) {
        return Err(DecodeError::UnsupportedFormatChunkSize { size: header.size });
    }

    let mut body = ChunkBody::new(reader, header);
    let mut core = [0u8; CORE_LEN];
    body.read_exact(&mut core)?;
    let format = FormatDescriptor::from_bytes(&core);

    if verbose {
        debug!(
            format_code = format.format_code,
            channels = format.channels,
            sample_rate = format.sample_rate,
            byte_rate = format.byte_rate,
            block_align = format.block_align,
            bits_per_sample = format.bits_per_sample,
            "format chunk"
        );
    }

    if body.remaining() > 0 {
        let mut ext_len = [0u8; 2];
        body.read_exact(&mut ext_len)?;
        let ext_size = u16_at(&ext_len, 0);
        if !EXTENSION_SIZES.contains(&ext_size) || u64::from(ext_size) > body.remaining() {
            return Err(DecodeError::InvalidExtensionSize {
                size: ext_size,
                chunk_size: header.size,
            });
        }
        // Extension contents (and any declared slack after them) are not interpreted.
        body.discard_rest(false)?;
    }

    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn core_bytes(format_code: u16, channels: u16, rate: u32, block_align: u16, bits: u16) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(CORE_LEN);
        bytes.extend_from_slice(&format_code.to_le_bytes());
        bytes.extend_from_slice(&channels.to_le_bytes());
        bytes.extend_from_slice(&rate.to_le_bytes());
        bytes.extend_from_slice(&(rate * u32::from(block_align)).to_le_bytes());
        bytes.extend_from_slice(&block_align.to_le_bytes());
        bytes.extend_from_slice(&bits.to_le_bytes());
        bytes
    }

    fn header(size: u32) -> ChunkHeader {
        ChunkHeader { tag: *b"fmt ", size }
    }

    #[test]
    fn test_parse_core_fields() {
        let bytes = core_bytes(1, 2, 44100, 4, 16);
        let mut reader: &[u8] = &bytes;
        let format = read_format_chunk(&mut reader, &header(16), false).unwrap();
        assert_eq!(
            format,
            FormatDescriptor {
                format_code: 1,
                channels: 2,
                sample_rate: 44100,
                byte_rate: 176400,
                block_align: 4,
                bits_per_sample: 16,
            }
        );
        assert!(format.is_pcm());
        assert!(reader.is_empty());
    }

    #[test]
    fn test_size_18_with_empty_extension() {
        let mut bytes = core_bytes(1, 1, 8000, 2, 16);
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(b"next");
        let mut reader: &[u8] = &bytes;

        let extended = read_format_chunk(&mut reader, &header(18), false).unwrap();
        let mut plain: &[u8] = &bytes[..CORE_LEN];
        let baseline = read_format_chunk(&mut plain, &header(16), false).unwrap();

        assert_eq!(extended, baseline);
        assert_eq!(reader, b"next");
    }

    #[test]
    fn test_size_40_with_full_extension() {
        let mut bytes = core_bytes(1, 2, 48000, 4, 16);
        bytes.extend_from_slice(&22u16.to_le_bytes());
        bytes.extend_from_slice(&[0xEE; 22]);
        bytes.extend_from_slice(b"data");
        let mut reader: &[u8] = &bytes;

        let format = read_format_chunk(&mut reader, &header(40), false).unwrap();
        assert_eq!(format.sample_rate, 48000);
        assert_eq!(reader, b"data");
    }

    #[test]
    fn test_size_40_with_empty_extension_consumes_whole_chunk() {
        let mut bytes = core_bytes(1, 1, 8000, 1, 8);
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 22]);
        bytes.extend_from_slice(b"data");
        let mut reader: &[u8] = &bytes;

        read_format_chunk(&mut reader, &header(40), false).unwrap();
        assert_eq!(reader, b"data");
    }

    #[test]
    fn test_unsupported_chunk_size() {
        for size in [0u32, 14, 17, 20, 41] {
            let bytes = vec![0u8; 64];
            let mut reader: &[u8] = &bytes;
            match read_format_chunk(&mut reader, &header(size), false) {
                Err(DecodeError::UnsupportedFormatChunkSize { size: got }) => assert_eq!(got, size),
                other => panic!("expected unsupported size for {}, got {:?}", size, other),
            }
            // Nothing is consumed for a rejected size.
            assert_eq!(reader.len(), 64);
        }
    }

    #[test]
    fn test_invalid_extension_size() {
        let mut bytes = core_bytes(1, 1, 8000, 2, 16);
        bytes.extend_from_slice(&7u16.to_le_bytes());
        let mut reader: &[u8] = &bytes;
        match read_format_chunk(&mut reader, &header(18), false) {
            Err(DecodeError::InvalidExtensionSize { size, chunk_size }) => {
                assert_eq!(size, 7);
                assert_eq!(chunk_size, 18);
            }
            other => panic!("expected invalid extension, got {:?}", other),
        }
    }

    #[test]
    fn test_extension_larger_than_chunk() {
        let mut bytes = core_bytes(1, 1, 8000, 2, 16);
        bytes.extend_from_slice(&22u16.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 22]);
        let mut reader: &[u8] = &bytes;
        assert!(matches!(
            read_format_chunk(&mut reader, &header(18), false),
            Err(DecodeError::InvalidExtensionSize { size: 22, .. })
        ));
    }

    #[test]
    fn test_truncated_core() {
        let bytes = core_bytes(1, 1, 8000, 2, 16);
        let mut reader: &[u8] = &bytes[..10];
        match read_format_chunk(&mut reader, &header(16), false) {
            Err(DecodeError::TruncatedChunkBody {
                expected, actual, ..
            }) => {
                assert_eq!(expected, 16);
                assert_eq!(actual, 10);
            }
            other => panic!("expected truncated body, got {:?}", other),
        }
    }

    #[test]
    fn test_non_pcm_is_parsed() {
        let bytes = core_bytes(2, 1, 8000, 2, 16);
        let mut reader: &[u8] = &bytes;
        let format = read_format_chunk(&mut reader, &header(16), false).unwrap();
        assert_eq!(format.format_code, 2);
        assert!(!format.is_pcm());
    }
}
