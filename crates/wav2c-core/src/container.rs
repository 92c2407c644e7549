//! RIFF/WAVE envelope validation.
//!
//! The envelope is 12 bytes:
//! - Bytes 0-3: `RIFF`
//! - Bytes 4-7: declared size (little-endian u32), everything after this field
//! - Bytes 8-11: container type, `WAVE` for audio
//!
//! The declared size is informational; it is not checked against the number
//! of bytes that actually follow.

use std::io::Read;

use crate::bytes::{read_up_to, u32_at};
use crate::error::{ContainerFormatReason, DecodeError, DecodeResult};

/// RIFF magic bytes.
pub const RIFF_MAGIC: &[u8; 4] = b"RIFF";

/// WAVE container type.
pub const WAVE_TYPE: &[u8; 4] = b"WAVE";

/// Length of the envelope in bytes.
pub const ENVELOPE_LEN: usize = 12;

/// Smallest declared size that still covers the type tag.
const MIN_DECLARED_SIZE: u32 = 4;

/// Validates the first 12 bytes of a stream and returns the declared size.
///
/// Checks run in order: magic, declared size, type tag. The first failing
/// check decides the reported reason.
pub fn validate_envelope(header: &[u8; ENVELOPE_LEN]) -> DecodeResult<u32> {
    if &header[0..4] != RIFF_MAGIC {
        return Err(DecodeError::container(ContainerFormatReason::BadMagic));
    }

    let declared_size = u32_at(header, 4);
    if declared_size < MIN_DECLARED_SIZE {
        return Err(DecodeError::container(ContainerFormatReason::InvalidSize));
    }

    if &header[8..12] != WAVE_TYPE {
        return Err(DecodeError::container(ContainerFormatReason::BadType));
    }

    Ok(declared_size)
}

/// Reads and validates the envelope from the start of a stream.
pub fn read_envelope<R: Read>(reader: &mut R) -> DecodeResult<u32> {
    let mut header = [0u8; ENVELOPE_LEN];
    let read = read_up_to(reader, &mut header)?;
    if read < ENVELOPE_LEN {
        // A short stream that already fails the magic check reports that instead.
        if read >= 4 && &header[0..4] != RIFF_MAGIC {
            return Err(DecodeError::container(ContainerFormatReason::BadMagic));
        }
        return Err(DecodeError::container(ContainerFormatReason::Truncated));
    }
    validate_envelope(&header)
}
