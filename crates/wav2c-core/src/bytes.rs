//! Little-endian integer decoding and exact-length stream reads.

use std::io::{self, Read};

/// Decodes a little-endian `u16`.
pub fn decode_u16(bytes: [u8; 2]) -> u16 {
    u16::from_le_bytes(bytes)
}

/// Decodes a little-endian `u32`.
pub fn decode_u32(bytes: [u8; 4]) -> u32 {
    u32::from_le_bytes(bytes)
}

/// Decodes a little-endian `u16` at `offset` inside a fixed window.
///
/// Callers index with constant offsets into buffers whose length they own,
/// so the slice-to-array conversion cannot fail.
pub(crate) fn u16_at(window: &[u8], offset: usize) -> u16 {
    decode_u16([window[offset], window[offset + 1]])
}

/// Decodes a little-endian `u32` at `offset` inside a fixed window.
pub(crate) fn u32_at(window: &[u8], offset: usize) -> u32 {
    decode_u32([
        window[offset],
        window[offset + 1],
        window[offset + 2],
        window[offset + 3],
    ])
}

/// Reads until `buf` is full or the stream ends.
///
/// Returns the number of bytes actually read; a value smaller than
/// `buf.len()` means end of stream was reached.
pub(crate) fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
