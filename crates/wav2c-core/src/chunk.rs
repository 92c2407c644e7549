//! Chunk headers, tag dispatch and bounded chunk bodies.

use std::io::Read;

use tracing::debug;

use crate::bytes::{read_up_to, u32_at};
use crate::error::{DecodeError, DecodeResult};

/// Tag of the format descriptor chunk.
pub const FORMAT_TAG: &[u8; 4] = b"fmt ";

/// Tag of the sample data chunk.
pub const DATA_TAG: &[u8; 4] = b"data";

/// Length of a chunk header in bytes.
pub const HEADER_LEN: usize = 8;

/// Window size used when discarding chunk bodies.
const SKIP_WINDOW: usize = 512;

/// Handler selected for a chunk tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    /// `fmt ` chunk.
    Format,
    /// `data` chunk.
    Data,
    /// Any other tag; its body is skipped.
    Other([u8; 4]),
}

impl ChunkKind {
    /// Resolves a tag by exact 4-byte match.
    pub fn from_tag(tag: [u8; 4]) -> Self {
        match &tag {
            FORMAT_TAG => ChunkKind::Format,
            DATA_TAG => ChunkKind::Data,
            _ => ChunkKind::Other(tag),
        }
    }
}

/// An 8-byte chunk header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    /// Four-byte chunk tag.
    pub tag: [u8; 4],
    /// Exact size of the body that follows, excluding this header.
    pub size: u32,
}

impl ChunkHeader {
    /// Parses a header from its raw bytes.
    pub fn parse(bytes: &[u8; HEADER_LEN]) -> Self {
        Self {
            tag: [bytes[0], bytes[1], bytes[2], bytes[3]],
            size: u32_at(bytes, 4),
        }
    }

    /// Handler this header dispatches to.
    pub fn kind(&self) -> ChunkKind {
        ChunkKind::from_tag(self.tag)
    }

    /// Printable form of the tag.
    pub fn tag_display(&self) -> String {
        self.tag.escape_ascii().to_string()
    }
}

/// Reads the next chunk header.
///
/// Returns `Ok(None)` when the stream is exhausted before any header byte,
/// which is the normal end of a container.
pub fn read_chunk_header<R: Read>(reader: &mut R) -> DecodeResult<Option<ChunkHeader>> {
    let mut bytes = [0u8; HEADER_LEN];
    match read_up_to(reader, &mut bytes)? {
        0 => Ok(None),
        HEADER_LEN => Ok(Some(ChunkHeader::parse(&bytes))),
        available => Err(DecodeError::TruncatedChunkHeader { available }),
    }
}

/// A chunk body limited to its declared size.
///
/// Every read is checked against the bytes the stream actually delivers;
/// running out early is reported as [`DecodeError::TruncatedChunkBody`].
pub struct ChunkBody<'a, R> {
    reader: &'a mut R,
    tag: [u8; 4],
    size: u64,
    consumed: u64,
}

impl<'a, R: Read> ChunkBody<'a, R> {
    /// Wraps the stream positioned right after `header`.
    pub fn new(reader: &'a mut R, header: &ChunkHeader) -> Self {
        Self {
            reader,
            tag: header.tag,
            size: u64::from(header.size),
            consumed: 0,
        }
    }

    /// Declared body size.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Bytes consumed so far.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Bytes of the body not yet consumed.
    pub fn remaining(&self) -> u64 {
        self.size - self.consumed
    }

    /// Fills `buf` completely from the body.
    ///
    /// `buf` must not be longer than [`remaining`](Self::remaining).
    pub fn read_exact(&mut self, buf: &mut [u8]) -> DecodeResult<()> {
        debug_assert!(buf.len() as u64 <= self.remaining());
        let read = read_up_to(&mut *self.reader, buf)?;
        self.consumed += read as u64;
        if read < buf.len() {
            return Err(self.truncated());
        }
        Ok(())
    }

    /// Consumes the rest of the body without interpreting it.
    ///
    /// With `echo` set, the discarded bytes are emitted as escaped debug events.
    pub fn discard_rest(&mut self, echo: bool) -> DecodeResult<()> {
        let mut window = [0u8; SKIP_WINDOW];
        while self.remaining() > 0 {
            let want = self.remaining().min(SKIP_WINDOW as u64) as usize;
            let read = read_up_to(&mut *self.reader, &mut window[..want])?;
            self.consumed += read as u64;
            if echo && read > 0 {
                debug!(
                    tag = %self.tag.escape_ascii(),
                    "{}",
                    window[..read].escape_ascii()
                );
            }
            if read < want {
                return Err(self.truncated());
            }
        }
        Ok(())
    }

    fn truncated(&self) -> DecodeError {
        DecodeError::truncated_body(&self.tag, self.size, self.consumed)
    }
}

/// Skip handler for unrecognized chunks: consumes exactly `header.size` bytes.
pub fn skip_chunk<R: Read>(reader: &mut R, header: &ChunkHeader, echo: bool) -> DecodeResult<()> {
    ChunkBody::new(reader, header).discard_rest(echo)
}
