//! Test fixture utilities for building synthetic WAV files.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Builds a RIFF/WAVE byte stream chunk by chunk.
///
/// The envelope size is computed from the chunks unless overridden.
#[derive(Debug, Clone, Default)]
pub struct WavBuilder {
    chunks: Vec<u8>,
    declared_size: Option<u32>,
}

impl WavBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a 16-byte PCM format chunk.
    pub fn pcm_format(self, channels: u16, sample_rate: u32, bits_per_sample: u16) -> Self {
        let block_align = channels * (bits_per_sample / 8);
        self.format(1, channels, sample_rate, block_align, bits_per_sample)
    }

    /// Appends a 16-byte format chunk with explicit fields.
    pub fn format(
        self,
        format_code: u16,
        channels: u16,
        sample_rate: u32,
        block_align: u16,
        bits_per_sample: u16,
    ) -> Self {
        let body = format_body(format_code, channels, sample_rate, block_align, bits_per_sample);
        self.chunk(b"fmt ", &body)
    }

    /// Appends an 18-byte PCM format chunk with a zero extension size.
    pub fn pcm_format_extended(self, channels: u16, sample_rate: u32, bits_per_sample: u16) -> Self {
        let block_align = channels * (bits_per_sample / 8);
        let mut body = format_body(1, channels, sample_rate, block_align, bits_per_sample);
        body.extend_from_slice(&0u16.to_le_bytes());
        self.chunk(b"fmt ", &body)
    }

    /// Appends a data chunk of 16-bit samples.
    pub fn data16(self, samples: &[i16]) -> Self {
        let body: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        self.chunk(b"data", &body)
    }

    /// Appends a data chunk of 8-bit samples.
    pub fn data8(self, samples: &[u8]) -> Self {
        self.chunk(b"data", samples)
    }

    /// Appends an arbitrary chunk whose declared size matches the body.
    pub fn chunk(mut self, tag: &[u8; 4], body: &[u8]) -> Self {
        self.chunks.extend_from_slice(tag);
        self.chunks
            .extend_from_slice(&(body.len() as u32).to_le_bytes());
        self.chunks.extend_from_slice(body);
        self
    }

    /// Appends a chunk header declaring `size` followed by `body`, which may be shorter.
    pub fn chunk_with_size(mut self, tag: &[u8; 4], size: u32, body: &[u8]) -> Self {
        self.chunks.extend_from_slice(tag);
        self.chunks.extend_from_slice(&size.to_le_bytes());
        self.chunks.extend_from_slice(body);
        self
    }

    /// Appends raw bytes after the last chunk.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.chunks.extend_from_slice(bytes);
        self
    }

    /// Overrides the size declared in the envelope.
    pub fn declared_size(mut self, size: u32) -> Self {
        self.declared_size = Some(size);
        self
    }

    /// Produces the complete byte stream.
    pub fn build(&self) -> Vec<u8> {
        let size = self
            .declared_size
            .unwrap_or(4 + self.chunks.len() as u32);
        let mut bytes = Vec::with_capacity(12 + self.chunks.len());
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&size.to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(&self.chunks);
        bytes
    }
}

/// The 16 core bytes of a format chunk.
pub fn format_body(
    format_code: u16,
    channels: u16,
    sample_rate: u32,
    block_align: u16,
    bits_per_sample: u16,
) -> Vec<u8> {
    let byte_rate = sample_rate * u32::from(block_align);
    let mut body = Vec::with_capacity(16);
    body.extend_from_slice(&format_code.to_le_bytes());
    body.extend_from_slice(&channels.to_le_bytes());
    body.extend_from_slice(&sample_rate.to_le_bytes());
    body.extend_from_slice(&byte_rate.to_le_bytes());
    body.extend_from_slice(&block_align.to_le_bytes());
    body.extend_from_slice(&bits_per_sample.to_le_bytes());
    body
}

/// A mono 16-bit 8 kHz file holding `samples`.
pub fn mono16(samples: &[i16]) -> Vec<u8> {
    WavBuilder::new()
        .pcm_format(1, 8000, 16)
        .data16(samples)
        .build()
}

/// A temporary directory holding input files and receiving outputs.
pub struct WavFixture {
    pub root: TempDir,
}

impl WavFixture {
    /// Create a new empty fixture directory.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        Self { root }
    }

    /// Get the fixture root path.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Write an input file relative to the root, creating parent directories.
    pub fn add_file(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.root.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, bytes).expect("Failed to write input file");
        path
    }

    /// Read an output file relative to the root.
    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.root.path().join(name)).expect("Failed to read output file")
    }

    /// Whether a file exists relative to the root.
    pub fn exists(&self, name: &str) -> bool {
        self.root.path().join(name).exists()
    }
}

impl Default for WavFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_envelope_size() {
        let bytes = mono16(&[1, 2]);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        let declared = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        assert_eq!(declared as usize, bytes.len() - 8);
        assert_eq!(declared, 36 + 4);
    }

    #[test]
    fn test_fixture_files() {
        let fixture = WavFixture::new();
        let path = fixture.add_file("nested/a.wav", b"x");
        assert!(path.exists());
        assert!(fixture.exists("nested/a.wav"));
    }
}
