//! Sample data chunk (`data`).

use std::io::{Read, Write};

use serde::Serialize;
use tracing::debug;

use crate::bytes::u16_at;
use crate::chunk::{ChunkBody, ChunkHeader};
use crate::error::{DecodeError, DecodeResult};
use crate::format::FormatDescriptor;
use crate::render::OutputRenderer;
use crate::stats::{RunningStatistics, Sample, StatisticsReport};

/// What one data chunk produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataChunkSummary {
    /// Declared chunk size in bytes.
    pub data_size: u32,
    /// Sample frames rendered (one output line each).
    pub frames: u64,
    /// Scalar samples across all channels.
    pub samples: u64,
    /// BLAKE3 hash of the PCM bytes.
    pub pcm_hash: String,
    /// Statistics, when requested and at least one sample was decoded.
    pub statistics: Option<StatisticsReport>,
}

/// Decodes a data chunk frame by frame, rendering every sample.
///
/// The chunk body is consumed in blocks of `block_align` bytes; a trailing
/// partial block is a truncation. Unsupported bit depths are only detected
/// when the first sample is extracted.
pub fn read_data_chunk<R: Read, W: Write>(
    reader: &mut R,
    header: &ChunkHeader,
    format: &FormatDescriptor,
    renderer: &mut OutputRenderer<'_, W>,
    report_statistics: bool,
    verbose: bool,
) -> DecodeResult<DataChunkSummary> {
    if verbose {
        debug!(data_size = header.size, "data chunk");
    }

    if !format.is_pcm() {
        return Err(DecodeError::UnsupportedCodec {
            format_code: format.format_code,
        });
    }
    if format.block_align == 0 {
        return Err(DecodeError::InvalidBlockAlignment {
            block_align: 0,
            required: 1,
        });
    }

    renderer.begin(format, header.size)?;

    let block_len = usize::from(format.block_align);
    let mut block = vec![0u8; block_len];
    let mut body = ChunkBody::new(reader, header);
    let mut stats = RunningStatistics::new();
    let mut hasher = blake3::Hasher::new();
    let mut frames = 0u64;

    while body.remaining() > 0 {
        // A trailing partial block: report the frame size against what is left.
        if body.remaining() < block_len as u64 {
            return Err(DecodeError::truncated_body(
                &header.tag,
                block_len as u64,
                body.remaining(),
            ));
        }
        body.read_exact(&mut block)?;
        hasher.update(&block);

        for channel in 0..usize::from(format.channels) {
            let sample = extract_sample(&block, channel, format)?;
            stats.record(sample);
            renderer.value(sample.signed)?;
        }
        renderer.end_frame()?;
        frames += 1;
    }

    renderer.finish()?;

    let statistics = if report_statistics {
        stats.report(format.sample_rate)
    } else {
        None
    };

    Ok(DataChunkSummary {
        data_size: header.size,
        frames,
        samples: stats.count(),
        pcm_hash: hasher.finalize().to_hex().to_string(),
        statistics,
    })
}

/// Extracts the sample of `channel` from one block.
fn extract_sample(block: &[u8], channel: usize, format: &FormatDescriptor) -> DecodeResult<Sample> {
    let width = match format.bits_per_sample {
        16 => 2,
        8 => 1,
        bits => return Err(DecodeError::UnsupportedBitDepth { bits }),
    };

    let offset = channel * width;
    let Some(bytes) = block.get(offset..offset + width) else {
        return Err(DecodeError::InvalidBlockAlignment {
            block_align: format.block_align,
            required: u32::from(format.channels) * width as u32,
        });
    };

    Ok(match width {
        2 => Sample::from_pcm16(u16_at(bytes, 0)),
        _ => Sample::from_pcm8(bytes[0]),
    })
}
