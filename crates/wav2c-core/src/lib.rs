//! wav2c decoding engine
//!
//! This crate decodes RIFF/WAVE files chunk by chunk and renders their PCM
//! samples either as a plain numeric table or as a C array literal.
//!
//! # Overview
//!
//! A file is decoded by a [`DecodeSession`]:
//!
//! 1. The 12-byte `RIFF`/`WAVE` envelope is validated.
//! 2. Chunk headers are read one after another and dispatched by tag:
//!    - `fmt ` populates the [`FormatDescriptor`]
//!    - `data` is decoded frame by frame, feeding the statistics and the renderer
//!    - anything else is skipped
//! 3. The stream ends cleanly when no further header byte is available.
//!
//! Only PCM with 8 or 16 bits per sample is decoded. The first error aborts
//! the session; nothing is retried.
//!
//! # Example
//!
//! ```ignore
//! use wav2c_core::{decode, SessionConfig};
//!
//! let file = std::fs::File::open("beep.wav")?;
//! let config = SessionConfig { statistics: true, ..SessionConfig::default() };
//! let summary = decode(file, std::io::stdout().lock(), &config, "BEEP")?;
//!
//! for chunk in &summary.data_chunks {
//!     if let Some(stats) = &chunk.statistics {
//!         print!("{}", stats);
//!     }
//! }
//! ```
//!
//! # Crate Structure
//!
//! - [`bytes`] - Little-endian integer decoding
//! - [`container`] - RIFF/WAVE envelope validation
//! - [`chunk`] - Chunk headers, tag dispatch and the skip handler
//! - [`format`] - Format chunk parsing
//! - [`data`] - Data chunk decoding
//! - [`stats`] - Running statistics
//! - [`render`] - Table and array-literal output
//! - [`session`] - Per-file decoding session

pub mod bytes;
pub mod chunk;
pub mod container;
pub mod data;
pub mod error;
pub mod format;
pub mod render;
pub mod session;
pub mod stats;

// Re-export main types at crate root
pub use data::DataChunkSummary;
pub use error::{ContainerFormatReason, DecodeError, DecodeResult};
pub use format::FormatDescriptor;
pub use render::{OutputRenderer, RenderMode};
pub use session::{
    decode, decode_to_vec, DataChunkObserver, DecodeSession, DecodeState, DecodeSummary,
    SessionConfig,
};
pub use stats::{RunningStatistics, Sample, StatisticsReport};
