//! Per-file decoding session: envelope check followed by the chunk loop.

use std::io::{Read, Write};

use serde::Serialize;
use tracing::debug;

use crate::chunk::{read_chunk_header, skip_chunk, ChunkHeader, ChunkKind};
use crate::container::read_envelope;
use crate::data::{read_data_chunk, DataChunkSummary};
use crate::error::{DecodeError, DecodeResult};
use crate::format::{read_format_chunk, FormatDescriptor};
use crate::render::{OutputRenderer, RenderMode};

/// Options for one session, supplied by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Report statistics after each data chunk.
    pub statistics: bool,
    /// Write rendered samples to a file instead of the default sink.
    pub output_to_file: bool,
    /// Render a C array literal instead of a table.
    pub array_literal: bool,
    /// Emit diagnostic events.
    pub verbose: bool,
}

impl SessionConfig {
    /// Rendering mode selected by these options.
    pub fn render_mode(&self) -> RenderMode {
        if self.array_literal {
            RenderMode::ArrayLiteral
        } else {
            RenderMode::Tabular
        }
    }
}

/// Structural chunks processed so far, as a bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeState(u8);

impl DecodeState {
    /// A format chunk has been parsed.
    pub const FORMAT: DecodeState = DecodeState(1 << 0);
    /// A data chunk has been decoded.
    pub const DATA: DecodeState = DecodeState(1 << 1);

    /// Whether every flag of `other` is set.
    pub fn contains(self, other: DecodeState) -> bool {
        self.0 & other.0 == other.0
    }

    /// Sets the flags of `other`.
    pub fn insert(&mut self, other: DecodeState) {
        self.0 |= other.0;
    }
}

/// Everything a successful session produced, apart from the rendered text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodeSummary {
    /// Size declared in the RIFF envelope.
    pub declared_size: u32,
    /// Parsed format descriptor, if a format chunk was present.
    pub format: Option<FormatDescriptor>,
    /// One entry per data chunk, in stream order.
    pub data_chunks: Vec<DataChunkSummary>,
    /// Tags of chunks that were skipped.
    pub skipped_chunks: Vec<String>,
}

/// Callback run after each decoded data chunk.
pub type DataChunkObserver<'a> = Box<dyn FnMut(&DataChunkSummary) + 'a>;

/// Decodes one RIFF/WAVE stream into a sink.
pub struct DecodeSession<'a, R, W> {
    reader: R,
    sink: W,
    config: SessionConfig,
    identifier: &'a str,
    state: DecodeState,
    format: Option<FormatDescriptor>,
    on_data_chunk: Option<DataChunkObserver<'a>>,
}

impl<'a, R: Read, W: Write> DecodeSession<'a, R, W> {
    /// Creates a session. `identifier` names the array in array-literal mode.
    pub fn new(reader: R, sink: W, config: SessionConfig, identifier: &'a str) -> Self {
        Self {
            reader,
            sink,
            config,
            identifier,
            state: DecodeState::default(),
            format: None,
            on_data_chunk: None,
        }
    }

    /// Registers a callback invoked after each data chunk, once its rendered
    /// samples have been flushed to the sink.
    pub fn on_data_chunk(mut self, observer: impl FnMut(&DataChunkSummary) + 'a) -> Self {
        self.on_data_chunk = Some(Box::new(observer));
        self
    }

    /// Validates the envelope and dispatches every chunk until end of stream.
    ///
    /// The first error aborts the session.
    pub fn run(mut self) -> DecodeResult<DecodeSummary> {
        let declared_size = read_envelope(&mut self.reader)?;
        if self.config.verbose {
            debug!(
                declared_size,
                file_size = u64::from(declared_size) + 8,
                "RIFF envelope"
            );
        }

        let mut summary = DecodeSummary {
            declared_size,
            format: None,
            data_chunks: Vec::new(),
            skipped_chunks: Vec::new(),
        };

        while let Some(header) = read_chunk_header(&mut self.reader)? {
            if self.config.verbose {
                debug!(tag = %header.tag_display(), size = header.size, "chunk");
            }
            match header.kind() {
                ChunkKind::Format => summary.format = Some(self.handle_format(&header)?),
                ChunkKind::Data => summary.data_chunks.push(self.handle_data(&header)?),
                ChunkKind::Other(_) => {
                    skip_chunk(&mut self.reader, &header, self.config.verbose)?;
                    summary.skipped_chunks.push(header.tag_display());
                }
            }
        }

        self.sink.flush()?;
        Ok(summary)
    }

    fn handle_format(&mut self, header: &ChunkHeader) -> DecodeResult<FormatDescriptor> {
        if self.state.contains(DecodeState::FORMAT) {
            return Err(DecodeError::DuplicateFormatChunk);
        }
        let format = read_format_chunk(&mut self.reader, header, self.config.verbose)?;
        self.format = Some(format);
        self.state.insert(DecodeState::FORMAT);
        Ok(format)
    }

    fn handle_data(&mut self, header: &ChunkHeader) -> DecodeResult<DataChunkSummary> {
        if !self.state.contains(DecodeState::FORMAT) {
            return Err(DecodeError::ChunkOrder);
        }
        let format = self.format.ok_or(DecodeError::ChunkOrder)?;

        let mut renderer =
            OutputRenderer::new(&mut self.sink, self.config.render_mode(), self.identifier);
        let summary = read_data_chunk(
            &mut self.reader,
            header,
            &format,
            &mut renderer,
            self.config.statistics,
            self.config.verbose,
        )?;
        self.state.insert(DecodeState::DATA);

        if let Some(observer) = self.on_data_chunk.as_mut() {
            self.sink.flush()?;
            observer(&summary);
        }
        Ok(summary)
    }
}

/// Decodes `reader` into `sink` with a fresh session.
pub fn decode<R: Read, W: Write>(
    reader: R,
    sink: W,
    config: &SessionConfig,
    identifier: &str,
) -> DecodeResult<DecodeSummary> {
    DecodeSession::new(reader, sink, *config, identifier).run()
}

/// Decodes an in-memory file and returns the summary with the rendered text.
pub fn decode_to_vec(
    data: &[u8],
    config: &SessionConfig,
    identifier: &str,
) -> DecodeResult<(DecodeSummary, Vec<u8>)> {
    let mut rendered = Vec::new();
    let summary = decode(data, &mut rendered, config, identifier)?;
    Ok((summary, rendered))
}
