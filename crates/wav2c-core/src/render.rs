//! Rendering of decoded samples as a numeric table or a C array literal.

use std::io::{self, Write};

use crate::format::FormatDescriptor;

/// How decoded samples are written to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// One fixed-width decimal per sample, one frame per line.
    #[default]
    Tabular,
    /// A `#define`d size, a typed array declaration and one row per frame.
    ArrayLiteral,
}

/// Width of every rendered value.
const VALUE_WIDTH: usize = 6;

/// Element count declared in the `<ID>_SIZE` constant.
///
/// Reproduces `(data_size - block_align - 1) * (bits / 8) / block_align`
/// exactly, floor-divided in signed arithmetic. It is one short of the
/// frames actually rendered for typical inputs, and negative for chunks
/// smaller than one block plus one byte.
///
/// The negative result differs from unsigned 32-bit evaluation of the same
/// expression, which wraps (a 2-byte chunk with 2-byte blocks would declare
/// `2147483647`).
pub fn declared_element_count(data_size: u32, block_align: u16, bits_per_sample: u16) -> i64 {
    if block_align == 0 {
        return 0;
    }
    let numerator = (i64::from(data_size) - i64::from(block_align) - 1)
        * i64::from(bits_per_sample / 8);
    numerator.div_euclid(i64::from(block_align))
}

/// Writes samples of one data chunk to a sink.
///
/// Holds only a per-row cursor; nothing survives past the chunk.
pub struct OutputRenderer<'a, W: Write> {
    sink: &'a mut W,
    mode: RenderMode,
    identifier: &'a str,
    values_in_row: usize,
}

impl<'a, W: Write> OutputRenderer<'a, W> {
    /// Creates a renderer. `identifier` is only used in array-literal mode.
    pub fn new(sink: &'a mut W, mode: RenderMode, identifier: &'a str) -> Self {
        Self {
            sink,
            mode,
            identifier,
            values_in_row: 0,
        }
    }

    /// Active rendering mode.
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Emits the array-literal header; a no-op in tabular mode.
    pub fn begin(&mut self, format: &FormatDescriptor, data_size: u32) -> io::Result<()> {
        if self.mode != RenderMode::ArrayLiteral {
            return Ok(());
        }

        writeln!(self.sink, "#include <stdint.h>")?;
        if format.channels > 1 {
            writeln!(self.sink, "/* Even: channel 1 | Odd: channel 2 */\n")?;
        }
        let size =
            declared_element_count(data_size, format.block_align, format.bits_per_sample);
        writeln!(self.sink, "#define {}_SIZE ({})", self.identifier, size)?;
        writeln!(
            self.sink,
            "uint{}_t {}[] = {{",
            format.bits_per_sample, self.identifier
        )
    }

    /// Emits one sample value on the current row.
    pub fn value(&mut self, value: i16) -> io::Result<()> {
        match self.mode {
            RenderMode::Tabular => write!(self.sink, "{:>width$}", value, width = VALUE_WIDTH)?,
            RenderMode::ArrayLiteral => {
                write!(self.sink, "{:>width$}, ", value, width = VALUE_WIDTH)?
            }
        }
        self.values_in_row += 1;
        Ok(())
    }

    /// Closes the current row.
    pub fn end_frame(&mut self) -> io::Result<()> {
        self.values_in_row = 0;
        self.sink.write_all(b"\n")
    }

    /// Emits the array-literal footer; a no-op in tabular mode.
    pub fn finish(&mut self) -> io::Result<()> {
        if self.values_in_row > 0 {
            self.end_frame()?;
        }
        match self.mode {
            RenderMode::Tabular => Ok(()),
            RenderMode::ArrayLiteral => writeln!(self.sink, "}}; // {}", self.identifier),
        }
    }
}
