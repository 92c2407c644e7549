//! CLI argument definitions for the wav2c command-line interface.
//!
//! The `#[derive(Parser)]` type is defined here, keeping `main.rs` focused on
//! dispatch logic.

use std::path::PathBuf;

use clap::Parser;
use wav2c_cli::commands::convert::ConvertOptions;
use wav2c_core::SessionConfig;

/// wav2c - Dump PCM samples of WAV files as text tables or C arrays
#[derive(Parser, Debug)]
#[command(name = "wav2c")]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// Print diagnostics (envelope, chunk headers, format fields) to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Print sample statistics after each data chunk
    #[arg(short, long)]
    pub statistics: bool,

    /// Write the sample table to <name>.txt instead of stdout
    #[arg(short = 'f', long = "to-file")]
    pub to_file: bool,

    /// Write a C array literal to <name>.c
    #[arg(short = 'c', long = "c-array")]
    pub c_array: bool,

    /// Print statistics as JSON
    #[arg(long, requires = "statistics")]
    pub json: bool,

    /// Directory for output files
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    /// WAV files (or directories containing them) to process, in order
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

impl Cli {
    /// Session and reporting options selected by the flags.
    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            session: SessionConfig {
                statistics: self.statistics,
                output_to_file: self.to_file,
                array_literal: self.c_array,
                verbose: self.verbose,
            },
            json: self.json,
            out_dir: self.out_dir.clone(),
        }
    }
}
