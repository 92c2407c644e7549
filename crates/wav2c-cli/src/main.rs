//! wav2c CLI - WAV sample dumper
//!
//! Reads RIFF/WAVE files and prints their PCM samples as a numeric table or
//! writes them as C array literals.

mod cli_args;

use clap::Parser;
use cli_args::Cli;
use std::process::ExitCode;

use wav2c_cli::{commands, logging};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = commands::convert::run(&cli.files, &cli.convert_options());

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
