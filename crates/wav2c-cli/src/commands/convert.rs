//! Convert command implementation
//!
//! Decodes each input WAV file and writes its samples as a numeric table or
//! as a C array literal. Files are processed one at a time; a failure is
//! reported for that file and processing continues with the next one.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, warn};

use wav2c_core::{DecodeSession, DecodeSummary, RenderMode, SessionConfig};

use crate::input::expand_inputs;
use crate::naming::OutputNames;

/// Options for a convert run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Per-file session configuration.
    pub session: SessionConfig,
    /// Print statistics as JSON instead of text.
    pub json: bool,
    /// Directory receiving output files.
    pub out_dir: PathBuf,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            json: false,
            out_dir: PathBuf::from("."),
        }
    }
}

/// Outcome of one successfully converted file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Input path as given.
    pub input: PathBuf,
    /// Output file, if rendering went to a file.
    pub output: Option<PathBuf>,
    /// Array identifier, in array-literal mode.
    pub identifier: Option<String>,
    /// Decoder summary.
    #[serde(flatten)]
    pub summary: DecodeSummary,
}

/// Whether rendered samples go to a file rather than stdout.
///
/// Array-literal output always goes to a `.c` file.
pub fn writes_to_file(config: &SessionConfig) -> bool {
    config.output_to_file || config.array_literal
}

/// Output file for `path`, or `None` when rendering goes to stdout.
pub fn output_path(path: &Path, options: &ConvertOptions) -> Option<PathBuf> {
    if !writes_to_file(&options.session) {
        return None;
    }
    let names = OutputNames::from_path(path);
    Some(
        options
            .out_dir
            .join(names.output_file_name(options.session.render_mode())),
    )
}

/// Run the convert command
///
/// # Arguments
/// * `inputs` - Files or directories to convert
/// * `options` - Session and reporting options
///
/// # Returns
/// Exit code: 0 if every file converted, 1 otherwise
pub fn run(inputs: &[PathBuf], options: &ConvertOptions) -> Result<ExitCode> {
    let files = expand_inputs(inputs);
    if files.is_empty() {
        anyhow::bail!("No .wav files found in the given inputs");
    }

    let mut written: HashSet<PathBuf> = HashSet::new();
    let mut failures = 0usize;
    for file in &files {
        if options.session.verbose {
            debug!(file = %file.display(), "processing");
        }

        let output = output_path(file, options);
        let result = match output.as_ref() {
            Some(out) if written.contains(out) => Err(anyhow::anyhow!(
                "Output {} was already written by an earlier input in this run",
                out.display()
            )),
            _ => process_file(file, options),
        };

        match result {
            Ok(report) => {
                if let Some(out) = output {
                    written.insert(out);
                }
                if options.session.statistics && options.json {
                    print!("{}", render_statistics(&report, true)?);
                }
            }
            Err(e) => {
                failures += 1;
                eprintln!("{} {}: {:#}", "error:".red().bold(), file.display(), e);
            }
        }
    }

    if failures > 0 {
        eprintln!(
            "{} {} of {} file(s) failed",
            "FAILED".red().bold(),
            failures,
            files.len()
        );
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Converts a single file.
///
/// With statistics in text mode, each data chunk's report is printed to
/// stdout right after that chunk's samples. The input and output handles are
/// closed on every path; a partially written output file is removed when
/// decoding fails.
pub fn process_file(path: &Path, options: &ConvertOptions) -> Result<FileReport> {
    let config = options.session;
    let input =
        File::open(path).with_context(|| format!("Failed to open input: {}", path.display()))?;
    let reader = BufReader::new(input);

    let names = OutputNames::from_path(path);
    let identifier = match config.render_mode() {
        RenderMode::ArrayLiteral => Some(names.identifier.clone()),
        RenderMode::Tabular => None,
    };
    if config.verbose {
        debug!(
            basename = %names.basename,
            identifier = identifier.as_deref().unwrap_or(""),
            "output names"
        );
    }
    let ident = identifier.as_deref().unwrap_or("");
    let print_text_statistics = config.statistics && !options.json;

    let Some(output_path) = output_path(path, options) else {
        let sink = BufWriter::new(io::stdout().lock());
        let summary = session(reader, sink, config, ident, print_text_statistics).run()?;
        return Ok(FileReport {
            input: path.to_path_buf(),
            output: None,
            identifier,
            summary,
        });
    };

    let output = File::create(&output_path)
        .with_context(|| format!("Failed to create output: {}", output_path.display()))?;

    match session(reader, BufWriter::new(output), config, ident, print_text_statistics).run() {
        Ok(summary) => Ok(FileReport {
            input: path.to_path_buf(),
            output: Some(output_path),
            identifier,
            summary,
        }),
        Err(err) => {
            if let Err(rm) = fs::remove_file(&output_path) {
                warn!(
                    path = %output_path.display(),
                    error = %rm,
                    "could not remove partial output"
                );
            }
            Err(err.into())
        }
    }
}

fn session<'a, R: Read, W: Write>(
    reader: R,
    sink: W,
    config: SessionConfig,
    identifier: &'a str,
    print_statistics: bool,
) -> DecodeSession<'a, R, W> {
    let session = DecodeSession::new(reader, sink, config, identifier);
    if !print_statistics {
        return session;
    }
    session.on_data_chunk(|chunk| {
        if let Some(stats) = &chunk.statistics {
            print!("{}", stats);
        }
    })
}

/// Formats the statistics of a converted file.
///
/// Text mode prints one block per data chunk that decoded at least one
/// sample; JSON mode prints the whole report.
pub fn render_statistics(report: &FileReport, json: bool) -> Result<String> {
    if json {
        let mut text = serde_json::to_string_pretty(report)?;
        text.push('\n');
        return Ok(text);
    }

    Ok(report
        .summary
        .data_chunks
        .iter()
        .filter_map(|chunk| chunk.statistics.as_ref())
        .map(|stats| stats.to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn mono16_wav(values: &[i16]) -> Vec<u8> {
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let mut wav = Vec::new();
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data.len() as u32).to_le_bytes());
        wav.extend_from_slice(b"WAVE");
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&8000u32.to_le_bytes());
        wav.extend_from_slice(&16000u32.to_le_bytes());
        wav.extend_from_slice(&2u16.to_le_bytes());
        wav.extend_from_slice(&16u16.to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&(data.len() as u32).to_le_bytes());
        wav.extend_from_slice(&data);
        wav
    }

    fn options(dir: &TempDir, session: SessionConfig) -> ConvertOptions {
        ConvertOptions {
            session,
            json: false,
            out_dir: dir.path().to_path_buf(),
        }
    }

    #[test]
    fn test_writes_to_file() {
        assert!(!writes_to_file(&SessionConfig::default()));
        assert!(writes_to_file(&SessionConfig {
            output_to_file: true,
            ..SessionConfig::default()
        }));
        assert!(writes_to_file(&SessionConfig {
            array_literal: true,
            ..SessionConfig::default()
        }));
    }

    #[test]
    fn test_tabular_to_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("beep.wav");
        fs::write(&input, mono16_wav(&[100, -50])).unwrap();

        let session = SessionConfig {
            output_to_file: true,
            ..SessionConfig::default()
        };
        let report = process_file(&input, &options(&dir, session)).unwrap();

        let output = report.output.unwrap();
        assert_eq!(output, dir.path().join("beep.txt"));
        assert_eq!(fs::read_to_string(output).unwrap(), "   100\n   -50\n");
        assert!(report.identifier.is_none());
    }

    #[test]
    fn test_array_literal_to_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("door-bell.wav");
        fs::write(&input, mono16_wav(&[1, 2, 3])).unwrap();

        let session = SessionConfig {
            array_literal: true,
            ..SessionConfig::default()
        };
        let report = process_file(&input, &options(&dir, session)).unwrap();

        assert_eq!(report.identifier.as_deref(), Some("DOORBELL"));
        let text = fs::read_to_string(dir.path().join("door_bell.c")).unwrap();
        assert!(text.contains("#define DOORBELL_SIZE (3)\n"));
        assert!(text.ends_with("}; // DOORBELL\n"));
    }

    #[test]
    fn test_failed_decode_removes_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("broken.wav");
        let mut wav = mono16_wav(&[1, 2]);
        wav[20] = 2; // format code: not PCM
        fs::write(&input, wav).unwrap();

        let session = SessionConfig {
            output_to_file: true,
            ..SessionConfig::default()
        };
        let err = process_file(&input, &options(&dir, session)).unwrap_err();
        assert!(err.to_string().contains("unsupported codec"));
        assert!(!dir.path().join("broken.txt").exists());
    }

    #[test]
    fn test_missing_input() {
        let dir = TempDir::new().unwrap();
        let err = process_file(
            &dir.path().join("nope.wav"),
            &options(&dir, SessionConfig::default()),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Failed to open input"));
    }

    #[test]
    fn test_statistics_text_and_json() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("tone.wav");
        fs::write(&input, mono16_wav(&[100, -50])).unwrap();

        let session = SessionConfig {
            statistics: true,
            output_to_file: true,
            ..SessionConfig::default()
        };
        let report = process_file(&input, &options(&dir, session)).unwrap();

        let text = render_statistics(&report, false).unwrap();
        assert!(text.starts_with("samples:       2 ="));
        assert!(text.contains("signed:   minimal=   -50 maximal=   100 average=   25.0"));

        let json: serde_json::Value =
            serde_json::from_str(&render_statistics(&report, true).unwrap()).unwrap();
        assert_eq!(json["format"]["sample_rate"], 8000);
        assert_eq!(json["data_chunks"][0]["statistics"]["signed"]["min"], -50);
        assert_eq!(json["data_chunks"][0]["frames"], 2);
    }

    #[test]
    fn test_output_path() {
        let dir = TempDir::new().unwrap();
        let input = Path::new("in/door-bell.wav");
        assert_eq!(output_path(input, &options(&dir, SessionConfig::default())), None);

        let session = SessionConfig {
            array_literal: true,
            ..SessionConfig::default()
        };
        assert_eq!(
            output_path(input, &options(&dir, session)),
            Some(dir.path().join("door_bell.c"))
        );
    }

    #[test]
    fn test_run_rejects_output_collision() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("a").join("tone.wav");
        let second = dir.path().join("b").join("tone.wav");
        fs::create_dir_all(first.parent().unwrap()).unwrap();
        fs::create_dir_all(second.parent().unwrap()).unwrap();
        fs::write(&first, mono16_wav(&[1])).unwrap();
        fs::write(&second, mono16_wav(&[2])).unwrap();

        let session = SessionConfig {
            output_to_file: true,
            ..SessionConfig::default()
        };
        let code = run(&[first, second], &options(&dir, session)).unwrap();

        assert_eq!(format!("{:?}", code), format!("{:?}", ExitCode::from(1)));
        // The earlier input keeps its output.
        assert_eq!(
            fs::read_to_string(dir.path().join("tone.txt")).unwrap(),
            "     1\n"
        );
    }

    #[test]
    fn test_run_reports_failure_exit_code() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.wav");
        let bad = dir.path().join("bad.wav");
        fs::write(&good, mono16_wav(&[1])).unwrap();
        fs::write(&bad, b"not a wave file").unwrap();

        let session = SessionConfig {
            output_to_file: true,
            ..SessionConfig::default()
        };
        let code = run(&[bad, good], &options(&dir, session)).unwrap();
        assert_eq!(format!("{:?}", code), format!("{:?}", ExitCode::from(1)));
        // The failure does not stop the next file.
        assert!(dir.path().join("good.txt").exists());
        assert!(!dir.path().join("bad.txt").exists());
    }
}
