//! Diagnostic output setup.

use tracing::metadata::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Installs a stderr subscriber. `RUST_LOG` wins over the verbosity flag.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_line_number(false)
        .with_file(false)
        .try_init();
}
