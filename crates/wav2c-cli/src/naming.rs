//! Output file names and C identifiers derived from input paths.

use std::path::Path;

use wav2c_core::RenderMode;

/// Longest basename or identifier produced.
pub const MAX_NAME_LEN: usize = 29;

/// Identifier used when nothing usable is left of the file name.
const FALLBACK_IDENTIFIER: &str = "WAVE";

/// Basename used when the file name has no stem.
const FALLBACK_BASENAME: &str = "output";

/// Names derived from one input path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    /// Sanitized file stem, used for the output file.
    pub basename: String,
    /// Upper-case C identifier, used in array-literal output.
    pub identifier: String,
}

impl OutputNames {
    /// Derives both names from `path`.
    pub fn from_path(path: &Path) -> Self {
        let basename = basename(path);
        let identifier = identifier(&basename);
        Self {
            basename,
            identifier,
        }
    }

    /// Output file name for a rendering mode: `.c` for arrays, `.txt` for tables.
    pub fn output_file_name(&self, mode: RenderMode) -> String {
        let suffix = match mode {
            RenderMode::ArrayLiteral => "c",
            RenderMode::Tabular => "txt",
        };
        format!("{}.{}", self.basename, suffix)
    }
}

/// File stem of `path` with every non-alphanumeric character replaced by `_`.
pub fn basename(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let sanitized: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .take(MAX_NAME_LEN)
        .collect();

    if sanitized.is_empty() {
        FALLBACK_BASENAME.to_string()
    } else {
        sanitized
    }
}

/// Upper-case identifier built from a sanitized basename.
///
/// Underscores are dropped, and a leading digit `d` becomes the letter `'A' + d`
/// so the result is a valid C identifier.
pub fn identifier(basename: &str) -> String {
    let mut ident: String = basename
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .take(MAX_NAME_LEN)
        .collect();

    if let Some(first) = ident.chars().next() {
        if let Some(digit) = first.to_digit(10) {
            let letter = char::from(b'A' + digit as u8);
            ident.replace_range(..1, &letter.to_string());
        }
    }

    if ident.is_empty() {
        FALLBACK_IDENTIFIER.to_string()
    } else {
        ident
    }
}
