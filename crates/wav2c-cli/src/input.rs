//! Expansion of command-line inputs into the list of files to process.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Returns true if `path` has a `.wav` extension (any case).
pub fn is_wav_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("wav"))
}

/// Expands the given inputs in order.
///
/// Directories are walked recursively and contribute their `.wav` files in
/// sorted order. Any other path is kept as given, even if it does not exist,
/// so that the failure is reported for that file alone.
pub fn expand_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(input)
                .min_depth(1)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file() && is_wav_path(e.path()))
                .map(|e| e.into_path())
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    files
}
