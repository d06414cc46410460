//! File naming and writing for generated artifacts.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::GenerationError;

/// Replace every character that is not alphanumeric, `-`, `_` or `.` with `_`.
///
/// ```
/// use vocab_enricher::generate::sanitize_file_stem;
///
/// assert_eq!(sanitize_file_stem("der Bär"), "der_Bär");
/// assert_eq!(sanitize_file_stem("a/b?"), "a_b_");
/// ```
pub fn sanitize_file_stem(word: &str) -> String {
    word.chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `<dir>/<sanitized word>_<suffix>.<extension>`
pub fn artifact_path(dir: &Path, word: &str, suffix: &str, extension: &str) -> PathBuf {
    dir.join(format!("{}_{suffix}.{extension}", sanitize_file_stem(word)))
}

/// Write `bytes` to `path` via a temp file in the same directory, creating
/// the directory if needed. A reader never sees a half-written artifact.
pub fn write_artifact(path: &Path, bytes: &[u8]) -> Result<(), GenerationError> {
    let io_err = |source| GenerationError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(io_err)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(bytes).map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
