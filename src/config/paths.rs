//! Where things live on disk.
//!
//! Two kinds of location matter:
//!
//! - the settings file, resolved once per platform through `dirs`
//!   (`~/.config/vocab-enricher/settings.toml` on Linux,
//!   `~/Library/Application Support/vocab-enricher/` on macOS,
//!   `%APPDATA%\vocab-enricher\` on Windows);
//! - the artifact directories, which default to siblings of the vocabulary
//!   file so a table and its media travel together.

use std::path::{Path, PathBuf};

const APP_NAME: &str = "vocab-enricher";
const SETTINGS_FILE: &str = "settings.toml";

/// Default audio directory name, next to the input table.
pub const AUDIO_DIR_NAME: &str = "word_audio";
/// Default images directory name, next to the input table.
pub const IMAGES_DIR_NAME: &str = "word_images";

/// Platform config location.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub settings_file: PathBuf,
}

impl AppPaths {
    /// Falls back to `./vocab-enricher/` when the platform has no config dir.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_NAME);
        Self {
            settings_file: config_dir.join(SETTINGS_FILE),
            config_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

/// `name` in the directory holding `input`; a bare file name resolves
/// against the working directory.
pub fn sibling_dir(input: &Path, name: &str) -> PathBuf {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(name),
        _ => PathBuf::from(name),
    }
}
