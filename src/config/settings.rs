//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and handed to each
//! generator by value.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::paths::{sibling_dir, AppPaths, AUDIO_DIR_NAME, IMAGES_DIR_NAME};

/// Environment variable consulted when `llm.api_key` is not set.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Settings for the text-generation provider (sentences, transcriptions).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API.
    ///
    /// - OpenAI: `https://api.openai.com`
    /// - Ollama (OpenAI mode): `http://localhost:11434`
    pub base_url: String,
    /// API key, `None` for local providers. Also used by the primary
    /// speech provider.
    pub api_key: Option<String>,
    /// Model identifier sent to the API (e.g. `"gpt-4o-mini"`).
    pub model: String,
    /// Maximum seconds to wait for a completion before timing out.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            api_key: None,
            model: "gpt-4o-mini".into(),
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// Settings for the two speech-synthesis providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Base URL of the OpenAI-compatible `/v1/audio/speech` endpoint.
    pub base_url: String,
    /// TTS model name.
    pub model: String,
    /// Voice profile (`alloy`, `echo`, `fable`, `onyx`, `nova`, `shimmer`).
    pub voice: String,
    /// Playback rate; below 1.0 slows the word down for learners.
    pub speed: f32,
    /// Base URL of the Google Translate TTS fallback.
    pub fallback_url: String,
    /// Language code passed to the fallback provider.
    pub fallback_language: String,
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            model: "tts-1".into(),
            voice: "alloy".into(),
            speed: 0.9,
            fallback_url: "https://translate.google.com".into(),
            fallback_language: "de".into(),
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// ImageConfig
// ---------------------------------------------------------------------------

/// Settings for the icon and photo search providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Iconify API base URL.
    pub iconify_url: String,
    /// Pexels API base URL.
    pub pexels_url: String,
    /// Pexels API key. Photo search is skipped when this is `None`.
    pub pexels_api_key: Option<String>,
    /// Edge length in pixels of the rasterised icon.
    pub icon_size: u32,
    pub timeout_secs: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            iconify_url: "https://api.iconify.design".into(),
            pexels_url: "https://api.pexels.com".into(),
            pexels_api_key: None,
            icon_size: 300,
            timeout_secs: 15,
        }
    }
}

// ---------------------------------------------------------------------------
// RunConfig
// ---------------------------------------------------------------------------

/// Pacing and length limits of a single enrichment run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Pause after every processed row, in milliseconds.
    pub row_delay_ms: u64,
    /// Maximum number of rows processed (persisted) per run.
    pub max_rows: usize,
    /// Attempts made to persist the table after a row before giving up.
    pub save_attempts: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            row_delay_ms: 2_000,
            max_rows: 500,
            save_attempts: 2,
        }
    }
}

// ---------------------------------------------------------------------------
// OutputConfig
// ---------------------------------------------------------------------------

/// Where generated artifacts are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Images directory. `None` means `word_images/` next to the input file.
    pub images_dir: Option<PathBuf>,
    /// Audio directory. `None` means `word_audio/` next to the input file.
    pub audio_dir: Option<PathBuf>,
}

impl OutputConfig {
    pub fn images_dir_for(&self, input: &Path) -> PathBuf {
        self.images_dir
            .clone()
            .unwrap_or_else(|| sibling_dir(input, IMAGES_DIR_NAME))
    }

    pub fn audio_dir_for(&self, input: &Path) -> PathBuf {
        self.audio_dir
            .clone()
            .unwrap_or_else(|| sibling_dir(input, AUDIO_DIR_NAME))
    }
}

// ---------------------------------------------------------------------------
// ColumnNames
// ---------------------------------------------------------------------------

/// Header names of the seven logical columns in the vocabulary file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub word: String,
    pub translation: String,
    pub level: String,
    pub sentence: String,
    pub pronunciation: String,
    pub audio_path: String,
    pub image_path: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            word: "word".into(),
            translation: "translation".into(),
            level: "level".into(),
            sentence: "sentence".into(),
            pronunciation: "pronunciation".into(),
            audio_path: "audioPath".into(),
            image_path: "imagePath".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level configuration, serialised as `settings.toml`.
///
/// Every section falls back to its defaults when omitted, so a file that
/// only sets `[llm] api_key = "..."` is valid.
///
/// ```rust,no_run
/// use vocab_enricher::config::AppConfig;
///
/// let config = AppConfig::load().unwrap().with_env_api_key();
/// assert_eq!(config.run.max_rows, 500);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Text-generation provider settings.
    pub llm: LlmConfig,
    /// Speech-synthesis provider settings.
    pub speech: SpeechConfig,
    /// Image-search provider settings.
    pub images: ImageConfig,
    /// Run pacing and cap.
    pub run: RunConfig,
    /// Artifact output directories.
    pub output: OutputConfig,
    /// Column header names.
    pub columns: ColumnNames,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Fill `llm.api_key` from `OPENAI_API_KEY` when the file left it unset.
    pub fn with_env_api_key(self) -> Self {
        self.with_api_key_from(std::env::var(API_KEY_ENV).ok())
    }

    fn with_api_key_from(mut self, key: Option<String>) -> Self {
        let unset = self.llm.api_key.as_deref().map_or(true, str::is_empty);
        if unset {
            self.llm.api_key = key.filter(|k| !k.is_empty());
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
