//! Configuration module.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for each provider
//! family and the run loop, `AppPaths` for the platform config directory, and
//! TOML persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::{AppPaths, AUDIO_DIR_NAME, IMAGES_DIR_NAME};
pub use settings::{
    AppConfig, ColumnNames, ImageConfig, LlmConfig, OutputConfig, RunConfig, SpeechConfig,
    API_KEY_ENV,
};
