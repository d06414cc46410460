//! Derived-field generators.
//!
//! Every generator is an independent, stateless function from a row's
//! source fields to one derived value, behind the [`FieldGenerator`] trait:
//!
//! | Field           | Generator                  | Backed by                         |
//! |-----------------|----------------------------|-----------------------------------|
//! | `sentence`      | [`SentenceGenerator`]      | [`TextProvider`]                  |
//! | `pronunciation` | [`PronunciationGenerator`] | [`TextProvider`]                  |
//! | `audioPath`     | [`AudioGenerator`]         | [`SpeechChain`] (OpenAI → Google) |
//! | `imagePath`     | [`ImageGenerator`]         | [`ImageChain`] (Iconify → Pexels) + placeholder |
//!
//! [`Generators`] bundles one of each for the enrichment loop.

pub mod artifact;
pub mod audio;
pub mod illustration;
pub mod placeholder;
pub mod prompt;
pub mod pronunciation;
pub mod sentence;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::AppConfig;
use crate::provider::{
    GoogleTranslateSpeech, IconifyProvider, ImageChain, OpenAiChat, OpenAiSpeech, PexelsProvider,
    ProviderError, SpeechChain, TextProvider,
};
use crate::table::{Entry, Field};

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use artifact::{artifact_path, sanitize_file_stem, write_artifact};
pub use audio::{looks_like_mp3, AudioGenerator};
pub use illustration::ImageGenerator;
pub use placeholder::{palette_color, render_placeholder};
pub use pronunciation::{normalize_transcription, PronunciationGenerator};
pub use sentence::{clean_sentence, SentenceGenerator};

// ---------------------------------------------------------------------------
// GenerationError
// ---------------------------------------------------------------------------

/// A single generator call failed. Never fatal to the row.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The backing provider (or every provider of a chain) failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The provider answered, but nothing usable was left after cleanup.
    #[error("generator produced an empty result")]
    EmptyResult,

    /// An artifact could not be written.
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The placeholder image could not be rendered or encoded.
    #[error("cannot encode image: {0}")]
    Encode(String),
}

// ---------------------------------------------------------------------------
// FieldGenerator trait
// ---------------------------------------------------------------------------

/// Produces one derived value for a row.
///
/// Implementations must not return an empty or blank string on success.
#[async_trait]
pub trait FieldGenerator: Send + Sync {
    async fn generate(&self, entry: &Entry<'_>) -> Result<String, GenerationError>;
}

// Compile-time assertion: Box<dyn FieldGenerator> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn FieldGenerator>) {}
};

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// One generator per derived field.
pub struct Generators {
    pub sentence: Box<dyn FieldGenerator>,
    pub pronunciation: Box<dyn FieldGenerator>,
    pub audio: Box<dyn FieldGenerator>,
    pub image: Box<dyn FieldGenerator>,
}

impl Generators {
    /// The generator filling `field`, or `None` for source fields.
    pub fn for_field(&self, field: Field) -> Option<&dyn FieldGenerator> {
        match field {
            Field::Sentence => Some(self.sentence.as_ref()),
            Field::Pronunciation => Some(self.pronunciation.as_ref()),
            Field::AudioPath => Some(self.audio.as_ref()),
            Field::ImagePath => Some(self.image.as_ref()),
            Field::Word | Field::Translation | Field::Level => None,
        }
    }

    /// Wire the production providers from `config`.
    ///
    /// Artifacts go to the configured directories, or next to `input` when
    /// those are unset.
    pub fn from_config(config: &AppConfig, input: &Path) -> Self {
        let text: Arc<dyn TextProvider> = Arc::new(OpenAiChat::from_config(&config.llm));

        let speech = SpeechChain::new(vec![
            Box::new(OpenAiSpeech::from_config(
                &config.speech,
                config.llm.api_key.clone(),
            )),
            Box::new(GoogleTranslateSpeech::from_config(&config.speech)),
        ]);

        let images = ImageChain::new(vec![
            Box::new(IconifyProvider::from_config(&config.images)),
            Box::new(PexelsProvider::from_config(&config.images)),
        ]);

        Self {
            sentence: Box::new(SentenceGenerator::new(Arc::clone(&text))),
            pronunciation: Box::new(PronunciationGenerator::new(text)),
            audio: Box::new(AudioGenerator::new(
                config.output.audio_dir_for(input),
                Box::new(speech),
            )),
            image: Box::new(ImageGenerator::new(
                config.output.images_dir_for(input),
                Box::new(images),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_derived_field_has_a_generator() {
        let gens = Generators::from_config(&AppConfig::default(), Path::new("words.csv"));
        for field in Field::DERIVED {
            assert!(gens.for_field(field).is_some(), "no generator for {field}");
        }
        for field in Field::REQUIRED {
            assert!(gens.for_field(field).is_none());
        }
    }
}
