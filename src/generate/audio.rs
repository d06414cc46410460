//! Pronunciation audio generator.
//!
//! The output file name is derived from the word alone
//! (`<audio_dir>/<sanitized word>_voice.mp3`), so an existing file is reused
//! as-is and no provider is called. Only the filesystem is consulted; the
//! table's `audioPath` value plays no part in that decision. A row without a
//! word has no clip of its own and fails with
//! [`GenerationError::EmptyResult`].

use std::path::PathBuf;

use async_trait::async_trait;

use crate::provider::SpeechProvider;
use crate::table::Entry;

use super::artifact::{artifact_path, write_artifact};
use super::{FieldGenerator, GenerationError};

/// Synthesizes `entry.word` through a speech provider (usually a
/// [`SpeechChain`](crate::provider::SpeechChain)) and stores the MP3.
pub struct AudioGenerator {
    dir: PathBuf,
    speech: Box<dyn SpeechProvider>,
}

impl AudioGenerator {
    pub fn new(dir: PathBuf, speech: Box<dyn SpeechProvider>) -> Self {
        Self { dir, speech }
    }

    /// Where the clip for `word` lives, whether or not it exists yet.
    pub fn target_path(&self, word: &str) -> PathBuf {
        artifact_path(&self.dir, word, "voice", "mp3")
    }
}

#[async_trait]
impl FieldGenerator for AudioGenerator {
    async fn generate(&self, entry: &Entry<'_>) -> Result<String, GenerationError> {
        if entry.word.trim().is_empty() {
            return Err(GenerationError::EmptyResult);
        }
        let path = self.target_path(entry.word);

        if path.exists() {
            log::info!("audio: reusing {}", path.display());
            return Ok(path.display().to_string());
        }

        let audio = self.speech.synthesize(entry.word).await?;
        write_artifact(&path, &audio)?;

        if looks_like_mp3(&audio) {
            log::debug!("audio: validated {}", path.display());
        } else {
            log::warn!(
                "audio: {} does not start with an MP3 header; keeping it anyway",
                path.display()
            );
        }

        Ok(path.display().to_string())
    }
}

/// `true` when `bytes` start with an ID3 tag or an MPEG audio frame sync.
pub fn looks_like_mp3(bytes: &[u8]) -> bool {
    match bytes {
        [b'I', b'D', b'3', ..] => true,
        [0xFF, second, ..] => second & 0xE0 == 0xE0,
        _ => false,
    }
}
