//! IPA transcription generator.

use std::sync::Arc;

use async_trait::async_trait;

use crate::provider::TextProvider;
use crate::table::Entry;

use super::prompt::pronunciation_request;
use super::{FieldGenerator, GenerationError};

const OPENING: [char; 2] = ['/', '['];
const CLOSING: [char; 2] = ['/', ']'];

/// Asks the text provider for the word's IPA and normalises the reply to
/// `/.../` form.
pub struct PronunciationGenerator {
    text: Arc<dyn TextProvider>,
}

impl PronunciationGenerator {
    pub fn new(text: Arc<dyn TextProvider>) -> Self {
        Self { text }
    }
}

#[async_trait]
impl FieldGenerator for PronunciationGenerator {
    async fn generate(&self, entry: &Entry<'_>) -> Result<String, GenerationError> {
        let raw = self.text.complete(&pronunciation_request(entry.word)).await?;
        normalize_transcription(&raw).ok_or(GenerationError::EmptyResult)
    }
}

/// Reduce a provider reply to a single slash-delimited transcription.
///
/// Everything up to and including the first `/` or `[` is dropped, as is
/// everything from the last `/` or `]` onward; the rest is wrapped in one
/// pair of slashes. Returns `None` when nothing is left in between.
///
/// ```
/// use vocab_enricher::generate::normalize_transcription;
///
/// assert_eq!(normalize_transcription("[fəːɐt]").as_deref(), Some("/fəːɐt/"));
/// assert_eq!(normalize_transcription("/ˈvɔʁt/").as_deref(), Some("/ˈvɔʁt/"));
/// ```
pub fn normalize_transcription(raw: &str) -> Option<String> {
    let mut inner = raw.trim();
    if let Some(start) = inner.find(OPENING) {
        inner = &inner[start + 1..];
    }
    if let Some(end) = inner.rfind(CLOSING) {
        inner = &inner[..end];
    }
    let inner = inner.trim();
    if inner.is_empty() {
        return None;
    }
    Some(format!("/{inner}/"))
}
