//! Example-sentence generator.

use std::sync::Arc;

use async_trait::async_trait;

use crate::provider::TextProvider;
use crate::table::Entry;

use super::prompt::sentence_request;
use super::{FieldGenerator, GenerationError};

/// Asks the text provider for one level-appropriate sentence using the word.
pub struct SentenceGenerator {
    text: Arc<dyn TextProvider>,
}

impl SentenceGenerator {
    pub fn new(text: Arc<dyn TextProvider>) -> Self {
        Self { text }
    }
}

#[async_trait]
impl FieldGenerator for SentenceGenerator {
    async fn generate(&self, entry: &Entry<'_>) -> Result<String, GenerationError> {
        let raw = self.text.complete(&sentence_request(entry)).await?;
        let sentence = clean_sentence(&raw);
        if sentence.is_empty() {
            return Err(GenerationError::EmptyResult);
        }
        Ok(sentence)
    }
}

/// Trim and drop one pair of surrounding double quotes (straight or curly,
/// including German „...“).
pub fn clean_sentence(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = [('"', '"'), ('“', '”'), ('„', '“')]
        .iter()
        .find_map(|(open, close)| {
            trimmed
                .strip_prefix(*open)
                .and_then(|rest| rest.strip_suffix(*close))
        })
        .unwrap_or(trimmed);
    unquoted.trim().to_string()
}
