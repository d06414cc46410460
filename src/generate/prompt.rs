//! Prompt builders for the two text-backed generators.
//!
//! Sentence prompts carry a level-specific style instruction so the example
//! matches the learner's tier; transcription prompts ask for IPA only.

use crate::provider::ChatRequest;
use crate::table::{Entry, Level};

// ---------------------------------------------------------------------------
// System instructions
// ---------------------------------------------------------------------------

const SENTENCE_SYSTEM: &str =
    "You are a German language teacher creating example sentences for language learners.";

const PRONUNCIATION_SYSTEM: &str = "You are a German linguistics expert specializing in \
phonetic transcription. Provide accurate IPA pronunciations for German words.";

// ---------------------------------------------------------------------------
// Level styles
// ---------------------------------------------------------------------------

/// Register and complexity instruction for a tier.
pub fn level_style(level: Level) -> &'static str {
    match level {
        Level::A1 => "very simple, short sentences, present tense, simple words",
        Level::A2 => {
            "simple, somewhat longer sentences, present and perfect tense, everyday words"
        }
        Level::B1 => {
            "intermediate, more complex sentences, varied tenses, broader vocabulary"
        }
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Chat request for one example sentence containing `entry.word`.
///
/// The level is sent as written in the table; the style instruction comes
/// from the parsed tier, so unknown levels get the A1 style.
pub fn sentence_request(entry: &Entry<'_>) -> ChatRequest {
    let tier = entry.tier();
    let level = if entry.level.is_empty() {
        tier.as_str()
    } else {
        entry.level
    };
    let user = format!(
        "Write one German example sentence for the word \"{word}\" (meaning: {translation}).\n\
         \n\
         Requirements:\n\
         - Level: {level} ({style})\n\
         - The sentence must contain the word \"{word}\"\n\
         - Natural and grammatically correct\n\
         - Reply with the sentence only, no explanation\n\
         \n\
         Example sentence:",
        word = entry.word,
        translation = entry.translation,
        style = level_style(tier),
    );

    ChatRequest {
        system: SENTENCE_SYSTEM.into(),
        user,
        temperature: 0.3,
        max_tokens: 150,
    }
}

/// Chat request for the IPA transcription of `word`.
pub fn pronunciation_request(word: &str) -> ChatRequest {
    let user = format!(
        "Give the IPA (International Phonetic Alphabet) transcription of the German word \"{word}\".\n\
         \n\
         Requirements:\n\
         - Standard German pronunciation\n\
         - Only the transcription between forward slashes, like /ˈvɔʁt/\n\
         - Be precise with German phonemes (ɛ, œ, ʏ, ʊ, ɔ, a, ...)\n\
         - Mark primary stress with ˈ\n\
         - For compounds, transcribe the whole word\n\
         - Reply with the transcription only\n\
         \n\
         Word: {word}\n\
         IPA:"
    );

    ChatRequest {
        system: PRONUNCIATION_SYSTEM.into(),
        user,
        temperature: 0.1,
        max_tokens: 100,
    }
}
