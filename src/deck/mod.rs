//! Flashcard deck export.
//!
//! Turns an enriched [`Table`] into the JSON deck read by the flashcard web
//! app: one card per row, word and pronunciation on the front, translation
//! and example sentence on the back.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::table::{Field, Table};

// ---------------------------------------------------------------------------
// DeckError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("cannot serialize deck: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("cannot write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Card types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardFront {
    pub primary_text: String,
    /// IPA transcription.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardBack {
    pub translation: String,
    /// Example sentence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    /// CEFR level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashCard {
    /// 1-based row number.
    pub id: String,
    pub front: CardFront,
    pub back: CardBack,
    pub is_favourite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// One card per row, in table order.
pub fn build_deck(table: &Table) -> Vec<FlashCard> {
    (0..table.len())
        .map(|row| {
            let cell = |field| {
                table
                    .get(row, field)
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
            };
            let entry = table.entry(row);
            FlashCard {
                id: (row + 1).to_string(),
                front: CardFront {
                    primary_text: entry.word.to_string(),
                    secondary_text: cell(Field::Pronunciation),
                    audio_url: cell(Field::AudioPath),
                },
                back: CardBack {
                    translation: entry.translation.to_string(),
                    example: cell(Field::Sentence),
                    notes: cell(Field::Level),
                },
                is_favourite: false,
                image_path: cell(Field::ImagePath),
            }
        })
        .collect()
}

/// Write the deck for `table` to `path` as pretty-printed JSON.
pub fn write_deck(table: &Table, path: &Path) -> Result<usize, DeckError> {
    let deck = build_deck(table);
    let json = serde_json::to_string_pretty(&deck)?;
    std::fs::write(path, json).map_err(|source| DeckError::Io {
        path: path.display().to_string(),
        source,
    })?;
    log::info!("deck: wrote {} cards to {}", deck.len(), path.display());
    Ok(deck.len())
}
