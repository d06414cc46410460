//! Logical columns of a vocabulary row and proficiency tiers.

use std::fmt;

use crate::config::ColumnNames;

// ---------------------------------------------------------------------------
// Field
// ---------------------------------------------------------------------------

/// One logical column of the vocabulary table.
///
/// `Word`, `Translation` and `Level` are source fields that must exist in the
/// input file. The remaining four are derived fields, filled by generators
/// and never overwritten once present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Word,
    Translation,
    Level,
    Sentence,
    Pronunciation,
    AudioPath,
    ImagePath,
}

impl Field {
    /// Every field, in schema order.
    pub const ALL: [Field; 7] = [
        Field::Word,
        Field::Translation,
        Field::Level,
        Field::Sentence,
        Field::Pronunciation,
        Field::AudioPath,
        Field::ImagePath,
    ];

    /// Source columns a loadable file must contain.
    pub const REQUIRED: [Field; 3] = [Field::Word, Field::Translation, Field::Level];

    /// Derived columns, in the order the enrichment loop fills them.
    pub const DERIVED: [Field; 4] = [
        Field::Sentence,
        Field::Pronunciation,
        Field::AudioPath,
        Field::ImagePath,
    ];

    /// Position of this field in [`Field::ALL`].
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    pub fn is_derived(self) -> bool {
        Self::DERIVED.contains(&self)
    }

    /// Header name for this field under the configured column names.
    pub fn header(self, names: &ColumnNames) -> &str {
        match self {
            Field::Word => &names.word,
            Field::Translation => &names.translation,
            Field::Level => &names.level,
            Field::Sentence => &names.sentence,
            Field::Pronunciation => &names.pronunciation,
            Field::AudioPath => &names.audio_path,
            Field::ImagePath => &names.image_path,
        }
    }

    /// Short lowercase label used in log lines.
    pub fn label(self) -> &'static str {
        match self {
            Field::Word => "word",
            Field::Translation => "translation",
            Field::Level => "level",
            Field::Sentence => "sentence",
            Field::Pronunciation => "pronunciation",
            Field::AudioPath => "audio",
            Field::ImagePath => "image",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// FieldCounts
// ---------------------------------------------------------------------------

/// Per-derived-field counters, used for table statistics and run reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldCounts {
    pub sentence: usize,
    pub pronunciation: usize,
    pub audio: usize,
    pub image: usize,
}

impl FieldCounts {
    /// Increment the counter for `field`. Source fields are ignored.
    pub fn bump(&mut self, field: Field) {
        match field {
            Field::Sentence => self.sentence += 1,
            Field::Pronunciation => self.pronunciation += 1,
            Field::AudioPath => self.audio += 1,
            Field::ImagePath => self.image += 1,
            Field::Word | Field::Translation | Field::Level => {}
        }
    }

    pub fn get(&self, field: Field) -> usize {
        match field {
            Field::Sentence => self.sentence,
            Field::Pronunciation => self.pronunciation,
            Field::AudioPath => self.audio,
            Field::ImagePath => self.image,
            Field::Word | Field::Translation | Field::Level => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.sentence + self.pronunciation + self.audio + self.image
    }
}

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

/// Proficiency tier of a vocabulary entry.
///
/// Parsing is case-insensitive and ignores surrounding whitespace. Anything
/// that is not a known tier is treated as [`Level::A1`] by callers that need
/// a tier, while the raw string stays untouched in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Level {
    /// Minimal: first-contact vocabulary.
    #[default]
    A1,
    /// Elementary.
    A2,
    /// Intermediate.
    B1,
}

impl Level {
    pub fn parse(raw: &str) -> Option<Level> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "A1" => Some(Level::A1),
            "A2" => Some(Level::A2),
            "B1" => Some(Level::B1),
            _ => None,
        }
    }

    /// Parse `raw`, falling back to the lowest tier.
    pub fn parse_or_default(raw: &str) -> Level {
        Self::parse(raw).unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::A1 => "A1",
            Level::A2 => "A2",
            Level::B1 => "B1",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
