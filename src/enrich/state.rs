//! Per-row progress flags and the run report.
//!
//! [`RowProgress`] mirrors which derived fields of the row being processed
//! are already filled. It is rebuilt from the table for every row and only
//! ever moves from missing to present.
//!
//! [`RunReport`] is what [`EnrichmentLoop::run`](super::EnrichmentLoop::run)
//! hands back to the caller once the loop ends.

use std::fmt;

use crate::table::{Field, FieldCounts, Table};

// ---------------------------------------------------------------------------
// RowProgress
// ---------------------------------------------------------------------------

/// Presence flags of the four derived fields of one row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowProgress {
    pub sentence: bool,
    pub pronunciation: bool,
    pub audio: bool,
    pub image: bool,
}

impl RowProgress {
    /// Read the flags for `row` from the table.
    pub fn of(table: &Table, row: usize) -> Self {
        Self {
            sentence: table.is_field_present(row, Field::Sentence),
            pronunciation: table.is_field_present(row, Field::Pronunciation),
            audio: table.is_field_present(row, Field::AudioPath),
            image: table.is_field_present(row, Field::ImagePath),
        }
    }

    pub fn is_done(&self, field: Field) -> bool {
        match field {
            Field::Sentence => self.sentence,
            Field::Pronunciation => self.pronunciation,
            Field::AudioPath => self.audio,
            Field::ImagePath => self.image,
            Field::Word | Field::Translation | Field::Level => true,
        }
    }

    /// Record that `field` now holds a value. There is no way back.
    pub fn mark(&mut self, field: Field) {
        match field {
            Field::Sentence => self.sentence = true,
            Field::Pronunciation => self.pronunciation = true,
            Field::AudioPath => self.audio = true,
            Field::ImagePath => self.image = true,
            Field::Word | Field::Translation | Field::Level => {}
        }
    }

    pub fn is_complete(&self) -> bool {
        self.sentence && self.pronunciation && self.audio && self.image
    }

    /// Derived fields still missing, in generation order.
    pub fn missing(&self) -> Vec<Field> {
        Field::DERIVED
            .into_iter()
            .filter(|f| !self.is_done(*f))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// RunReport
// ---------------------------------------------------------------------------

/// Outcome of one enrichment run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Rows in the table.
    pub rows_total: usize,
    /// Complete rows passed over without any work.
    pub rows_skipped: usize,
    /// Rows that were attempted and persisted.
    pub rows_processed: usize,
    /// Values successfully generated, per field.
    pub generated: FieldCounts,
    /// Generator failures, per field.
    pub failed: FieldCounts,
    /// `true` when the loop stopped at the row cap with incomplete rows left.
    pub cap_reached: bool,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows: {} processed, {} already complete; generated {} (sentence {}, \
             pronunciation {}, audio {}, image {}); {} failures",
            self.rows_total,
            self.rows_processed,
            self.rows_skipped,
            self.generated.total(),
            self.generated.sentence,
            self.generated.pronunciation,
            self.generated.audio,
            self.generated.image,
            self.failed.total(),
        )?;
        if self.cap_reached {
            write!(f, "; row cap reached")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
