//! Enrichment loop: walks the table once and fills missing derived fields.
//!
//! # Row flow
//!
//! ```text
//! for each row, in table order
//!   ├─ all four fields present → skip (no calls, no save, no delay)
//!   └─ otherwise
//!        ├─ sentence       ─┐
//!        ├─ pronunciation   │ only the missing ones, in this order;
//!        ├─ audio           │ a failure leaves the field empty and
//!        ├─ image          ─┘ moves on to the next field
//!        ├─ save_with_retry  (failure ends the run)
//!        ├─ sleep row_delay
//!        └─ processed += 1; stop at max_rows
//! ```
//!
//! Because the table is saved after every processed row, an interrupted run
//! loses at most the row in flight, and the next run resumes at the first
//! incomplete row.

use std::time::Duration;

use thiserror::Error;

use crate::config::RunConfig;
use crate::generate::Generators;
use crate::table::{RowStore, StoreError, Table};

use super::state::{RowProgress, RunReport};

// ---------------------------------------------------------------------------
// EnrichError
// ---------------------------------------------------------------------------

/// Errors that end a run early.
///
/// Generator failures never surface here; they are logged and counted in
/// [`RunReport::failed`].
#[derive(Debug, Error)]
pub enum EnrichError {
    /// The table could not be persisted after a row.
    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),
}

// ---------------------------------------------------------------------------
// EnrichmentLoop
// ---------------------------------------------------------------------------

/// Drives the generators over a [`Table`] and persists it through a
/// [`RowStore`].
///
/// ```rust,no_run
/// use std::path::Path;
/// use vocab_enricher::config::AppConfig;
/// use vocab_enricher::enrich::EnrichmentLoop;
/// use vocab_enricher::generate::Generators;
/// use vocab_enricher::table::RowStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = AppConfig::default();
/// let input = Path::new("words.csv");
/// let store = RowStore::new(input, config.columns.clone());
/// let mut table = store.load()?;
///
/// let enrich = EnrichmentLoop::new(store, Generators::from_config(&config, input), &config.run);
/// let report = enrich.run(&mut table).await?;
/// println!("{report}");
/// # Ok(())
/// # }
/// ```
pub struct EnrichmentLoop {
    store: RowStore,
    generators: Generators,
    row_delay: Duration,
    max_rows: usize,
}

impl EnrichmentLoop {
    pub fn new(store: RowStore, generators: Generators, run: &RunConfig) -> Self {
        Self {
            store,
            generators,
            row_delay: Duration::from_millis(run.row_delay_ms),
            max_rows: run.max_rows,
        }
    }

    /// Override the row cap (e.g. from the command line).
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    pub fn store(&self) -> &RowStore {
        &self.store
    }

    // -----------------------------------------------------------------------
    // Main loop
    // -----------------------------------------------------------------------

    /// Process `table` once, front to back.
    ///
    /// Missing derived columns are added first. Rows beyond the cap are left
    /// untouched.
    ///
    /// # Errors
    ///
    /// [`EnrichError::Storage`] when the table cannot be saved after a row,
    /// even after retrying. Rows saved before that point stay saved.
    pub async fn run(&self, table: &mut Table) -> Result<RunReport, EnrichError> {
        self.store.ensure_derived_columns(table);

        let before = table.stats();
        log::info!(
            "enrich: {} rows, {} complete, {} to do (cap {})",
            before.rows,
            before.complete,
            before.incomplete(),
            self.max_rows
        );

        let mut report = RunReport {
            rows_total: table.len(),
            ..RunReport::default()
        };

        for row in 0..table.len() {
            let mut progress = RowProgress::of(table, row);
            if progress.is_complete() {
                report.rows_skipped += 1;
                continue;
            }

            if report.rows_processed >= self.max_rows {
                report.cap_reached = true;
                log::info!(
                    "enrich: row cap of {} reached, stopping before row {}",
                    self.max_rows,
                    row + 1
                );
                break;
            }

            self.process_row(table, row, &mut progress, &mut report).await;

            self.store.save_with_retry(table)?;
            log::debug!("enrich: row {} saved", row + 1);

            if !self.row_delay.is_zero() {
                tokio::time::sleep(self.row_delay).await;
            }
            report.rows_processed += 1;
        }

        let after = table.stats();
        log::info!(
            "enrich: done; {} of {} rows complete (sentence {}, pronunciation {}, audio {}, image {})",
            after.complete,
            after.rows,
            after.present.sentence,
            after.present.pronunciation,
            after.present.audio,
            after.present.image
        );
        log::info!("enrich: {report}");

        Ok(report)
    }

    /// Fill the missing fields of one row, in generation order.
    async fn process_row(
        &self,
        table: &mut Table,
        row: usize,
        progress: &mut RowProgress,
        report: &mut RunReport,
    ) {
        for field in progress.missing() {
            let Some(generator) = self.generators.for_field(field) else {
                continue;
            };

            let entry = table.entry(row);
            log::info!("enrich: row {} '{}': generating {}", row + 1, entry.word, field.label());

            let outcome = generator.generate(&entry).await;
            match outcome {
                Ok(value) if !value.trim().is_empty() => {
                    table.set(row, field, value.trim());
                    progress.mark(field);
                    report.generated.bump(field);
                }
                Ok(_) => {
                    log::warn!("enrich: row {}: {} came back empty", row + 1, field.label());
                    report.failed.bump(field);
                }
                Err(e) => {
                    log::warn!("enrich: row {}: {} failed: {e}", row + 1, field.label());
                    report.failed.bump(field);
                }
            }
        }

        if !progress.is_complete() {
            let missing: Vec<&str> = progress.missing().iter().map(|f| f.label()).collect();
            log::warn!("enrich: row {} still missing {}", row + 1, missing.join(", "));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
