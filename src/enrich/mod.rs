//! Enrichment loop module.
//!
//! [`EnrichmentLoop`] walks a [`Table`](crate::table::Table) row by row,
//! asks the [`Generators`](crate::generate::Generators) for every missing
//! derived field and saves the table after each row it touched.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use vocab_enricher::config::AppConfig;
//! use vocab_enricher::enrich::EnrichmentLoop;
//! use vocab_enricher::generate::Generators;
//! use vocab_enricher::table::RowStore;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = AppConfig::default().with_env_api_key();
//! let input = Path::new("vocabulary.csv");
//!
//! let store = RowStore::new(input, config.columns.clone())
//!     .with_save_attempts(config.run.save_attempts);
//! let mut table = store.load()?;
//!
//! let report = EnrichmentLoop::new(store, Generators::from_config(&config, input), &config.run)
//!     .run(&mut table)
//!     .await?;
//! assert!(report.rows_processed <= config.run.max_rows);
//! # Ok(())
//! # }
//! ```

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{EnrichError, EnrichmentLoop};
pub use state::{RowProgress, RunReport};
