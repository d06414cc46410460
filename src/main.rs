//! Command-line entry point.
//!
//! # Startup sequence
//!
//! 1. Initialise logging (`RUST_LOG`, default `info`).
//! 2. Parse the command line.
//! 3. Load [`AppConfig`] (explicit `--config`, else the platform settings
//!    file, else defaults) and pick up `OPENAI_API_KEY`.
//! 4. Load the vocabulary table and wire the generators.
//! 5. Run the enrichment loop once over the table.
//! 6. Optionally write the flashcard deck.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use vocab_enricher::{
    config::{AppConfig, API_KEY_ENV},
    deck::write_deck,
    enrich::EnrichmentLoop,
    generate::Generators,
    table::RowStore,
};

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(name = "vocab-enricher", version, about = "Fill vocabulary tables with sentences, IPA, audio and images")]
struct Cli {
    /// Vocabulary CSV with `word`, `translation` and `level` columns.
    input: PathBuf,

    /// Settings file to use instead of the platform default.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Process at most this many incomplete rows.
    #[arg(short = 'n', long, value_name = "N")]
    max_rows: Option<usize>,

    /// Also write a flashcard deck (JSON) to this path after the run.
    #[arg(long, value_name = "FILE")]
    deck: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 2. Command line
    let cli = Cli::parse();

    // 3. Configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("cannot load config {}", path.display()))?,
        None => AppConfig::load().unwrap_or_else(|e| {
            log::warn!("Failed to load config ({e}); using defaults");
            AppConfig::default()
        }),
    }
    .with_env_api_key();

    if config.llm.api_key.is_none() {
        log::warn!("{API_KEY_ENV} is not set; text generation will likely fail");
    }

    // 4. Table and generators
    let store = RowStore::new(&cli.input, config.columns.clone())
        .with_save_attempts(config.run.save_attempts);
    let mut table = store
        .load()
        .with_context(|| format!("cannot open {}", cli.input.display()))?;
    log::info!("Loaded {} rows from {}", table.len(), cli.input.display());

    let generators = Generators::from_config(&config, &cli.input);

    // 5. Run
    let mut enrich = EnrichmentLoop::new(store, generators, &config.run);
    if let Some(max_rows) = cli.max_rows {
        enrich = enrich.with_max_rows(max_rows);
    }
    let report = enrich.run(&mut table).await?;
    log::info!("Finished: {report}");

    // 6. Deck
    if let Some(path) = &cli.deck {
        write_deck(&table, path)
            .with_context(|| format!("cannot write deck {}", path.display()))?;
    }

    Ok(())
}
