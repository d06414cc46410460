//! Vocabulary enrichment pipeline.
//!
//! Reads a vocabulary table (word, translation, CEFR level), fills in an
//! example sentence, an IPA transcription, a pronunciation clip and an
//! illustration for every row that lacks them, and saves the table after
//! each row so an interrupted run can simply be started again.
//!
//! | Module       | Role                                              |
//! |--------------|---------------------------------------------------|
//! | [`config`]   | TOML settings and platform paths                  |
//! | [`table`]    | CSV row store and the in-memory table             |
//! | [`provider`] | HTTP clients for text, speech and image services  |
//! | [`generate`] | One generator per derived field                   |
//! | [`raster`]   | SVG rendering and PNG encoding                    |
//! | [`enrich`]   | The row loop                                      |
//! | [`deck`]     | Flashcard JSON export                             |

pub mod config;
pub mod deck;
pub mod enrich;
pub mod generate;
pub mod provider;
pub mod raster;
pub mod table;
