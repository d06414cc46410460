//! CSV-backed row store.
//!
//! [`RowStore`] owns the path of the vocabulary file. It loads the whole file
//! into a [`Table`] and writes the whole table back after every enriched row.
//!
//! Writes go to a temporary file in the target's directory which is then
//! renamed over the target, so a concurrent reader sees either the previous
//! version or the new one, never a truncated file.

use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::config::ColumnNames;

use super::field::Field;
use super::model::Table;

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// Errors raised while reading or persisting the vocabulary file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The header lacks one or more required source columns.
    #[error("{path}: missing required column(s): {}", .missing.join(", "))]
    Format { path: PathBuf, missing: Vec<String> },

    /// The file could not be opened or is not valid CSV.
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The table could not be written back.
    #[error("cannot write {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}

// ---------------------------------------------------------------------------
// RowStore
// ---------------------------------------------------------------------------

/// Loads and persists the vocabulary table at a fixed path.
#[derive(Debug, Clone)]
pub struct RowStore {
    path: PathBuf,
    columns: ColumnNames,
    save_attempts: u32,
}

impl RowStore {
    /// Create a store for `path` using the given column names and a default
    /// of two save attempts.
    pub fn new(path: impl Into<PathBuf>, columns: ColumnNames) -> Self {
        Self {
            path: path.into(),
            columns,
            save_attempts: 2,
        }
    }

    /// Number of attempts made by [`save_with_retry`](Self::save_with_retry).
    /// Values below 1 are treated as 1.
    pub fn with_save_attempts(mut self, attempts: u32) -> Self {
        self.save_attempts = attempts.max(1);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // -----------------------------------------------------------------------
    // Load
    // -----------------------------------------------------------------------

    /// Read the whole file.
    ///
    /// Records may be shorter or longer than the header; [`Table::new`]
    /// squares them up so that a later [`save`](Self::save) writes a
    /// rectangular file.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Read`] when the file cannot be read or parsed.
    /// - [`StoreError::Format`] when `word`, `translation` or `level` (under
    ///   the configured names) is missing from the header.
    pub fn load(&self) -> Result<Table, StoreError> {
        let read_err = |source| StoreError::Read {
            path: self.path.clone(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(read_err)?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(read_err)?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(read_err)?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        let table = Table::new(headers, rows, self.columns.clone());

        let missing = table.missing_required();
        if !missing.is_empty() {
            return Err(StoreError::Format {
                path: self.path.clone(),
                missing,
            });
        }

        log::debug!(
            "store: loaded {} rows, {} columns from {}",
            table.len(),
            table.headers().len(),
            self.path.display()
        );
        Ok(table)
    }

    /// Add any missing derived columns to `table` (empty for every row).
    pub fn ensure_derived_columns(&self, table: &mut Table) -> Vec<Field> {
        let added = table.ensure_derived_columns();
        if !added.is_empty() {
            log::info!(
                "store: added column(s) {}",
                added
                    .iter()
                    .map(|f| f.header(&self.columns))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        added
    }

    // -----------------------------------------------------------------------
    // Save
    // -----------------------------------------------------------------------

    /// Overwrite the file with the full table via write-to-temp-then-rename.
    pub fn save(&self, table: &Table) -> Result<(), StoreError> {
        let write_err = |reason: String| StoreError::Write {
            path: self.path.clone(),
            reason,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| write_err(e.to_string()))?;
        {
            let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
            writer
                .write_record(table.headers())
                .map_err(|e| write_err(e.to_string()))?;
            for record in table.records() {
                writer
                    .write_record(record)
                    .map_err(|e| write_err(e.to_string()))?;
            }
            writer.flush().map_err(|e| write_err(e.to_string()))?;
        }
        tmp.as_file()
            .sync_all()
            .map_err(|e| write_err(e.to_string()))?;
        tmp.persist(&self.path)
            .map_err(|e| write_err(e.error.to_string()))?;

        Ok(())
    }

    /// [`save`](Self::save), retried up to the configured number of attempts.
    ///
    /// Returns the last error when every attempt fails.
    pub fn save_with_retry(&self, table: &Table) -> Result<(), StoreError> {
        let mut attempt = 1;
        loop {
            match self.save(table) {
                Ok(()) => return Ok(()),
                Err(e) if attempt < self.save_attempts => {
                    log::warn!("store: save attempt {attempt} failed ({e}), retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn load_reads_rows_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.csv");
        write(
            &path,
            "word,translation,level\nHaus,house,A1\nlaufen,to run,A2\nschnell,fast,B1\n",
        );

        let table = RowStore::new(&path, ColumnNames::default()).load().unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.entry(0).word, "Haus");
        assert_eq!(table.entry(2).translation, "fast");
    }

    #[test]
    fn load_rejects_missing_required_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.csv");
        write(&path, "word,meaning\nHaus,house\n");

        let err = RowStore::new(&path, ColumnNames::default())
            .load()
            .unwrap_err();
        match err {
            StoreError::Format { missing, .. } => {
                assert_eq!(missing, vec!["translation".to_string(), "level".to_string()]);
            }
            other => panic!("expected Format error, got {other:?}"),
        }
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let dir = tempdir().unwrap();
        let err = RowStore::new(dir.path().join("absent.csv"), ColumnNames::default())
            .load()
            .unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
    }

    #[test]
    fn load_honours_custom_column_names() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wortliste.csv");
        write(&path, "Wort,Übersetzung,Band\nHaus,house,A1\n");

        let columns = ColumnNames {
            word: "Wort".into(),
            translation: "Übersetzung".into(),
            level: "Band".into(),
            ..ColumnNames::default()
        };
        let table = RowStore::new(&path, columns).load().unwrap();
        assert_eq!(table.entry(0).translation, "house");
    }

    #[test]
    fn save_round_trips_extra_columns_and_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.csv");
        write(
            &path,
            "id,word,translation,level\n7,Haus,house,A1\n3,\"Tür, die\",door,A1\n",
        );

        let store = RowStore::new(&path, ColumnNames::default());
        let mut table = store.load().unwrap();
        store.ensure_derived_columns(&mut table);
        table.set(1, Field::Sentence, "Die Tür ist offen.");
        store.save(&table).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(
            reloaded.headers()[..4],
            ["id", "word", "translation", "level"].map(String::from)
        );
        assert_eq!(reloaded.headers().len(), 8);
        assert_eq!(reloaded.records()[0][0], "7");
        assert_eq!(reloaded.records()[1][0], "3");
        assert_eq!(reloaded.entry(1).word, "Tür, die");
        assert_eq!(reloaded.get(1, Field::Sentence), Some("Die Tür ist offen."));
        assert_eq!(reloaded.get(0, Field::Sentence), Some(""));
    }

    #[test]
    fn save_accepts_rows_longer_than_the_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.csv");
        write(&path, "word,translation,level\nHaus,house,A1,note\nBaum,tree,A1\n");

        let store = RowStore::new(&path, ColumnNames::default());
        let mut table = store.load().unwrap();
        store.ensure_derived_columns(&mut table);
        table.set(0, Field::Sentence, "Das Haus ist alt.");
        store.save(&table).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(
            "word,translation,level,column4,sentence,pronunciation,audioPath,imagePath\n"
        ));
        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.get(0, Field::Sentence), Some("Das Haus ist alt."));
        assert_eq!(reloaded.get(1, Field::Sentence), Some(""));
    }

    #[test]
    fn save_leaves_no_temp_files_behind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.csv");
        write(&path, "word,translation,level\nHaus,house,A1\n");

        let store = RowStore::new(&path, ColumnNames::default());
        let table = store.load().unwrap();
        store.save(&table).unwrap();
        store.save(&table).unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn save_into_missing_directory_fails_after_retries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.csv");
        write(&path, "word,translation,level\nHaus,house,A1\n");
        let table = RowStore::new(&path, ColumnNames::default()).load().unwrap();

        let broken = RowStore::new(dir.path().join("gone").join("words.csv"), ColumnNames::default())
            .with_save_attempts(3);
        let err = broken.save_with_retry(&table).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
    }
}
