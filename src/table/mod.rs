//! Row store: the vocabulary table and its CSV persistence.
//!
//! * [`Table`]: ordered rows plus header; per-field read/write.
//! * [`Field`]: the seven logical columns (three source, four derived).
//! * [`RowStore`]: load, widen and atomically save the backing CSV file.
//! * [`StoreError`]: format, read and write failures.
//!
//! ```rust,no_run
//! use vocab_enricher::config::ColumnNames;
//! use vocab_enricher::table::{Field, RowStore};
//!
//! let store = RowStore::new("words.csv", ColumnNames::default());
//! let mut table = store.load().unwrap();
//! store.ensure_derived_columns(&mut table);
//! if !table.is_field_present(0, Field::Sentence) {
//!     table.set(0, Field::Sentence, "Das Haus ist groß.");
//!     store.save_with_retry(&table).unwrap();
//! }
//! ```

pub mod field;
pub mod model;
pub mod store;

pub use field::{Field, FieldCounts, Level};
pub use model::{Entry, Table, TableStats};
pub use store::{RowStore, StoreError};
