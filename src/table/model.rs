//! In-memory vocabulary table.
//!
//! [`Table`] keeps the header row and every record as plain strings so that
//! columns it does not know about survive a load/save cycle untouched and in
//! place. The seven logical [`Field`]s are resolved to column positions once,
//! at construction, from the configured [`ColumnNames`].

use crate::config::ColumnNames;

use super::field::{Field, FieldCounts, Level};

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// The immutable source fields of one row, as handed to generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
    pub word: &'a str,
    pub translation: &'a str,
    /// Raw level string as stored in the table.
    pub level: &'a str,
}

impl Entry<'_> {
    /// Tier used for prompt styling; unknown levels map to [`Level::A1`].
    pub fn tier(&self) -> Level {
        Level::parse_or_default(self.level)
    }
}

// ---------------------------------------------------------------------------
// TableStats
// ---------------------------------------------------------------------------

/// Snapshot of how much of the table is already enriched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableStats {
    pub rows: usize,
    /// Rows with all four derived fields present.
    pub complete: usize,
    /// Present values per derived field.
    pub present: FieldCounts,
}

impl TableStats {
    pub fn incomplete(&self) -> usize {
        self.rows - self.complete
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Header for an unnamed column at 0-based position `index`.
fn placeholder_header(index: usize) -> String {
    format!("column{}", index + 1)
}

/// Ordered vocabulary rows plus their header.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    names: ColumnNames,
    /// Column position per [`Field::index`].
    columns: [Option<usize>; 7],
}

impl Table {
    /// Build a table from a header row and records.
    ///
    /// Every record ends up with exactly one cell per header. Short records
    /// are padded with empty cells. When a record is longer than the header
    /// row, the header is widened to match with placeholder names
    /// (`column4`, `column5`, ... by 1-based position) so the extra cells are
    /// kept and columns appended later land after them. Required-column
    /// validation is the caller's job; see [`Table::missing_required`].
    pub fn new(mut headers: Vec<String>, rows: Vec<Vec<String>>, names: ColumnNames) -> Self {
        let longest = rows.iter().map(Vec::len).max().unwrap_or(0);
        while headers.len() < longest {
            headers.push(placeholder_header(headers.len()));
        }

        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        let mut table = Self {
            headers,
            rows,
            names,
            columns: [None; 7],
        };
        for field in Field::ALL {
            let col = table.find_header(field.header(&table.names));
            table.columns[field.index()] = col;
        }
        table
    }

    fn find_header(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    // -----------------------------------------------------------------------
    // Schema
    // -----------------------------------------------------------------------

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn column_names(&self) -> &ColumnNames {
        &self.names
    }

    pub fn has_column(&self, field: Field) -> bool {
        self.columns[field.index()].is_some()
    }

    /// Header names of required fields absent from this table.
    pub fn missing_required(&self) -> Vec<String> {
        Field::REQUIRED
            .iter()
            .filter(|f| !self.has_column(**f))
            .map(|f| f.header(&self.names).to_string())
            .collect()
    }

    /// Append an empty column for every derived field that has none.
    ///
    /// Existing columns and values are never touched. Returns the fields
    /// whose columns were added.
    pub fn ensure_derived_columns(&mut self) -> Vec<Field> {
        Field::DERIVED
            .into_iter()
            .filter(|field| self.ensure_column(*field))
            .collect()
    }

    /// Returns `true` when a new column had to be appended.
    fn ensure_column(&mut self, field: Field) -> bool {
        if self.has_column(field) {
            return false;
        }
        self.headers.push(field.header(&self.names).to_string());
        for row in &mut self.rows {
            row.push(String::new());
        }
        self.columns[field.index()] = Some(self.headers.len() - 1);
        true
    }

    // -----------------------------------------------------------------------
    // Rows
    // -----------------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw records, in persisted order.
    pub fn records(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Raw cell for `field` in row `row`, if the row and column exist.
    pub fn get(&self, row: usize, field: Field) -> Option<&str> {
        let col = self.columns[field.index()]?;
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Store `value` in `field` of row `row`, adding the column if needed.
    ///
    /// Out-of-range rows are ignored.
    pub fn set(&mut self, row: usize, field: Field, value: impl Into<String>) {
        if row >= self.rows.len() {
            return;
        }
        self.ensure_column(field);
        if let Some(col) = self.columns[field.index()] {
            self.rows[row][col] = value.into();
        }
    }

    /// `true` iff the cell exists and is non-empty after trimming.
    pub fn is_field_present(&self, row: usize, field: Field) -> bool {
        self.get(row, field).is_some_and(|v| !v.trim().is_empty())
    }

    /// `true` iff every derived field of the row is present.
    pub fn is_complete(&self, row: usize) -> bool {
        Field::DERIVED
            .iter()
            .all(|f| self.is_field_present(row, *f))
    }

    /// Trimmed source fields of row `row`.
    pub fn entry(&self, row: usize) -> Entry<'_> {
        let cell = |field| self.get(row, field).unwrap_or("").trim();
        Entry {
            word: cell(Field::Word),
            translation: cell(Field::Translation),
            level: cell(Field::Level),
        }
    }

    pub fn stats(&self) -> TableStats {
        let mut stats = TableStats {
            rows: self.len(),
            ..TableStats::default()
        };
        for row in 0..self.len() {
            let mut all = true;
            for field in Field::DERIVED {
                if self.is_field_present(row, field) {
                    stats.present.bump(field);
                } else {
                    all = false;
                }
            }
            if all {
                stats.complete += 1;
            }
        }
        stats
    }
}
