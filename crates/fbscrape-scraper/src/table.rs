//! In-memory tabular form of normalized posts.

use std::collections::HashMap;

use serde_json::Value;

use crate::normalize::{
    reaction_column, CanonicalPostRecord, ACCOUNT_METADATA, ACCOUNT_NAME_COLUMN,
    REACTION_KINDS, SCRAPE_DATE_COLUMN,
};

/// One table cell. `None` marks a column the row's source never had; a
/// provider `null` is kept as `Some(Value::Null)`.
pub type Cell = Option<Value>;

/// Columns every normalized table carries, even when it has no rows.
#[must_use]
pub fn canonical_columns() -> Vec<String> {
    let mut columns: Vec<String> = REACTION_KINDS.iter().map(|k| reaction_column(k)).collect();
    columns.push(ACCOUNT_NAME_COLUMN.to_owned());
    columns.extend(ACCOUNT_METADATA.iter().map(|(c, _)| (*c).to_owned()));
    columns.push(SCRAPE_DATE_COLUMN.to_owned());
    columns
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl PostTable {
    /// Builds a table from parts. Short rows are padded with absent cells
    /// and cells beyond the last column are dropped, so every row ends up
    /// exactly as wide as `columns`.
    #[must_use]
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        for row in &mut rows {
            row.resize(width, None);
        }
        Self { columns, rows }
    }

    /// Builds the per-target table from normalized records.
    ///
    /// Columns appear in first-seen order across records, followed by any
    /// canonical column no record produced. Missing reaction counts become
    /// `0`, missing account metadata becomes `""`, and every other missing
    /// cell stays absent.
    #[must_use]
    pub fn from_records(records: Vec<CanonicalPostRecord>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut add_column = |name: &str, columns: &mut Vec<String>| {
            if !index.contains_key(name) {
                index.insert(name.to_owned(), columns.len());
                columns.push(name.to_owned());
            }
        };

        for record in &records {
            for name in record.columns() {
                add_column(name, &mut columns);
            }
        }
        for name in canonical_columns() {
            add_column(&name, &mut columns);
        }

        let width = columns.len();
        let rows = records
            .into_iter()
            .map(|record| {
                let mut row: Vec<Cell> = vec![None; width];
                for (name, value) in record.into_fields() {
                    if let Some(&i) = index.get(&name) {
                        row[i] = Some(value);
                    }
                }
                row
            })
            .collect();

        let mut table = Self { columns, rows };
        for kind in REACTION_KINDS {
            table.fill_absent(&reaction_column(kind), &Value::from(0u64));
        }
        for (name, _) in ACCOUNT_METADATA {
            table.fill_absent(name, &Value::String(String::new()));
        }
        table
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// The cell at `row` in column `name`, or `None` if either is out of range.
    #[must_use]
    pub fn cell(&self, row: usize, name: &str) -> Option<&Cell> {
        let col = self.column_index(name)?;
        self.rows.get(row).map(|r| &r[col])
    }

    /// The value at `row` in column `name`, treating absent cells as missing.
    #[must_use]
    pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
        self.cell(row, name).and_then(Option::as_ref)
    }

    /// All cells of column `name`, top to bottom.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let col = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[col]).collect())
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<Cell>>) {
        (self.columns, self.rows)
    }

    fn fill_absent(&mut self, name: &str, default: &Value) {
        let Some(col) = self.column_index(name) else {
            return;
        };
        for row in &mut self.rows {
            if row[col].is_none() {
                row[col] = Some(default.clone());
            }
        }
    }
}
