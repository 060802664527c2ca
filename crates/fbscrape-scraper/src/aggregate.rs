//! Merging per-target tables into the fleet-wide dataset.

use std::collections::HashMap;

use crate::table::{Cell, PostTable};

/// Terminal artifact of a fleet run.
#[derive(Debug, Clone, PartialEq)]
pub enum FleetResult {
    /// No target produced a table.
    NoData,
    /// Union of all per-target tables, rows in target-processing order.
    /// May have zero rows.
    Combined(PostTable),
}

impl FleetResult {
    #[must_use]
    pub fn table(&self) -> Option<&PostTable> {
        match self {
            Self::NoData => None,
            Self::Combined(table) => Some(table),
        }
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.table().map_or(0, PostTable::len)
    }

    #[must_use]
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }
}

/// Concatenates `tables` in order under the union of their columns.
///
/// Column order is first-seen across the input. Cells for columns a table
/// never had are absent (`None`). An empty input yields
/// [`FleetResult::NoData`], which is distinct from a combined table with
/// zero rows.
#[must_use]
pub fn combine(tables: Vec<PostTable>) -> FleetResult {
    if tables.is_empty() {
        return FleetResult::NoData;
    }

    let mut columns: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for table in &tables {
        for name in table.columns() {
            if !index.contains_key(name) {
                index.insert(name.clone(), columns.len());
                columns.push(name.clone());
            }
        }
    }

    let width = columns.len();
    let total_rows = tables.iter().map(PostTable::len).sum();
    let mut rows: Vec<Vec<Cell>> = Vec::with_capacity(total_rows);

    for table in tables {
        let (table_columns, table_rows) = table.into_parts();
        let positions: Vec<usize> = table_columns
            .iter()
            .filter_map(|name| index.get(name).copied())
            .collect();
        for row in table_rows {
            let mut combined: Vec<Cell> = vec![None; width];
            for (cell, &position) in row.into_iter().zip(&positions) {
                combined[position] = cell;
            }
            rows.push(combined);
        }
    }

    FleetResult::Combined(PostTable::new(columns, rows))
}
