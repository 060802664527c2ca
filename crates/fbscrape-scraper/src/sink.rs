//! Writing tables to timestamped CSV files.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::error::ScraperError;
use crate::table::{Cell, PostTable};

/// Label used for the combined fleet table.
pub use fbscrape_core::FLEET_LABEL;

pub const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Destination for finished tables.
pub trait PersistenceSink {
    /// Writes `table` under `label` and returns where it went.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Persist`] if the table could not be written.
    fn persist(
        &self,
        table: &PostTable,
        label: &str,
        stamped_at: NaiveDateTime,
    ) -> Result<PathBuf, ScraperError>;
}

/// Writes UTF-8 CSV files named `<label>_<YYYY-MM-DD_HH-MM-SS>.csv` into
/// `output_dir`, creating the directory on first use.
///
/// Each file is written to a `.partial` sibling and renamed into place, so a
/// failed write never leaves a truncated CSV behind.
#[derive(Debug, Clone)]
pub struct CsvSink {
    output_dir: PathBuf,
}

impl CsvSink {
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    #[must_use]
    pub fn file_path(&self, label: &str, stamped_at: NaiveDateTime) -> PathBuf {
        let safe_label = label.replace(['/', '\\'], "_");
        self.output_dir.join(format!(
            "{safe_label}_{}.csv",
            stamped_at.format(FILE_TIMESTAMP_FORMAT)
        ))
    }
}

impl PersistenceSink for CsvSink {
    fn persist(
        &self,
        table: &PostTable,
        label: &str,
        stamped_at: NaiveDateTime,
    ) -> Result<PathBuf, ScraperError> {
        let path = self.file_path(label, stamped_at);
        write_csv(&self.output_dir, &path, table).map_err(|e| ScraperError::Persist {
            label: label.to_owned(),
            source: Box::new(e),
        })?;
        tracing::debug!(label, path = %path.display(), rows = table.len(), "table written");
        Ok(path)
    }
}

fn write_csv(output_dir: &Path, path: &Path, table: &PostTable) -> Result<(), ScraperError> {
    std::fs::create_dir_all(output_dir)?;

    let partial = path.with_extension("csv.partial");
    if let Err(err) = write_rows(&partial, table) {
        let _ = std::fs::remove_file(&partial);
        return Err(err);
    }
    std::fs::rename(&partial, path)?;
    Ok(())
}

fn write_rows(path: &Path, table: &PostTable) -> Result<(), ScraperError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(render_cell))?;
    }
    writer.flush()?;
    Ok(())
}

/// Text form of a cell: absent and `null` cells are empty, strings are
/// written as-is, other scalars use their JSON spelling, and nested values
/// are written as compact JSON.
#[must_use]
pub fn render_cell(cell: &Cell) -> String {
    match cell {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap()
    }

    #[test]
    fn file_path_follows_label_timestamp_pattern() {
        let sink = CsvSink::new("facebook_data");
        assert_eq!(
            sink.file_path("AWMemorial", at()),
            PathBuf::from("facebook_data/AWMemorial_2026-10-19_14-05-09.csv")
        );
    }

    #[test]
    fn file_path_neutralises_path_separators() {
        let sink = CsvSink::new("out");
        assert_eq!(
            sink.file_path("a/b", at()),
            PathBuf::from("out/a_b_2026-10-19_14-05-09.csv")
        );
    }

    #[test]
    fn render_cell_variants() {
        assert_eq!(render_cell(&None), "");
        assert_eq!(render_cell(&Some(Value::Null)), "");
        assert_eq!(render_cell(&Some(json!("héllo"))), "héllo");
        assert_eq!(render_cell(&Some(json!(42))), "42");
        assert_eq!(render_cell(&Some(json!(true))), "true");
        assert_eq!(render_cell(&Some(json!({"a": 1}))), r#"{"a":1}"#);
    }

    #[test]
    fn persist_creates_directory_and_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("nested").join("facebook_data");
        let sink = CsvSink::new(&output_dir);
        let table = PostTable::new(
            vec!["post_text".to_owned(), "reaction_Like".to_owned()],
            vec![
                vec![Some(json!("first, with comma")), Some(json!(3))],
                vec![None, Some(json!(0))],
            ],
        );

        let path = sink.persist(&table, "AWMemorial", at()).unwrap();

        assert_eq!(path, output_dir.join("AWMemorial_2026-10-19_14-05-09.csv"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "post_text,reaction_Like\n\"first, with comma\",3\n,0\n"
        );
        assert!(!path.with_extension("csv.partial").exists());
    }

    #[test]
    fn persist_failure_is_labelled() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();
        let sink = CsvSink::new(&blocker);
        let table = PostTable::new(vec!["a".to_owned()], Vec::new());

        let err = sink.persist(&table, FLEET_LABEL, at()).unwrap_err();

        assert!(
            matches!(err, ScraperError::Persist { ref label, .. } if label == FLEET_LABEL),
            "expected Persist error, got: {err:?}"
        );
    }
}
