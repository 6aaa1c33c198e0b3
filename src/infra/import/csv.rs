use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::entities::record::Cell;

/// Reads a CSV export of the sheet. Every cell is text; empty fields are `Cell::Empty`.
pub fn read_csv_rows(csv_path: &Path) -> Result<Vec<Vec<Cell>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(csv_path)
        .with_context(|| format!("failed to open csv: {}", csv_path.display()))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("failed to parse csv record")?;
        rows.push(
            record
                .iter()
                .map(|value| {
                    if value.is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(value.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn reads_ragged_rows_with_empty_cells() {
        let temp_dir = tempfile::tempdir().expect("should create temp dir");
        let csv_path = temp_dir.path().join("sales.csv");
        fs::write(&csv_path, "a,b,c\n45000,,x\n\n1,2\n").expect("should write csv fixture");

        let rows = read_csv_rows(&csv_path).expect("csv should parse");

        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[1],
            vec![Cell::from("45000"), Cell::Empty, Cell::from("x")]
        );
        assert_eq!(rows[2], vec![Cell::from("1"), Cell::from("2")]);
    }
}
