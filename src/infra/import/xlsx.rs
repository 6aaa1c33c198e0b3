use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};

use crate::domain::entities::record::Cell;

pub fn cell_from_data(cell: &Data) -> Cell {
    match cell {
        Data::String(v) => Cell::Text(v.to_string()),
        Data::Float(v) => Cell::Number(*v),
        Data::Int(v) => Cell::Number(*v as f64),
        Data::Bool(v) => Cell::Bool(*v),
        Data::DateTime(v) => Cell::Number(v.as_f64()),
        Data::DateTimeIso(v) => Cell::Text(v.to_string()),
        Data::DurationIso(v) => Cell::Text(v.to_string()),
        Data::Error(v) => Cell::Text(v.to_string()),
        Data::Empty => Cell::Empty,
    }
}

/// Reads one named worksheet as rows of cells, header included.
pub fn read_sheet_rows(xlsx_path: &Path, sheet: &str) -> Result<Vec<Vec<Cell>>> {
    let mut workbook = open_workbook_auto(xlsx_path)
        .with_context(|| format!("failed to open workbook: {}", xlsx_path.display()))?;

    let available = workbook.sheet_names();
    if !available.iter().any(|name| name == sheet) {
        anyhow::bail!(
            "sheet not found: {sheet} (available: {})",
            available.join(", ")
        )
    }

    let range = workbook
        .worksheet_range(sheet)
        .with_context(|| format!("failed to read sheet: {sheet}"))?;

    Ok(range
        .rows()
        .map(|r| r.iter().map(cell_from_data).collect())
        .collect())
}

#[cfg(test)]
mod tests {
    use calamine::CellErrorType;

    use super::*;

    #[test]
    fn cell_from_data_keeps_numbers_numeric() {
        assert_eq!(cell_from_data(&Data::Int(7)), Cell::Number(7.0));
        assert_eq!(cell_from_data(&Data::Float(45123.5)), Cell::Number(45123.5));
        assert_eq!(cell_from_data(&Data::Bool(true)), Cell::Bool(true));
    }

    #[test]
    fn cell_from_data_maps_text_empty_and_errors() {
        assert_eq!(
            cell_from_data(&Data::String("SILK".to_string())),
            Cell::Text("SILK".to_string())
        );
        assert_eq!(cell_from_data(&Data::Empty), Cell::Empty);
        assert_eq!(
            cell_from_data(&Data::Error(CellErrorType::NA)),
            Cell::Text("#N/A".to_string())
        );
    }

    #[test]
    fn read_sheet_rows_reports_missing_workbook() {
        let err = read_sheet_rows(Path::new("/nonexistent/data-mb.xlsx"), "Sheet1")
            .expect_err("missing workbook should fail");

        assert!(
            err.to_string().contains("failed to open workbook"),
            "unexpected error: {err:#}"
        );
    }
}
