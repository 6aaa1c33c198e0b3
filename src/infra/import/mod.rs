pub mod csv;
pub mod xlsx;

use std::path::Path;

use anyhow::Result;

use crate::domain::entities::record::Cell;
use crate::usecase::ports::sheet::SheetReader;

/// Picks the reader by file extension: `.csv` goes through the csv crate, everything
/// else through calamine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadsheetReader;

impl SheetReader for SpreadsheetReader {
    fn read_rows(&self, path: &Path, sheet: &str) -> Result<Vec<Vec<Cell>>> {
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            self::csv::read_csv_rows(path)
        } else {
            self::xlsx::read_sheet_rows(path, sheet)
        }
    }
}
