use std::path::Path;

use anyhow::Result;

use crate::domain::entities::record::Cell;

/// Reads one named sheet as rows of positional cells, header row included.
pub trait SheetReader {
    fn read_rows(&self, path: &Path, sheet: &str) -> Result<Vec<Vec<Cell>>>;
}
