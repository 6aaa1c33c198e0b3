use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::entities::record::{check_layout, LayoutError};
use crate::usecase::ports::repo::{RecordSink, StoreError};
use crate::usecase::ports::sheet::SheetReader;
use crate::usecase::services::batch_loader::{BatchLoader, LoadReport};
use crate::usecase::services::normalizer::normalize_rows;

pub const DEFAULT_SHEET: &str = "Sheet1";

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to connect to storage: {0}")]
    Connect(StoreError),
    #[error("failed to clear existing records: {0}")]
    Clear(StoreError),
    #[error("failed to read spreadsheet: {0:#}")]
    Source(anyhow::Error),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("failed to publish imported records: {0}")]
    Publish(StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    pub source: PathBuf,
    pub sheet: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub cleared: u64,
    /// Data rows read from the sheet, header excluded.
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub load: LoadReport,
}

/// Runs a full-refresh import: connect, clear, read, normalize, load, publish.
pub struct ImportService<R> {
    reader: R,
    loader: BatchLoader,
}

impl<R: SheetReader> ImportService<R> {
    pub fn new(reader: R, loader: BatchLoader) -> Self {
        Self { reader, loader }
    }

    /// The sink returned by `connect` is dropped, releasing the connection, on every path out.
    pub fn run<S, F>(
        &self,
        connect: F,
        request: &ImportRequest,
    ) -> Result<ImportSummary, ImportError>
    where
        S: RecordSink,
        F: FnOnce() -> Result<S, StoreError>,
    {
        let mut sink = connect().map_err(ImportError::Connect)?;

        let cleared = sink.clear_all().map_err(ImportError::Clear)?;
        info!(cleared, "existing data cleared");

        let mut summary = self.read_and_load(&mut sink, &request.source, &request.sheet)?;
        summary.cleared = cleared;

        sink.publish().map_err(ImportError::Publish)?;

        if summary.load.offered == 0 {
            info!("no valid data found to import");
        } else {
            info!(
                offered = summary.load.offered,
                inserted = summary.load.inserted,
                failed = summary.load.failed_records(),
                chunks_with_errors = summary.load.chunks_with_errors(),
                skipped_rows = summary.rows_skipped,
                "import completed: {} records processed",
                summary.load.offered
            );
        }

        Ok(summary)
    }

    fn read_and_load<S: RecordSink>(
        &self,
        sink: &mut S,
        source: &Path,
        sheet: &str,
    ) -> Result<ImportSummary, ImportError> {
        let rows = self
            .reader
            .read_rows(source, sheet)
            .map_err(ImportError::Source)?;
        info!("found {} rows in sheet \"{sheet}\"", rows.len());

        let (header, data_rows) = rows.split_first().ok_or(LayoutError::MissingHeader)?;
        check_layout(header)?;

        let normalized = normalize_rows(data_rows);
        let load = if normalized.records.is_empty() {
            LoadReport::default()
        } else {
            self.loader.load(sink, &normalized.records)
        };

        Ok(ImportSummary {
            cleared: 0,
            rows_read: data_rows.len(),
            rows_skipped: normalized.skipped,
            load,
        })
    }
}
