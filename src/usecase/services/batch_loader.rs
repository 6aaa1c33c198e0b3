use std::ops::Range;

use tracing::{info, warn};

use crate::domain::entities::record::Record;
use crate::usecase::ports::repo::{RecordSink, WriteFailure};

pub const DEFAULT_CHUNK_SIZE: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkStatus {
    Completed,
    CompletedWithErrors(Vec<WriteFailure>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkReport {
    /// 1-based chunk number.
    pub number: usize,
    /// Positions of the chunk's records in the loaded sequence.
    pub range: Range<usize>,
    pub inserted: usize,
    pub status: ChunkStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub offered: usize,
    /// Best effort: counted per chunk from what the store reports.
    pub inserted: usize,
    pub chunks: Vec<ChunkReport>,
}

impl LoadReport {
    pub fn failed_records(&self) -> usize {
        self.offered - self.inserted
    }

    pub fn chunks_with_errors(&self) -> usize {
        self.chunks
            .iter()
            .filter(|chunk| !matches!(chunk.status, ChunkStatus::Completed))
            .count()
    }
}

/// Writes records in fixed-size chunks, one chunk at a time, in order.
#[derive(Debug, Clone, Copy)]
pub struct BatchLoader {
    chunk_size: usize,
}

impl Default for BatchLoader {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl BatchLoader {
    pub fn new(chunk_size: usize) -> anyhow::Result<Self> {
        if chunk_size == 0 {
            anyhow::bail!("chunk size must be greater than zero")
        }
        Ok(Self { chunk_size })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn total_chunks(&self, records: usize) -> usize {
        records.div_ceil(self.chunk_size)
    }

    /// Writes every chunk. The sink must already be cleared. A failing chunk is
    /// reported and the next chunk is still attempted.
    pub fn load<S: RecordSink + ?Sized>(&self, sink: &mut S, records: &[Record]) -> LoadReport {
        let total_chunks = self.total_chunks(records.len());
        let mut report = LoadReport {
            offered: records.len(),
            ..LoadReport::default()
        };

        info!(
            records = records.len(),
            chunks = total_chunks,
            "starting import of {} records in {} chunks",
            records.len(),
            total_chunks
        );

        for (idx, chunk) in records.chunks(self.chunk_size).enumerate() {
            let number = idx + 1;
            let start = idx * self.chunk_size;
            let range = start..start + chunk.len();
            info!(
                "processing chunk {number}/{total_chunks} (records {} to {})",
                range.start + 1,
                range.end
            );

            let chunk_report = match sink.insert_unordered(chunk) {
                Ok(write) if write.failures.is_empty() => {
                    info!(inserted = write.inserted, "chunk {number} completed");
                    ChunkReport {
                        number,
                        range,
                        inserted: write.inserted,
                        status: ChunkStatus::Completed,
                    }
                }
                Ok(write) => {
                    for failure in &write.failures {
                        warn!(
                            source_row = failure.source_row,
                            kind = %failure.kind,
                            "record rejected: {}",
                            failure.message
                        );
                    }
                    warn!(
                        inserted = write.inserted,
                        failed = write.failures.len(),
                        "chunk {number} completed with errors"
                    );
                    ChunkReport {
                        number,
                        range,
                        inserted: write.inserted,
                        status: ChunkStatus::CompletedWithErrors(write.failures),
                    }
                }
                Err(err) => {
                    warn!("chunk {number} failed: {err}");
                    ChunkReport {
                        number,
                        range,
                        inserted: 0,
                        status: ChunkStatus::Failed(err.to_string()),
                    }
                }
            };

            report.inserted += chunk_report.inserted;
            report.chunks.push(chunk_report);
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::domain::entities::record::{Cell, FIELD_COUNT};
    use crate::usecase::ports::repo::{ChunkWrite, StoreError, WriteFailureKind};

    fn record(source_row: usize) -> Record {
        let mut cells: [Cell; FIELD_COUNT] = Default::default();
        cells[0] = Cell::Number(45000.0);
        cells[10] = Cell::Text(format!("ART-{source_row}"));
        Record { source_row, cells }
    }

    /// Keeps every chunk it sees; rejects configured rows and can fail whole chunks.
    #[derive(Default)]
    struct RecordingSink {
        chunks: Vec<Vec<usize>>,
        stored: Vec<usize>,
        reject_rows: Vec<usize>,
        fail_chunk_containing: Option<usize>,
    }

    impl RecordSink for RecordingSink {
        fn clear_all(&mut self) -> Result<u64, StoreError> {
            let removed = self.stored.len() as u64;
            self.stored.clear();
            Ok(removed)
        }

        fn insert_unordered(&mut self, chunk: &[Record]) -> Result<ChunkWrite, StoreError> {
            let rows: Vec<usize> = chunk.iter().map(|r| r.source_row).collect();
            self.chunks.push(rows.clone());
            if let Some(row) = self.fail_chunk_containing {
                if rows.contains(&row) {
                    return Err(StoreError::Message("connection reset".to_string()));
                }
            }

            let mut write = ChunkWrite::default();
            for (position, row) in rows.into_iter().enumerate() {
                if self.reject_rows.contains(&row) {
                    write.failures.push(WriteFailure {
                        position,
                        source_row: row,
                        kind: WriteFailureKind::Duplicate,
                        message: "duplicate key".to_string(),
                    });
                } else {
                    self.stored.push(row);
                    write.inserted += 1;
                }
            }
            Ok(write)
        }

        fn publish(&mut self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[test]
    fn rejects_zero_chunk_size() {
        assert!(BatchLoader::new(0).is_err());
        assert_eq!(BatchLoader::default().chunk_size(), 2000);
    }

    #[test]
    fn partial_chunk_failure_keeps_valid_records() {
        let records: Vec<Record> = (1..=2000).map(record).collect();
        let mut sink = RecordingSink {
            reject_rows: vec![1500],
            ..RecordingSink::default()
        };

        let report = BatchLoader::default().load(&mut sink, &records);

        assert_eq!(report.offered, 2000);
        assert_eq!(report.inserted, 1999);
        assert_eq!(report.failed_records(), 1);
        assert_eq!(report.chunks.len(), 1);
        match &report.chunks[0].status {
            ChunkStatus::CompletedWithErrors(failures) => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].source_row, 1500);
            }
            other => panic!("unexpected status: {other:?}"),
        }
        assert!(!sink.stored.contains(&1500));
        assert!(sink.stored.contains(&1499) && sink.stored.contains(&1501));
    }

    #[test]
    fn failed_chunk_does_not_stop_later_chunks() {
        let records: Vec<Record> = (1..=10).map(record).collect();
        let mut sink = RecordingSink {
            fail_chunk_containing: Some(5),
            ..RecordingSink::default()
        };

        let report = BatchLoader::new(4)
            .expect("chunk size is valid")
            .load(&mut sink, &records);

        assert_eq!(report.chunks.len(), 3);
        assert!(matches!(report.chunks[1].status, ChunkStatus::Failed(_)));
        assert_eq!(report.chunks[2].status, ChunkStatus::Completed);
        assert_eq!(report.chunks[2].range, 8..10);
        assert_eq!(report.inserted, 6);
        assert_eq!(report.chunks_with_errors(), 1);
        assert_eq!(sink.stored, vec![1, 2, 3, 4, 9, 10]);
    }

    #[test]
    fn empty_input_writes_nothing() {
        let mut sink = RecordingSink::default();

        let report = BatchLoader::default().load(&mut sink, &[]);

        assert_eq!(report, LoadReport::default());
        assert!(sink.chunks.is_empty());
    }

    proptest! {
        #[test]
        fn chunks_are_ordered_and_exhaustive(len in 0usize..300, chunk_size in 1usize..64) {
            let records: Vec<Record> = (0..len).map(record).collect();
            let mut sink = RecordingSink::default();

            let report = BatchLoader::new(chunk_size).unwrap().load(&mut sink, &records);

            let concatenated: Vec<usize> = sink.chunks.iter().flatten().copied().collect();
            prop_assert_eq!(concatenated, (0..len).collect::<Vec<_>>());
            if let Some((last, full)) = sink.chunks.split_last() {
                prop_assert!(full.iter().all(|chunk| chunk.len() == chunk_size));
                prop_assert!(!last.is_empty() && last.len() <= chunk_size);
            }
            prop_assert_eq!(report.chunks.len(), len.div_ceil(chunk_size));
        }
    }
}
