use crate::domain::entities::query::{Predicate, SortSpec};
use crate::domain::entities::record::{Field, Record, SalesRecord};
use crate::domain::entities::summary::Aggregate;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Message(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteFailureKind {
    /// The record collides with an existing key.
    Duplicate,
    /// A cell could not be coerced to its column type.
    TypeMismatch,
    /// Any other constraint violation.
    Constraint,
    Other,
}

impl std::fmt::Display for WriteFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            WriteFailureKind::Duplicate => "duplicate key",
            WriteFailureKind::TypeMismatch => "type mismatch",
            WriteFailureKind::Constraint => "constraint violation",
            WriteFailureKind::Other => "write error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteFailure {
    /// Index of the record inside its chunk.
    pub position: usize,
    pub source_row: usize,
    pub kind: WriteFailureKind,
    pub message: String,
}

/// Result of one unordered bulk insert.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChunkWrite {
    pub inserted: usize,
    pub failures: Vec<WriteFailure>,
}

/// Write side of the record store, held open for the length of an import.
pub trait RecordSink {
    /// Empties the write target, returning how many active records the refresh replaces.
    fn clear_all(&mut self) -> Result<u64, StoreError>;

    /// Inserts every record it can; individual failures are reported, not raised.
    fn insert_unordered(&mut self, chunk: &[Record]) -> Result<ChunkWrite, StoreError>;

    /// Makes the write target the set readers see.
    fn publish(&mut self) -> Result<(), StoreError>;
}

/// Read side of the record store.
pub trait RecordSource: Send + Sync {
    fn count(&self, predicate: &Predicate) -> Result<u64, StoreError>;

    fn find(
        &self,
        predicate: &Predicate,
        sort: SortSpec,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<SalesRecord>, StoreError>;

    /// The first `limit` records in import order.
    fn first(&self, limit: u64) -> Result<Vec<SalesRecord>, StoreError>;

    /// Distinct non-null values of a text field, sorted.
    fn distinct(&self, field: Field) -> Result<Vec<String>, StoreError>;

    fn aggregate(&self, predicate: &Predicate) -> Result<Aggregate, StoreError>;
}
