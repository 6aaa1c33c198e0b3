use std::path::{Path, PathBuf};

use anyhow::Context;
use rusqlite::{ffi, types::Value, Connection, ErrorCode};
use tracing::debug;

use crate::domain::entities::query::{Predicate, SortSpec};
use crate::domain::entities::record::{Field, Record, SalesRecord};
use crate::domain::entities::summary::Aggregate;
use crate::infra::sqlite::coerce::coerce;
use crate::infra::sqlite::queries::{
    aggregate_records, count_records, distinct_values, find_records, first_records, insert_sql,
};
use crate::infra::sqlite::schema::{
    create_indexes_sql, create_table_sql, init_db, open_connection, ACTIVE_TABLE, STAGING_TABLE,
};
use crate::usecase::ports::repo::{
    ChunkWrite, RecordSink, RecordSource, StoreError, WriteFailure, WriteFailureKind,
};

const SQLITE_CONSTRAINT_DATATYPE: i32 = 3091;

fn store_err(err: anyhow::Error) -> StoreError {
    StoreError::Message(format!("{err:#}"))
}

/// How an import replaces the active record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshMode {
    /// Load into a staging table and swap it in when the load finishes.
    #[default]
    Staged,
    /// Clear and load the active table directly; readers may see a partial set.
    InPlace,
}

/// Import-side store holding one connection until dropped.
pub struct SqliteRecordSink {
    conn: Connection,
    mode: RefreshMode,
}

impl SqliteRecordSink {
    pub fn connect(db_path: &Path, mode: RefreshMode) -> Result<Self, StoreError> {
        init_db(db_path).map_err(store_err)?;
        let conn = open_connection(db_path).map_err(store_err)?;
        debug!(db = %db_path.display(), ?mode, "storage connection established");
        Ok(Self { conn, mode })
    }

    fn table(&self) -> &'static str {
        match self.mode {
            RefreshMode::Staged => STAGING_TABLE,
            RefreshMode::InPlace => ACTIVE_TABLE,
        }
    }

    /// Recreates an empty staging table; returns the active count that publish replaces.
    fn reset_staging(&self) -> anyhow::Result<u64> {
        let replaced = count_records(&self.conn, ACTIVE_TABLE, &Predicate::match_all())
            .context("failed to count active records")?;

        self.conn
            .execute_batch(&format!(
                "DROP TABLE IF EXISTS {STAGING_TABLE};\n{}",
                create_table_sql(STAGING_TABLE)
            ))
            .context("failed to reset staging table")?;
        Ok(replaced)
    }

    fn swap_staging_in(&mut self) -> anyhow::Result<()> {
        let tx = self
            .conn
            .transaction()
            .context("failed to start publish transaction")?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {ACTIVE_TABLE};
             ALTER TABLE {STAGING_TABLE} RENAME TO {ACTIVE_TABLE};
             {}",
            create_indexes_sql()
        ))
        .context("failed to swap staging table into place")?;
        tx.commit().context("failed to commit publish transaction")
    }
}

fn classify(err: &rusqlite::Error) -> WriteFailureKind {
    match err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            match failure.extended_code {
                ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE => {
                    WriteFailureKind::Duplicate
                }
                SQLITE_CONSTRAINT_DATATYPE => WriteFailureKind::TypeMismatch,
                _ => WriteFailureKind::Constraint,
            }
        }
        _ => WriteFailureKind::Other,
    }
}

fn bind_record(record: &Record, stamp: &str) -> Result<Vec<Value>, String> {
    let mut values = Vec::with_capacity(Field::ALL.len() + 3);
    values.push(Value::Integer(record.source_row as i64));
    for field in Field::ALL {
        let value = coerce(record.get(field), field.kind())
            .map_err(|message| format!("{}: {message}", field.api_name()))?;
        values.push(value);
    }
    values.push(Value::Text(stamp.to_string()));
    values.push(Value::Text(stamp.to_string()));
    Ok(values)
}

impl RecordSink for SqliteRecordSink {
    fn clear_all(&mut self) -> Result<u64, StoreError> {
        match self.mode {
            RefreshMode::Staged => self.reset_staging().map_err(store_err),
            RefreshMode::InPlace => self
                .conn
                .execute(&format!("DELETE FROM {ACTIVE_TABLE}"), [])
                .map(|removed| removed as u64)
                .context("failed to clear records")
                .map_err(store_err),
        }
    }

    fn insert_unordered(&mut self, chunk: &[Record]) -> Result<ChunkWrite, StoreError> {
        let sql = insert_sql(self.table());
        let stamp = chrono::Utc::now().to_rfc3339();
        let tx = self
            .conn
            .transaction()
            .context("failed to start chunk transaction")
            .map_err(store_err)?;

        let mut write = ChunkWrite::default();
        {
            let mut insert_record = tx
                .prepare(&sql)
                .context("failed to prepare record insert")
                .map_err(store_err)?;

            for (position, record) in chunk.iter().enumerate() {
                let values = match bind_record(record, &stamp) {
                    Ok(values) => values,
                    Err(message) => {
                        write.failures.push(WriteFailure {
                            position,
                            source_row: record.source_row,
                            kind: WriteFailureKind::TypeMismatch,
                            message,
                        });
                        continue;
                    }
                };

                match insert_record.execute(rusqlite::params_from_iter(values)) {
                    Ok(_) => write.inserted += 1,
                    Err(err) => write.failures.push(WriteFailure {
                        position,
                        source_row: record.source_row,
                        kind: classify(&err),
                        message: err.to_string(),
                    }),
                }
            }
        }

        tx.commit()
            .context("failed to commit chunk transaction")
            .map_err(store_err)?;
        Ok(write)
    }

    fn publish(&mut self) -> Result<(), StoreError> {
        match self.mode {
            RefreshMode::Staged => self.swap_staging_in().map_err(store_err),
            RefreshMode::InPlace => Ok(()),
        }
    }
}

impl Drop for SqliteRecordSink {
    fn drop(&mut self) {
        debug!("storage connection released");
    }
}

/// Read-side store; opens a connection per call so it can be shared across requests.
pub struct SqliteRecordSource {
    pub db_path: PathBuf,
}

impl SqliteRecordSource {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    pub fn init(&self) -> Result<(), StoreError> {
        init_db(&self.db_path).map_err(store_err)
    }

    fn connection(&self) -> Result<Connection, StoreError> {
        open_connection(&self.db_path).map_err(store_err)
    }
}

impl RecordSource for SqliteRecordSource {
    fn count(&self, predicate: &Predicate) -> Result<u64, StoreError> {
        count_records(&self.connection()?, ACTIVE_TABLE, predicate).map_err(store_err)
    }

    fn find(
        &self,
        predicate: &Predicate,
        sort: SortSpec,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<SalesRecord>, StoreError> {
        find_records(&self.connection()?, ACTIVE_TABLE, predicate, sort, skip, limit)
            .map_err(store_err)
    }

    fn first(&self, limit: u64) -> Result<Vec<SalesRecord>, StoreError> {
        first_records(&self.connection()?, ACTIVE_TABLE, limit).map_err(store_err)
    }

    fn distinct(&self, field: Field) -> Result<Vec<String>, StoreError> {
        distinct_values(&self.connection()?, ACTIVE_TABLE, field).map_err(store_err)
    }

    fn aggregate(&self, predicate: &Predicate) -> Result<Aggregate, StoreError> {
        aggregate_records(&self.connection()?, ACTIVE_TABLE, predicate).map_err(store_err)
    }
}
