use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

use crate::domain::entities::record::{Field, FieldKind};

pub const ACTIVE_TABLE: &str = "sales_records";
pub const STAGING_TABLE: &str = "sales_records_staging";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQL function lowercasing its argument with full Unicode case mapping.
pub const CASEFOLD_FN: &str = "casefold";

fn register_casefold(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        CASEFOLD_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|text| text.to_lowercase()))
        },
    )
}

pub fn open_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("failed to open db: {}", db_path.display()))?;
    conn.busy_timeout(BUSY_TIMEOUT)
        .context("failed to set busy timeout")?;
    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))
        .context("failed to enable WAL journal")?;
    register_casefold(&conn).context("failed to register casefold function")?;
    Ok(conn)
}

pub fn create_table_sql(table: &str) -> String {
    let columns = Field::ALL
        .iter()
        .map(|field| {
            let sql_type = match field.kind() {
                FieldKind::Text => "TEXT",
                FieldKind::Number => "REAL",
            };
            let not_null = if *field == Field::ArticleNo {
                " NOT NULL"
            } else {
                ""
            };
            format!("    {} {sql_type}{not_null},\n", field.column())
        })
        .collect::<String>();

    format!(
        "CREATE TABLE IF NOT EXISTS {table} (
    source_row INTEGER PRIMARY KEY,
{columns}    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
) STRICT;"
    )
}

/// Indexes backing the filter and default-sort columns of the active table.
pub fn create_indexes_sql() -> String {
    [
        Field::CategoryFilter,
        Field::BranchFilter,
        Field::SupplierFilter,
        Field::XnMemoDate,
    ]
    .iter()
    .map(|field| {
        format!(
            "CREATE INDEX IF NOT EXISTS idx_{ACTIVE_TABLE}_{col} ON {ACTIVE_TABLE}({col});\n",
            col = field.column()
        )
    })
    .collect()
}

pub fn init_db(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create parent dir: {}", parent.display()))?;
    }

    let conn = open_connection(db_path)?;

    conn.execute_batch(&format!(
        "{}\n{}",
        create_table_sql(ACTIVE_TABLE),
        create_indexes_sql()
    ))
    .context("failed to initialize schema")?;

    Ok(())
}
