use anyhow::{Context, Result};
use rusqlite::{types::Value, Connection, Row};

use crate::domain::entities::query::{Predicate, SortDirection, SortSpec};
use crate::domain::entities::record::{Field, SalesRecord};
use crate::domain::entities::summary::Aggregate;
use crate::infra::sqlite::schema::CASEFOLD_FN;

/// Escapes `LIKE` wildcards so the needle matches as a literal substring.
pub fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Renders a predicate as a `WHERE` clause (empty when it matches everything).
/// Both sides are lowercased, so matching ignores case beyond ASCII too.
pub fn where_clause(predicate: &Predicate) -> (String, Vec<Value>) {
    if predicate.is_match_all() {
        return (String::new(), Vec::new());
    }

    let mut clauses = Vec::with_capacity(predicate.clauses.len());
    let mut params = Vec::with_capacity(predicate.clauses.len());
    for clause in &predicate.clauses {
        clauses.push(format!(
            "{CASEFOLD_FN}({}) LIKE ? ESCAPE '\\'",
            clause.field.column()
        ));
        let needle = escape_like(&clause.needle.to_lowercase());
        params.push(Value::Text(format!("%{needle}%")));
    }

    (format!(" WHERE {}", clauses.join(" AND ")), params)
}

fn select_columns() -> String {
    let fields = Field::ALL
        .iter()
        .map(|field| field.column())
        .collect::<Vec<_>>()
        .join(", ");
    format!("source_row, {fields}, created_at, updated_at")
}

pub fn insert_sql(table: &str) -> String {
    let placeholders = vec!["?"; Field::ALL.len() + 3].join(", ");
    format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders})",
        select_columns()
    )
}

fn text(row: &Row<'_>, field: Field) -> rusqlite::Result<Option<String>> {
    row.get(field.position() + 1)
}

fn number(row: &Row<'_>, field: Field) -> rusqlite::Result<Option<f64>> {
    row.get(field.position() + 1)
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<SalesRecord> {
    let timestamps = Field::ALL.len() + 1;
    Ok(SalesRecord {
        id: row.get(0)?,
        xn_memo_date: number(row, Field::XnMemoDate)?,
        department_short_name: text(row, Field::DepartmentShortName)?,
        category_short_name: text(row, Field::CategoryShortName)?,
        category_filter: text(row, Field::CategoryFilter)?,
        branch_alias: text(row, Field::BranchAlias)?,
        branch_filter: text(row, Field::BranchFilter)?,
        supplier_alias: text(row, Field::SupplierAlias)?,
        supplier_filter: text(row, Field::SupplierFilter)?,
        supplier_name: text(row, Field::SupplierName)?,
        supplier_city: text(row, Field::SupplierCity)?,
        article_no: text(row, Field::ArticleNo)?.unwrap_or_default(),
        para1_name: text(row, Field::Para1Name)?,
        para2_name: text(row, Field::Para2Name)?,
        para2_index: number(row, Field::Para2Index)?,
        fabric: text(row, Field::Fabric)?,
        sub_fabric: text(row, Field::SubFabric)?,
        concept: text(row, Field::Concept)?,
        item_id: text(row, Field::ItemId)?,
        item_mrp: number(row, Field::ItemMrp)?,
        property: text(row, Field::Property)?,
        para3_name: text(row, Field::Para3Name)?,
        para4_name: text(row, Field::Para4Name)?,
        pur_date: number(row, Field::PurDate)?,
        net_sls_qty: number(row, Field::NetSlsQty)?,
        net_amount: number(row, Field::NetAmount)?,
        net_sls_cost_value: number(row, Field::NetSlsCostValue)?,
        sls_ext_cost_value: number(row, Field::SlsExtCostValue)?,
        created_at: row.get(timestamps)?,
        updated_at: row.get(timestamps + 1)?,
    })
}

fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

pub fn count_records(conn: &Connection, table: &str, predicate: &Predicate) -> Result<u64> {
    let (where_sql, params) = where_clause(predicate);
    let count: i64 = conn
        .query_row(
            &format!("SELECT COUNT(*) FROM {table}{where_sql}"),
            rusqlite::params_from_iter(params),
            |row| row.get(0),
        )
        .context("failed to query filtered record count")?;
    Ok(count.max(0) as u64)
}

pub fn find_records(
    conn: &Connection,
    table: &str,
    predicate: &Predicate,
    sort: SortSpec,
    skip: u64,
    limit: u64,
) -> Result<Vec<SalesRecord>> {
    let (where_sql, mut params) = where_clause(predicate);
    let sort_direction = match sort.direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    };
    let sql = format!(
        "SELECT {} FROM {table}{where_sql}
         ORDER BY {} {sort_direction}, source_row ASC
         LIMIT ? OFFSET ?",
        select_columns(),
        sort.field.column()
    );
    params.push(Value::Integer(to_sql_int(limit)));
    params.push(Value::Integer(to_sql_int(skip)));

    query_records(conn, &sql, params)
}

/// Records in import order, which is ascending source row.
pub fn first_records(conn: &Connection, table: &str, limit: u64) -> Result<Vec<SalesRecord>> {
    let sql = format!(
        "SELECT {} FROM {table} ORDER BY source_row ASC LIMIT ?",
        select_columns()
    );
    query_records(conn, &sql, vec![Value::Integer(to_sql_int(limit))])
}

fn query_records(conn: &Connection, sql: &str, params: Vec<Value>) -> Result<Vec<SalesRecord>> {
    let mut stmt = conn
        .prepare(sql)
        .context("failed to prepare record page query")?;
    let records = stmt
        .query_map(rusqlite::params_from_iter(params), row_to_record)
        .context("failed to query record page")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect record page")?;
    Ok(records)
}

pub fn distinct_values(conn: &Connection, table: &str, field: Field) -> Result<Vec<String>> {
    let column = field.column();
    let mut stmt = conn
        .prepare(&format!(
            "SELECT DISTINCT {column} FROM {table}
             WHERE {column} IS NOT NULL
             ORDER BY {column} ASC"
        ))
        .with_context(|| format!("failed to prepare distinct query for {column}"))?;
    let values = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .with_context(|| format!("failed to query distinct {column}"))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("failed to collect distinct {column}"))?;
    Ok(values)
}

pub fn aggregate_records(
    conn: &Connection,
    table: &str,
    predicate: &Predicate,
) -> Result<Aggregate> {
    let (where_sql, params) = where_clause(predicate);
    let amount = Field::NetAmount.column();
    let quantity = Field::NetSlsQty.column();
    let mrp = Field::ItemMrp.column();
    let sql = format!(
        "SELECT COUNT(*),
                COALESCE(SUM({amount}), 0.0),
                COALESCE(SUM({quantity}), 0.0),
                COALESCE(AVG({amount}), 0.0),
                COALESCE(AVG({mrp}), 0.0),
                COALESCE(MAX({amount}), 0.0),
                COALESCE(MIN({amount}), 0.0)
         FROM {table}{where_sql}"
    );

    conn.query_row(&sql, rusqlite::params_from_iter(params), |row| {
        Ok(Aggregate {
            count: row.get::<_, i64>(0)?.max(0) as u64,
            sum_net_amount: row.get(1)?,
            sum_net_sls_qty: row.get(2)?,
            avg_net_amount: row.get(3)?,
            avg_item_mrp: row.get(4)?,
            max_net_amount: row.get(5)?,
            min_net_amount: row.get(6)?,
        })
    })
    .context("failed to aggregate records")
}
