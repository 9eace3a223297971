//! SQLite access: connection opening, destination table creation, schema
//! introspection, and transactional row writes.
//!
//! Table shapes are owned by the store, not the pipeline: ingestion reads
//! them back through `PRAGMA table_info` and never issues DDL of its own.
//! [`create_tables`] exists so a fresh database can be stood up once through
//! the `init` command.

use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use rusqlite::{Connection, params_from_iter, types::Value as SqlValue};

use crate::cli::WriteMode;
use crate::schema::{ColumnKind, ColumnMeta, TableSchema, kind_from_declared_type};

const DESTINATION_DDL: &str = "
CREATE TABLE IF NOT EXISTS demand_forecast (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ProductID INTEGER NOT NULL,
    StoreID INTEGER NOT NULL,
    Date TEXT NOT NULL,
    SalesQuantity INTEGER,
    Price REAL,
    Promotion TEXT,
    Seasonality TEXT,
    ExternalFactors TEXT,
    DemandTrend TEXT,
    CustomerSegment TEXT,
    UNIQUE(ProductID, StoreID, Date)
);
CREATE TABLE IF NOT EXISTS inventory_monitoring (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ProductID INTEGER NOT NULL,
    StoreID INTEGER NOT NULL,
    StockLevel INTEGER,
    SupplierLeadTimeDays INTEGER,
    StockoutFrequency INTEGER,
    ReorderPoint INTEGER,
    ExpiryDate TEXT,
    WarehouseCapacity INTEGER,
    OrderFulfillmentTimeDays INTEGER,
    LastUpdated TEXT DEFAULT CURRENT_TIMESTAMP,
    UNIQUE(ProductID, StoreID)
);
CREATE TABLE IF NOT EXISTS pricing_optimization (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ProductID INTEGER NOT NULL,
    StoreID INTEGER NOT NULL,
    Price REAL,
    CompetitorPrice REAL,
    DiscountPercentage REAL,
    SalesVolume INTEGER,
    CustomerReviews TEXT,
    ReturnRatePercentage REAL,
    StorageCost REAL,
    ElasticityIndex REAL,
    UNIQUE(ProductID, StoreID)
);
";

pub fn open(path: &Path) -> Result<Connection> {
    Connection::open(path).with_context(|| format!("Opening destination store {path:?}"))
}

pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(DESTINATION_DDL)
        .context("Creating destination tables")
}

/// Introspects `table` once and overlays the dataset's declared date columns
/// onto the store-reported kinds. Returns `None` when the table does not
/// exist.
pub fn table_schema(
    conn: &Connection,
    table: &str,
    date_columns: &[&str],
) -> rusqlite::Result<Option<TableSchema>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info(\"{table}\")"))?;
    let columns = stmt
        .query_map([], |row| {
            let name: String = row.get(1)?;
            let declared: String = row.get(2)?;
            Ok((name, declared))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    if columns.is_empty() {
        return Ok(None);
    }

    let columns = columns
        .into_iter()
        .map(|(name, declared)| {
            let kind = if date_columns.contains(&name.as_str()) {
                ColumnKind::Date
            } else {
                kind_from_declared_type(&declared)
            };
            ColumnMeta { name, kind }
        })
        .collect();
    Ok(Some(TableSchema {
        table: table.to_string(),
        columns,
    }))
}

/// Writes `rows` (cells aligned with `columns`) into the schema's table
/// inside one transaction. `Replace` clears existing contents first; any
/// failure rolls the whole write back.
pub fn write_rows(
    conn: &mut Connection,
    schema: &TableSchema,
    columns: &[String],
    rows: &[Vec<Option<String>>],
    mode: WriteMode,
) -> rusqlite::Result<usize> {
    let kinds = columns
        .iter()
        .map(|name| schema.kind_of(name).unwrap_or(ColumnKind::Textual))
        .collect::<Vec<_>>();
    let column_list = columns
        .iter()
        .map(|name| format!("\"{name}\""))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; columns.len()].join(", ");
    let insert_sql = format!(
        "INSERT INTO \"{table}\" ({column_list}) VALUES ({placeholders})",
        table = schema.table
    );
    debug!("Insert statement: {insert_sql}");

    let tx = conn.transaction()?;
    if mode == WriteMode::Replace {
        tx.execute(&format!("DELETE FROM \"{table}\"", table = schema.table), [])?;
    }
    {
        let mut stmt = tx.prepare(&insert_sql)?;
        for row in rows {
            let params = row
                .iter()
                .zip(kinds.iter())
                .map(|(cell, kind)| bind_value(cell.as_deref(), *kind));
            stmt.execute(params_from_iter(params))?;
        }
    }
    tx.commit()?;
    Ok(rows.len())
}

/// Binds a cell under the destination column kind. Numeric cells are bound
/// as integers or reals when they parse; everything else goes in as text so
/// SQLite affinity has the final say.
fn bind_value(cell: Option<&str>, kind: ColumnKind) -> SqlValue {
    let Some(text) = cell else {
        return SqlValue::Null;
    };
    if kind == ColumnKind::Numeric {
        if let Ok(int) = text.parse::<i64>() {
            return SqlValue::Integer(int);
        }
        if let Ok(real) = text.parse::<f64>() {
            return SqlValue::Real(real);
        }
    }
    SqlValue::Text(text.to_string())
}
