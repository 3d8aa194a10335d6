//! Fixed record schema
//!
//! One table, `logs`, one row per invocation. `id` is an
//! `AUTOINCREMENT` primary key so ids are never reused, even after rows
//! are removed by external tooling.
//!
//! Creating the schema is idempotent. Attaching to a store written by an
//! older version adds any missing columns.

use crate::error::{Result, StorageError};
use calltrace_core::{Level, LogRecord, RecordId};
use once_cell::sync::Lazy;
use rusqlite::{params, Connection, Row};

/// Name of the log table
pub const TABLE: &str = "logs";

/// Data columns in storage order (the `id` column is implicit)
pub const COLUMNS: &[(&str, &str)] = &[
    ("level", "TEXT NOT NULL"),
    ("timestamp", "TEXT NOT NULL"),
    ("message", "TEXT"),
    ("host_info", "TEXT"),
    ("function_file_name", "TEXT"),
    ("function_line_number", "INTEGER"),
    ("function_name", "TEXT"),
    ("args", "TEXT"),
    ("kwargs", "TEXT"),
    ("return_value", "TEXT"),
    ("function_time", "REAL NOT NULL"),
    ("thread_name", "TEXT"),
    ("thread_id", "INTEGER"),
    ("process_id", "INTEGER"),
    ("tag", "TEXT"),
    ("extra", "TEXT"),
    ("exception_type", "TEXT"),
    ("traceback", "TEXT"),
    ("system_info", "TEXT"),
];

static INSERT_SQL: Lazy<String> = Lazy::new(insert_sql);

fn create_table_sql() -> String {
    let columns = COLUMNS
        .iter()
        .map(|(name, ty)| format!("{} {}", name, ty))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "CREATE TABLE IF NOT EXISTS {} (id INTEGER PRIMARY KEY AUTOINCREMENT, {})",
        TABLE, columns
    )
}

/// `INSERT` statement binding every data column in [`COLUMNS`] order
pub fn insert_sql() -> String {
    let names = COLUMNS.iter().map(|(name, _)| *name).collect::<Vec<_>>();
    let placeholders = (1..=names.len())
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        TABLE,
        names.join(", "),
        placeholders.join(", ")
    )
}

/// `SELECT` list of `id` followed by every data column
pub fn select_columns() -> String {
    std::iter::once("id")
        .chain(COLUMNS.iter().map(|(name, _)| *name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Create the table and index if absent, then add missing columns
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(&format!(
        "{};\nCREATE INDEX IF NOT EXISTS idx_{}_level ON {}(level);",
        create_table_sql(),
        TABLE,
        TABLE
    ))?;
    migrate_columns(conn)
}

/// Names of the columns currently in the log table
pub fn existing_columns(conn: &Connection) -> Result<Vec<String>> {
    let columns = conn
        .prepare(&format!("PRAGMA table_info({})", TABLE))?
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(columns)
}

// SQLite has no ADD COLUMN IF NOT EXISTS, so check table_info first.
fn migrate_columns(conn: &Connection) -> Result<()> {
    let existing = existing_columns(conn)?;
    if !existing.iter().any(|c| c == "id") {
        return Err(StorageError::Schema(format!(
            "table {} exists without an id column",
            TABLE
        )));
    }

    for (name, ty) in COLUMNS {
        if !existing.iter().any(|c| c == name) {
            // NOT NULL columns cannot be added to populated tables without a default
            let ty = ty.trim_end_matches(" NOT NULL");
            conn.execute(&format!("ALTER TABLE {} ADD COLUMN {} {}", TABLE, name, ty), [])?;
            tracing::info!(column = name, "added missing column to log table");
        }
    }
    Ok(())
}

/// Insert one record and return the id SQLite assigned
pub fn insert(conn: &Connection, record: &LogRecord) -> Result<RecordId> {
    conn.prepare_cached(&INSERT_SQL)?.execute(params![
        record.level.as_str(),
        record.timestamp,
        record.message,
        record.host_info,
        record.function_file_name,
        record.function_line_number,
        record.function_name,
        record.args,
        record.kwargs,
        record.return_value,
        record.function_time,
        record.thread_name,
        record.thread_id as i64,
        record.process_id,
        record.tag,
        record.extra,
        record.exception_type,
        record.traceback,
        record.system_info,
    ])?;
    Ok(RecordId::new(conn.last_insert_rowid() as u64))
}

/// Convert a row selected with [`select_columns`] into a record
///
/// Columns added by a migration are NULL in rows written before it, so
/// every column is read as nullable. A missing level reads as `NOTSET`.
pub fn row_to_record(row: &Row<'_>) -> rusqlite::Result<LogRecord> {
    let level = match row.get::<_, Option<String>>(1)? {
        Some(level) => level.parse::<Level>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?,
        None => Level::NotSet,
    };

    Ok(LogRecord {
        id: Some(RecordId::new(row.get::<_, i64>(0)? as u64)),
        level,
        timestamp: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        message: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        host_info: row.get(4)?,
        system_info: row.get(19)?,
        function_file_name: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        function_line_number: row.get::<_, Option<u32>>(6)?.unwrap_or_default(),
        function_name: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
        args: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
        kwargs: row.get::<_, Option<String>>(9)?.unwrap_or_default(),
        return_value: row.get(10)?,
        function_time: row.get::<_, Option<f64>>(11)?.unwrap_or_default(),
        thread_name: row.get::<_, Option<String>>(12)?.unwrap_or_default(),
        thread_id: row.get::<_, Option<i64>>(13)?.unwrap_or_default() as u64,
        process_id: row.get::<_, Option<u32>>(14)?.unwrap_or_default(),
        tag: row.get(15)?,
        extra: row.get(16)?,
        exception_type: row.get(17)?,
        traceback: row.get(18)?,
    })
}
