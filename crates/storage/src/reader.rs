//! Read-only access to a log store
//!
//! A [`LogReader`] opens its own connection, so it can inspect a store while
//! a [`LogSink`](crate::LogSink) in this or another process is still
//! appending to it. The connection never creates the store and runs with
//! `query_only` set.

use crate::config::SinkConfig;
use crate::error::{Result, StorageError};
use crate::schema::{self, TABLE};
use crate::sink::LogSink;
use calltrace_core::{Level, LogRecord, ParseLevelError, RecordId};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};

/// Query interface over a log store
pub struct LogReader {
    conn: Connection,
    path: PathBuf,
}

impl LogReader {
    /// Open an existing store for reading
    ///
    /// `path` is resolved the same way [`LogSink::open`] resolves it.
    ///
    /// # Errors
    ///
    /// Fails if the store file does not exist or is not a SQLite database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, &SinkConfig::default())
    }

    /// Open an existing store, resolving directories with `config.db_name`
    pub fn open_with(path: impl AsRef<Path>, config: &SinkConfig) -> Result<Self> {
        let path = LogSink::store_path(path.as_ref(), config);
        // READ_WRITE without CREATE: a WAL store may need its -shm file recreated
        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(config.busy_timeout())?;
        conn.execute_batch("PRAGMA query_only = ON;")?;
        Ok(LogReader { conn, path })
    }

    /// Path of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every record, in id order
    pub fn records(&self) -> Result<Vec<LogRecord>> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY id",
            schema::select_columns(),
            TABLE
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], schema::row_to_record)?;
        rows.map(|row| row.map_err(row_error)).collect()
    }

    /// Records at `level`, in id order
    pub fn by_level(&self, level: Level) -> Result<Vec<LogRecord>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE level = ?1 ORDER BY id",
            schema::select_columns(),
            TABLE
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![level.as_str()], schema::row_to_record)?;
        rows.map(|row| row.map_err(row_error)).collect()
    }

    /// The record with `id`, if present
    pub fn get(&self, id: RecordId) -> Result<Option<LogRecord>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            schema::select_columns(),
            TABLE
        );
        self.conn
            .query_row(&sql, params![id.as_u64() as i64], schema::row_to_record)
            .optional()
            .map_err(row_error)
    }

    /// Number of stored records
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", TABLE), [], |row| {
                row.get(0)
            })?;
        Ok(count as u64)
    }

    /// Column names of the log table, `id` first
    pub fn columns(&self) -> Result<Vec<String>> {
        schema::existing_columns(&self.conn)
    }
}

impl std::fmt::Debug for LogReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogReader").field("path", &self.path).finish()
    }
}

fn row_error(e: rusqlite::Error) -> StorageError {
    match e {
        rusqlite::Error::FromSqlConversionFailure(_, _, ref inner)
            if inner.is::<ParseLevelError>() =>
        {
            StorageError::InvalidLevel(inner.to_string())
        }
        other => StorageError::Sqlite(other),
    }
}
