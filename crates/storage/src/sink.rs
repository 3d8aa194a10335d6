//! Log sink: the only writer of the log store
//!
//! A [`LogSink`] owns one SQLite connection. Every append, from any thread,
//! goes through a single lock around that connection, so inserts are
//! serialized and `id` assignment is atomic. Each insert commits on its
//! own; once [`LogSink::append`] returns `Ok` the row is durable to the
//! degree the configured [`SyncMode`](crate::SyncMode) promises.
//!
//! ```text
//! append(record):
//!   lock connection ─▶ closed? ─▶ Err(Closed)
//!          │
//!          ▼
//!   INSERT INTO logs ... (autocommit)
//!          │
//!          ▼
//!   last_insert_rowid ─▶ RecordId
//! ```

use crate::config::SinkConfig;
use crate::error::{Result, StorageError};
use crate::schema;
use calltrace_core::{LogRecord, RecordId};
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// Append-only writer for the log store
pub struct LogSink {
    /// `None` once closed
    conn: Mutex<Option<Connection>>,
    path: PathBuf,
    config: SinkConfig,
    appended: AtomicU64,
    failed: AtomicU64,
}

/// Counters for a sink's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkMetrics {
    /// Records written successfully
    pub appended: u64,
    /// Appends that returned an error
    pub failed: u64,
}

impl LogSink {
    /// Open or create the store at `path` with default options
    ///
    /// See [`LogSink::open_with`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, SinkConfig::default())
    }

    /// Open or create the store at `path`
    ///
    /// If `path` is an existing directory the store file is
    /// `<path>/<db_name>.sqlite`; otherwise `path` is the store file
    /// itself. The parent directory must already exist. The schema is
    /// created if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or the schema cannot
    /// be created.
    pub fn open_with(path: impl AsRef<Path>, config: SinkConfig) -> Result<Self> {
        let path = Self::store_path(path.as_ref(), &config);
        let conn = Connection::open(&path)?;
        Self::initialize_connection(&conn, &config)?;

        info!(
            path = %path.display(),
            wal = config.wal,
            synchronous = config.synchronous.pragma_value(),
            "opened log store"
        );

        Ok(LogSink {
            conn: Mutex::new(Some(conn)),
            path,
            config,
            appended: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        })
    }

    /// File a sink opened on `path` with `config` would use
    pub fn store_path(path: &Path, config: &SinkConfig) -> PathBuf {
        if path.is_dir() {
            path.join(config.file_name())
        } else {
            path.to_path_buf()
        }
    }

    fn initialize_connection(conn: &Connection, config: &SinkConfig) -> Result<()> {
        conn.busy_timeout(config.busy_timeout())?;
        if config.wal {
            conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        }
        conn.execute_batch(&format!(
            "PRAGMA synchronous={};",
            config.synchronous.pragma_value()
        ))?;
        schema::ensure_schema(conn)
    }

    /// Durably write one record and return its assigned id
    ///
    /// The record's own `id` field is ignored. Appends from all threads are
    /// serialized.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Closed`] after [`LogSink::close`], or the
    /// underlying SQLite error if the insert fails. A failed append writes
    /// nothing.
    pub fn append(&self, record: &LogRecord) -> Result<RecordId> {
        let guard = self.conn.lock();
        let conn = match guard.as_ref() {
            Some(conn) => conn,
            None => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                warn!(path = %self.path.display(), "append on closed log sink");
                return Err(StorageError::Closed {
                    path: self.path.clone(),
                });
            }
        };

        match schema::insert(conn, record) {
            Ok(id) => {
                self.appended.fetch_add(1, Ordering::Relaxed);
                debug!(id = id.as_u64(), level = %record.level, function = %record.function_name, "appended record");
                Ok(id)
            }
            Err(e) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }

    /// Close the store, releasing the connection
    ///
    /// Idempotent. Later appends fail with [`StorageError::Closed`].
    ///
    /// # Errors
    ///
    /// Returns the SQLite error if the connection could not be closed
    /// cleanly; the sink is considered closed either way.
    pub fn close(&self) -> Result<()> {
        let conn = self.conn.lock().take();
        match conn {
            Some(conn) => {
                conn.close().map_err(|(_, e)| StorageError::from(e))?;
                info!(
                    path = %self.path.display(),
                    appended = self.appended.load(Ordering::Relaxed),
                    "closed log store"
                );
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Check if [`LogSink::close`] has been called
    pub fn is_closed(&self) -> bool {
        self.conn.lock().is_none()
    }

    /// Path of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Options the sink was opened with
    pub fn config(&self) -> &SinkConfig {
        &self.config
    }

    /// Append counters so far
    pub fn metrics(&self) -> SinkMetrics {
        SinkMetrics {
            appended: self.appended.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for LogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSink")
            .field("path", &self.path)
            .field("config", &self.config)
            .field("metrics", &self.metrics())
            .finish()
    }
}
