//! Logging session: the entry point for instrumentation.
//!
//! A [`Logger`] owns one open log store. Wrappers created from it share the
//! store, so every instrumented function in a process can write through a
//! single session.

use crate::error::{Error, Result};
use crate::host::{self, Resources, SystemMonitor};
use crate::instrument::{Decorator, InstrumentConfig, Instrumented};
use calltrace_core::{LogRecord, RecordId};
use calltrace_storage::{LogReader, LogSink, SinkConfig, SinkMetrics, SyncMode};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// An open logging session.
///
/// Cheap to clone; clones share the same store. The store is closed by
/// [`Logger::close`] or when the last clone is dropped.
///
/// # Example
///
/// ```ignore
/// use calltrace::prelude::*;
///
/// let logger = Logger::open("calls.sqlite")?;
///
/// let parse = logger.instrument(|s: &str| s.parse::<u32>());
/// assert_eq!(parse.call("42"), Some(42));
/// assert_eq!(parse.call("x"), None);
///
/// let parse_or_zero = logger
///     .configure(InstrumentConfig::new().error_return(0).tag("input"))
///     .wrap(|s: &str| s.parse::<u32>());
/// assert_eq!(parse_or_zero.call("x"), Some(0));
///
/// logger.close()?;
/// ```
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Session>,
}

struct Session {
    sink: LogSink,
    host_info: Option<&'static str>,
    // Created on the first sampled call.
    monitor: OnceCell<SystemMonitor>,
    // Declared after the sink so the connection is dropped first.
    _temp_dir: Option<TempDir>,
}

impl Logger {
    /// Open a session on the store at `path`.
    ///
    /// Uses default settings. If `path` is an existing directory the store
    /// is `<path>/log.sqlite`; any other path is the store file itself.
    /// Directories are never created, so a path to a directory that does
    /// not exist yet names a file.
    ///
    /// # Example
    ///
    /// ```ignore
    /// // A store file in the working directory
    /// let logger = Logger::open("calls.sqlite")?;
    ///
    /// // `./logs/log.sqlite`; the directory must exist
    /// std::fs::create_dir_all("./logs")?;
    /// let logger = Logger::open("./logs")?;
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder().path(path).open()
    }

    /// Create a builder for session configuration.
    ///
    /// # Example
    ///
    /// ```ignore
    /// // `<dir>/jobs.sqlite` inside an existing directory
    /// let logger = Logger::builder()
    ///     .path(dir)
    ///     .db_name("jobs")
    ///     .strict()
    ///     .open()?;
    /// ```
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Wrap `f` with the default configuration.
    ///
    /// A failed call returns `None`. The call site recorded with every row
    /// is the location of this call. The result type is taken from `f`'s
    /// signature, so the wrapper can be stored before its first call.
    #[track_caller]
    pub fn instrument<F, A, T, E>(&self, f: F) -> Instrumented<F, T>
    where
        F: Fn(A) -> std::result::Result<T, E>,
    {
        Instrumented::new(self.clone(), f, InstrumentConfig::new())
    }

    /// Wrap a two-parameter `f` whose second parameter is recorded as
    /// `kwargs`; call it with [`Instrumented::call_kw`].
    #[track_caller]
    pub fn instrument_kw<F, A, K, T, E>(&self, f: F) -> Instrumented<F, T>
    where
        F: Fn(A, K) -> std::result::Result<T, E>,
    {
        Instrumented::new(self.clone(), f, InstrumentConfig::new())
    }

    /// Start a configured wrapper; finish it with [`Decorator::wrap`].
    pub fn configure<T>(&self, config: InstrumentConfig<T>) -> Decorator<T> {
        Decorator::new(self.clone(), config)
    }

    /// Write one record directly, bypassing instrumentation.
    pub fn append(&self, record: &LogRecord) -> Result<RecordId> {
        self.inner.sink.append(record).map_err(Error::from)
    }

    /// Open a reader on this session's store.
    pub fn reader(&self) -> Result<LogReader> {
        LogReader::open_with(self.path(), self.inner.sink.config()).map_err(Error::from)
    }

    /// Gracefully close the session.
    ///
    /// Idempotent. Wrapped functions keep working afterwards, but their
    /// records are reported as storage failures instead of being written.
    pub fn close(&self) -> Result<()> {
        self.inner.sink.close().map_err(Into::into)
    }

    /// Check if [`Logger::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.sink.is_closed()
    }

    /// Path of the store file.
    pub fn path(&self) -> &Path {
        self.inner.sink.path()
    }

    /// Options the store was opened with.
    pub fn config(&self) -> &SinkConfig {
        self.inner.sink.config()
    }

    /// Host description attached to each record, if enabled.
    pub fn host_info(&self) -> Option<&'static str> {
        self.inner.host_info
    }

    /// Resources sampled into `system_info` unless a wrapper overrides them.
    pub fn resources(&self) -> Resources {
        let config = self.inner.sink.config();
        Resources {
            cpu: config.record_cpu,
            memory: config.record_memory,
        }
    }

    /// Sample `resources` now, as JSON; `None` if nothing is requested.
    pub fn system_snapshot(&self, resources: Resources) -> Option<String> {
        if !resources.any() {
            return None;
        }
        self.inner
            .monitor
            .get_or_init(SystemMonitor::new)
            .snapshot_json(resources)
    }

    /// Append counters for this session.
    pub fn metrics(&self) -> SinkMetrics {
        self.inner.sink.metrics()
    }

    fn from_sink(sink: LogSink, temp_dir: Option<TempDir>) -> Self {
        let host_info = if sink.config().record_host_info {
            host::host_info_json()
        } else {
            None
        };
        Logger {
            inner: Arc::new(Session {
                sink,
                host_info,
                monitor: OnceCell::new(),
                _temp_dir: temp_dir,
            }),
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("sink", &self.inner.sink)
            .field("host_info", &self.inner.host_info.is_some())
            .field("monitor", &self.inner.monitor.get().is_some())
            .finish()
    }
}

/// Builder for session configuration.
///
/// # Example
///
/// ```ignore
/// // Production: sync every record
/// let logger = Logger::builder().path("/var/log/app/calls.sqlite").strict().open()?;
///
/// // Tests: throwaway directory, no fsync
/// let logger = Logger::builder().fast().open_temp()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct LoggerBuilder {
    path: Option<PathBuf>,
    config: SinkConfig,
}

impl LoggerBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the store path (a file, or a directory to hold `<db_name>.sqlite`).
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the file stem used when the path is a directory.
    pub fn db_name(mut self, name: impl Into<String>) -> Self {
        self.config.db_name = name.into();
        self
    }

    /// Enable or disable WAL journaling (default on).
    pub fn wal(mut self, enabled: bool) -> Self {
        self.config.wal = enabled;
        self
    }

    /// Sync every record to disk (safest, slowest).
    pub fn strict(mut self) -> Self {
        self.config.synchronous = SyncMode::Full;
        self
    }

    /// No fsync, no host info, no resource snapshots (fastest).
    pub fn fast(mut self) -> Self {
        let db_name = std::mem::take(&mut self.config.db_name);
        self.config = SinkConfig {
            db_name,
            ..SinkConfig::fast()
        };
        self
    }

    /// Enable or disable the per-row host description (default on).
    pub fn host_info(mut self, enabled: bool) -> Self {
        self.config.record_host_info = enabled;
        self
    }

    /// Enable or disable CPU figures in `system_info` (default on).
    pub fn cpu(mut self, enabled: bool) -> Self {
        self.config.record_cpu = enabled;
        self
    }

    /// Enable or disable memory figures in `system_info` (default on).
    pub fn memory(mut self, enabled: bool) -> Self {
        self.config.record_memory = enabled;
        self
    }

    /// Enable or disable the whole `system_info` snapshot.
    pub fn system_info(self, enabled: bool) -> Self {
        self.cpu(enabled).memory(enabled)
    }

    /// Replace all store options at once.
    pub fn config(mut self, config: SinkConfig) -> Self {
        self.config = config;
        self
    }

    /// Open the session.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if no path was set or the db name is empty;
    /// [`Error::Storage`] if the store cannot be opened.
    pub fn open(self) -> Result<Logger> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| Error::Config("no store path set".to_string()))?;
        self.validate()?;
        let sink = LogSink::open_with(&path, self.config)?;
        Ok(Logger::from_sink(sink, None))
    }

    /// Open a session in a fresh temporary directory.
    ///
    /// The directory is removed when the last clone of the logger is
    /// dropped. Any path set on the builder is ignored.
    pub fn open_temp(self) -> Result<Logger> {
        self.validate()?;
        let dir = tempfile::Builder::new().prefix("calltrace-").tempdir()?;
        let sink = LogSink::open_with(dir.path(), self.config)?;
        Ok(Logger::from_sink(sink, Some(dir)))
    }

    fn validate(&self) -> Result<()> {
        if self.config.db_name.is_empty() {
            return Err(Error::Config("db_name must not be empty".to_string()));
        }
        Ok(())
    }
}
