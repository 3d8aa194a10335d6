//! # calltrace
//!
//! Function instrumentation with durable, queryable per-call records.
//!
//! Wrap a function once; every call is timed, its outcome captured, and one
//! row written to a local SQLite store. Failures (`Err` returns and panics)
//! never propagate to the caller: they are recorded with their type and
//! trace, and the call returns a configured fallback instead.
//!
//! ## Quick Start
//!
//! ```ignore
//! use calltrace::prelude::*;
//!
//! // Open a session on a store file. An existing directory would hold
//! // `log.sqlite`; directories are never created.
//! let logger = Logger::open("calls.sqlite")?;
//!
//! // Bare shape: failures return None
//! let parse = logger.instrument(|s: &str| s.parse::<u32>());
//! assert_eq!(parse.call("7"), Some(7));
//!
//! // Configured shape: failures return the fallback
//! let fetch = logger
//!     .configure(InstrumentConfig::new().error_return("offline".to_string()).tag("net"))
//!     .wrap(fetch_status);
//! let status = fetch.call(("example.org", 443));
//!
//! // Read back what happened
//! for record in logger.reader()?.by_level(Level::Error)? {
//!     println!("{} {}", record.function_name, record.message);
//! }
//!
//! logger.close()?;
//! ```
//!
//! ## Layers
//!
//! - [`calltrace_core`] - record shape, rendering, failure capture
//! - [`calltrace_storage`] - the SQLite sink and reader
//! - this crate - the [`Logger`] session and the [`Instrumented`] wrapper

#![warn(missing_docs)]

mod error;
mod host;
mod instrument;
mod logger;

pub mod prelude;

// Re-export main entry points
pub use error::{Error, Result};
pub use host::{
    host_info_json, CpuInfo, HostInfo, MemoryInfo, Resources, SystemInfo, SystemMonitor,
};
pub use instrument::{Decorator, InstrumentConfig, Instrumented, NO_KWARGS};
pub use logger::{Logger, LoggerBuilder};

// Re-export core and storage types
pub use calltrace_core::{
    CallSite, ErrorReturn, Failure, Level, LogRecord, Opaque, ParseLevelError, RecordId,
    PANIC_TYPE,
};
pub use calltrace_storage::{
    LogReader, LogSink, SinkConfig, SinkMetrics, StorageError, SyncMode,
};
