//! Convenient imports for calltrace.
//!
//! ```ignore
//! use calltrace::prelude::*;
//!
//! let logger = Logger::open("calls.sqlite")?;
//! let wrapped = logger.instrument(job);
//! ```

// Main entry point
pub use crate::logger::{Logger, LoggerBuilder};

// Wrapping
pub use crate::instrument::{InstrumentConfig, Instrumented};

// Error handling
pub use crate::error::{Error, Result};

// Records
pub use calltrace_core::{Level, LogRecord, Opaque, RecordId};
pub use calltrace_storage::{LogReader, SinkConfig, SyncMode};
