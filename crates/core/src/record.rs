//! The persisted record shape
//!
//! A [`LogRecord`] is one row in the log store: the complete outcome of a
//! single instrumented invocation. Records are append-only. The store
//! assigns the [`RecordId`] at insert time; records built in memory carry
//! `id: None` until then.

use crate::level::Level;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned record identifier
///
/// Ids are strictly increasing in insertion order and serve as the
/// chronological sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(u64);

impl RecordId {
    /// Wrap a raw id
    pub fn new(id: u64) -> Self {
        RecordId(id)
    }

    /// Raw numeric id
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One recorded invocation
///
/// Field groups:
/// - base: `level`, `timestamp`, `message`
/// - host: `host_info`, `system_info`
/// - function: `function_file_name`, `function_line_number`,
///   `function_name`, `args`, `kwargs`, `return_value`, `function_time`
/// - thread: `thread_name`, `thread_id`, `process_id`
/// - annotation: `tag`, `extra`
/// - failure: `exception_type`, `traceback`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Assigned by the store; `None` until appended
    pub id: Option<RecordId>,
    /// Outcome level
    pub level: Level,
    /// Wall-clock completion time, ISO-8601 local with microseconds
    pub timestamp: String,
    /// Rendered result on success, `"{Type}: {message}"` on failure
    pub message: String,
    /// JSON host description, when recorded
    pub host_info: Option<String>,
    /// JSON CPU and memory snapshot taken at call time, when recorded
    pub system_info: Option<String>,
    /// File where the wrapper was applied
    pub function_file_name: String,
    /// Line where the wrapper was applied
    pub function_line_number: u32,
    /// Name of the wrapped function
    pub function_name: String,
    /// Rendered positional arguments
    pub args: String,
    /// Rendered keyword arguments
    pub kwargs: String,
    /// Rendered result; `None` for failed calls
    pub return_value: Option<String>,
    /// Elapsed seconds measured on a monotonic clock
    pub function_time: f64,
    /// Name of the executing thread
    pub thread_name: String,
    /// Process-unique id of the executing thread
    pub thread_id: u64,
    /// OS process id
    pub process_id: u32,
    /// Caller-supplied tag
    pub tag: Option<String>,
    /// Caller-supplied extra annotation
    pub extra: Option<String>,
    /// Failure type name; only set for failed calls
    pub exception_type: Option<String>,
    /// Full failure trace; only set for failed calls
    pub traceback: Option<String>,
}

impl LogRecord {
    /// Whether this record describes a failed call
    pub fn is_failure(&self) -> bool {
        self.exception_type.is_some()
    }

    /// Copy of this record carrying the store-assigned id
    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }
}
