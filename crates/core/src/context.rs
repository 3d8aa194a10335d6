//! Call metadata gathered around an instrumented invocation
//!
//! - [`CallSite`]: where the wrapper was applied; fixed at wrap time
//! - [`ExecutionContext`]: which thread and process ran the call
//! - [`CallContext`]: everything the record builder needs for one call

use crate::level::Level;
use std::panic::Location;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

/// Source location and name of a wrapped function
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallSite {
    /// Source file where the wrapper was applied
    pub file: String,
    /// Line where the wrapper was applied
    pub line: u32,
    /// Name of the wrapped function
    pub function: String,
}

impl CallSite {
    /// Create a call site from explicit parts
    pub fn new(file: impl Into<String>, line: u32, function: impl Into<String>) -> Self {
        CallSite {
            file: file.into(),
            line,
            function: function.into(),
        }
    }

    /// Create a call site from a captured caller location
    pub fn from_location(location: &Location<'_>, function: impl Into<String>) -> Self {
        CallSite::new(location.file(), location.line(), function)
    }
}

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_ID: u64 = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
}

/// Process-unique id of the current thread
///
/// Assigned on first use, starting at 1. Stable for the thread's lifetime.
pub fn current_thread_id() -> u64 {
    THREAD_ID.with(|id| *id)
}

/// Identity of the thread and process performing a call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Thread name, `<unnamed>` if the thread has none
    pub thread_name: String,
    /// See [`current_thread_id`]
    pub thread_id: u64,
    /// OS process id
    pub process_id: u32,
}

impl ExecutionContext {
    /// Capture the calling thread's identity
    pub fn current() -> Self {
        let current = thread::current();
        ExecutionContext {
            thread_name: current.name().unwrap_or("<unnamed>").to_string(),
            thread_id: current_thread_id(),
            process_id: std::process::id(),
        }
    }
}

/// Per-invocation input to the record builder
#[derive(Debug, Clone)]
pub struct CallContext<'a> {
    /// Where the wrapper was applied
    pub site: &'a CallSite,
    /// Rendered positional arguments
    pub args: String,
    /// Rendered keyword arguments
    pub kwargs: String,
    /// Thread and process that ran the call
    pub execution: ExecutionContext,
    /// Configured tag
    pub tag: Option<&'a str>,
    /// Configured extra annotation
    pub extra: Option<&'a str>,
    /// Session host description
    pub host_info: Option<&'a str>,
    /// Resource snapshot for this call
    pub system_info: Option<String>,
    /// Level recorded on normal return
    pub success_level: Level,
    /// Level recorded on failure
    pub error_level: Level,
}

impl<'a> CallContext<'a> {
    /// Context for a call at `site` on the current thread, default levels
    pub fn new(site: &'a CallSite, args: String, kwargs: String) -> Self {
        CallContext {
            site,
            args,
            kwargs,
            execution: ExecutionContext::current(),
            tag: None,
            extra: None,
            host_info: None,
            system_info: None,
            success_level: Level::Log,
            error_level: Level::Error,
        }
    }
}
