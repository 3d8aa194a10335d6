//! Severity levels for recorded invocations
//!
//! Every row in the log store carries exactly one [`Level`]. Instrumented
//! calls record [`Level::Log`] on normal return and [`Level::Error`] on
//! failure unless the wrapper is configured otherwise.
//!
//! ## Stored Form
//!
//! Levels are stored as their upper-case names. These strings are frozen:
//! rows written by older versions must keep parsing.
//!
//! | Variant | Stored |
//! |---------|--------|
//! | NotSet | `NOTSET` |
//! | Trace | `TRACE` |
//! | Debug | `DEBUG` |
//! | Info | `INFO` |
//! | Log | `LOG` |
//! | Warning | `WARNING` |
//! | Error | `ERROR` |
//! | Critical | `CRITICAL` |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome level of a recorded invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    /// No level assigned
    NotSet,
    /// Fine-grained tracing
    Trace,
    /// Debugging detail
    Debug,
    /// Informational
    Info,
    /// Normal return of an instrumented call (default success level)
    Log,
    /// Something unexpected that did not fail the call
    Warning,
    /// Instrumented call failed (default failure level)
    Error,
    /// Failure that needs immediate attention
    Critical,
}

impl Level {
    /// All recognized levels, lowest severity first
    pub const ALL: [Level; 8] = [
        Level::NotSet,
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Log,
        Level::Warning,
        Level::Error,
        Level::Critical,
    ];

    /// Stored text form of this level
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::NotSet => "NOTSET",
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Log => "LOG",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }

    /// Whether this level denotes a failed call
    pub fn is_failure(&self) -> bool {
        matches!(self, Level::Error | Level::Critical)
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::Log
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored level string is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized level: {0:?}")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .iter()
            .copied()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseLevelError(s.to_string()))
    }
}
