//! Shared helpers for integration tests.

#![allow(dead_code)]

use calltrace::{LogRecord, Logger, LogReader};
use std::fmt;
use tempfile::TempDir;

/// Logger on a fresh directory; keep the `TempDir` alive for the test.
pub fn open_logger() -> (TempDir, Logger) {
    let dir = tempfile::tempdir().expect("tempdir");
    let logger = Logger::builder()
        .path(dir.path())
        .fast()
        .open()
        .expect("open logger");
    (dir, logger)
}

/// Every record written through `logger`, in id order.
pub fn read_all(logger: &Logger) -> Vec<LogRecord> {
    reader(logger).records().expect("read records")
}

pub fn reader(logger: &Logger) -> LogReader {
    logger.reader().expect("open reader")
}

/// Error type used by wrapped test functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFailed {
    pub code: u32,
}

impl fmt::Display for JobFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job failed with code {}", self.code)
    }
}

impl std::error::Error for JobFailed {}
