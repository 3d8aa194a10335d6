//! Storage layer for calltrace
//!
//! This crate persists [`LogRecord`](calltrace_core::LogRecord)s to a
//! single-file SQLite store:
//! - [`LogSink`]: serialized, durable appends with id assignment
//! - [`LogReader`]: read-only queries over an existing store
//! - [`schema`]: the fixed `logs` table, its creation and migration
//! - [`SinkConfig`] / [`SyncMode`]: file naming and durability options

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod reader;
pub mod schema;
pub mod sink;

pub use config::{SinkConfig, SyncMode, DB_EXTENSION, DEFAULT_DB_NAME};
pub use error::{Result, StorageError};
pub use reader::LogReader;
pub use sink::{LogSink, SinkMetrics};
