//! Sink configuration
//!
//! Controls the store file name and the SQLite durability trade-off.
//!
//! # Sync Mode Comparison
//!
//! | Mode | fsync | Data Loss Window |
//! |------|-------|------------------|
//! | Off | Never | Anything since the OS last flushed |
//! | Normal | At WAL checkpoints | Last transactions on power loss |
//! | Full | Every commit | None |

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default file stem for the store when the sink is opened on a directory
pub const DEFAULT_DB_NAME: &str = "log";

/// File extension for store files
pub const DB_EXTENSION: &str = "sqlite";

/// SQLite `synchronous` setting used by the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Hand writes to the OS without syncing.
    ///
    /// Use case: tests, throwaway traces.
    Off,

    /// Sync at WAL checkpoints.
    ///
    /// Safe against application crashes; may lose the last commits on
    /// power loss. Recommended together with WAL journaling.
    Normal,

    /// Sync on every commit.
    ///
    /// Use when no recorded invocation may be lost, even on power loss.
    Full,
}

impl SyncMode {
    /// Value for `PRAGMA synchronous`
    pub fn pragma_value(&self) -> &'static str {
        match self {
            SyncMode::Off => "OFF",
            SyncMode::Normal => "NORMAL",
            SyncMode::Full => "FULL",
        }
    }

    /// Check if every commit is synced to disk
    pub fn requires_immediate_fsync(&self) -> bool {
        matches!(self, SyncMode::Full)
    }

    /// Human-readable description of the mode
    pub fn description(&self) -> &'static str {
        match self {
            SyncMode::Off => "No fsync (fastest, recent rows lost on OS crash)",
            SyncMode::Normal => "Checkpoint fsync (balanced speed/safety)",
            SyncMode::Full => "Per-commit fsync (safest, slowest)",
        }
    }
}

impl Default for SyncMode {
    fn default() -> Self {
        SyncMode::Normal
    }
}

/// Log sink options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// File stem used when the sink is opened on a directory
    pub db_name: String,
    /// Use WAL journaling so readers are not blocked by the writer
    pub wal: bool,
    /// `PRAGMA synchronous` setting
    pub synchronous: SyncMode,
    /// How long a write waits on a lock held by another connection
    pub busy_timeout_ms: u64,
    /// Store a host description with every row
    pub record_host_info: bool,
    /// Include CPU usage, core counts and frequency in each row's `system_info`
    pub record_cpu: bool,
    /// Include RAM totals and usage in each row's `system_info`
    pub record_memory: bool,
}

impl Default for SinkConfig {
    fn default() -> Self {
        SinkConfig {
            db_name: DEFAULT_DB_NAME.to_string(),
            wal: true,
            synchronous: SyncMode::Normal,
            busy_timeout_ms: 5_000,
            record_host_info: true,
            record_cpu: true,
            record_memory: true,
        }
    }
}

impl SinkConfig {
    /// Durable options - WAL with a sync on every commit
    pub fn durable() -> Self {
        SinkConfig {
            synchronous: SyncMode::Full,
            ..Default::default()
        }
    }

    /// Fast options - no fsync, no host lookup, no resource snapshots
    pub fn fast() -> Self {
        SinkConfig {
            synchronous: SyncMode::Off,
            record_host_info: false,
            record_cpu: false,
            record_memory: false,
            ..Default::default()
        }
    }

    /// Busy timeout as a [`Duration`]
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// File name for the store, `<db_name>.sqlite`
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.db_name, DB_EXTENSION)
    }
}
