//! Core types for calltrace
//!
//! This crate defines everything about an instrumented call that does not
//! touch storage:
//! - [`Level`]: outcome severity stored with each row
//! - [`LogRecord`] / [`RecordId`]: the persisted row shape
//! - [`CallSite`], [`ExecutionContext`], [`CallContext`]: call metadata
//! - [`builder`]: turns a finished call into a [`LogRecord`]
//! - [`render`]: total text rendering of arbitrary values
//! - [`Failure`]: normalized `Err` or panic outcome
//! - [`ErrorReturn`]: what a failed call returns to its caller

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod context;
pub mod failure;
pub mod level;
pub mod record;
pub mod render;
pub mod resolver;

pub use builder::{build_failure, build_success, timestamp_now};
pub use context::{current_thread_id, CallContext, CallSite, ExecutionContext};
pub use failure::{Failure, PANIC_TYPE};
pub use level::{Level, ParseLevelError};
pub use record::{LogRecord, RecordId};
pub use render::{render, Opaque};
pub use resolver::ErrorReturn;
