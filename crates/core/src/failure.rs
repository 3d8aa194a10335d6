//! Captured failure of an instrumented call
//!
//! A wrapped call fails either by returning `Err(e)` or by panicking. Both
//! are normalized into a [`Failure`]: a type name, a one-line message and
//! a full trace. The trace is never empty.

use crate::render::{render_display, short_type_name};
use std::any::{type_name, Any};
use std::backtrace::Backtrace;
use std::fmt::{Debug, Display};
use std::panic::{self, AssertUnwindSafe};

/// Type name recorded for calls that panicked
pub const PANIC_TYPE: &str = "panic";

/// A normalized call failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Short type name of the error, or [`PANIC_TYPE`]
    pub exception_type: String,
    /// `"{Type}: {message}"`
    pub message: String,
    /// Error detail followed by the captured stack backtrace
    pub traceback: String,
}

impl Failure {
    /// Capture a failure from an error value returned by the call
    pub fn from_error<E>(error: &E) -> Self
    where
        E: Display + Debug + ?Sized + 'static,
    {
        let exception_type = short_type_name(type_name::<E>());
        let message = format!("{}: {}", exception_type, render_display(error));
        let detail = panic::catch_unwind(AssertUnwindSafe(|| format!("{:#?}", error)))
            .unwrap_or_else(|_| message.clone());
        let traceback = format!(
            "{}\n\n{}\n\nstack backtrace:\n{}",
            message,
            detail,
            Backtrace::force_capture()
        );

        Failure {
            exception_type,
            message,
            traceback,
        }
    }

    /// Capture a failure from a panic payload caught at the wrapper
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let text = panic_message(payload.as_ref());
        let message = format!("{}: {}", PANIC_TYPE, text);
        let traceback = format!(
            "{}\n\nstack backtrace:\n{}",
            message,
            Backtrace::force_capture()
        );

        Failure {
            exception_type: PANIC_TYPE.to_string(),
            message,
            traceback,
        }
    }

    /// Whether this failure came from a panic
    pub fn is_panic(&self) -> bool {
        self.exception_type == PANIC_TYPE
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}
