//! Error-return resolution
//!
//! Decides what a failed instrumented call hands back to its caller. The
//! fallback is captured as a value when the wrapper is configured and is
//! cloned on every failure; it is never recomputed. An expression used to
//! produce the fallback therefore runs once, at configuration time.

/// Fallback returned by a failed instrumented call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorReturn<T> {
    /// Return the null sentinel (`None`)
    Null,
    /// Return a clone of this value
    Value(T),
}

impl<T: Clone> ErrorReturn<T> {
    /// Value a failed call returns
    pub fn resolve(&self) -> Option<T> {
        match self {
            ErrorReturn::Null => None,
            ErrorReturn::Value(value) => Some(value.clone()),
        }
    }
}

impl<T> ErrorReturn<T> {
    /// Whether this is the null sentinel
    pub fn is_null(&self) -> bool {
        matches!(self, ErrorReturn::Null)
    }
}

impl<T> Default for ErrorReturn<T> {
    fn default() -> Self {
        ErrorReturn::Null
    }
}

impl<T> From<Option<T>> for ErrorReturn<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => ErrorReturn::Value(value),
            None => ErrorReturn::Null,
        }
    }
}
