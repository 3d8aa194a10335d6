//! Instrumentation Integration Tests
//!
//! End-to-end behavior of wrapped functions: what they return, and the
//! rows they leave in the store.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test instrumentation
//! cargo test --test instrumentation fallback::
//! ```

#[path = "../common/mod.rs"]
mod common;

mod concurrency;
mod fallback;
mod levels;
mod scenarios;
mod storage_failures;
