//! Storage Integration Tests
//!
//! Tests for the log store as seen through the public session API:
//! round trips, reopen, schema and lifecycle.

#[path = "../common/mod.rs"]
mod common;

mod schema;
