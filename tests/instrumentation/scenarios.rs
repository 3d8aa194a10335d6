//! Reference Scenarios
//!
//! A unit-returning call, an always-failing call with a literal fallback,
//! and the record fields each leaves behind.

use crate::common::*;
use calltrace::{InstrumentConfig, Level, Opaque, NO_KWARGS};
use std::convert::Infallible;

fn func1(_: ()) -> Result<(), Infallible> {
    Ok(())
}

fn func3(_: ()) -> Result<String, JobFailed> {
    Err(JobFailed { code: 3 })
}

fn divide((a, b): (i64, i64)) -> Result<i64, JobFailed> {
    if b == 0 {
        return Err(JobFailed { code: 22 });
    }
    Ok(a / b)
}

// =============================================================================
// SCENARIO A: BARE SUCCESS
// =============================================================================

#[test]
fn test_unit_function_records_one_log_row() {
    let (_dir, logger) = open_logger();
    let wrapped = logger.instrument(func1);

    assert_eq!(wrapped.call(()), Some(()));

    let records = read_all(&logger);
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.level, Level::Log);
    assert_eq!(record.function_name, "func1");
    assert_eq!(record.return_value.as_deref(), Some("()"));
    assert_eq!(record.message, "()");
    assert_eq!(record.args, "()");
    assert_eq!(record.kwargs, NO_KWARGS);
    assert!(record.function_time >= 0.0);
    assert!(record.function_time < 5.0);
    assert!(record.exception_type.is_none());
    assert!(record.traceback.is_none());
}

#[test]
fn test_success_row_carries_execution_context() {
    let (_dir, logger) = open_logger();
    let line = line!() + 1;
    let wrapped = logger.instrument(divide);

    assert_eq!(wrapped.call((6, 3)), Some(2));

    let record = &read_all(&logger)[0];
    assert!(record.function_file_name.ends_with("scenarios.rs"));
    assert_eq!(record.function_line_number, line);
    assert_eq!(record.args, "(6, 3)");
    assert_eq!(record.process_id, std::process::id());
    assert!(record.thread_id > 0);
    assert!(!record.thread_name.is_empty());
    assert!(!record.timestamp.is_empty());
    assert!(record.id.is_some());
}

// =============================================================================
// SCENARIO B: CONFIGURED FAILURE
// =============================================================================

#[test]
fn test_failing_function_returns_literal_fallback() {
    let (_dir, logger) = open_logger();
    let wrapped = logger
        .configure(InstrumentConfig::new().error_return("error".to_string()))
        .wrap(func3);

    assert_eq!(wrapped.call(()).as_deref(), Some("error"));

    let records = read_all(&logger);
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.level, Level::Error);
    assert_eq!(record.function_name, "func3");
    assert_eq!(record.exception_type.as_deref(), Some("JobFailed"));
    assert_eq!(record.message, "JobFailed: job failed with code 3");
    assert!(record.return_value.is_none());

    let traceback = record.traceback.as_deref().unwrap();
    assert!(!traceback.is_empty());
    assert!(traceback.contains("code: 3"));
}

#[test]
fn test_bare_failure_returns_none() {
    let (_dir, logger) = open_logger();
    let wrapped = logger.instrument(divide);

    assert_eq!(wrapped.call((1, 0)), None);

    let record = &read_all(&logger)[0];
    assert_eq!(record.level, Level::Error);
    assert_eq!(record.args, "(1, 0)");
}

// =============================================================================
// ANNOTATIONS AND ARGUMENT RENDERING
// =============================================================================

#[test]
fn test_tag_and_extra_are_stored() {
    let (_dir, logger) = open_logger();
    let wrapped = logger
        .configure(InstrumentConfig::new().tag("billing").extra("retry=2"))
        .wrap(divide);

    wrapped.call((10, 5));

    let record = &read_all(&logger)[0];
    assert_eq!(record.tag.as_deref(), Some("billing"));
    assert_eq!(record.extra.as_deref(), Some("retry=2"));
}

#[test]
fn test_keyword_arguments_are_recorded() {
    let (_dir, logger) = open_logger();
    let wrapped = logger.instrument_kw(|name: &str, opts: &[(&str, u32)]| {
        Ok::<_, JobFailed>(format!("{}:{}", name, opts.len()))
    });

    let result = wrapped.call_kw("sync", &[("retries", 3)][..]);
    assert_eq!(result.as_deref(), Some("sync:1"));

    let record = &read_all(&logger)[0];
    assert_eq!(record.args, "\"sync\"");
    assert_eq!(record.kwargs, "[(\"retries\", 3)]");
    assert_eq!(record.return_value.as_deref(), Some("\"sync:1\""));
}

#[test]
fn test_opaque_argument_renders_type_name() {
    struct Connection;

    let (_dir, logger) = open_logger();
    let wrapped = logger.instrument(|_conn: Opaque<Connection>| Ok::<_, JobFailed>(1u8));

    assert_eq!(wrapped.call(Opaque(Connection)), Some(1));

    let record = &read_all(&logger)[0];
    assert_eq!(record.args, "<Connection>");
}

#[test]
fn test_closure_name_keeps_enclosing_function() {
    let (_dir, logger) = open_logger();
    let wrapped = logger.instrument(|x: u8| Ok::<_, JobFailed>(x));
    wrapped.call(1);

    let record = &read_all(&logger)[0];
    assert!(record.function_name.contains("{{closure}}"));
    assert!(record
        .function_name
        .starts_with("test_closure_name_keeps_enclosing_function"));
}

#[test]
fn test_pointer_and_boxed_callables_are_named_by_signature() {
    let (_dir, logger) = open_logger();
    let pointer: fn((i64, i64)) -> Result<i64, JobFailed> = divide;
    let boxed: Box<dyn Fn(i64) -> Result<i64, JobFailed>> = Box::new(|x| Ok(x * 2));

    assert_eq!(logger.instrument(pointer).call((8, 2)), Some(4));
    assert_eq!(logger.instrument(boxed).call(5), Some(10));

    let records = read_all(&logger);
    assert!(records[0].function_name.starts_with("fn("));
    assert!(records[0].function_name.contains("JobFailed"));
    assert!(!records[0].function_name.contains("::"));
    assert!(records[1].function_name.starts_with("Box<dyn Fn(i64)"));
    assert!(!records[1].function_name.contains("::"));
}
