//! Fallback Resolution Tests
//!
//! What a failed call hands back, and how often the fallback is computed.

use crate::common::*;
use calltrace::InstrumentConfig;
use std::cell::Cell;

fn always_fails(_: ()) -> Result<Vec<String>, JobFailed> {
    Err(JobFailed { code: 1 })
}

fn sometimes_fails(ok: bool) -> Result<Vec<String>, JobFailed> {
    if ok {
        Ok(vec!["real".to_string()])
    } else {
        Err(JobFailed { code: 2 })
    }
}

#[test]
fn test_literal_fallback_identical_on_every_failure() {
    let (_dir, logger) = open_logger();
    let wrapped = logger
        .configure(InstrumentConfig::new().error_return(vec!["empty".to_string()]))
        .wrap(always_fails);

    for _ in 0..5 {
        assert_eq!(wrapped.call(()), Some(vec!["empty".to_string()]));
    }
    assert_eq!(read_all(&logger).len(), 5);
}

#[test]
fn test_side_effecting_fallback_runs_once() {
    let evaluations = Cell::new(0);
    let make_fallback = || {
        evaluations.set(evaluations.get() + 1);
        vec![format!("built #{}", evaluations.get())]
    };

    let (_dir, logger) = open_logger();
    let wrapped = logger
        .configure(InstrumentConfig::new().error_return(make_fallback()))
        .wrap(always_fails);

    for _ in 0..4 {
        assert_eq!(wrapped.call(()), Some(vec!["built #1".to_string()]));
    }
    assert_eq!(evaluations.get(), 1);
}

#[test]
fn test_success_ignores_fallback() {
    let (_dir, logger) = open_logger();
    let wrapped = logger
        .configure(InstrumentConfig::new().error_return(Vec::new()))
        .wrap(sometimes_fails);

    assert_eq!(wrapped.call(true), Some(vec!["real".to_string()]));
    assert_eq!(wrapped.call(false), Some(Vec::new()));
}

#[test]
fn test_default_fallback_is_none() {
    let (_dir, logger) = open_logger();
    let wrapped = logger.instrument(always_fails);

    assert_eq!(wrapped.call(()), None);
    assert!(wrapped.config().fallback().is_null());
}
