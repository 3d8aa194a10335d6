//! Storage Failure Tests
//!
//! A record that cannot be written never changes what the call returns.

use crate::common::*;
use calltrace::InstrumentConfig;

fn add((a, b): (u32, u32)) -> Result<u32, JobFailed> {
    a.checked_add(b).ok_or(JobFailed { code: 75 })
}

#[test]
fn test_success_value_survives_closed_store() {
    let (_dir, logger) = open_logger();
    let wrapped = logger.instrument(add);
    logger.close().unwrap();

    assert_eq!(wrapped.call((2, 3)), Some(5));

    let metrics = logger.metrics();
    assert_eq!(metrics.appended, 0);
    assert_eq!(metrics.failed, 1);
}

#[test]
fn test_fallback_survives_closed_store() {
    let (_dir, logger) = open_logger();
    let wrapped = logger
        .configure(InstrumentConfig::new().error_return(0))
        .wrap(add);
    assert_eq!(wrapped.call((1, 1)), Some(2));
    logger.close().unwrap();

    assert_eq!(wrapped.call((u32::MAX, 1)), Some(0));

    assert_eq!(logger.metrics().failed, 1);
    assert_eq!(read_all(&logger).len(), 1);
}

#[test]
fn test_direct_append_after_close_is_an_error() {
    let (_dir, logger) = open_logger();
    let wrapped = logger.instrument(add);
    wrapped.call((1, 2));
    let record = read_all(&logger).remove(0);

    logger.close().unwrap();
    let err = logger.append(&record).unwrap_err();
    assert!(err.is_closed());
}
