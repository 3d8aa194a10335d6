//! Level Configuration Tests

use crate::common::*;
use calltrace::{InstrumentConfig, Level};

fn check(value: i32) -> Result<i32, JobFailed> {
    if value < 0 {
        Err(JobFailed { code: 7 })
    } else {
        Ok(value)
    }
}

#[test]
fn test_default_levels() {
    let (_dir, logger) = open_logger();
    let wrapped = logger.instrument(check);
    wrapped.call(1);
    wrapped.call(-1);

    let levels: Vec<Level> = read_all(&logger).iter().map(|r| r.level).collect();
    assert_eq!(levels, vec![Level::Log, Level::Error]);
}

#[test]
fn test_configured_levels() {
    let (_dir, logger) = open_logger();
    let wrapped = logger
        .configure(
            InstrumentConfig::new()
                .success_level(Level::Debug)
                .error_level(Level::Critical),
        )
        .wrap(check);
    wrapped.call(1);
    wrapped.call(-1);

    let reader = reader(&logger);
    assert_eq!(reader.by_level(Level::Debug).unwrap().len(), 1);

    let critical = reader.by_level(Level::Critical).unwrap();
    assert_eq!(critical.len(), 1);
    assert!(critical[0].is_failure());
    assert_eq!(critical[0].exception_type.as_deref(), Some("JobFailed"));
    assert!(critical[0].traceback.is_some());
}

#[test]
fn test_error_level_below_error_still_carries_exception() {
    let (_dir, logger) = open_logger();
    let wrapped = logger
        .configure(InstrumentConfig::new().error_level(Level::Warning))
        .wrap(check);
    wrapped.call(-5);

    let record = &read_all(&logger)[0];
    assert_eq!(record.level, Level::Warning);
    assert!(record.exception_type.is_some());
    assert!(record.traceback.is_some());
    assert!(record.return_value.is_none());
}
