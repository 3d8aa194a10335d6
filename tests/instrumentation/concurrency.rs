//! Concurrency Tests
//!
//! Wrapped functions shared across threads: one row per call, ids unique
//! and gap-free.

use crate::common::*;
use calltrace::{InstrumentConfig, Level};
use std::collections::HashSet;
use std::thread;

fn flaky(_: ()) -> Result<String, JobFailed> {
    Err(JobFailed { code: 500 })
}

#[test]
fn test_ten_threads_failing_get_distinct_gap_free_ids() {
    let (_dir, logger) = open_logger();
    let wrapped = logger
        .configure(InstrumentConfig::new().error_return("error".to_string()))
        .wrap(flaky);

    let results: Vec<Option<String>> = thread::scope(|s| {
        let handles: Vec<_> = (0..10).map(|_| s.spawn(|| wrapped.call(()))).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(results.iter().all(|r| r.as_deref() == Some("error")));

    let records = read_all(&logger);
    assert_eq!(records.len(), 10);
    assert!(records.iter().all(|r| r.level == Level::Error));

    let ids: Vec<u64> = records.iter().map(|r| r.id.unwrap().as_u64()).collect();
    assert_eq!(ids, (1..=10).collect::<Vec<_>>());

    let thread_ids: HashSet<u64> = records.iter().map(|r| r.thread_id).collect();
    assert_eq!(thread_ids.len(), 10);
}

#[test]
fn test_many_wrappers_share_one_session() {
    let (_dir, logger) = open_logger();
    let square = logger.instrument(|x: u64| Ok::<_, JobFailed>(x * x));
    let negate = logger.instrument(|x: i64| Ok::<_, JobFailed>(-x));

    thread::scope(|s| {
        for i in 0..4u64 {
            let square = &square;
            let negate = &negate;
            s.spawn(move || {
                for j in 0..25 {
                    square.call(i * 100 + j);
                    negate.call((i * 100 + j) as i64);
                }
            });
        }
    });

    let records = read_all(&logger);
    assert_eq!(records.len(), 200);
    assert_eq!(logger.metrics().appended, 200);

    let ids: Vec<u64> = records.iter().map(|r| r.id.unwrap().as_u64()).collect();
    assert!(ids.windows(2).all(|w| w[1] == w[0] + 1));
}

#[test]
fn test_sequential_ids_strictly_increase() {
    let (_dir, logger) = open_logger();
    let wrapped = logger.instrument(flaky);
    for _ in 0..20 {
        wrapped.call(());
    }

    let ids: Vec<u64> = read_all(&logger)
        .iter()
        .map(|r| r.id.unwrap().as_u64())
        .collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(ids.len(), 20);
}
