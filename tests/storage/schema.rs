//! Schema Tests
//!
//! The on-disk table as external readers see it.

use crate::common::*;
use calltrace::{Level, Logger};
use rusqlite::Connection;

const EXPECTED_COLUMNS: &[&str] = &[
    "id",
    "level",
    "timestamp",
    "message",
    "host_info",
    "function_file_name",
    "function_line_number",
    "function_name",
    "args",
    "kwargs",
    "return_value",
    "function_time",
    "thread_name",
    "thread_id",
    "process_id",
    "tag",
    "extra",
    "exception_type",
    "traceback",
    "system_info",
];

#[test]
fn test_columns_match_published_schema() {
    let (_dir, logger) = open_logger();
    assert_eq!(reader(&logger).columns().unwrap(), EXPECTED_COLUMNS);
}

#[test]
fn test_plain_sql_reader_sees_rows() {
    let (_dir, logger) = open_logger();
    logger
        .instrument(|_: ()| Err::<(), _>(JobFailed { code: 9 }))
        .call(());

    let conn = Connection::open(logger.path()).unwrap();
    let (level, exception_type): (String, String) = conn
        .query_row(
            "SELECT level, exception_type FROM logs WHERE id = 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(level, "ERROR");
    assert_eq!(exception_type, "JobFailed");
}

#[test]
fn test_level_index_exists() {
    let (_dir, logger) = open_logger();
    let conn = Connection::open(logger.path()).unwrap();
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = 'idx_logs_level'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_legacy_store_is_readable_after_migration() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.sqlite");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE logs (id INTEGER PRIMARY KEY AUTOINCREMENT, level TEXT, \
             timestamp TEXT, message TEXT);\
             INSERT INTO logs (message) VALUES ('written by an older tool');",
        )
        .unwrap();
    }

    let logger = Logger::builder().path(&path).fast().open().unwrap();
    assert_eq!(logger.instrument(|x: i32| Ok::<_, JobFailed>(x + 1)).call(1), Some(2));

    let records = read_all(&logger);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].message, "written by an older tool");
    assert_eq!(records[0].level, Level::NotSet);
    assert_eq!(records[0].function_time, 0.0);
    assert_eq!(records[1].level, Level::Log);
    assert_eq!(records[1].message, "2");
}
