//! Record builder
//!
//! Turns the state of one finished call into a [`LogRecord`]. Pure apart
//! from reading the wall clock: nothing here touches storage, and nothing
//! here can fail.

use crate::context::CallContext;
use crate::failure::Failure;
use crate::level::Level;
use crate::record::LogRecord;
use crate::render::render;
use chrono::Local;
use std::fmt::Debug;
use std::time::Duration;

/// Timestamp format for stored records (ISO-8601, local, microseconds)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Current wall-clock time in [`TIMESTAMP_FORMAT`]
pub fn timestamp_now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Build the record for a call that returned normally
pub fn build_success<T: ?Sized + Debug>(
    ctx: &CallContext<'_>,
    result: &T,
    elapsed: Duration,
) -> LogRecord {
    let rendered = render(result);
    let mut record = base(ctx, ctx.success_level, rendered.clone(), elapsed);
    record.return_value = Some(rendered);
    record
}

/// Build the record for a call that failed
pub fn build_failure(ctx: &CallContext<'_>, failure: &Failure, elapsed: Duration) -> LogRecord {
    let mut record = base(ctx, ctx.error_level, failure.message.clone(), elapsed);
    record.exception_type = Some(failure.exception_type.clone());
    record.traceback = Some(failure.traceback.clone());
    record
}

fn base(ctx: &CallContext<'_>, level: Level, message: String, elapsed: Duration) -> LogRecord {
    LogRecord {
        id: None,
        level,
        timestamp: timestamp_now(),
        message,
        host_info: ctx.host_info.map(str::to_string),
        system_info: ctx.system_info.clone(),
        function_file_name: ctx.site.file.clone(),
        function_line_number: ctx.site.line,
        function_name: ctx.site.function.clone(),
        args: ctx.args.clone(),
        kwargs: ctx.kwargs.clone(),
        return_value: None,
        function_time: elapsed.as_secs_f64(),
        thread_name: ctx.execution.thread_name.clone(),
        thread_id: ctx.execution.thread_id,
        process_id: ctx.execution.process_id,
        tag: ctx.tag.map(str::to_string),
        extra: ctx.extra.map(str::to_string),
        exception_type: None,
        traceback: None,
    }
}
