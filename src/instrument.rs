//! Instrumentation wrapper.
//!
//! Wrapping a function yields an [`Instrumented`] callable. Every call:
//!
//! 1. starts a monotonic timer,
//! 2. runs the function, catching both `Err` returns and panics,
//! 3. builds one record (success level on `Ok`, error level otherwise),
//! 4. writes it through the session's sink,
//! 5. returns `Some(value)` on success, or the configured fallback.
//!
//! A failure to write the record is reported through `tracing` and counted
//! in [`SinkMetrics`](calltrace_storage::SinkMetrics); it never changes
//! what the call returns.
//!
//! The wrapped function takes its positional arguments as one value
//! (usually a tuple). [`Instrumented::call_kw`] additionally passes a
//! second, keyword-style value that is stored in the `kwargs` column.

use crate::host::Resources;
use crate::logger::Logger;
use calltrace_core::render::function_name;
use calltrace_core::{
    build_failure, build_success, render, CallContext, CallSite, ErrorReturn, Failure, Level,
    LogRecord,
};
use std::any::type_name;
use std::fmt::{Debug, Display};
use std::panic::{self, AssertUnwindSafe, Location};
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Text stored in `kwargs` when a call has no keyword arguments
pub const NO_KWARGS: &str = "{}";

/// Options applied to one wrapped function.
///
/// Built once and reused for every call of the wrapped function. The
/// fallback given to [`InstrumentConfig::error_return`] is stored as a
/// value: an expression used to compute it is evaluated once, here, and
/// every failed call returns a clone of that result.
#[derive(Debug, Clone)]
pub struct InstrumentConfig<T> {
    error_return: ErrorReturn<T>,
    tag: Option<String>,
    extra: Option<String>,
    success_level: Level,
    error_level: Level,
    name: Option<String>,
    cpu: Option<bool>,
    memory: Option<bool>,
}

impl<T> InstrumentConfig<T> {
    /// Default options: `None` on failure, `LOG`/`ERROR` levels, no tags
    pub fn new() -> Self {
        InstrumentConfig {
            error_return: ErrorReturn::Null,
            tag: None,
            extra: None,
            success_level: Level::Log,
            error_level: Level::Error,
            name: None,
            cpu: None,
            memory: None,
        }
    }

    /// Return `Some(value.clone())` when the call fails
    pub fn error_return(mut self, value: T) -> Self {
        self.error_return = ErrorReturn::Value(value);
        self
    }

    /// Annotation stored in the `tag` column
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Annotation stored in the `extra` column
    pub fn extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = Some(extra.into());
        self
    }

    /// Level recorded when the call succeeds
    pub fn success_level(mut self, level: Level) -> Self {
        self.success_level = level;
        self
    }

    /// Level recorded when the call fails
    pub fn error_level(mut self, level: Level) -> Self {
        self.error_level = level;
        self
    }

    /// Override the function name derived from the callable's type
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sample CPU into `system_info`, overriding the session setting
    pub fn cpu(mut self, enabled: bool) -> Self {
        self.cpu = Some(enabled);
        self
    }

    /// Sample memory into `system_info`, overriding the session setting
    pub fn memory(mut self, enabled: bool) -> Self {
        self.memory = Some(enabled);
        self
    }

    /// Resources sampled per call, given the session defaults
    pub fn resources(&self, session: Resources) -> Resources {
        Resources {
            cpu: self.cpu.unwrap_or(session.cpu),
            memory: self.memory.unwrap_or(session.memory),
        }
    }

    /// Configured fallback
    pub fn fallback(&self) -> &ErrorReturn<T> {
        &self.error_return
    }

    /// Configured tag
    pub fn tag_value(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Configured extra annotation
    pub fn extra_value(&self) -> Option<&str> {
        self.extra.as_deref()
    }
}

impl<T> Default for InstrumentConfig<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Configured wrapper waiting for its function.
///
/// Returned by [`Logger::configure`].
#[must_use = "a decorator does nothing until `wrap` is called"]
#[derive(Debug)]
pub struct Decorator<T> {
    logger: Logger,
    config: InstrumentConfig<T>,
}

impl<T> Decorator<T> {
    pub(crate) fn new(logger: Logger, config: InstrumentConfig<T>) -> Self {
        Decorator { logger, config }
    }

    /// Wrap `f`; the call site recorded is the location of this call
    #[track_caller]
    pub fn wrap<F>(self, f: F) -> Instrumented<F, T> {
        Instrumented::new(self.logger, f, self.config)
    }
}

/// A function wrapped with failure handling and per-call recording.
#[derive(Clone)]
pub struct Instrumented<F, T> {
    f: F,
    logger: Logger,
    site: CallSite,
    config: InstrumentConfig<T>,
}

impl<F, T> Instrumented<F, T> {
    #[track_caller]
    pub(crate) fn new(logger: Logger, f: F, config: InstrumentConfig<T>) -> Self {
        let name = config
            .name
            .clone()
            .unwrap_or_else(|| function_name(type_name::<F>()));
        let site = CallSite::from_location(Location::caller(), name);
        Instrumented {
            f,
            logger,
            site,
            config,
        }
    }

    /// Invoke the wrapped function with positional arguments.
    ///
    /// Returns `Some(result)` if it returned `Ok`, otherwise the configured
    /// fallback. Panics are caught and treated as failures.
    pub fn call<A, E>(&self, args: A) -> Option<T>
    where
        F: Fn(A) -> Result<T, E>,
        A: Debug,
        T: Debug + Clone,
        E: Display + Debug + 'static,
    {
        let start = Instant::now();
        let rendered = render(&args);
        self.run(start, rendered, NO_KWARGS.to_string(), move || (self.f)(args))
    }

    /// Invoke a two-parameter function, recording the second as `kwargs`.
    pub fn call_kw<A, K, E>(&self, args: A, kwargs: K) -> Option<T>
    where
        F: Fn(A, K) -> Result<T, E>,
        A: Debug,
        K: Debug,
        T: Debug + Clone,
        E: Display + Debug + 'static,
    {
        let start = Instant::now();
        let rendered_args = render(&args);
        let rendered_kwargs = render(&kwargs);
        self.run(start, rendered_args, rendered_kwargs, move || {
            (self.f)(args, kwargs)
        })
    }

    /// Where the wrapper was applied and what it is called
    pub fn site(&self) -> &CallSite {
        &self.site
    }

    /// Options this wrapper was built with
    pub fn config(&self) -> &InstrumentConfig<T> {
        &self.config
    }

    /// Session records are written to
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Unwrap the original function
    pub fn into_inner(self) -> F {
        self.f
    }

    fn run<E>(
        &self,
        start: Instant,
        args: String,
        kwargs: String,
        body: impl FnOnce() -> Result<T, E>,
    ) -> Option<T>
    where
        T: Debug + Clone,
        E: Display + Debug + 'static,
    {
        let outcome = panic::catch_unwind(AssertUnwindSafe(body));
        let elapsed = start.elapsed();
        let ctx = self.context(args, kwargs);

        match outcome {
            Ok(Ok(value)) => {
                self.persist(&build_success(&ctx, &value, elapsed));
                Some(value)
            }
            Ok(Err(err)) => self.fail(&ctx, Failure::from_error(&err), elapsed),
            Err(payload) => self.fail(&ctx, Failure::from_panic(payload), elapsed),
        }
    }

    fn fail(&self, ctx: &CallContext<'_>, failure: Failure, elapsed: Duration) -> Option<T>
    where
        T: Clone,
    {
        debug!(
            function = %self.site.function,
            exception_type = %failure.exception_type,
            "instrumented call failed"
        );
        self.persist(&build_failure(ctx, &failure, elapsed));
        self.config.error_return.resolve()
    }

    fn context(&self, args: String, kwargs: String) -> CallContext<'_> {
        let mut ctx = CallContext::new(&self.site, args, kwargs);
        ctx.tag = self.config.tag.as_deref();
        ctx.extra = self.config.extra.as_deref();
        ctx.host_info = self.logger.host_info();
        ctx.system_info = self
            .logger
            .system_snapshot(self.config.resources(self.logger.resources()));
        ctx.success_level = self.config.success_level;
        ctx.error_level = self.config.error_level;
        ctx
    }

    fn persist(&self, record: &LogRecord) {
        if let Err(e) = self.logger.append(record) {
            error!(
                function = %self.site.function,
                file = %self.site.file,
                line = self.site.line,
                level = %record.level,
                error = %e,
                "failed to persist call record"
            );
        }
    }
}

impl<F, T: Debug> Debug for Instrumented<F, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instrumented")
            .field("site", &self.site)
            .field("config", &self.config)
            .finish()
    }
}
