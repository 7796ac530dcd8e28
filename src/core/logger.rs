//! Named, context-bound logger handles

use super::{
    log_context::LogContext, log_level::LogLevel, log_record::LogRecord, shipper::LogShipper,
};
use std::fmt;
use std::sync::Arc;

/// A named handle that appends records to its shipper
///
/// Bound fields are frozen at creation; [`Logger::bind`] returns a new
/// logger and never changes this one.
#[derive(Clone)]
pub struct Logger {
    name: Arc<str>,
    bound: Arc<LogContext>,
    shipper: LogShipper,
}

impl Logger {
    pub(crate) fn new(shipper: LogShipper, name: impl Into<String>, fields: LogContext) -> Self {
        Self {
            name: Arc::from(name.into()),
            bound: Arc::new(fields),
            shipper,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bound_fields(&self) -> &LogContext {
        &self.bound
    }

    pub fn shipper(&self) -> &LogShipper {
        &self.shipper
    }

    /// Return a child logger whose bound fields are these fields overlaid with `fields`
    #[must_use]
    pub fn bind(&self, fields: LogContext) -> Logger {
        Logger {
            name: Arc::clone(&self.name),
            bound: Arc::new(self.bound.merged_with(&fields)),
            shipper: self.shipper.clone(),
        }
    }

    /// Whether an event at `level` would currently be recorded
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.shipper.is_enabled(level)
    }

    /// Emit one event; call-site fields override bound fields on collision
    ///
    /// No record is built when the level is filtered out or logging is
    /// disabled. The `event` argument is already evaluated by then; the
    /// logging macros check [`Logger::is_enabled`] before formatting.
    pub fn log(&self, level: LogLevel, event: impl Into<String>, fields: Option<&LogContext>) {
        self.shipper.emit(level, || {
            let context = match fields {
                Some(fields) => self.bound.merged_with(fields),
                None => LogContext::clone(&self.bound),
            };
            LogRecord::new(&*self.name, level, event, context)
        });
    }

    #[inline]
    pub fn debug(&self, event: impl Into<String>) {
        self.log(LogLevel::Debug, event, None);
    }

    #[inline]
    pub fn info(&self, event: impl Into<String>) {
        self.log(LogLevel::Info, event, None);
    }

    #[inline]
    pub fn warn(&self, event: impl Into<String>) {
        self.log(LogLevel::Warn, event, None);
    }

    #[inline]
    pub fn error(&self, event: impl Into<String>) {
        self.log(LogLevel::Error, event, None);
    }

    /// Helper for structured debug logging
    pub fn debug_with(&self, event: impl Into<String>, fields: &LogContext) {
        self.log(LogLevel::Debug, event, Some(fields));
    }

    /// Helper for structured info logging
    pub fn info_with(&self, event: impl Into<String>, fields: &LogContext) {
        self.log(LogLevel::Info, event, Some(fields));
    }

    /// Helper for structured warn logging
    pub fn warn_with(&self, event: impl Into<String>, fields: &LogContext) {
        self.log(LogLevel::Warn, event, Some(fields));
    }

    /// Helper for structured error logging
    pub fn error_with(&self, event: impl Into<String>, fields: &LogContext) {
        self.log(LogLevel::Error, event, Some(fields));
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("bound", &self.bound)
            .finish()
    }
}
