//! Logging macros for ergonomic event formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`, plus `fields!`
//! for building a [`LogContext`](crate::LogContext) inline.
//!
//! # Examples
//!
//! ```
//! use log_shipper::prelude::*;
//! use log_shipper::info;
//!
//! let shipper = LogShipper::new();
//! let logger = shipper.create_logger("server", LogContext::new());
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! let request = logger.bind(fields! { "request_id" => "abc-123", "attempt" => 2 });
//! assert_eq!(request.bound_fields().len(), 2);
//! ```

/// Log an event with automatic formatting.
///
/// The message is only formatted when the level passes the logger's
/// threshold and logging is enabled.
///
/// # Examples
///
/// ```
/// # use log_shipper::prelude::*;
/// # let logger = LogShipper::new().create_logger("app", LogContext::new());
/// use log_shipper::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled(level) {
            logger.log(level, format!($($arg)+), None);
        }
    }};
}

/// Log a debug-level event.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level event.
///
/// # Examples
///
/// ```
/// # use log_shipper::prelude::*;
/// # let logger = LogShipper::new().create_logger("app", LogContext::new());
/// use log_shipper::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warn-level event.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level event.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Build a `LogContext` from `key => value` pairs.
///
/// ```
/// use log_shipper::{fields, FieldValue};
///
/// let ctx = fields! { "user_id" => 42, "admin" => false };
/// assert_eq!(ctx.get("user_id"), Some(&FieldValue::Int(42)));
/// assert!(fields! {}.is_empty());
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::LogContext::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut ctx = $crate::LogContext::new();
        $( ctx.add_field($key, $value); )+
        ctx
    }};
}
