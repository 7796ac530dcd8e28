//! # Log Shipper
//!
//! Client-side structured log batching: application code emits events,
//! the shipper buffers them in memory and periodically delivers them to a
//! remote collector.
//!
//! ## Features
//!
//! - **Bounded Buffer**: Flushes as soon as the line buffer fills
//! - **Periodic Delivery**: Recurring flush on a configurable cadence
//! - **Pluggable Senders**: JSON-over-HTTP by default, any async sender otherwise
//! - **Degraded Mode**: Keeps only the newest lines until a sender is configured
//! - **Bound Context**: Child loggers carry frozen key-value fields
//!
//! ## Example
//!
//! ```no_run
//! use log_shipper::prelude::*;
//!
//! # async fn run() -> log_shipper::Result<()> {
//! log_shipper::configure(
//!     ShipperConfig::builder()
//!         .endpoint("https://logs.example.com/ingest")
//!         .request_field("application", "myapp-client")
//!         .level("info")
//!         .build(),
//! )?;
//!
//! let logger = log_shipper::create_logger("router", LogContext::new());
//! let request = logger.bind(fields! { "request_id" => "abc-123" });
//! request.info("route_changed");
//!
//! log_shipper::flush().await?;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod macros;
pub mod senders;

pub mod prelude {
    pub use crate::core::{
        FieldValue, LogContext, LogLevel, LogRecord, LogSender, LogShipper, Logger, LoggerError,
        LoggerMetrics, Payload, Result, ShipperConfig, ShipperState,
    };
    pub use crate::fields;
}

#[cfg(feature = "http")]
pub use senders::HttpSender;
pub use crate::core::{
    configure, create_logger, flush, merge_maps, DiagnosticCallback, FieldValue, FnSender, LevelFilter,
    LogContext, LogLevel, LogRecord, LogSender, LogShipper, Logger, LoggerError, LoggerMetrics,
    Payload, Result, ShipperConfig, ShipperConfigBuilder, ShipperState,
};
