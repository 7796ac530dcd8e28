//! Core shipper types and traits

pub mod config;
pub mod error;
pub mod line_buffer;
pub mod log_context;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod payload;
pub mod scheduler;
pub mod sender;
pub mod shipper;

pub use config::{ShipperConfig, ShipperConfigBuilder, DEFAULT_REQUEST_TIMEOUT};
pub use error::{LoggerError, Result};
pub use line_buffer::{LineBuffer, DEFAULT_LINE_BUFFER};
pub use log_context::{merge_maps, FieldValue, LogContext};
pub use log_level::{LevelFilter, LogLevel};
pub use log_record::LogRecord;
pub use logger::Logger;
pub use metrics::LoggerMetrics;
pub use payload::Payload;
pub use scheduler::{FlushScheduler, DEFAULT_FLUSH_INTERVAL};
pub use sender::{FnSender, LogSender};
pub use shipper::{configure, create_logger, flush, DiagnosticCallback, LogShipper, ShipperState};
