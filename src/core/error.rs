//! Error types for the log shipper

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Unknown or missing level name passed to configuration
    #[error("invalid log level: {0}")]
    InvalidLevel(String),

    /// Lines dropped because no sender is configured
    #[error("Dropping {dropped_count} logs because logging is not configured")]
    QueueOverflow { dropped_count: usize },

    /// Sender rejected a payload
    #[error("Failed to send logs via {sender}: {message}")]
    DeliveryFailed { sender: String, message: String },

    /// Transport error from the HTTP client
    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Collector answered with a non-success status
    #[error("Collector at '{endpoint}' responded with status {status}")]
    HttpStatus { status: u16, endpoint: String },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Configure was called outside a tokio runtime
    #[error("No tokio runtime available to schedule log delivery")]
    NoRuntime,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an invalid level error
    pub fn invalid_level(level: impl Into<String>) -> Self {
        LoggerError::InvalidLevel(level.into())
    }

    /// Create a queue overflow error
    pub fn queue_overflow(dropped_count: usize) -> Self {
        LoggerError::QueueOverflow { dropped_count }
    }

    /// Create a delivery failure error
    pub fn delivery(sender: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::DeliveryFailed {
            sender: sender.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, endpoint: impl Into<String>) -> Self {
        LoggerError::HttpStatus {
            status,
            endpoint: endpoint.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::queue_overflow(3);
        assert!(matches!(err, LoggerError::QueueOverflow { dropped_count: 3 }));

        let err = LoggerError::config("endpoint", "missing");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::delivery("http", "connection refused");
        assert!(matches!(err, LoggerError::DeliveryFailed { .. }));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            LoggerError::queue_overflow(7).to_string(),
            "Dropping 7 logs because logging is not configured"
        );
        assert_eq!(
            LoggerError::invalid_level("verbose").to_string(),
            "invalid log level: verbose"
        );
        assert_eq!(
            LoggerError::http_status(503, "http://collector/logs").to_string(),
            "Collector at 'http://collector/logs' responded with status 503"
        );
        assert_eq!(
            LoggerError::config("ShipperConfig", "no endpoint").to_string(),
            "Invalid configuration for ShipperConfig: no endpoint"
        );
    }
}
