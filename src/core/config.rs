//! Shipper configuration
//!
//! A `ShipperConfig` replaces the active configuration wholesale each time
//! it is applied. It can be assembled with [`ShipperConfig::builder`] or
//! loaded from JSON; the sender capability can only be set in code.

use super::error::Result;
use super::line_buffer::DEFAULT_LINE_BUFFER;
use super::log_context::{FieldValue, LogContext};
use super::log_level::LogLevel;
use super::scheduler::DEFAULT_FLUSH_INTERVAL;
use super::sender::LogSender;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Default timeout applied by the HTTP sender (5 seconds)
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShipperConfig {
    /// Turn logging off: pending lines are discarded and emits become no-ops
    pub disabled: bool,

    /// Collector URL used by the default HTTP sender
    pub endpoint: Option<String>,

    /// Added verbatim to every payload, e.g. `{"application": "myapp-client"}`
    #[serde(alias = "request_fields")]
    pub request_fields: LogContext,

    /// Lines buffered before a flush is forced (0 means the default of 50)
    #[serde(alias = "line_buffer")]
    pub line_buffer: usize,

    /// Periodic flush cadence; read from JSON as milliseconds
    #[serde(with = "duration_ms")]
    pub interval: Duration,

    /// Minimum level name: `debug`, `info`, `warn` or `error`
    pub level: Option<String>,

    /// Extra headers sent by the HTTP sender, e.g. credentials
    pub headers: HashMap<String, String>,

    /// Request timeout for the HTTP sender; read from JSON as milliseconds
    #[serde(with = "duration_ms", alias = "request_timeout")]
    pub request_timeout: Duration,

    /// Custom delivery capability; replaces the HTTP sender when set
    #[serde(skip)]
    pub sender: Option<Arc<dyn LogSender>>,
}

impl ShipperConfig {
    #[must_use]
    pub fn builder() -> ShipperConfigBuilder {
        ShipperConfigBuilder::new()
    }

    /// Parse a configuration from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn effective_line_buffer(&self) -> usize {
        if self.line_buffer == 0 {
            DEFAULT_LINE_BUFFER
        } else {
            self.line_buffer
        }
    }

    pub fn effective_interval(&self) -> Duration {
        if self.interval.is_zero() {
            DEFAULT_FLUSH_INTERVAL
        } else {
            self.interval
        }
    }
}

impl Default for ShipperConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            endpoint: None,
            request_fields: LogContext::new(),
            line_buffer: DEFAULT_LINE_BUFFER,
            interval: DEFAULT_FLUSH_INTERVAL,
            level: None,
            headers: HashMap::new(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            sender: None,
        }
    }
}

impl fmt::Debug for ShipperConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShipperConfig")
            .field("disabled", &self.disabled)
            .field("endpoint", &self.endpoint)
            .field("request_fields", &self.request_fields)
            .field("line_buffer", &self.line_buffer)
            .field("interval", &self.interval)
            .field("level", &self.level)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("request_timeout", &self.request_timeout)
            .field("sender", &self.sender.as_ref().map(|s| s.name().to_string()))
            .finish()
    }
}

/// Builder for constructing ShipperConfig with a fluent API
///
/// # Example
/// ```
/// use log_shipper::prelude::*;
/// use std::time::Duration;
///
/// let config = ShipperConfig::builder()
///     .endpoint("https://logs.example.com/ingest")
///     .request_field("application", "myapp-client")
///     .line_buffer(100)
///     .interval(Duration::from_secs(5))
///     .min_level(LogLevel::Info)
///     .build();
///
/// assert_eq!(config.line_buffer, 100);
/// ```
#[derive(Debug, Default)]
pub struct ShipperConfigBuilder {
    config: ShipperConfig,
}

impl ShipperConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.config.disabled = disabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = Some(endpoint.into());
        self
    }

    /// Add one request field
    #[must_use = "builder methods return a new value"]
    pub fn request_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.config.request_fields.add_field(key, value);
        self
    }

    /// Replace all request fields
    #[must_use = "builder methods return a new value"]
    pub fn request_fields(mut self, fields: LogContext) -> Self {
        self.config.request_fields = fields;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn line_buffer(mut self, lines: usize) -> Self {
        self.config.line_buffer = lines;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn interval(mut self, interval: Duration) -> Self {
        self.config.interval = interval;
        self
    }

    /// Set the minimum level by name; unknown names are reported when applied
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.config.level = Some(level.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(self, level: LogLevel) -> Self {
        self.level(level.to_str())
    }

    #[must_use = "builder methods return a new value"]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.insert(name.into(), value.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn sender<S: LogSender + 'static>(self, sender: S) -> Self {
        self.shared_sender(Arc::new(sender))
    }

    #[must_use = "builder methods return a new value"]
    pub fn shared_sender(mut self, sender: Arc<dyn LogSender>) -> Self {
        self.config.sender = Some(sender);
        self
    }

    pub fn build(self) -> ShipperConfig {
        self.config
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
