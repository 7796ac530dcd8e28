//! HTTP sender for remote collectors
//!
//! POSTs each payload as JSON to a fixed endpoint. Extra headers carry
//! whatever credentials the collector expects.

use crate::core::{LogSender, LoggerError, Payload, Result, ShipperConfig};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Url};
use std::collections::HashMap;
use std::time::Duration;

/// Default sender used when a configuration names only an endpoint
///
/// # Example
///
/// ```no_run
/// use log_shipper::senders::HttpSender;
/// use std::time::Duration;
///
/// let sender = HttpSender::new("https://logs.example.com/ingest")
///     .expect("valid endpoint")
///     .with_timeout(Duration::from_secs(2))
///     .expect("client builds");
/// ```
#[derive(Debug, Clone)]
pub struct HttpSender {
    client: Client,
    endpoint: Url,
    headers: HeaderMap,
}

impl HttpSender {
    /// Create a sender for `endpoint` with the default timeout
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint is not a valid URL
    pub fn new(endpoint: &str) -> Result<Self> {
        Self::build(endpoint, &HashMap::new(), crate::core::DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create the sender described by a configuration
    pub fn from_config(config: &ShipperConfig) -> Result<Self> {
        let endpoint = config.endpoint.as_deref().ok_or_else(|| {
            LoggerError::config("endpoint", "either an endpoint or a sender is required")
        })?;
        Self::build(endpoint, &config.headers, config.request_timeout)
    }

    fn build(endpoint: &str, headers: &HashMap<String, String>, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| LoggerError::config("endpoint", format!("'{}': {}", endpoint, e)))?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint,
            headers: header_map(headers)?,
        })
    }

    /// Add a header sent with every request
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        let (name, value) = parse_header(name, value)?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Replace the client with one using a different timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

#[async_trait]
impl LogSender for HttpSender {
    async fn send_logs(&self, payload: Payload) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .headers(self.headers.clone())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoggerError::http_status(status.as_u16(), self.endpoint.as_str()));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "http"
    }
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| LoggerError::config("headers", format!("invalid name '{}': {}", name, e)))?;
    let header_value = HeaderValue::from_str(value)
        .map_err(|e| LoggerError::config("headers", format!("invalid value for '{}': {}", name, e)))?;
    Ok((header_name, header_value))
}

fn header_map(headers: &HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let (name, value) = parse_header(name, value)?;
        map.insert(name, value);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_endpoint() {
        let result = HttpSender::new("not a url");
        assert!(matches!(result, Err(LoggerError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_from_config_requires_endpoint() {
        let result = HttpSender::from_config(&ShipperConfig::default());
        assert!(matches!(result, Err(LoggerError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_from_config_headers() {
        let config = ShipperConfig::builder()
            .endpoint("http://127.0.0.1:9999/logs")
            .header("X-Api-Key", "secret")
            .build();

        let sender = HttpSender::from_config(&config).unwrap();
        assert_eq!(sender.endpoint(), "http://127.0.0.1:9999/logs");
        assert_eq!(sender.headers["x-api-key"], "secret");
        assert_eq!(sender.name(), "http");
    }

    #[test]
    fn test_invalid_header_rejected() {
        let sender = HttpSender::new("http://127.0.0.1:9999/").unwrap();
        assert!(sender.with_header("bad header", "v").is_err());
    }

    #[tokio::test]
    async fn test_send_without_server_fails() {
        // Nothing listens on port 9 (discard) in the test environment
        let sender = HttpSender::new("http://127.0.0.1:9/logs")
            .unwrap()
            .with_timeout(Duration::from_millis(500))
            .unwrap();

        let payload = Payload::new(&Default::default(), Vec::new());
        assert!(sender.send_logs(payload).await.is_err());
    }
}
