//! Delivery payload built fresh at each flush

use super::log_context::LogContext;
use super::log_record::LogRecord;
use serde::{Deserialize, Serialize};

/// Request fields flattened next to the ordered `lines`
///
/// A request field named `lines` is discarded so the records always win,
/// matching a merge of the request fields with `{ "lines": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(flatten)]
    request_fields: LogContext,
    lines: Vec<LogRecord>,
}

impl Payload {
    pub fn new(request_fields: &LogContext, lines: Vec<LogRecord>) -> Self {
        let mut request_fields = request_fields.clone();
        request_fields.remove("lines");
        Self {
            request_fields,
            lines,
        }
    }

    pub fn request_fields(&self) -> &LogContext {
        &self.request_fields
    }

    pub fn lines(&self) -> &[LogRecord] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<LogRecord> {
        self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_request_fields_are_flattened() {
        let fields = LogContext::new()
            .with_field("application", "myapp-client")
            .with_field("subsystem", "router");
        let line = LogRecord::new("nav", LogLevel::Info, "route_changed", LogContext::new());

        let payload = Payload::new(&fields, vec![line]);
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["application"], "myapp-client");
        assert_eq!(json["subsystem"], "router");
        assert_eq!(json["lines"].as_array().unwrap().len(), 1);
        assert_eq!(json["lines"][0]["event"], "route_changed");
    }

    #[test]
    fn test_lines_key_in_request_fields_is_overridden() {
        let fields = LogContext::new().with_field("lines", "bogus");
        let payload = Payload::new(&fields, Vec::new());

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({ "lines": [] }));
        // source mapping untouched
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_parse_back() {
        let fields = LogContext::new().with_field("app", "web");
        let line = LogRecord::new("a", LogLevel::Error, "boom", LogContext::new());
        let mut payload = Payload::new(&fields, vec![line]);
        payload.lines[0].at = Utc.with_ymd_and_hms(2025, 3, 1, 1, 2, 3).unwrap();

        let parsed: Payload = serde_json::from_str(&payload.to_json().unwrap()).unwrap();
        assert_eq!(parsed, payload);
    }
}
