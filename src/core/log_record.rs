//! Log record structure

use super::log_context::LogContext;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One buffered log line
///
/// Records are immutable once appended to the line buffer; they leave the
/// buffer only by being drained into a payload or dropped on overflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub logger: String,
    #[serde(with = "iso8601")]
    pub at: DateTime<Utc>,
    pub level: LogLevel,
    pub event: String,
    pub context: LogContext,
}

impl LogRecord {
    pub fn new(
        logger: impl Into<String>,
        level: LogLevel,
        event: impl Into<String>,
        context: LogContext,
    ) -> Self {
        Self {
            logger: logger.into(),
            at: Utc::now(),
            level,
            event: event.into(),
            context,
        }
    }

    /// Timestamp rendered the way it goes over the wire
    pub fn at_iso8601(&self) -> String {
        iso8601::format(&self.at)
    }
}

/// ISO 8601 UTC timestamps with millisecond precision: `2025-01-08T10:30:45.123Z`
pub mod iso8601 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(at: &DateTime<Utc>) -> String {
        at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(at))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_record() -> LogRecord {
        let mut record = LogRecord::new(
            "checkout",
            LogLevel::Warn,
            "card_declined",
            LogContext::new().with_field("attempt", 2),
        );
        record.at = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap()
            + chrono::Duration::milliseconds(123);
        record
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(fixed_record()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "logger": "checkout",
                "at": "2025-01-08T10:30:45.123Z",
                "level": "warn",
                "event": "card_declined",
                "context": { "attempt": 2 }
            })
        );
    }

    #[test]
    fn test_parse_back() {
        let record = fixed_record();
        let json = serde_json::to_string(&record).unwrap();
        let parsed: LogRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_at_iso8601_uses_millis_and_z() {
        assert_eq!(fixed_record().at_iso8601(), "2025-01-08T10:30:45.123Z");
    }
}
