//! Log level definitions and threshold filtering

use super::error::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug = 10,
    Info = 20,
    Warn = 30,
    Error = 40,
}

impl LogLevel {
    pub const ALL: [LogLevel; 4] = [LogLevel::Debug, LogLevel::Info, LogLevel::Warn, LogLevel::Error];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Ordinal rank used for threshold comparisons
    #[inline]
    pub fn ordinal(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(LoggerError::invalid_level(s)),
        }
    }
}

/// Threshold gate applied before a record is built
///
/// A threshold of 0 lets every level through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelFilter {
    threshold: u8,
}

impl LevelFilter {
    pub const fn new() -> Self {
        Self { threshold: 0 }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn set_level(&mut self, level: LogLevel) {
        self.threshold = level.ordinal();
    }

    /// Apply a level name from configuration
    ///
    /// Unknown or missing names leave the current threshold in place and
    /// return the error so the caller can report it.
    pub fn configure(&mut self, level: Option<&str>) -> Result<()> {
        let name = level.ok_or_else(|| LoggerError::invalid_level("<unset>"))?;
        let level: LogLevel = name.parse()?;
        self.set_level(level);
        Ok(())
    }

    #[inline]
    pub fn should_emit(&self, level: LogLevel) -> bool {
        level.ordinal() >= self.threshold
    }
}
