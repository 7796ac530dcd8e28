//! Sender implementations

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::HttpSender;

pub use crate::core::{FnSender, LogSender};
