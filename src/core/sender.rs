//! Delivery capability invoked by the flush path

use super::error::Result;
use super::payload::Payload;
use async_trait::async_trait;
use std::fmt;
use std::future::Future;

/// Trait for delivering a batch of log lines to a collector
///
/// Implementations own transport concerns such as timeouts. A returned
/// error is reported as a diagnostic; the lines in the payload are not
/// requeued.
///
/// # Example
///
/// ```no_run
/// use log_shipper::core::{LogSender, Payload, Result};
/// use async_trait::async_trait;
///
/// struct StdoutSender;
///
/// #[async_trait]
/// impl LogSender for StdoutSender {
///     async fn send_logs(&self, payload: Payload) -> Result<()> {
///         println!("{}", payload.to_json()?);
///         Ok(())
///     }
///
///     fn name(&self) -> &str {
///         "stdout"
///     }
/// }
/// ```
#[async_trait]
pub trait LogSender: Send + Sync {
    /// Deliver one payload
    async fn send_logs(&self, payload: Payload) -> Result<()>;

    /// Get the sender name
    fn name(&self) -> &str;
}

/// Adapter turning an async closure into a [`LogSender`]
///
/// ```
/// use log_shipper::core::FnSender;
///
/// let sender = FnSender::new(|payload| async move {
///     println!("{} lines", payload.len());
///     Ok(())
/// });
/// ```
pub struct FnSender<F> {
    send: F,
}

impl<F> FnSender<F> {
    pub fn new<Fut>(send: F) -> Self
    where
        F: Fn(Payload) -> Fut + Send + Sync,
        Fut: Future<Output = Result<()>> + Send,
    {
        Self { send }
    }
}

impl<F> fmt::Debug for FnSender<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnSender")
    }
}

#[async_trait]
impl<F, Fut> LogSender for FnSender<F>
where
    F: Fn(Payload) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send,
{
    async fn send_logs(&self, payload: Payload) -> Result<()> {
        (self.send)(payload).await
    }

    fn name(&self) -> &str {
        "fn"
    }
}
