//! Seam between the translator and the external notification bus.
//!
//! The bus itself (connection, session, delivery ordering) lives outside
//! this service; everything here is the port the front end publishes
//! through, plus two in-process implementations.

use tokio::sync::mpsc;
use tracing::info;

use crate::notification::Notification;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PublishError {
    #[error("notification bus is no longer accepting messages")]
    BusClosed,
}

/// Anything that can take a completed notification off our hands.
pub trait Publisher: Send + Sync {
    fn publish(&self, notification: &Notification) -> Result<(), PublishError>;
}

/// Default wiring: writes the notification to the log and drops it.
/// Stands in when no bus endpoint is configured.
#[derive(Debug, Default)]
pub struct LogPublisher;

impl Publisher for LogPublisher {
    fn publish(&self, notification: &Notification) -> Result<(), PublishError> {
        info!(
            level = notification.level,
            url = %notification.url,
            "notification: {}",
            notification.message
        );
        Ok(())
    }
}

/// Forwards notifications into an mpsc channel. The embedding side owns the
/// receiver and pumps it into the real bus client; tests use it to capture
/// what would have been delivered.
#[derive(Debug, Clone)]
pub struct ChannelPublisher {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelPublisher {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Publisher for ChannelPublisher {
    fn publish(&self, notification: &Notification) -> Result<(), PublishError> {
        self.tx
            .send(notification.clone())
            .map_err(|_| PublishError::BusClosed)
    }
}
