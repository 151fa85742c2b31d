//! User-facing notifications ("toasts") raised by failed cart operations.
//!
//! The cart never surfaces failures as panics; it hands a [`Notification`]
//! to whichever [`Notifier`] the application injected.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;

/// Which cart operation produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CartOperation {
    AddProduct,
    RemoveProduct,
    UpdateProductAmount,
}

impl CartOperation {
    /// Generic message shown when the operation fails unexpectedly.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::AddProduct => "Failed to add product",
            Self::RemoveProduct => "Failed to remove product",
            Self::UpdateProductAmount => "Failed to update product quantity",
        }
    }
}

/// A transient error message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub operation: CartOperation,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notification {
    #[must_use]
    pub fn error(operation: CartOperation, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
            at: Utc::now(),
        }
    }
}

/// Sink for notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Renders notifications as `error`-level log lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        tracing::error!(
            operation = ?notification.operation,
            "{}",
            notification.message
        );
    }
}

/// Forwards notifications to a UI task over a channel.
impl Notifier for mpsc::UnboundedSender<Notification> {
    fn notify(&self, notification: Notification) {
        if let Err(e) = self.send(notification) {
            tracing::debug!(message = %e.0.message, "Notification dropped, receiver closed");
        }
    }
}
