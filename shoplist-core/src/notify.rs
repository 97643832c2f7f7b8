//! Notification emitter.
//!
//! Surfaces the end of every mutation as transient user feedback. Emitting is
//! fire-and-forget: nothing waits for a notification to be shown, and a
//! listener that went away is silently ignored.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;

/// How long a notification stays on screen.
pub const DISPLAY_DURATION: Duration = Duration::from_millis(2500);

/// Which mutation finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Added,
    Updated,
    Removed,
}

impl NotificationKind {
    pub fn message(self) -> &'static str {
        match self {
            NotificationKind::Added => "Item added",
            NotificationKind::Updated => "Item updated",
            NotificationKind::Removed => "Item removed",
        }
    }
}

/// Whether the remote confirmed the change or it only exists locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    Confirmed,
    LocalOnly,
}

/// A single piece of user feedback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub delivery: Delivery,
    pub emitted_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(kind: NotificationKind, delivery: Delivery) -> Self {
        Self {
            kind,
            message: kind.message().to_string(),
            delivery,
            emitted_at: Utc::now(),
        }
    }

    /// When the notification should stop being shown.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.emitted_at + chrono::Duration::milliseconds(DISPLAY_DURATION.as_millis() as i64)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.delivery {
            Delivery::Confirmed => write!(f, "{}", self.message),
            Delivery::LocalOnly => write!(f, "{} (saved locally)", self.message),
        }
    }
}

/// Receives notifications. Must not block.
pub trait Notifier {
    fn notify(&self, notification: Notification);
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

/// Forwards notifications into an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    /// Creates a notifier and the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        // Nobody listening is fine
        let _ = self.tx.send(notification);
    }
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        tracing::info!(
            kind = ?notification.kind,
            delivery = ?notification.delivery,
            "{}",
            notification.message
        );
    }
}
