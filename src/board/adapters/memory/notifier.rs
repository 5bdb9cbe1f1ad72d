//! Notifier that keeps every notification for later inspection.

use crate::board::ports::{Notification, NotificationLevel, Notifier};
use parking_lot::Mutex;
use std::sync::Arc;

/// Thread-safe notifier recording notifications in delivery order.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    delivered: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    /// Creates an empty notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every notification delivered so far.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.delivered.lock().clone()
    }

    /// Returns the most recent notification.
    #[must_use]
    pub fn last(&self) -> Option<Notification> {
        self.delivered.lock().last().cloned()
    }

    /// Returns the messages delivered at `level`.
    #[must_use]
    pub fn messages(&self, level: NotificationLevel) -> Vec<String> {
        self.delivered
            .lock()
            .iter()
            .filter(|notification| notification.level == level)
            .map(|notification| notification.message.clone())
            .collect()
    }

    /// Forgets every recorded notification.
    pub fn clear(&self) {
        self.delivered.lock().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.delivered.lock().push(notification);
    }
}
