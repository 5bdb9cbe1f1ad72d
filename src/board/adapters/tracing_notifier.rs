//! Notifier that forwards notifications to `tracing`.

use crate::board::ports::{Notification, NotificationLevel, Notifier};

/// Emits each notification as a `tracing` event under the
/// `taskflow::notification` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let Notification { level, message } = notification;
        match level {
            NotificationLevel::Success => {
                tracing::info!(target: "taskflow::notification", kind = "success", "{message}");
            }
            NotificationLevel::Info => {
                tracing::info!(target: "taskflow::notification", kind = "info", "{message}");
            }
            NotificationLevel::Error => {
                tracing::error!(target: "taskflow::notification", "{message}");
            }
        }
    }
}
