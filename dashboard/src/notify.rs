use crate::types::{Notification, Severity};
use tracing::{error, info};

/// Sink for one-shot user notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Renders notifications as log lines
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Info => info!("🔔 {}: {}", notification.title, notification.description),
            Severity::Error => error!("🔔 {}: {}", notification.title, notification.description),
        }
    }
}
