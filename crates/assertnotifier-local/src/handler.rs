use std::time::Duration;

use assertnotifier_core::startup::StartupConfig;
use assertnotifier_core::AssertionMessenger;

use crate::center::NotificationCenter;
use crate::content::{NotificationContent, NotificationRequest, TimeIntervalTrigger};
use crate::sink::LOG_TARGET;

#[derive(Debug, Clone)]
pub struct HandlerSettings {
    pub title: String,
    pub identifier: String,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        let startup = StartupConfig::default();
        Self::from_startup(&startup)
    }
}

impl HandlerSettings {
    pub fn from_startup(startup: &StartupConfig) -> Self {
        Self {
            title: startup.notification_title.clone(),
            identifier: startup.notification_identifier.clone(),
        }
    }
}

/// Turns assertion failures into local notifications.
///
/// Configure an [`AssertionNotifier`](assertnotifier_core::AssertionNotifier) with an
/// `Arc` of this; the notifier only keeps a weak reference, so the caller owns it.
pub struct NotificationsHandler {
    center: NotificationCenter,
    settings: HandlerSettings,
}

impl NotificationsHandler {
    #[inline]
    pub fn new(center: NotificationCenter, settings: HandlerSettings) -> Self {
        Self { center, settings }
    }

    #[inline]
    pub fn center(&self) -> &NotificationCenter {
        &self.center
    }

    #[inline]
    pub fn settings(&self) -> &HandlerSettings {
        &self.settings
    }

    pub fn request(&self, message: &str, delay: Duration, file: &str, line: u32) -> NotificationRequest {
        NotificationRequest::new(
            self.settings.identifier.clone(),
            NotificationContent::assertion(&self.settings.title, message, file, line),
            TimeIntervalTrigger::once(delay),
        )
    }
}

impl AssertionMessenger for NotificationsHandler {
    fn send_assert_notification(&self, message: &str, delay: Duration, file: &'static str, line: u32) {
        let request = self.request(message, delay, file, line);

        if let Err(e) = self.center.add(request) {
            log::debug!(target: LOG_TARGET, "assertion notification dropped: {e}");
        }
    }
}
