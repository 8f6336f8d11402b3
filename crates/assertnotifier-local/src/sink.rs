use crossbeam_channel::Sender;

use crate::content::DeliveredNotification;

pub const LOG_TARGET: &str = "assertnotifier::local";

/// Where due notifications end up. Runs on the notification center's worker thread.
pub trait NotificationSink: Send {
    fn deliver(&mut self, notification: &DeliveredNotification);
}

/// Writes notifications to the log at warn level.
#[derive(Debug, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn deliver(&mut self, n: &DeliveredNotification) {
        log::warn!(
            target: LOG_TARGET,
            "[{}] {}: {}\n{}",
            n.identifier,
            n.content.title,
            n.content.subtitle,
            n.content.body
        );
    }
}

/// Forwards notifications to a channel. Best-effort: a closed receiver is ignored.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<DeliveredNotification>,
}

impl ChannelSink {
    #[inline]
    pub fn new(tx: Sender<DeliveredNotification>) -> Self {
        Self { tx }
    }
}

impl NotificationSink for ChannelSink {
    fn deliver(&mut self, n: &DeliveredNotification) {
        let _ = self.tx.send(n.clone());
    }
}
