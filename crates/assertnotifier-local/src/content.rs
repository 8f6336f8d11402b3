use std::time::Duration;

use assertnotifier_core::{NotifierError, NotifierResult};

/// What the user sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub title: String,
    pub subtitle: String,
    pub body: String,
}

impl NotificationContent {
    /// Content for an assertion failure: the message as subtitle, plus file and line in the body.
    pub fn assertion(title: &str, message: &str, file: &str, line: u32) -> Self {
        Self {
            title: title.to_owned(),
            subtitle: message.to_owned(),
            body: format!("{message}\nIn file: {file}\nAt line: {line}"),
        }
    }
}

/// Fires once `interval` after the request was added, optionally again every `interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeIntervalTrigger {
    interval: Duration,
    repeats: bool,
}

impl TimeIntervalTrigger {
    #[inline]
    pub fn once(interval: Duration) -> Self {
        Self {
            interval,
            repeats: false,
        }
    }

    /// A zero interval cannot repeat.
    pub fn repeating(interval: Duration) -> NotifierResult<Self> {
        if interval.is_zero() {
            return Err(NotifierError::other("repeating trigger needs a non-zero interval"));
        }
        Ok(Self {
            interval,
            repeats: true,
        })
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[inline]
    pub fn repeats(&self) -> bool {
        self.repeats
    }
}

/// A notification waiting for its trigger. Requests sharing an identifier replace each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub identifier: String,
    pub content: NotificationContent,
    pub trigger: TimeIntervalTrigger,
}

impl NotificationRequest {
    #[inline]
    pub fn new(
        identifier: impl Into<String>,
        content: NotificationContent,
        trigger: TimeIntervalTrigger,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            content,
            trigger,
        }
    }
}

/// A notification handed to a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredNotification {
    pub identifier: String,
    pub content: NotificationContent,
}
