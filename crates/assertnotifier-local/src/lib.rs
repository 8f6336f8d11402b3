#![forbid(unsafe_code)]

//! Local notifications for failed assertions.
//!
//! [`NotificationsHandler`] plugs into an `AssertionNotifier` and schedules a
//! notification on a [`NotificationCenter`], which delivers it to a
//! [`NotificationSink`] after the requested delay.

mod center;
mod content;
mod handler;
mod sink;

pub use center::{AuthorizationPolicy, AuthorizationStatus, NotificationCenter};
pub use content::{DeliveredNotification, NotificationContent, NotificationRequest, TimeIntervalTrigger};
pub use handler::{HandlerSettings, NotificationsHandler};
pub use sink::{ChannelSink, LogSink, NotificationSink};
