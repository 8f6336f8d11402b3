use std::sync::Arc;

use crate::messenger::{AssertionMessenger, MessengerHandle};

/// Everything the notifier needs to hand failures over to a messenger.
///
/// The messenger is held weakly. Without a live messenger no notification can be
/// delivered, but assertions still log and halt.
#[derive(Debug, Clone)]
pub struct Config {
    messenger: MessengerHandle,
}

impl Config {
    #[inline]
    pub fn new<M>(messenger: &Arc<M>) -> Self
    where
        M: AssertionMessenger + 'static,
    {
        Self {
            messenger: MessengerHandle::new(messenger),
        }
    }

    #[inline]
    pub fn from_handle(messenger: MessengerHandle) -> Self {
        Self { messenger }
    }

    #[inline]
    pub fn messenger(&self) -> &MessengerHandle {
        &self.messenger
    }
}
