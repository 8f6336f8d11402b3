use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

/// Receiver of assertion failure notifications.
///
/// Implementors schedule or dispatch an out-of-band notification (a desktop popup,
/// a chat message, a file) and use `delay` as a scheduling hint. The call is made
/// synchronously from the failing assertion, right before the process halts, so it
/// must not block beyond trivial dispatch setup. Failures inside the implementor are
/// its own concern.
pub trait AssertionMessenger: Send + Sync {
    fn send_assert_notification(&self, message: &str, delay: Duration, file: &'static str, line: u32);
}

/// Non-owning handle to a messenger.
///
/// The handle never keeps the messenger alive; it has to be upgraded for every use.
#[derive(Clone)]
pub struct MessengerHandle {
    inner: Weak<dyn AssertionMessenger>,
}

impl MessengerHandle {
    #[inline]
    pub fn new<M>(messenger: &Arc<M>) -> Self
    where
        M: AssertionMessenger + 'static,
    {
        let weak: Weak<M> = Arc::downgrade(messenger);
        Self { inner: weak }
    }

    #[inline]
    pub fn from_dyn(messenger: &Arc<dyn AssertionMessenger>) -> Self {
        Self {
            inner: Arc::downgrade(messenger),
        }
    }

    /// Returns the messenger if it is still alive.
    #[inline]
    pub fn upgrade(&self) -> Option<Arc<dyn AssertionMessenger>> {
        self.inner.upgrade()
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl fmt::Debug for MessengerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessengerHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}
