use std::sync::OnceLock;
use std::time::Duration;

use parking_lot::RwLock;

use crate::config::Config;
use crate::location::SourceLocation;

/// Delay handed to the messenger when the caller does not pick one.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(3);

/// Log target for records emitted by failed assertions.
pub const LOG_TARGET: &str = "assertnotifier";

static SHARED: OnceLock<AssertionNotifier> = OnceLock::new();

/// Debug-build assertion that tells a messenger about the failure before halting.
///
/// Usually owned by the application's composition root and passed around. For
/// call sites that cannot reach it, [`AssertionNotifier::shared`] provides a
/// process-wide instance; remember to [`configure`](Self::configure) it at startup.
pub struct AssertionNotifier {
    config: RwLock<Option<Config>>,
}

impl AssertionNotifier {
    #[inline]
    pub fn new() -> Self {
        Self {
            config: RwLock::new(None),
        }
    }

    /// Process-wide instance. Starts unconfigured.
    #[inline]
    pub fn shared() -> &'static AssertionNotifier {
        SHARED.get_or_init(AssertionNotifier::new)
    }

    /// Replaces the active configuration.
    pub fn configure(&self, config: Config) {
        *self.config.write() = Some(config);
        log::debug!(target: LOG_TARGET, "assertion notifier configured");
    }

    /// Drops the active configuration. Assertions keep logging and halting.
    pub fn clear(&self) {
        *self.config.write() = None;
    }

    /// `true` when a configuration is active and its messenger is still alive.
    pub fn is_configured(&self) -> bool {
        self.config
            .read()
            .as_ref()
            .is_some_and(|c| c.messenger().is_alive())
    }

    /// Evaluates `condition` once. When it is `false`, notifies the configured
    /// messenger, logs the message, then either runs `on_failure` or halts.
    ///
    /// `delay` is passed through to the messenger untouched.
    /// `on_failure` replaces the halt; it exists so tests can observe the failure path.
    ///
    /// Compiles to nothing without `debug_assertions`.
    #[inline]
    pub fn assert<F>(
        &self,
        condition: F,
        message: &str,
        delay: Duration,
        location: SourceLocation,
        on_failure: Option<&dyn Fn()>,
    ) where
        F: FnOnce() -> bool,
    {
        #[cfg(debug_assertions)]
        {
            if condition() {
                return;
            }
            self.fail(message, delay, location, on_failure);
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = (condition, message, delay, location, on_failure);
        }
    }

    /// [`assert`](Self::assert) with the default delay, no failure hook, and the
    /// caller's location.
    #[inline]
    #[track_caller]
    pub fn check<F>(&self, condition: F, message: &str)
    where
        F: FnOnce() -> bool,
    {
        self.assert(condition, message, DEFAULT_DELAY, SourceLocation::caller(), None);
    }

    #[cfg(debug_assertions)]
    #[cold]
    #[inline(never)]
    fn fail(
        &self,
        message: &str,
        delay: Duration,
        location: SourceLocation,
        on_failure: Option<&dyn Fn()>,
    ) {
        self.notify(message, delay, location);

        log::error!(target: LOG_TARGET, "assertion failed at {location}: {message}");

        if let Some(hook) = on_failure {
            hook();
            return;
        }

        crate::fatal::assertion_failure(message, location);
    }

    /// Best-effort hand-over to the messenger. Never fails.
    #[cfg(debug_assertions)]
    fn notify(&self, message: &str, delay: Duration, location: SourceLocation) {
        // Upgrade under the lock, call outside of it.
        let messenger = self
            .config
            .read()
            .as_ref()
            .and_then(|c| c.messenger().upgrade());

        let Some(messenger) = messenger else {
            log::debug!(target: LOG_TARGET, "no live messenger; skipping notification");
            return;
        };

        let sent = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            messenger.send_assert_notification(message, delay, location.file, location.line);
        }));

        if sent.is_err() {
            log::warn!(target: LOG_TARGET, "messenger panicked while sending assertion notification");
        }
    }
}

impl Default for AssertionNotifier {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(test, debug_assertions))]
mod tests {
    use super::*;
    use crate::messenger::AssertionMessenger;

    use parking_lot::Mutex;
    use std::cell::Cell;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    struct Sent {
        message: String,
        delay: Duration,
        file: &'static str,
        line: u32,
    }

    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<Sent>>,
    }

    impl Recorder {
        fn count(&self) -> usize {
            self.sent.lock().len()
        }
    }

    impl AssertionMessenger for Recorder {
        fn send_assert_notification(&self, message: &str, delay: Duration, file: &'static str, line: u32) {
            self.sent.lock().push(Sent {
                message: message.to_owned(),
                delay,
                file,
                line,
            });
        }
    }

    struct Panicking;

    impl AssertionMessenger for Panicking {
        fn send_assert_notification(&self, _: &str, _: Duration, _: &'static str, _: u32) {
            panic!("permission denied");
        }
    }

    fn here() -> SourceLocation {
        SourceLocation::new("src/screen.rs", 12)
    }

    #[test]
    fn passing_condition_is_a_noop() {
        let recorder = Arc::new(Recorder::default());
        let notifier = AssertionNotifier::new();
        notifier.configure(Config::new(&recorder));

        let calls = AtomicUsize::new(0);
        let hook_ran = Cell::new(false);

        notifier.assert(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                true
            },
            "never",
            DEFAULT_DELAY,
            here(),
            Some(&|| hook_ran.set(true)),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(recorder.count(), 0);
        assert!(!hook_ran.get());
    }

    #[test]
    fn failing_condition_notifies_once_with_exact_arguments() {
        let recorder = Arc::new(Recorder::default());
        let notifier = AssertionNotifier::new();
        notifier.configure(Config::new(&recorder));

        let calls = AtomicUsize::new(0);
        let hook_calls = Cell::new(0);

        notifier.assert(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                false
            },
            "index out of range",
            Duration::from_millis(1500),
            here(),
            Some(&|| {
                // Notification happens before the hook.
                assert_eq!(recorder.count(), 1);
                hook_calls.set(hook_calls.get() + 1);
            }),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(hook_calls.get(), 1);
        assert_eq!(
            *recorder.sent.lock(),
            vec![Sent {
                message: "index out of range".to_owned(),
                delay: Duration::from_millis(1500),
                file: "src/screen.rs",
                line: 12,
            }]
        );
    }

    #[test]
    fn unconfigured_failure_still_runs_hook() {
        let notifier = AssertionNotifier::new();
        let hook_ran = Cell::new(false);

        notifier.assert(|| false, "lonely", DEFAULT_DELAY, here(), Some(&|| hook_ran.set(true)));

        assert!(hook_ran.get());
        assert!(!notifier.is_configured());
    }

    #[test]
    fn dropped_messenger_is_skipped() {
        let recorder = Arc::new(Recorder::default());
        let notifier = AssertionNotifier::new();
        notifier.configure(Config::new(&recorder));
        assert!(notifier.is_configured());

        drop(recorder);
        assert!(!notifier.is_configured());

        let hook_ran = Cell::new(false);
        notifier.assert(|| false, "gone", DEFAULT_DELAY, here(), Some(&|| hook_ran.set(true)));

        assert!(hook_ran.get());
    }

    #[test]
    fn reconfigure_replaces_previous_messenger() {
        let first = Arc::new(Recorder::default());
        let second = Arc::new(Recorder::default());
        let notifier = AssertionNotifier::new();

        notifier.configure(Config::new(&first));
        notifier.configure(Config::new(&second));

        notifier.assert(|| false, "which one", DEFAULT_DELAY, here(), Some(&|| {}));
        notifier.assert(|| false, "still second", DEFAULT_DELAY, here(), Some(&|| {}));

        assert_eq!(first.count(), 0);
        assert_eq!(second.count(), 2);
    }

    #[test]
    fn clear_stops_notifications() {
        let recorder = Arc::new(Recorder::default());
        let notifier = AssertionNotifier::new();
        notifier.configure(Config::new(&recorder));
        notifier.clear();

        notifier.assert(|| false, "cleared", DEFAULT_DELAY, here(), Some(&|| {}));

        assert_eq!(recorder.count(), 0);
    }

    #[test]
    fn panicking_messenger_does_not_stop_the_hook() {
        let messenger = Arc::new(Panicking);
        let notifier = AssertionNotifier::new();
        notifier.configure(Config::new(&messenger));

        let hook_ran = Cell::new(false);
        notifier.assert(|| false, "bad messenger", DEFAULT_DELAY, here(), Some(&|| hook_ran.set(true)));

        assert!(hook_ran.get());
    }

    #[test]
    #[should_panic(expected = "assertion failed at src/screen.rs:12: fatal")]
    fn failure_without_hook_halts() {
        let recorder = Arc::new(Recorder::default());
        let notifier = AssertionNotifier::new();
        notifier.configure(Config::new(&recorder));

        notifier.assert(|| false, "fatal", DEFAULT_DELAY, here(), None);
    }

    #[test]
    #[should_panic(expected = "assertion failed at src/screen.rs:12: messenger gone")]
    fn panicking_messenger_still_halts() {
        let messenger = Arc::new(Panicking);
        let notifier = AssertionNotifier::new();
        notifier.configure(Config::new(&messenger));

        notifier.assert(|| false, "messenger gone", DEFAULT_DELAY, here(), None);
    }

    #[test]
    fn halt_happens_after_notification() {
        let recorder = Arc::new(Recorder::default());
        let notifier = AssertionNotifier::new();
        notifier.configure(Config::new(&recorder));

        let halted = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            notifier.assert(|| false, "ordered", DEFAULT_DELAY, here(), None);
        }));

        assert!(halted.is_err());
        assert_eq!(recorder.count(), 1);
    }

    #[test]
    fn check_uses_caller_location_and_default_delay() {
        let recorder = Arc::new(Recorder::default());
        let notifier = AssertionNotifier::new();
        notifier.configure(Config::new(&recorder));

        let line = line!() + 2;
        let halted = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            notifier.check(|| 1 + 1 == 3, "math");
        }));

        assert!(halted.is_err());
        let sent = recorder.sent.lock();
        assert_eq!(sent[0].file, file!());
        assert_eq!(sent[0].line, line);
        assert_eq!(sent[0].delay, DEFAULT_DELAY);
    }
}
