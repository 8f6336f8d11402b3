#![cfg(debug_assertions)]

//! Checks the log record written by failed assertions through a capturing logger.

use assertnotifier_core::{AssertionMessenger, AssertionNotifier, Config, SourceLocation, DEFAULT_DELAY, LOG_TARGET};

use log::{Level, LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

struct Captured {
    level: Level,
    target: String,
    message: String,
}

struct CaptureLogger {
    records: Mutex<Vec<Captured>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        self.records.lock().push(Captured {
            level: record.level(),
            target: record.target().to_owned(),
            message: record.args().to_string(),
        });
    }

    fn flush(&self) {}
}

fn logger() -> &'static CaptureLogger {
    static LOGGER: OnceLock<&'static CaptureLogger> = OnceLock::new();
    LOGGER.get_or_init(|| {
        let logger: &'static CaptureLogger = Box::leak(Box::new(CaptureLogger {
            records: Mutex::new(Vec::new()),
        }));
        log::set_logger(logger).expect("logger installed once");
        log::set_max_level(LevelFilter::Trace);
        logger
    })
}

/// Error records from the notifier that mention `needle`.
fn errors_mentioning(needle: &str) -> usize {
    logger()
        .records
        .lock()
        .iter()
        .filter(|r| r.level == Level::Error && r.target == LOG_TARGET && r.message.contains(needle))
        .count()
}

struct Quiet {
    called: AtomicBool,
}

impl AssertionMessenger for Quiet {
    fn send_assert_notification(&self, _: &str, _: Duration, _: &'static str, _: u32) {
        self.called.store(true, Ordering::SeqCst);
    }
}

#[test]
fn failed_assertion_logs_one_error_with_message() {
    logger();
    let notifier = AssertionNotifier::new();

    notifier.assert(
        || false,
        "failed-assertion-logs-once",
        DEFAULT_DELAY,
        SourceLocation::new("src/cart.rs", 31),
        Some(&|| assert_eq!(errors_mentioning("failed-assertion-logs-once"), 1)),
    );

    assert_eq!(errors_mentioning("failed-assertion-logs-once"), 1);
    assert_eq!(errors_mentioning("src/cart.rs:31"), 1);
}

#[test]
fn passing_assertion_logs_nothing() {
    logger();
    let notifier = AssertionNotifier::new();

    notifier.assert(
        || true,
        "passing-assertion-is-silent",
        DEFAULT_DELAY,
        SourceLocation::new("src/cart.rs", 40),
        None,
    );

    assert_eq!(errors_mentioning("passing-assertion-is-silent"), 0);
}

#[test]
fn notification_precedes_log_record() {
    logger();
    let quiet = Arc::new(Quiet {
        called: AtomicBool::new(false),
    });
    let notifier = AssertionNotifier::new();
    notifier.configure(Config::new(&quiet));

    notifier.assert(
        || false,
        "notify-then-log",
        DEFAULT_DELAY,
        SourceLocation::new("src/cart.rs", 55),
        Some(&|| {
            assert!(quiet.called.load(Ordering::SeqCst));
            assert_eq!(errors_mentioning("notify-then-log"), 1);
        }),
    );
}
