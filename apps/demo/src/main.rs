mod command;

use log::{debug, info, warn};

use assertnotifier_core::startup::{ConfigPaths, StartupConfig, StartupLoader};
use assertnotifier_core::{assert_notify, AssertionNotifier, Config, NotifierError, NotifierResult};
use assertnotifier_local::{
    AuthorizationPolicy, HandlerSettings, LogSink, NotificationCenter, NotificationsHandler,
};
use assertnotifier_modules_logging::{ConsoleLogger, ConsoleLoggerConfig};

use std::io::BufRead;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::command::DemoCommand;

const DEFAULT_MESSAGE: &str = "Assert button tapped";

fn main() -> NotifierResult<()> {
    let (startup, report) = StartupLoader::load_json(&ConfigPaths::default())?;

    let mut logger = ConsoleLogger::new(ConsoleLoggerConfig::from_startup(&startup));
    logger.init()?;
    report.log();

    let handler = Arc::new(build_handler(&startup)?);

    // The notifier holds the handler weakly; `handler` must outlive the loop.
    AssertionNotifier::shared().configure(Config::new(&handler));

    info!("demo ready: `assert [message]` fails an assertion, `pass` runs a passing one, `quit` exits");

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.map_err(|e| NotifierError::Other(format!("stdin read failed: {e}")))?;

        match DemoCommand::parse(&line) {
            DemoCommand::Assert(message) => {
                let message = message.unwrap_or_else(|| DEFAULT_MESSAGE.to_owned());
                run_action(message, startup.default_delay);
            }
            DemoCommand::Pass => {
                assert_notify!(!line.is_empty(), "a typed command is never empty");
                info!("assertion passed");
            }
            DemoCommand::Quit => break,
            DemoCommand::Empty => {}
            DemoCommand::Unknown(cmd) => warn!("unknown command: {cmd}"),
        }
    }

    wait_for_pending(handler.center(), startup.default_delay.saturating_add(Duration::from_secs(1)));
    Ok(())
}

fn build_handler(startup: &StartupConfig) -> NotifierResult<NotificationsHandler> {
    let policy = if startup.notifications_authorized {
        AuthorizationPolicy::Grant
    } else {
        AuthorizationPolicy::Deny
    };

    let center = NotificationCenter::spawn(Box::new(LogSink), policy)?;
    if let Err(e) = center.request_authorization() {
        debug!("{e}");
    }

    Ok(NotificationsHandler::new(
        center,
        HandlerSettings::from_startup(startup),
    ))
}

/// Runs the failing assertion on its own thread, so the halt ends that action
/// instead of the whole demo.
fn run_action(message: String, delay: Duration) {
    let action = thread::Builder::new()
        .name("assert-action".to_owned())
        .spawn(move || {
            assert_notify!(false, message, delay);
        });

    match action {
        Ok(handle) => {
            if handle.join().is_err() {
                warn!("assertion halted the action; notification due in {delay:?}");
            }
        }
        Err(e) => warn!("could not start assert action: {e}"),
    }
}

fn wait_for_pending(center: &NotificationCenter, timeout: Duration) {
    // An unrepresentable deadline means "wait until the queue drains".
    let deadline = Instant::now().checked_add(timeout);

    while deadline.map_or(true, |d| Instant::now() < d) {
        match center.pending_identifiers() {
            Ok(pending) if pending.is_empty() => return,
            Ok(pending) => debug!("waiting for {} notification(s)", pending.len()),
            Err(e) => {
                debug!("{e}");
                return;
            }
        }
        thread::sleep(Duration::from_millis(50));
    }
}
