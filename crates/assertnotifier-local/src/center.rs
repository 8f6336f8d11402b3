use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use assertnotifier_core::{NotifierError, NotifierResult};
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;

use crate::content::{DeliveredNotification, NotificationRequest};
use crate::sink::{NotificationSink, LOG_TARGET};

/// What the user allows. Decided up front; `request_authorization` reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationPolicy {
    Grant,
    Deny,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    NotDetermined,
    Authorized,
    Denied,
}

enum Command {
    Add(NotificationRequest),
    Remove(String),
    Pending(Sender<Vec<String>>),
    Shutdown,
}

struct Pending {
    due: Instant,
    request: NotificationRequest,
}

/// In-process scheduler for local notifications.
///
/// A worker thread holds pending requests and hands each one to the sink once its
/// trigger interval has elapsed. Dropping the center stops the worker and discards
/// whatever is still pending.
pub struct NotificationCenter {
    tx: Sender<Command>,
    policy: AuthorizationPolicy,
    status: Mutex<AuthorizationStatus>,
    worker: Option<JoinHandle<()>>,
}

impl NotificationCenter {
    pub fn spawn(sink: Box<dyn NotificationSink>, policy: AuthorizationPolicy) -> NotifierResult<Self> {
        let (tx, rx) = unbounded::<Command>();

        let worker = thread::Builder::new()
            .name("assertnotifier-center".to_owned())
            .spawn(move || run(rx, sink))
            .map_err(|e| NotifierError::Other(format!("notification center spawn failed: {e}")))?;

        Ok(Self {
            tx,
            policy,
            status: Mutex::new(AuthorizationStatus::NotDetermined),
            worker: Some(worker),
        })
    }

    /// Resolves the authorization status from the policy. Must be called before `add`.
    pub fn request_authorization(&self) -> NotifierResult<()> {
        let mut status = self.status.lock();
        match self.policy {
            AuthorizationPolicy::Grant => {
                *status = AuthorizationStatus::Authorized;
                log::info!(target: LOG_TARGET, "notifications allowed");
                Ok(())
            }
            AuthorizationPolicy::Deny => {
                *status = AuthorizationStatus::Denied;
                Err(NotifierError::NotAuthorized)
            }
        }
    }

    #[inline]
    pub fn authorization_status(&self) -> AuthorizationStatus {
        *self.status.lock()
    }

    /// Schedules a request. Fire-and-forget: returns as soon as the worker has it.
    pub fn add(&self, request: NotificationRequest) -> NotifierResult<()> {
        if self.authorization_status() != AuthorizationStatus::Authorized {
            return Err(NotifierError::NotAuthorized);
        }
        self.send(Command::Add(request))
    }

    pub fn remove_pending(&self, identifier: &str) -> NotifierResult<()> {
        self.send(Command::Remove(identifier.to_owned()))
    }

    /// Identifiers still waiting for their trigger, soonest first.
    pub fn pending_identifiers(&self) -> NotifierResult<Vec<String>> {
        let (reply_tx, reply_rx) = bounded(1);
        self.send(Command::Pending(reply_tx))?;
        reply_rx.recv().map_err(|_| stopped())
    }

    fn send(&self, cmd: Command) -> NotifierResult<()> {
        self.tx.send(cmd).map_err(|_| stopped())
    }
}

impl Drop for NotificationCenter {
    fn drop(&mut self) {
        let _ = self.tx.send(Command::Shutdown);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!(target: LOG_TARGET, "notification center worker panicked");
            }
        }
    }
}

fn stopped() -> NotifierError {
    NotifierError::other("notification center stopped")
}

fn run(rx: Receiver<Command>, mut sink: Box<dyn NotificationSink>) {
    let mut pending: Vec<Pending> = Vec::new();

    loop {
        deliver_due(&mut pending, sink.as_mut());

        let next_due = pending.iter().map(|p| p.due).min();
        let cmd = match next_due {
            Some(due) => {
                let wait = due.saturating_duration_since(Instant::now());
                match rx.recv_timeout(wait) {
                    Ok(cmd) => cmd,
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match rx.recv() {
                Ok(cmd) => cmd,
                Err(_) => break,
            },
        };

        match cmd {
            Command::Add(request) => {
                pending.retain(|p| p.request.identifier != request.identifier);
                match Instant::now().checked_add(request.trigger.interval()) {
                    Some(due) => pending.push(Pending { due, request }),
                    None => log::debug!(
                        target: LOG_TARGET,
                        "dropping '{}': trigger interval {:?} is out of range",
                        request.identifier,
                        request.trigger.interval()
                    ),
                }
            }
            Command::Remove(identifier) => {
                pending.retain(|p| p.request.identifier != identifier);
            }
            Command::Pending(reply) => {
                let mut ids: Vec<(Instant, String)> = pending
                    .iter()
                    .map(|p| (p.due, p.request.identifier.clone()))
                    .collect();
                ids.sort();
                let _ = reply.send(ids.into_iter().map(|(_, id)| id).collect());
            }
            Command::Shutdown => break,
        }
    }

    if !pending.is_empty() {
        log::debug!(target: LOG_TARGET, "discarding {} pending notification(s)", pending.len());
    }
}

fn deliver_due(pending: &mut Vec<Pending>, sink: &mut dyn NotificationSink) {
    let now = Instant::now();
    let mut due: Vec<Pending> = Vec::new();

    let mut i = 0;
    while i < pending.len() {
        if pending[i].due <= now {
            due.push(pending.swap_remove(i));
        } else {
            i += 1;
        }
    }
    due.sort_by_key(|p| p.due);

    for p in due {
        let delivered = DeliveredNotification {
            identifier: p.request.identifier.clone(),
            content: p.request.content.clone(),
        };

        if panic::catch_unwind(AssertUnwindSafe(|| sink.deliver(&delivered))).is_err() {
            log::warn!(target: LOG_TARGET, "sink panicked delivering '{}'", delivered.identifier);
        }

        if p.request.trigger.repeats() {
            match p.due.checked_add(repeat_step(p.request.trigger.interval())) {
                Some(due) => pending.push(Pending {
                    due,
                    request: p.request,
                }),
                None => log::debug!(
                    target: LOG_TARGET,
                    "'{}' stops repeating: next trigger is out of range",
                    p.request.identifier
                ),
            }
        }
    }
}

#[inline]
fn repeat_step(interval: Duration) -> Duration {
    interval.max(Duration::from_millis(1))
}
