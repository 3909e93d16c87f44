//! Host services the engine reports through and schedules deferred work on.

use std::cmp::Ordering as CmpOrdering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;
use web_time::Instant;

/// User-facing reporting of test outcomes.
pub trait Notifier: Send + Sync {
    /// Non-blocking note that a step went well.
    fn success(&self, message: &str);

    /// Shows `message` and returns once the user (or sink) has taken it.
    fn show_message(&self, message: &str);
}

/// Writes every notification to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        log::info!("{message}");
    }

    fn show_message(&self, message: &str) {
        log::warn!("{message}");
    }
}

/// Runs a task once `delay` has passed, off the caller's thread.
pub trait DeferredExecutor: Send + Sync {
    fn run_after(&self, delay: Duration, task: Box<dyn FnOnce() + Send>);
}

struct Timer {
    deadline: Instant,
    sequence: u64,
    task: Box<dyn FnOnce() + Send>,
}

impl Timer {
    fn key(&self) -> (Instant, u64) {
        (self.deadline, self.sequence)
    }
}

impl PartialEq for Timer {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Timer {}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timer {
    // Reversed so the max-heap pops the earliest deadline first.
    fn cmp(&self, other: &Self) -> CmpOrdering {
        other.key().cmp(&self.key())
    }
}

/// Runs every deferred task on one shared timer thread.
///
/// The thread stops once the executor is dropped and its queued timers
/// have fired.
pub struct ThreadExecutor {
    sender: Mutex<Option<Sender<Timer>>>,
    sequence: AtomicU64,
}

impl ThreadExecutor {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("tapwright-timer".into())
            .spawn(move || run_timers(receiver));
        let sender = match spawned {
            Ok(_) => Some(sender),
            Err(err) => {
                log::error!("could not start the timer thread: {err}");
                None
            }
        };
        Self {
            sender: Mutex::new(sender),
            sequence: AtomicU64::new(0),
        }
    }
}

impl Default for ThreadExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ThreadExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadExecutor").finish_non_exhaustive()
    }
}

impl DeferredExecutor for ThreadExecutor {
    fn run_after(&self, delay: Duration, task: Box<dyn FnOnce() + Send>) {
        let timer = Timer {
            deadline: Instant::now() + delay,
            sequence: self.sequence.fetch_add(1, Ordering::Relaxed),
            task,
        };
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let sent = sender
            .as_ref()
            .is_some_and(|sender| sender.send(timer).is_ok());
        if !sent {
            log::warn!("timer thread unavailable; dropping deferred task");
        }
    }
}

fn run_timers(receiver: Receiver<Timer>) {
    let mut timers: BinaryHeap<Timer> = BinaryHeap::new();
    let mut open = true;
    while open || !timers.is_empty() {
        let received = match timers.peek().map(|timer: &Timer| timer.deadline) {
            _ if !open => Err(RecvTimeoutError::Disconnected),
            None => receiver
                .recv()
                .map_err(|_| RecvTimeoutError::Disconnected),
            Some(deadline) => {
                receiver.recv_timeout(deadline.saturating_duration_since(Instant::now()))
            }
        };
        match received {
            Ok(timer) => timers.push(timer),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                open = false;
                if let Some(deadline) = timers.peek().map(|timer| timer.deadline) {
                    thread::sleep(deadline.saturating_duration_since(Instant::now()));
                }
            }
        }

        let now = Instant::now();
        while timers.peek().is_some_and(|timer| timer.deadline <= now) {
            if let Some(timer) = timers.pop() {
                (timer.task)();
            }
        }
    }
}
