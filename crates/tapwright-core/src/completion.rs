//! Completion tracking for interactions whose handlers run asynchronously.
//!
//! A [`completion_pair`] is created per interaction. The view tree receives
//! the [`CompletionSignal`] with the event and may clone it into any follow-up
//! work its handlers schedule. When the last clone is dropped (or
//! [`CompletionSignal::complete`] is called) the matching
//! [`PendingInteraction`] resolves. Each pair is independent, so overlapping
//! interactions can never resolve each other's futures.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::task::{Context, Poll, Waker};
use std::time::Duration;

#[derive(Default)]
struct CompletionState {
    done: bool,
    waker: Option<Waker>,
}

#[derive(Default)]
struct Shared {
    state: Mutex<CompletionState>,
    changed: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, CompletionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn resolve(&self) {
        let waker = {
            let mut state = self.lock();
            if state.done {
                return;
            }
            state.done = true;
            state.waker.take()
        };
        self.changed.notify_all();
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

/// Resolves the pending side once the last clone goes away.
struct CompletionGuard {
    shared: Arc<Shared>,
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        self.shared.resolve();
    }
}

/// Held by the UI side for as long as an event's handler chain is running.
#[derive(Clone)]
pub struct CompletionSignal {
    guard: Arc<CompletionGuard>,
}

impl CompletionSignal {
    /// Resolves immediately, even if other clones are still alive.
    pub fn complete(&self) {
        self.guard.shared.resolve();
    }

    pub fn is_completed(&self) -> bool {
        self.guard.shared.lock().done
    }
}

impl std::fmt::Debug for CompletionSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionSignal")
            .field("completed", &self.is_completed())
            .finish()
    }
}

/// Future side of an awaited interaction.
pub struct PendingInteraction {
    shared: Arc<Shared>,
}

impl PendingInteraction {
    pub fn is_resolved(&self) -> bool {
        self.shared.lock().done
    }

    /// Blocks the calling thread until the handler chain has finished.
    pub fn wait(self) {
        pollster::block_on(self)
    }

    /// Blocks for at most `timeout`. Returns whether the interaction resolved.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let state = self.shared.lock();
        let (state, _) = self
            .shared
            .changed
            .wait_timeout_while(state, timeout, |state| !state.done)
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        state.done
    }
}

impl Future for PendingInteraction {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.shared.lock();
        if state.done {
            return Poll::Ready(());
        }
        state.waker = Some(cx.waker().clone());
        Poll::Pending
    }
}

impl std::fmt::Debug for PendingInteraction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingInteraction")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

pub fn completion_pair() -> (CompletionSignal, PendingInteraction) {
    let shared = Arc::new(Shared::default());
    let signal = CompletionSignal {
        guard: Arc::new(CompletionGuard {
            shared: Arc::clone(&shared),
        }),
    };
    (signal, PendingInteraction { shared })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn resolves_when_last_clone_dropped() {
        let (signal, pending) = completion_pair();
        let follow_up = signal.clone();
        drop(signal);
        assert!(!pending.is_resolved());
        drop(follow_up);
        assert!(pending.is_resolved());
    }

    #[test]
    fn explicit_complete_resolves_once() {
        let (signal, pending) = completion_pair();
        signal.complete();
        signal.complete();
        assert!(pending.is_resolved());
        assert!(signal.is_completed());
    }

    #[test]
    fn wait_blocks_until_other_thread_finishes() {
        let (signal, pending) = completion_pair();
        let worker = thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            drop(signal);
        });
        pending.wait();
        worker.join().unwrap();
    }

    #[test]
    fn wait_timeout_reports_unresolved() {
        let (_signal, pending) = completion_pair();
        assert!(!pending.wait_timeout(Duration::from_millis(10)));
    }
}
