//! "Wait until a predicate holds" on top of the locator's frame polling.

use crate::error::{TestError, TestResult};
use crate::locator::{Locator, MIN_POLL_STEP};
use std::thread;
use std::time::Duration;
use tapwright_core::{Element, ViewType};

/// Bound on a condition wait.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timeout {
    After(Duration),
    /// Wait as long as it takes.
    Never,
}

impl Timeout {
    pub fn millis(millis: u64) -> Self {
        Timeout::After(Duration::from_millis(millis))
    }
}

impl From<Duration> for Timeout {
    fn from(duration: Duration) -> Self {
        Timeout::After(duration)
    }
}

#[derive(Clone)]
pub struct Waiter {
    locator: Locator,
    popup_attempts: u32,
    popup_poll: Duration,
}

impl Waiter {
    pub fn new(locator: Locator, popup_attempts: u32, popup_poll: Duration) -> Self {
        Self {
            locator,
            popup_attempts,
            popup_poll,
        }
    }

    /// Polls one frame at a time until a visible `T` satisfies `predicate`.
    ///
    /// Elapsed time is counted as attempts times the frame duration. Each
    /// sleep lasts at least that long, so a timeout never fires early.
    pub fn wait_for<T, P>(&self, predicate: P, timeout: Timeout) -> TestResult<()>
    where
        T: ViewType,
        P: Fn(&Element) -> bool,
    {
        self.locator.await_navigation();

        let mut waited = Duration::ZERO;
        loop {
            if self.locator.all_visible::<T>().iter().any(&predicate) {
                return Ok(());
            }
            if let Timeout::After(limit) = timeout {
                if waited >= limit {
                    return Err(TestError::Timeout {
                        target: T::NAME,
                        timeout: limit,
                    });
                }
            }
            let frame = self.locator.frame();
            thread::sleep(frame);
            waited += frame;
        }
    }

    /// Waits for any `T` (visible or not) whose text contains `text`,
    /// ignoring case. Bounded by attempt count rather than wall clock.
    pub fn wait_for_message<T: ViewType>(&self, text: &str) -> TestResult<()> {
        let needle = text.to_lowercase();
        for _ in 0..self.popup_attempts {
            let shown = self
                .locator
                .all_of::<T>()
                .iter()
                .any(|element| element.text().to_lowercase().contains(&needle));
            if shown {
                return Ok(());
            }
            thread::sleep(self.popup_poll.max(MIN_POLL_STEP));
        }
        Err(TestError::PopupNotFound {
            kind: T::NAME,
            text: text.to_string(),
        })
    }
}
