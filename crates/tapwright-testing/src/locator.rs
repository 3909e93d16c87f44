//! Bounded polling search over the visible part of the view tree.
//!
//! A search first waits for any navigation to finish, then evaluates the
//! request once per frame for at most `locate_attempts` frames. Several
//! matches for a single-element request count as "not yet resolved", so the
//! search keeps polling until the screen settles on exactly one.

use crate::error::{TestError, TestResult};
use crate::overlay::Overlay;
use smallvec::SmallVec;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tapwright_core::{Element, ElementHandle, ViewTree, ViewType};

/// Lower bound for a polling step, so a zero frame cannot spin.
pub(crate) const MIN_POLL_STEP: Duration = Duration::from_micros(500);

/// Which of the matching elements a search resolves to.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Selection {
    /// Exactly one match; more than one keeps polling.
    #[default]
    Single,
    /// The first match in document order.
    First,
    /// The match at this position in document order.
    Nth(usize),
    /// Exactly one match once these elements are left out.
    Excluding(Vec<ElementHandle>),
}

/// Outcome of one polling attempt.
#[derive(Debug)]
pub(crate) enum Attempt {
    Found(Element),
    Pending { matches: usize },
}

impl Selection {
    fn resolve(&self, matches: SmallVec<[Element; 4]>) -> Attempt {
        let count = matches.len();
        let found = match self {
            Selection::Single if count == 1 => matches.into_iter().next(),
            Selection::Single => None,
            Selection::First => matches.into_iter().next(),
            Selection::Nth(index) => matches.into_iter().nth(*index),
            Selection::Excluding(excluded) => {
                let mut remaining: SmallVec<[Element; 4]> = matches
                    .into_iter()
                    .filter(|element| !excluded.contains(&element.handle))
                    .collect();
                if remaining.len() == 1 {
                    remaining.pop()
                } else {
                    return Attempt::Pending {
                        matches: remaining.len(),
                    };
                }
            }
        };
        match found {
            Some(element) => Attempt::Found(element),
            None => Attempt::Pending { matches: count },
        }
    }
}

#[derive(Clone)]
pub struct Locator {
    tree: Arc<dyn ViewTree>,
    overlay: Overlay,
    attempts: u32,
    navigation_poll: Duration,
}

impl Locator {
    pub fn new(
        tree: Arc<dyn ViewTree>,
        overlay: Overlay,
        attempts: u32,
        navigation_poll: Duration,
    ) -> Self {
        Self {
            tree,
            overlay,
            attempts,
            navigation_poll,
        }
    }

    /// Blocks until the tree stops navigating. Deliberately unbounded.
    pub fn await_navigation(&self) {
        if !self.tree.is_navigating() {
            return;
        }
        log::debug!("waiting for navigation to finish");
        while self.tree.is_navigating() {
            thread::sleep(self.navigation_poll);
        }
    }

    /// Current animation frame, the wait between two attempts.
    pub fn frame(&self) -> Duration {
        self.tree
            .time()
            .animation_durations()
            .one_frame
            .max(MIN_POLL_STEP)
    }

    pub fn all_visible<T: ViewType>(&self) -> Vec<Element> {
        self.tree
            .root()
            .map(|root| root.visible_of::<T>())
            .unwrap_or_default()
    }

    pub fn all_of<T: ViewType>(&self) -> Vec<Element> {
        self.tree
            .root()
            .map(|root| root.all_of::<T>())
            .unwrap_or_default()
    }

    /// Finds the visible `T` matching `predicate` under `selection`.
    pub fn locate<T, P>(
        &self,
        predicate: P,
        description: &str,
        selection: &Selection,
    ) -> TestResult<Element>
    where
        T: ViewType,
        P: Fn(&Element) -> bool,
    {
        self.try_to_find(description, || {
            let matches: SmallVec<[Element; 4]> = self
                .all_visible::<T>()
                .into_iter()
                .filter(|element| predicate(element))
                .collect();
            selection.resolve(matches)
        })
    }

    pub(crate) fn try_to_find(
        &self,
        description: &str,
        mut attempt: impl FnMut() -> Attempt,
    ) -> TestResult<Element> {
        self.await_navigation();

        let mut last_match_count = 0;
        for _ in 0..self.attempts {
            match attempt() {
                Attempt::Found(element) => {
                    self.overlay.show(&element);
                    return Ok(element);
                }
                Attempt::Pending { matches } => last_match_count = matches,
            }
            thread::sleep(self.frame());
        }

        log::warn!(
            "gave up on `{description}` after {} attempts ({last_match_count} matches on the last one)",
            self.attempts
        );
        Err(TestError::NotFound {
            description: description.to_string(),
            attempts: self.attempts,
            last_match_count,
        })
    }
}
