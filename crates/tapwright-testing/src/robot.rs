//! The test-facing driving API.
//!
//! A [`UiTest`] receives a [`Robot`] and uses it to find elements, interact
//! with them and wait for the UI to react. Every call blocks the test-run
//! thread while the UI keeps rendering on its own.
//!
//! # Example
//!
//! ```no_run
//! use tapwright_testing::{Robot, TestResult, UiTest};
//!
//! #[derive(Default)]
//! struct SignIn;
//!
//! impl UiTest for SignIn {
//!     fn run(&mut self, robot: &mut Robot) -> TestResult<()> {
//!         robot.type_in("email", "ada@example.com")?;
//!         robot.tap_text("Sign in")?;
//!         robot.expect("Welcome", false)?;
//!         Ok(())
//!     }
//! }
//! ```

use crate::error::{TestError, TestResult};
use crate::interaction::{Dispatcher, TextReaction};
use crate::locator::{Locator, Selection};
use crate::overlay::Overlay;
use crate::settings::EngineSettings;
use crate::waiter::{Timeout, Waiter};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tapwright_core::{
    Alert, Button, Carousel, DeferredExecutor, Direction, Element, ElementHandle,
    PendingInteraction, TextControl, TextInput, TextView, Toast, ViewTree, ViewType,
};

/// A named UI scenario. A fresh instance runs exactly once per run.
pub trait UiTest: Send {
    fn run(&mut self, robot: &mut Robot) -> TestResult<()>;
}

pub(crate) fn contains_text(haystack: &str, needle: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        haystack.contains(needle)
    } else {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    }
}

pub struct Robot {
    tree: Arc<dyn ViewTree>,
    locator: Locator,
    waiter: Waiter,
    dispatcher: Dispatcher,
    overlay: Overlay,
}

impl Robot {
    pub fn new(
        tree: Arc<dyn ViewTree>,
        settings: &EngineSettings,
        executor: Arc<dyn DeferredExecutor>,
    ) -> Self {
        let overlay = Overlay::new(
            Arc::clone(&tree),
            executor,
            settings.highlight_hide_after,
            settings.highlight_margin,
        );
        let locator = Locator::new(
            Arc::clone(&tree),
            overlay.clone(),
            settings.locate_attempts,
            settings.navigation_poll,
        );
        let waiter = Waiter::new(
            locator.clone(),
            settings.popup_attempts,
            settings.popup_poll,
        );
        let dispatcher = Dispatcher::new(Arc::clone(&tree), settings.settle_delay);
        Self {
            tree,
            locator,
            waiter,
            dispatcher,
            overlay,
        }
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn all_visible<T: ViewType>(&self) -> Vec<Element> {
        self.locator.all_visible::<T>()
    }

    // Finding

    /// The single visible `T` matching `predicate`.
    pub fn locate<T: ViewType>(
        &self,
        predicate: impl Fn(&Element) -> bool,
        description: &str,
    ) -> TestResult<Element> {
        self.locator
            .locate::<T, _>(predicate, description, &Selection::Single)
    }

    /// The `index`-th visible `T` matching `predicate`, in document order.
    pub fn locate_nth<T: ViewType>(
        &self,
        predicate: impl Fn(&Element) -> bool,
        description: &str,
        index: usize,
    ) -> TestResult<Element> {
        self.locator
            .locate::<T, _>(predicate, description, &Selection::Nth(index))
    }

    /// The single visible `T` matching `predicate` besides `excluded`.
    pub fn locate_excluding<T: ViewType>(
        &self,
        predicate: impl Fn(&Element) -> bool,
        description: &str,
        excluded: &[ElementHandle],
    ) -> TestResult<Element> {
        self.locator.locate::<T, _>(
            predicate,
            description,
            &Selection::Excluding(excluded.to_vec()),
        )
    }

    /// The first visible `T`.
    pub fn find<T: ViewType>(&self) -> TestResult<Element> {
        self.locator
            .locate::<T, _>(|_| true, T::NAME, &Selection::First)
    }

    /// The single visible text view whose text is exactly `text`.
    pub fn find_by_text(&self, text: &str) -> TestResult<Element> {
        self.locate::<TextView>(|element| element.text() == text, text)
    }

    pub fn by_id<T: ViewType>(&self, id: &str) -> TestResult<Element> {
        self.locate::<T>(
            |element| element.id() == id,
            &format!("Id not found: {id}"),
        )
    }

    /// Succeeds once any visible text control contains `text`.
    pub fn expect(&self, text: &str, case_sensitive: bool) -> TestResult<Element> {
        self.locator.locate::<TextControl, _>(
            |element| contains_text(element.text(), text, case_sensitive),
            text,
            &Selection::First,
        )
    }

    // Interacting

    pub fn tap(&self, element: &Element) {
        self.locator.await_navigation();
        self.dispatcher.tap(element);
    }

    pub fn tap_text(&self, text: &str) -> TestResult<Element> {
        let element = self.find_by_text(text)?;
        self.tap(&element);
        Ok(element)
    }

    /// Taps the first visible `T` whose id contains `fragment`.
    pub fn tap_id<T: ViewType>(&self, fragment: &str, case_sensitive: bool) -> TestResult<Element> {
        let element = self.locator.locate::<T, _>(
            |element| contains_text(element.id(), fragment, case_sensitive),
            &format!("No {} with the ID {fragment} was found.", T::NAME),
            &Selection::First,
        )?;
        self.tap(&element);
        Ok(element)
    }

    /// Touches the first visible button whose text or id contains `label`.
    pub fn touch(&self, label: &str, case_sensitive: bool) -> TestResult<Element> {
        let element = self.locator.locate::<Button, _>(
            |element| {
                contains_text(element.text(), label, case_sensitive)
                    || contains_text(element.id(), label, case_sensitive)
            },
            &format!("No button containing the phrase {label} was found."),
            &Selection::First,
        )?;
        self.locator.await_navigation();
        self.dispatcher.touch(&element);
        Ok(element)
    }

    /// Taps `element` and returns a future that resolves once the UI has
    /// finished reacting to the tap, including follow-up work it scheduled.
    pub fn tap_and_await(&self, element: &Element) -> PendingInteraction {
        self.locator.await_navigation();
        self.dispatcher.tap_and_await(element)
    }

    pub fn swipe(&self, direction: Direction) {
        self.locator.await_navigation();
        self.dispatcher.swipe(direction);
    }

    /// Moves the first visible carousel one slide: `Left` advances,
    /// `Right` goes back.
    pub fn swipe_carousel(&self, direction: Direction) -> TestResult<Element> {
        let carousel = self.find::<Carousel>()?;
        self.dispatcher.step_carousel(&carousel, direction);
        Ok(carousel)
    }

    /// Types into the input with `id` and raises text-changed.
    pub fn type_in(&self, id: &str, content: &str) -> TestResult<Element> {
        let input = self.by_id::<TextInput>(id)?;
        self.dispatcher
            .type_text(&input, content, TextReaction::Changed);
        Ok(input)
    }

    /// Types into the input with `id` and raises text-submitted.
    pub fn submit_text(&self, id: &str, content: &str) -> TestResult<Element> {
        let input = self.by_id::<TextInput>(id)?;
        self.dispatcher
            .type_text(&input, content, TextReaction::Submitted);
        Ok(input)
    }

    // Waiting

    pub fn wait_for<T: ViewType>(
        &self,
        predicate: impl Fn(&Element) -> bool,
        timeout: impl Into<Timeout>,
    ) -> TestResult<()> {
        self.waiter.wait_for::<T, _>(predicate, timeout.into())
    }

    pub fn wait_until_visible<T: ViewType>(
        &self,
        predicate: impl Fn(&Element) -> bool,
    ) -> TestResult<()> {
        self.waiter.wait_for::<T, _>(predicate, Timeout::Never)
    }

    /// Waits for a toast whose message contains `text`.
    pub fn wait_for_popup(&self, text: &str) -> TestResult<()> {
        self.waiter.wait_for_message::<Toast>(text)
    }

    pub fn wait_for_alert(&self, text: &str) -> TestResult<()> {
        self.waiter.wait_for_message::<Alert>(text)
    }

    // Navigation and control flow

    pub fn go_to(&self, page: &str) -> TestResult<()> {
        self.locator.await_navigation();
        self.tree.navigate(page)?;
        Ok(())
    }

    pub fn assert(&self, condition: &str, holds: bool) -> TestResult<()> {
        if holds {
            Ok(())
        } else {
            Err(TestError::AssertionFailed(condition.to_string()))
        }
    }

    /// Stops the run here on purpose.
    pub fn break_here(&self) -> TestResult<()> {
        Err(TestError::ExplicitBreak)
    }

    pub fn delay(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_text_respects_case_flag() {
        assert!(contains_text("Sign In", "sign in", false));
        assert!(!contains_text("Sign In", "sign in", true));
        assert!(contains_text("Sign In", "In", true));
    }
}
