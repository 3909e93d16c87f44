//! Synthetic event dispatch on located elements.

use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tapwright_core::{
    completion_pair, Direction, Element, EventTarget, PendingInteraction, Point, UiEvent,
    ViewTree,
};

/// Swipe velocity reported with synthetic swipes.
const SWIPE_VELOCITY: f32 = 20.0;

/// Reaction raised after typing into an input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextReaction {
    Changed,
    Submitted,
}

impl TextReaction {
    fn event(self) -> UiEvent {
        match self {
            TextReaction::Changed => UiEvent::TextChanged,
            TextReaction::Submitted => UiEvent::TextSubmitted,
        }
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    tree: Arc<dyn ViewTree>,
    settle_delay: Duration,
}

impl Dispatcher {
    pub fn new(tree: Arc<dyn ViewTree>, settle_delay: Duration) -> Self {
        Self { tree, settle_delay }
    }

    /// Raises `event` and hands back a future for its handler chain.
    pub fn raise(&self, target: EventTarget, event: UiEvent) -> PendingInteraction {
        log::debug!("raising {} on {:?}", event.name(), target);
        let (signal, pending) = completion_pair();
        self.tree.raise(target, event, signal);
        pending
    }

    pub fn settle(&self) {
        thread::sleep(self.settle_delay);
    }

    pub fn touch(&self, element: &Element) {
        self.raise(EventTarget::Element(element.handle), single_touch());
        self.settle();
    }

    /// Touch followed by tap, like a finger would.
    pub fn tap(&self, element: &Element) {
        let target = EventTarget::Element(element.handle);
        self.raise(target, single_touch());
        self.raise(target, UiEvent::Tapped);
        self.settle();
    }

    /// Taps and resolves once every handler reacting to the tap is done.
    pub fn tap_and_await(&self, element: &Element) -> PendingInteraction {
        let target = EventTarget::Element(element.handle);
        self.raise(target, single_touch());
        self.raise(target, UiEvent::Tapped)
    }

    pub fn swipe(&self, direction: Direction) {
        self.raise(
            EventTarget::Root,
            UiEvent::Swiped {
                direction,
                velocity: SWIPE_VELOCITY,
            },
        );
        self.settle();
    }

    pub fn step_carousel(&self, carousel: &Element, direction: Direction) {
        self.raise(
            EventTarget::Element(carousel.handle),
            UiEvent::CarouselStep { direction },
        );
        self.settle();
    }

    /// Replaces the input's text now and raises the reaction on a later
    /// scheduling turn, so the input already shows `content` when handlers
    /// run.
    pub fn type_text(&self, input: &Element, content: &str, reaction: TextReaction) {
        self.tree.set_text(input.handle, content);

        let tree = Arc::clone(&self.tree);
        let target = EventTarget::Element(input.handle);
        self.tree.post(Box::new(move || {
            let (signal, _pending) = completion_pair();
            tree.raise(target, reaction.event(), signal);
        }));
        self.settle();
    }
}

fn single_touch() -> UiEvent {
    UiEvent::Touched {
        point: Point::ZERO,
        touches: 1,
    }
}
