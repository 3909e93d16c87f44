//! Synthetic UI events raised by the interaction dispatcher.

use crate::element::ElementHandle;
use crate::geometry::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Where a synthetic event is delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Root,
    Element(ElementHandle),
}

#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent {
    /// Pointer contact at a point relative to the target.
    Touched {
        point: Point,
        touches: u32,
    },
    Tapped,
    Swiped {
        direction: Direction,
        velocity: f32,
    },
    /// The user edited the text of an input.
    TextChanged,
    /// The user confirmed the text of an input.
    TextSubmitted,
    /// Move a carousel one slide without animation.
    CarouselStep {
        direction: Direction,
    },
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::Touched { .. } => "touched",
            UiEvent::Tapped => "tapped",
            UiEvent::Swiped { .. } => "swiped",
            UiEvent::TextChanged => "text-changed",
            UiEvent::TextSubmitted => "text-submitted",
            UiEvent::CarouselStep { .. } => "carousel-step",
        }
    }
}
