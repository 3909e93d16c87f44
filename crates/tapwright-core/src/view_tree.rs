//! The view-tree collaborator the engine observes and drives.
//!
//! Implementations own a UI context that keeps rendering on its own; the
//! engine only reads snapshots, raises synthetic events and watches the
//! navigation flag from the test-run thread.

use crate::clock::TimeControl;
use crate::completion::CompletionSignal;
use crate::element::{ElementHandle, ElementNode};
use crate::event::{EventTarget, UiEvent};
use crate::geometry::Rect;
use thiserror::Error;

pub type NavigationListener = Box<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("page `{page}` is not registered")]
    PageNotFound { page: String },
    #[error("navigation to `{page}` failed: {reason}")]
    Failed { page: String, reason: String },
}

pub trait ViewTree: Send + Sync {
    /// Snapshot of the current tree, `None` before the first page exists.
    fn root(&self) -> Option<ElementNode>;

    fn is_navigating(&self) -> bool;

    /// Registers a callback invoked every time a navigation begins.
    fn on_navigation_started(&self, listener: NavigationListener);

    /// Starts navigating to `page`. Returns once the request is accepted;
    /// completion is observed through [`ViewTree::is_navigating`].
    fn navigate(&self, page: &str) -> Result<(), NavigationError>;

    /// Raises `event` on `target`. The tree keeps `completion` (or clones of
    /// it) alive until every handler reacting to the event has finished.
    fn raise(&self, target: EventTarget, event: UiEvent, completion: CompletionSignal);

    /// Replaces the text of an input without raising any event.
    fn set_text(&self, target: ElementHandle, text: &str);

    /// Runs `task` on a later scheduling turn than the caller's.
    fn post(&self, task: Box<dyn FnOnce() + Send>) {
        std::thread::spawn(task);
    }

    /// Creates the surface used to outline located elements. Called once.
    fn create_highlight(&self) -> Box<dyn HighlightSurface>;

    /// Logical clock and animation timing of the host.
    fn time(&self) -> &dyn TimeControl;
}

/// A floating outline drawn above the rest of the tree.
pub trait HighlightSurface: Send {
    fn place(&mut self, bounds: Rect);

    fn set_visible(&mut self, visible: bool);

    fn bring_to_front(&mut self);
}
