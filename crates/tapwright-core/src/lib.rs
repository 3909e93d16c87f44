//! Collaborator interfaces for the Tapwright UI test engine.
//!
//! The engine never renders anything itself. It reads snapshots of a live
//! view tree, raises synthetic events on it, watches its navigation state and
//! pins its clock. Everything it needs from the host is declared here.

pub mod clock;
pub mod completion;
pub mod element;
pub mod event;
pub mod geometry;
pub mod platform;
pub mod view_tree;

pub use clock::{AnimationDurations, ManualTime, TimeControl, ONE_FRAME};
pub use completion::{completion_pair, CompletionSignal, PendingInteraction};
pub use element::{
    Alert, AnyView, Button, Carousel, Element, ElementHandle, ElementKind, ElementNode,
    TextControl, TextInput, TextView, Toast, ViewType,
};
pub use event::{Direction, EventTarget, UiEvent};
pub use geometry::{Point, Rect, Size};
pub use platform::{DeferredExecutor, LogNotifier, Notifier, ThreadExecutor};
pub use view_tree::{HighlightSurface, NavigationError, NavigationListener, ViewTree};
