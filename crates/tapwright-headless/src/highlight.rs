use std::sync::{Arc, Mutex, MutexGuard};
use tapwright_core::{HighlightSurface, Rect};

/// Observable state of the highlight surfaces a [`crate::HeadlessUi`] created.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HighlightState {
    /// How many surfaces were requested.
    pub created: usize,
    pub bounds: Option<Rect>,
    pub visible: bool,
    /// How many times the surface was raised above the tree.
    pub raised: usize,
}

#[derive(Clone, Default)]
pub(crate) struct SharedHighlight(Arc<Mutex<HighlightState>>);

impl SharedHighlight {
    pub(crate) fn lock(&self) -> MutexGuard<'_, HighlightState> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn create(&self) -> HeadlessHighlight {
        self.lock().created += 1;
        HeadlessHighlight {
            shared: self.clone(),
        }
    }
}

pub struct HeadlessHighlight {
    shared: SharedHighlight,
}

impl HighlightSurface for HeadlessHighlight {
    fn place(&mut self, bounds: Rect) {
        self.shared.lock().bounds = Some(bounds);
    }

    fn set_visible(&mut self, visible: bool) {
        self.shared.lock().visible = visible;
    }

    fn bring_to_front(&mut self) {
        self.shared.lock().raised += 1;
    }
}
