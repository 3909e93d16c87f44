//! Highlight overlay that outlines the most recently located element.
//!
//! There is a single surface per engine. Each `show` bumps a generation
//! counter and schedules an auto-hide carrying that generation; the hide is
//! skipped if another `show` happened in between. Navigation hides the
//! surface immediately.

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;
use tapwright_core::{DeferredExecutor, Element, HighlightSurface, Rect, ViewTree};

/// Identity stamped on the overlay by one `show` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualizationToken(u64);

#[derive(Default)]
struct OverlayState {
    surface: Option<Box<dyn HighlightSurface>>,
    generation: u64,
    visible: bool,
    bounds: Option<Rect>,
}

struct OverlayInner {
    tree: Arc<dyn ViewTree>,
    executor: Arc<dyn DeferredExecutor>,
    hide_after: Duration,
    margin: f32,
    state: Mutex<OverlayState>,
}

impl OverlayInner {
    fn lock(&self) -> MutexGuard<'_, OverlayState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn hide(state: &mut OverlayState) {
        if let Some(surface) = state.surface.as_mut() {
            surface.set_visible(false);
        }
        state.visible = false;
    }

    fn hide_if_current(&self, token: VisualizationToken) {
        let mut state = self.lock();
        if state.generation != token.0 {
            log::debug!(
                "highlight timer {} is stale (current {}), keeping overlay",
                token.0,
                state.generation
            );
            return;
        }
        Self::hide(&mut state);
    }
}

#[derive(Clone)]
pub struct Overlay {
    inner: Arc<OverlayInner>,
}

impl Overlay {
    pub fn new(
        tree: Arc<dyn ViewTree>,
        executor: Arc<dyn DeferredExecutor>,
        hide_after: Duration,
        margin: f32,
    ) -> Self {
        Self {
            inner: Arc::new(OverlayInner {
                tree,
                executor,
                hide_after,
                margin,
                state: Mutex::new(OverlayState::default()),
            }),
        }
    }

    /// Outlines `element` and schedules the auto-hide for this showing.
    pub fn show(&self, element: &Element) -> VisualizationToken {
        let bounds = element.bounds.inflate(self.inner.margin);
        let token = {
            let mut state = self.inner.lock();
            if state.surface.is_none() {
                state.surface = Some(self.inner.tree.create_highlight());
                let weak: Weak<OverlayInner> = Arc::downgrade(&self.inner);
                self.inner.tree.on_navigation_started(Box::new(move || {
                    if let Some(inner) = weak.upgrade() {
                        OverlayInner::hide(&mut inner.lock());
                    }
                }));
            }

            state.generation += 1;
            let token = VisualizationToken(state.generation);
            if let Some(surface) = state.surface.as_mut() {
                surface.place(bounds);
                surface.set_visible(true);
                surface.bring_to_front();
            }
            state.visible = true;
            state.bounds = Some(bounds);
            token
        };

        let weak = Arc::downgrade(&self.inner);
        self.inner.executor.run_after(
            self.inner.hide_after,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.hide_if_current(token);
                }
            }),
        );
        token
    }

    pub fn hide(&self) {
        OverlayInner::hide(&mut self.inner.lock());
    }

    pub fn is_visible(&self) -> bool {
        self.inner.lock().visible
    }

    /// Bounds of the last `show`, margin included.
    pub fn bounds(&self) -> Option<Rect> {
        self.inner.lock().bounds
    }

    pub fn current_token(&self) -> Option<VisualizationToken> {
        let generation = self.inner.lock().generation;
        (generation > 0).then_some(VisualizationToken(generation))
    }
}
