//! Scriptable view tree and timer used by the unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tapwright_core::{
    CompletionSignal, DeferredExecutor, Element, ElementHandle, ElementKind, ElementNode,
    EventTarget, HighlightSurface, ManualTime, NavigationError, NavigationListener, Rect,
    TimeControl, UiEvent, ViewTree,
};

pub fn element_at(handle: u64, bounds: Rect) -> Element {
    Element {
        handle: ElementHandle(handle),
        kind: ElementKind::Container,
        id: None,
        text: None,
        bounds,
    }
}

pub fn text(handle: u64, kind: ElementKind, id: Option<&str>, text: &str) -> ElementNode {
    ElementNode::leaf(
        Element {
            handle: ElementHandle(handle),
            kind,
            id: id.map(str::to_string),
            text: Some(text.to_string()),
            bounds: Rect::new(0.0, 0.0, 50.0, 20.0),
        },
        true,
    )
}

pub fn screen(children: Vec<ElementNode>) -> ElementNode {
    ElementNode {
        element: element_at(0, Rect::new(0.0, 0.0, 800.0, 600.0)),
        visible: true,
        children,
    }
}

struct NoopHighlight;

impl HighlightSurface for NoopHighlight {
    fn place(&mut self, _bounds: Rect) {}

    fn set_visible(&mut self, _visible: bool) {}

    fn bring_to_front(&mut self) {}
}

/// Each `root()` call consumes the next scripted snapshot; the last one
/// sticks.
#[derive(Default)]
pub struct StubTree {
    script: Mutex<VecDeque<Option<ElementNode>>>,
    root_calls: AtomicUsize,
    navigating: AtomicBool,
    navigating_polls_left: AtomicUsize,
    listeners: Mutex<Vec<Arc<dyn Fn() + Send + Sync>>>,
    highlights: AtomicUsize,
    events: Mutex<Vec<(EventTarget, UiEvent)>>,
    texts: Mutex<Vec<(ElementHandle, String)>>,
    time: ManualTime,
}

impl StubTree {
    pub fn with_root(root: ElementNode) -> Self {
        let tree = Self::default();
        tree.script(vec![Some(root)]);
        tree
    }

    pub fn script(&self, snapshots: Vec<Option<ElementNode>>) {
        *self.script.lock().unwrap() = snapshots.into();
    }

    pub fn root_calls(&self) -> usize {
        self.root_calls.load(Ordering::SeqCst)
    }

    /// Reports navigating for the next `polls` checks.
    pub fn navigate_for(&self, polls: usize) {
        self.navigating_polls_left.store(polls, Ordering::SeqCst);
        self.navigating.store(polls > 0, Ordering::SeqCst);
    }

    pub fn start_navigation(&self) {
        let listeners: Vec<_> = self.listeners.lock().unwrap().clone();
        for listener in listeners {
            listener();
        }
    }

    pub fn highlights_created(&self) -> usize {
        self.highlights.load(Ordering::SeqCst)
    }

    pub fn navigation_listeners(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }

    pub fn events(&self) -> Vec<(EventTarget, UiEvent)> {
        self.events.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<(ElementHandle, String)> {
        self.texts.lock().unwrap().clone()
    }

    pub fn set_frame(&self, frame: Duration) {
        let durations = self.time.animation_durations();
        self.time.set_animation_durations(durations.collapsed(Some(frame)));
    }
}

impl ViewTree for StubTree {
    fn root(&self) -> Option<ElementNode> {
        self.root_calls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().flatten()
        } else {
            script.front().cloned().flatten()
        }
    }

    fn is_navigating(&self) -> bool {
        if !self.navigating.load(Ordering::SeqCst) {
            return false;
        }
        let left = self.navigating_polls_left.fetch_sub(1, Ordering::SeqCst);
        if left <= 1 {
            self.navigating.store(false, Ordering::SeqCst);
        }
        true
    }

    fn on_navigation_started(&self, listener: NavigationListener) {
        self.listeners.lock().unwrap().push(Arc::from(listener));
    }

    fn navigate(&self, page: &str) -> Result<(), NavigationError> {
        Err(NavigationError::PageNotFound {
            page: page.to_string(),
        })
    }

    fn raise(&self, target: EventTarget, event: UiEvent, _completion: CompletionSignal) {
        self.events.lock().unwrap().push((target, event));
    }

    fn set_text(&self, target: ElementHandle, text: &str) {
        self.texts.lock().unwrap().push((target, text.to_string()));
    }

    fn post(&self, task: Box<dyn FnOnce() + Send>) {
        task();
    }

    fn create_highlight(&self) -> Box<dyn HighlightSurface> {
        self.highlights.fetch_add(1, Ordering::SeqCst);
        Box::new(NoopHighlight)
    }

    fn time(&self) -> &dyn TimeControl {
        &self.time
    }
}

/// Queues deferred tasks until the test fires them, oldest first.
#[derive(Default)]
pub struct ManualExecutor {
    queue: Mutex<VecDeque<Box<dyn FnOnce() + Send>>>,
}

impl ManualExecutor {
    pub fn run_next(&self) -> bool {
        let task = self.queue.lock().unwrap().pop_front();
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.lock().unwrap().len()
    }
}

impl DeferredExecutor for ManualExecutor {
    fn run_after(&self, _delay: Duration, task: Box<dyn FnOnce() + Send>) {
        self.queue.lock().unwrap().push_back(task);
    }
}
