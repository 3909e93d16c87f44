//! Headless host for Tapwright.
//!
//! [`HeadlessUi`] keeps an in-memory element tree and runs every mutation
//! on its own UI thread, the way a windowed runtime runs its event loop.
//! Tests and demos build pages with [`NodeSpec`], attach event handlers and
//! hand the tree to the engine as a [`ViewTree`].

mod highlight;
mod node;

pub use highlight::{HeadlessHighlight, HighlightState};
pub use node::NodeSpec;

use highlight::SharedHighlight;
use node::NodeStore;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::thread;
use std::time::Duration;
use tapwright_core::{
    CompletionSignal, ElementHandle, ElementKind, ElementNode, EventTarget, HighlightSurface,
    ManualTime, NavigationError, NavigationListener, TimeControl, UiEvent, ViewTree,
};

/// Reaction to a raised event. Runs on the UI thread; clone the signal into
/// any follow-up work that should delay completion.
pub type Handler = Arc<dyn Fn(&HeadlessUi, &UiEvent, CompletionSignal) + Send + Sync>;

/// Builds a page under the (already cleared) root.
pub type PageBuilder = Arc<dyn Fn(&HeadlessUi, ElementHandle) + Send + Sync>;

type UiTask = Box<dyn FnOnce(&HeadlessUi) + Send>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Window-like settings for a headless host.
#[derive(Clone, Debug)]
pub struct HeadlessSettings {
    pub width: f32,
    pub height: f32,
    /// Simulated page transition time.
    pub navigation_delay: Duration,
}

impl Default for HeadlessSettings {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            navigation_delay: Duration::from_millis(30),
        }
    }
}

impl HeadlessSettings {
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_navigation_delay(mut self, delay: Duration) -> Self {
        self.navigation_delay = delay;
        self
    }
}

struct Inner {
    nodes: Mutex<NodeStore>,
    handlers: Mutex<HashMap<(EventTarget, &'static str), Handler>>,
    pages: Mutex<HashMap<String, PageBuilder>>,
    listeners: Mutex<Vec<Arc<dyn Fn() + Send + Sync>>>,
    /// Transitions requested but not yet built.
    pending_navigations: AtomicUsize,
    current_page: Mutex<Option<String>>,
    highlight: SharedHighlight,
    time: ManualTime,
    tasks: Mutex<Sender<UiTask>>,
    navigation_delay: Duration,
}

/// In-memory view tree with a dedicated UI thread.
#[derive(Clone)]
pub struct HeadlessUi {
    inner: Arc<Inner>,
}

impl HeadlessUi {
    /// Spawns the UI thread. It exits once the last handle is dropped.
    pub fn launch(settings: HeadlessSettings) -> std::io::Result<Self> {
        let (sender, receiver) = mpsc::channel::<UiTask>();
        let inner = Arc::new(Inner {
            nodes: Mutex::new(NodeStore::new(settings.width, settings.height)),
            handlers: Mutex::new(HashMap::new()),
            pages: Mutex::new(HashMap::new()),
            listeners: Mutex::new(Vec::new()),
            pending_navigations: AtomicUsize::new(0),
            current_page: Mutex::new(None),
            highlight: SharedHighlight::default(),
            time: ManualTime::new(),
            tasks: Mutex::new(sender),
            navigation_delay: settings.navigation_delay,
        });

        let weak: Weak<Inner> = Arc::downgrade(&inner);
        thread::Builder::new()
            .name("tapwright-headless-ui".into())
            .spawn(move || {
                while let Ok(task) = receiver.recv() {
                    let Some(inner) = weak.upgrade() else {
                        break;
                    };
                    task(&HeadlessUi { inner });
                }
                log::debug!("headless UI thread stopped");
            })?;

        Ok(Self { inner })
    }

    /// Queues `task` on the UI thread.
    pub fn run_on_ui(&self, task: impl FnOnce(&HeadlessUi) + Send + 'static) {
        if lock(&self.inner.tasks).send(Box::new(task)).is_err() {
            log::warn!("headless UI thread is gone; dropping task");
        }
    }

    pub fn root_handle(&self) -> ElementHandle {
        lock(&self.inner.nodes).root()
    }

    pub fn add(&self, parent: ElementHandle, spec: NodeSpec) -> ElementHandle {
        lock(&self.inner.nodes).add(parent, spec)
    }

    pub fn remove(&self, handle: ElementHandle) {
        lock(&self.inner.nodes).remove(handle);
        lock(&self.inner.handlers).retain(|(target, _), _| {
            *target != EventTarget::Element(handle)
        });
    }

    pub fn contains(&self, handle: ElementHandle) -> bool {
        lock(&self.inner.nodes).contains(handle)
    }

    pub fn set_visible(&self, handle: ElementHandle, visible: bool) {
        lock(&self.inner.nodes).set_visible(handle, visible);
    }

    pub fn text_of(&self, handle: ElementHandle) -> Option<String> {
        lock(&self.inner.nodes).text(handle)
    }

    pub fn find_by_id(&self, id: &str) -> Option<ElementHandle> {
        lock(&self.inner.nodes).find_by_id(id)
    }

    /// Attaches `handler` for events named `event` (see [`UiEvent::name`]).
    pub fn on(
        &self,
        target: EventTarget,
        event: &'static str,
        handler: impl Fn(&HeadlessUi, &UiEvent, CompletionSignal) + Send + Sync + 'static,
    ) {
        lock(&self.inner.handlers).insert((target, event), Arc::new(handler));
    }

    pub fn on_tap(
        &self,
        handle: ElementHandle,
        handler: impl Fn(&HeadlessUi, &UiEvent, CompletionSignal) + Send + Sync + 'static,
    ) {
        self.on(EventTarget::Element(handle), "tapped", handler);
    }

    pub fn register_page(
        &self,
        name: impl Into<String>,
        builder: impl Fn(&HeadlessUi, ElementHandle) + Send + Sync + 'static,
    ) {
        lock(&self.inner.pages).insert(name.into(), Arc::new(builder));
    }

    pub fn current_page(&self) -> Option<String> {
        lock(&self.inner.current_page).clone()
    }

    /// Shows a transient message that removes itself after `duration`.
    pub fn show_toast(&self, text: impl Into<String>, duration: Duration) {
        self.show_popup(ElementKind::Toast, text.into(), Some(duration));
    }

    /// Shows an alert that stays until removed.
    pub fn show_alert(&self, text: impl Into<String>) {
        self.show_popup(ElementKind::Alert, text.into(), None);
    }

    fn show_popup(&self, kind: ElementKind, text: String, duration: Option<Duration>) {
        self.run_on_ui(move |ui| {
            let root = ui.root_handle();
            let popup = ui.add(
                root,
                NodeSpec::new(kind)
                    .with_text(text)
                    .at(200.0, 500.0)
                    .sized(400.0, 60.0),
            );
            if let Some(duration) = duration {
                let ui = ui.clone();
                thread::spawn(move || {
                    thread::sleep(duration);
                    ui.run_on_ui(move |ui| ui.remove(popup));
                });
            }
        });
    }

    pub fn highlight_state(&self) -> HighlightState {
        *self.inner.highlight.lock()
    }

    fn build_page(&self, page: &str, builder: PageBuilder) {
        let root = {
            let mut nodes = lock(&self.inner.nodes);
            nodes.clear();
            nodes.root()
        };
        lock(&self.inner.handlers).retain(|(target, _), _| *target == EventTarget::Root);
        builder(self, root);
        *lock(&self.inner.current_page) = Some(page.to_string());
        self.inner.pending_navigations.fetch_sub(1, Ordering::SeqCst);
        log::debug!("navigated to `{page}`");
    }
}

impl ViewTree for HeadlessUi {
    fn root(&self) -> Option<ElementNode> {
        self.current_page()?;
        Some(lock(&self.inner.nodes).snapshot())
    }

    fn is_navigating(&self) -> bool {
        self.inner.pending_navigations.load(Ordering::SeqCst) > 0
    }

    fn on_navigation_started(&self, listener: NavigationListener) {
        lock(&self.inner.listeners).push(Arc::from(listener));
    }

    fn navigate(&self, page: &str) -> Result<(), NavigationError> {
        let builder = lock(&self.inner.pages).get(page).cloned().ok_or_else(|| {
            NavigationError::PageNotFound {
                page: page.to_string(),
            }
        })?;

        self.inner.pending_navigations.fetch_add(1, Ordering::SeqCst);
        let listeners: Vec<_> = lock(&self.inner.listeners).clone();
        for listener in listeners {
            listener();
        }

        let ui = self.clone();
        let name = page.to_string();
        let delay = self.inner.navigation_delay;
        thread::Builder::new()
            .name("tapwright-headless-transition".into())
            .spawn(move || {
                thread::sleep(delay);
                ui.run_on_ui(move |ui| ui.build_page(&name, builder));
            })
            .map_err(|err| {
                self.inner.pending_navigations.fetch_sub(1, Ordering::SeqCst);
                NavigationError::Failed {
                    page: page.to_string(),
                    reason: err.to_string(),
                }
            })?;
        Ok(())
    }

    fn raise(&self, target: EventTarget, event: UiEvent, completion: CompletionSignal) {
        self.run_on_ui(move |ui| {
            let handler = lock(&ui.inner.handlers).get(&(target, event.name())).cloned();
            match handler {
                Some(handler) => handler(ui, &event, completion),
                None => log::trace!("no `{}` handler on {target:?}", event.name()),
            }
        });
    }

    fn set_text(&self, target: ElementHandle, text: &str) {
        lock(&self.inner.nodes).set_text(target, text);
    }

    fn post(&self, task: Box<dyn FnOnce() + Send>) {
        self.run_on_ui(move |_| task());
    }

    fn create_highlight(&self) -> Box<dyn HighlightSurface> {
        Box::new(self.inner.highlight.create())
    }

    fn time(&self) -> &dyn TimeControl {
        &self.inner.time
    }
}
