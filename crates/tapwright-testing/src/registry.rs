//! Test discovery and ordering.
//!
//! Test cases are registered up front, in the order the application
//! declares them. [`TestRegistry::discover`] then decides what runs:
//!
//! 1. If any test is marked under development, only those run.
//! 2. Otherwise, if any test has an order, ordered tests run first by
//!    ascending order (ties keep registration order), then the rest.
//! 3. Otherwise everything runs in registration order.

use crate::robot::UiTest;
use indexmap::IndexMap;
use std::sync::Arc;

pub type TestFactory = Arc<dyn Fn() -> Box<dyn UiTest> + Send + Sync>;

/// Metadata attached to a test case at registration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TestMeta {
    pub order: Option<i32>,
    pub under_development: bool,
}

impl TestMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    /// Runs this test alone (together with other tests marked the same way).
    pub fn under_development(mut self) -> Self {
        self.under_development = true;
        self
    }
}

#[derive(Clone)]
pub struct TestEntry {
    name: String,
    meta: TestMeta,
    factory: TestFactory,
}

impl TestEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn meta(&self) -> TestMeta {
        self.meta
    }

    /// A fresh instance of the test case.
    pub fn instantiate(&self) -> Box<dyn UiTest> {
        (self.factory)()
    }
}

impl std::fmt::Debug for TestEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestEntry")
            .field("name", &self.name)
            .field("meta", &self.meta)
            .finish()
    }
}

/// Test cases selected for a run, in execution order.
#[derive(Clone, Debug, Default)]
pub struct DiscoveryResult {
    entries: Vec<TestEntry>,
}

impl DiscoveryResult {
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(TestEntry::name).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TestEntry> {
        self.entries.iter()
    }
}

/// Type name with every path shortened to its last segment, generic
/// arguments included: `app::Flow<app::Login>` becomes `Flow<Login>`.
fn short_type_name<T: ?Sized>() -> String {
    fn last_segment(path: &str) -> &str {
        path.rsplit("::").next().unwrap_or(path)
    }

    let full = std::any::type_name::<T>();
    let mut short = String::with_capacity(full.len());
    let mut start = 0;
    for (index, ch) in full.char_indices() {
        if matches!(ch, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | '&' | ';') {
            short.push_str(last_segment(&full[start..index]));
            short.push(ch);
            start = index + ch.len_utf8();
        }
    }
    short.push_str(last_segment(&full[start..]));
    short
}

#[derive(Clone, Default)]
pub struct TestRegistry {
    entries: IndexMap<String, TestEntry>,
}

impl TestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T>(&mut self) -> &mut Self
    where
        T: UiTest + Default + 'static,
    {
        self.register_with::<T>(TestMeta::new())
    }

    pub fn register_with<T>(&mut self, meta: TestMeta) -> &mut Self
    where
        T: UiTest + Default + 'static,
    {
        self.register_factory(
            short_type_name::<T>(),
            meta,
            Arc::new(|| Box::new(T::default()) as Box<dyn UiTest>),
        )
    }

    /// Registers a test built by `factory` under `name`. Registering a name
    /// twice replaces the earlier entry but keeps its position.
    pub fn register_factory(
        &mut self,
        name: impl Into<String>,
        meta: TestMeta,
        factory: TestFactory,
    ) -> &mut Self {
        let name = name.into();
        let entry = TestEntry {
            name: name.clone(),
            meta,
            factory,
        };
        if self.entries.insert(name.clone(), entry).is_some() {
            log::warn!("test `{name}` registered twice; keeping the latest");
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn discover(&self) -> DiscoveryResult {
        let all = self.entries.values();

        if all.clone().any(|entry| entry.meta.under_development) {
            return DiscoveryResult {
                entries: all.filter(|entry| entry.meta.under_development).cloned().collect(),
            };
        }

        let (mut ordered, unordered): (Vec<&TestEntry>, Vec<&TestEntry>) =
            all.partition(|entry| entry.meta.order.is_some());
        // Stable sort keeps registration order for equal priorities.
        ordered.sort_by_key(|entry| entry.meta.order);

        DiscoveryResult {
            entries: ordered.into_iter().chain(unordered).cloned().collect(),
        }
    }
}

/// Builds a [`TestRegistry`] from test case types, with optional metadata.
///
/// ```
/// use tapwright_testing::{ui_tests, Robot, TestResult, UiTest};
///
/// #[derive(Default)]
/// struct Login;
/// #[derive(Default)]
/// struct Checkout;
///
/// impl UiTest for Login {
///     fn run(&mut self, _robot: &mut Robot) -> TestResult<()> { Ok(()) }
/// }
/// impl UiTest for Checkout {
///     fn run(&mut self, _robot: &mut Robot) -> TestResult<()> { Ok(()) }
/// }
///
/// let registry = ui_tests![Checkout, Login => order(1)];
/// assert_eq!(registry.discover().names(), vec!["Login", "Checkout"]);
/// ```
#[macro_export]
macro_rules! ui_tests {
    ($($test:ty $(=> $($meta:ident $(($arg:expr))?).+)?),* $(,)?) => {{
        let mut registry = $crate::TestRegistry::new();
        $(
            registry.register_with::<$test>(
                $crate::TestMeta::new() $($(.$meta($($arg)?))+)?
            );
        )*
        registry
    }};
}
