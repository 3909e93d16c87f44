//! Polling UI test engine.
//!
//! Test cases implement [`UiTest`] and are registered in a [`TestRegistry`].
//! The [`Orchestrator`] discovers them, runs them one at a time on a
//! dedicated thread and stops at the first failure. Inside a test the
//! [`Robot`] locates elements by polling the visible view tree, raises
//! synthetic events on them, waits for conditions and outlines whatever it
//! found with a highlight overlay.

pub mod error;
pub mod interaction;
pub mod locator;
pub mod orchestrator;
pub mod overlay;
pub mod registry;
pub mod robot;
pub mod settings;
pub mod speed;
pub mod waiter;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{TestError, TestResult};
pub use interaction::{Dispatcher, TextReaction};
pub use locator::{Locator, Selection};
pub use orchestrator::{
    Orchestrator, RunHandle, RunResult, RunStatus, TestOutcome, TestStatus, COMPLETED_MESSAGE,
};
pub use overlay::{Overlay, VisualizationToken};
pub use registry::{DiscoveryResult, TestEntry, TestFactory, TestMeta, TestRegistry};
pub use robot::{Robot, UiTest};
pub use settings::EngineSettings;
pub use speed::apply_speed_override;
pub use waiter::{Timeout, Waiter};

pub mod prelude {
    pub use crate::{
        ui_tests, EngineSettings, Orchestrator, Robot, RunResult, TestError, TestMeta,
        TestRegistry, TestResult, Timeout, UiTest,
    };
    pub use tapwright_core::{
        Alert, AnyView, Button, Carousel, Direction, Element, TextControl, TextInput, TextView,
        Toast,
    };
}
