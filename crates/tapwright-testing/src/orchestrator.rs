//! Sequential test runner.
//!
//! Tests run one after another on a dedicated thread so that polling never
//! blocks the UI context. The first failure is reported and ends the run;
//! later tests are never instantiated.

use crate::error::TestError;
use crate::registry::TestRegistry;
use crate::robot::Robot;
use crate::settings::EngineSettings;
use crate::speed::apply_speed_override;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tapwright_core::{DeferredExecutor, LogNotifier, Notifier, ThreadExecutor, ViewTree};

pub const COMPLETED_MESSAGE: &str = "TESTS COMPLETED";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TestStatus {
    Succeeded,
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestOutcome {
    pub name: String,
    pub status: TestStatus,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunStatus {
    /// Every discovered test succeeded.
    Completed,
    /// The named test failed and the rest were skipped.
    Aborted { failed: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunResult {
    pub outcomes: Vec<TestOutcome>,
    pub status: RunStatus,
}

impl RunResult {
    pub fn is_completed(&self) -> bool {
        self.status == RunStatus::Completed
    }

    pub fn outcome(&self, name: &str) -> Option<&TestStatus> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.name == name)
            .map(|outcome| &outcome.status)
    }
}

/// A run in progress on its own thread.
pub struct RunHandle {
    thread: JoinHandle<RunResult>,
}

impl RunHandle {
    /// Blocks until the run ends.
    pub fn wait(self) -> RunResult {
        match self.thread.join() {
            Ok(result) => result,
            Err(payload) => panic::resume_unwind(payload),
        }
    }
}

pub struct Orchestrator {
    tree: Arc<dyn ViewTree>,
    registry: TestRegistry,
    settings: EngineSettings,
    notifier: Arc<dyn Notifier>,
    executor: Arc<dyn DeferredExecutor>,
}

impl Orchestrator {
    pub fn new(tree: Arc<dyn ViewTree>, registry: TestRegistry) -> Self {
        Self {
            tree,
            registry,
            settings: EngineSettings::default(),
            notifier: Arc::new(LogNotifier),
            executor: Arc::new(ThreadExecutor::new()),
        }
    }

    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Executor for the highlight auto-hide timers.
    pub fn with_executor(mut self, executor: Arc<dyn DeferredExecutor>) -> Self {
        self.executor = executor;
        self
    }

    /// Starts the run on a dedicated test-run thread.
    pub fn run(self) -> std::io::Result<RunHandle> {
        let thread = thread::Builder::new()
            .name("tapwright-test-run".into())
            .spawn(move || self.run_blocking())?;
        Ok(RunHandle { thread })
    }

    /// Runs every discovered test on the calling thread.
    pub fn run_blocking(self) -> RunResult {
        if self.settings.speed_override {
            apply_speed_override(self.tree.time(), &self.settings);
        }

        let tests = self.registry.discover();
        log::info!("running {} UI tests", tests.len());

        let mut robot = Robot::new(
            Arc::clone(&self.tree),
            &self.settings,
            Arc::clone(&self.executor),
        );
        let mut outcomes = Vec::with_capacity(tests.len());

        for entry in tests.iter() {
            let name = entry.name().to_string();
            log::info!("starting test \"{name}\"");

            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                let mut test = entry.instantiate();
                test.run(&mut robot)
            }))
            .unwrap_or_else(|payload| Err(TestError::Panicked(panic_message(payload))));

            match result {
                Ok(()) => {
                    outcomes.push(TestOutcome {
                        name: name.clone(),
                        status: TestStatus::Succeeded,
                    });
                    self.notifier
                        .success(&format!("Test \"{name}\" ran successfully"));
                    thread::sleep(self.settings.between_tests);
                }
                Err(err) => {
                    log::error!("test \"{name}\" failed: {err}");
                    outcomes.push(TestOutcome {
                        name: name.clone(),
                        status: TestStatus::Failed(err.to_string()),
                    });
                    // TODO: forward failures to a remote reporting sink once one exists.
                    self.notifier
                        .show_message(&format!("Test failed: \"{name}\"\n\n{err}"));
                    return RunResult {
                        outcomes,
                        status: RunStatus::Aborted { failed: name },
                    };
                }
            }
        }

        self.notifier.show_message(COMPLETED_MESSAGE);
        RunResult {
            outcomes,
            status: RunStatus::Completed,
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
