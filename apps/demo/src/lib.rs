//! Demo shop driven by its own Tapwright suite.

pub mod app;
pub mod scenarios;

use std::sync::Arc;
use tapwright_testing::{EngineSettings, Orchestrator, RunResult};

/// Launches the shop headless and runs the whole suite against it.
pub fn run_suite(settings: EngineSettings) -> std::io::Result<RunResult> {
    let ui = app::launch()?;
    let handle = Orchestrator::new(Arc::new(ui), scenarios::registry())
        .with_settings(settings)
        .run()?;
    Ok(handle.wait())
}
