use std::process::ExitCode;
use tapwright_demo::run_suite;
use tapwright_testing::{EngineSettings, RunStatus};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let settings = if std::env::args().any(|arg| arg == "--headless") {
        EngineSettings::headless()
    } else {
        EngineSettings::default()
    };

    match run_suite(settings) {
        Ok(result) => match result.status {
            RunStatus::Completed => {
                log::info!("{} tests passed", result.outcomes.len());
                ExitCode::SUCCESS
            }
            RunStatus::Aborted { failed } => {
                log::error!("suite stopped at \"{failed}\"");
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            log::error!("could not start the suite: {err}");
            ExitCode::FAILURE
        }
    }
}
