use std::time::Duration;
use tapwright_core::NavigationError;
use thiserror::Error;

pub type TestResult<T> = Result<T, TestError>;

/// Every way a UI test can fail. All of them end the current test.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TestError {
    #[error("Not found: {description}{}", ambiguity_note(.last_match_count))]
    NotFound {
        description: String,
        attempts: u32,
        /// Matches seen on the final attempt; above one means the search was
        /// still ambiguous when the budget ran out.
        last_match_count: usize,
    },

    #[error("Timed out after {timeout:?} waiting for {target}")]
    Timeout {
        target: &'static str,
        timeout: Duration,
    },

    #[error("No {kind} message containing the phrase '{text}' was found on the screen.")]
    PopupNotFound { kind: &'static str, text: String },

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Breakpoint...")]
    ExplicitBreak,

    #[error("Page not found: {page}")]
    PageNotFound { page: String },

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Test panicked: {0}")]
    Panicked(String),
}

fn ambiguity_note(matches: &usize) -> String {
    if *matches > 1 {
        format!(" (ambiguous: {matches} matches)")
    } else {
        String::new()
    }
}

impl From<NavigationError> for TestError {
    fn from(err: NavigationError) -> Self {
        match err {
            NavigationError::PageNotFound { page } => TestError::PageNotFound { page },
            other => TestError::Navigation(other.to_string()),
        }
    }
}
