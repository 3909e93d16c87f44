//! Engine configuration.

use std::time::Duration;
use web_time::{SystemTime, UNIX_EPOCH};

/// 2022-01-01 10:00:00 UTC, the logical "now" of every test run.
pub const DEFAULT_TESTING_TIME_SECS: u64 = 1_641_031_200;

/// Tunables for polling, settling and the highlight overlay.
///
/// `Default` reproduces the reference behaviour; the `with_*` builders adjust
/// individual values.
#[derive(Clone, Debug)]
pub struct EngineSettings {
    /// Attempts the locator makes before giving up, one frame apart.
    pub locate_attempts: u32,
    /// Poll interval while a navigation is in progress.
    pub navigation_poll: Duration,
    /// Pause after every dispatched interaction.
    pub settle_delay: Duration,
    /// Pause after a successful test before the next one starts.
    pub between_tests: Duration,
    /// How long a highlight stays up after its last `show`.
    pub highlight_hide_after: Duration,
    /// Extra space drawn around the highlighted element.
    pub highlight_margin: f32,
    pub popup_attempts: u32,
    pub popup_poll: Duration,
    /// Logical "now" while tests run.
    pub testing_time: SystemTime,
    /// Frame duration used while the speed override is active. `None` keeps
    /// the host's own frame duration.
    pub fast_frame: Option<Duration>,
    /// Pin the clock and collapse animations before the run.
    pub speed_override: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            locate_attempts: 300,
            navigation_poll: Duration::from_millis(50),
            settle_delay: Duration::from_millis(100),
            between_tests: Duration::from_secs(1),
            highlight_hide_after: Duration::from_secs(3),
            highlight_margin: 10.0,
            popup_attempts: 20,
            popup_poll: Duration::from_millis(50),
            testing_time: UNIX_EPOCH + Duration::from_secs(DEFAULT_TESTING_TIME_SECS),
            fast_frame: Some(Duration::from_millis(1)),
            speed_override: true,
        }
    }
}

impl EngineSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Short delays everywhere, for headless runs that have nothing to watch.
    pub fn headless() -> Self {
        Self {
            navigation_poll: Duration::from_millis(5),
            settle_delay: Duration::from_millis(5),
            between_tests: Duration::from_millis(10),
            popup_poll: Duration::from_millis(10),
            ..Self::default()
        }
    }

    pub fn with_locate_attempts(mut self, attempts: u32) -> Self {
        self.locate_attempts = attempts;
        self
    }

    pub fn with_navigation_poll(mut self, poll: Duration) -> Self {
        self.navigation_poll = poll;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_between_tests(mut self, delay: Duration) -> Self {
        self.between_tests = delay;
        self
    }

    pub fn with_highlight(mut self, hide_after: Duration, margin: f32) -> Self {
        self.highlight_hide_after = hide_after;
        self.highlight_margin = margin;
        self
    }

    pub fn with_popup_polling(mut self, attempts: u32, poll: Duration) -> Self {
        self.popup_attempts = attempts;
        self.popup_poll = poll;
        self
    }

    pub fn with_testing_time(mut self, now: SystemTime) -> Self {
        self.testing_time = now;
        self
    }

    pub fn with_fast_frame(mut self, frame: Option<Duration>) -> Self {
        self.fast_frame = frame;
        self
    }

    pub fn with_speed_override(mut self, enabled: bool) -> Self {
        self.speed_override = enabled;
        self
    }
}
