//! Logical clock and animation timing collaborator.
//!
//! Test runs pin "now" to a fixed instant and collapse animation durations
//! so that waits resolve quickly and the same way on every run.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use web_time::SystemTime;

/// One frame at 60 fps.
pub const ONE_FRAME: Duration = Duration::from_micros(16_667);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationDurations {
    pub default: Duration,
    pub list_item_slide: Duration,
    pub switch: Duration,
    /// Frame duration; polling loops wait this long between attempts.
    pub one_frame: Duration,
}

impl Default for AnimationDurations {
    fn default() -> Self {
        Self {
            default: Duration::from_millis(300),
            list_item_slide: Duration::from_millis(200),
            switch: Duration::from_millis(150),
            one_frame: ONE_FRAME,
        }
    }
}

impl AnimationDurations {
    /// Every animation takes a single frame, optionally shortening the frame.
    pub fn collapsed(&self, frame: Option<Duration>) -> Self {
        let one_frame = frame.unwrap_or(self.one_frame);
        Self {
            default: one_frame,
            list_item_slide: one_frame,
            switch: one_frame,
            one_frame,
        }
    }
}

pub trait TimeControl: Send + Sync {
    fn now(&self) -> SystemTime;

    /// Pins the logical "now" to `instant`.
    fn redefine_now(&self, instant: SystemTime);

    fn animation_durations(&self) -> AnimationDurations;

    fn set_animation_durations(&self, durations: AnimationDurations);
}

#[derive(Default)]
struct ManualTimeState {
    fixed_now: Option<SystemTime>,
    durations: AnimationDurations,
}

/// In-memory [`TimeControl`] that follows the system clock until pinned.
#[derive(Default)]
pub struct ManualTime {
    state: Mutex<ManualTimeState>,
}

impl ManualTime {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ManualTimeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TimeControl for ManualTime {
    fn now(&self) -> SystemTime {
        self.lock().fixed_now.unwrap_or_else(SystemTime::now)
    }

    fn redefine_now(&self, instant: SystemTime) {
        self.lock().fixed_now = Some(instant);
    }

    fn animation_durations(&self) -> AnimationDurations {
        self.lock().durations
    }

    fn set_animation_durations(&self, durations: AnimationDurations) {
        self.lock().durations = durations;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use web_time::UNIX_EPOCH;

    #[test]
    fn collapsed_durations_match_one_frame() {
        let collapsed = AnimationDurations::default().collapsed(None);
        assert_eq!(collapsed.default, ONE_FRAME);
        assert_eq!(collapsed.switch, ONE_FRAME);

        let fast = AnimationDurations::default().collapsed(Some(Duration::from_millis(1)));
        assert_eq!(fast.list_item_slide, Duration::from_millis(1));
        assert_eq!(fast.one_frame, Duration::from_millis(1));
    }

    #[test]
    fn redefined_now_stays_fixed() {
        let time = ManualTime::new();
        let pinned = UNIX_EPOCH + Duration::from_secs(1_641_031_200);
        time.redefine_now(pinned);
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(time.now(), pinned);
    }
}
