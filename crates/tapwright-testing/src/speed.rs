use crate::settings::EngineSettings;
use tapwright_core::TimeControl;

/// Pins the host clock to the testing time and collapses every animation to
/// a single (optionally shortened) frame.
pub fn apply_speed_override(time: &dyn TimeControl, settings: &EngineSettings) {
    time.redefine_now(settings.testing_time);
    let durations = time.animation_durations().collapsed(settings.fast_frame);
    log::debug!(
        "speed override: animations collapsed to {:?} per frame",
        durations.one_frame
    );
    time.set_animation_durations(durations);
}
