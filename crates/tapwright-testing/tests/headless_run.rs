//! Drives the engine against a live headless tree with its own UI thread.

mod common;

use common::{launch_app, robot, settings, SLIDES};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tapwright_core::{Button, Direction, Notifier, TextView};
use tapwright_testing::{
    Orchestrator, Robot, RunStatus, TestError, TestMeta, TestRegistry, TestResult, TestStatus,
    Timeout, UiTest, COMPLETED_MESSAGE,
};

#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    fn show_message(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

struct Scenario<F>(F);

impl<F> UiTest for Scenario<F>
where
    F: FnMut(&mut Robot) -> TestResult<()> + Send,
{
    fn run(&mut self, robot: &mut Robot) -> TestResult<()> {
        (self.0)(robot)
    }
}

fn counted<F>(
    registry: &mut TestRegistry,
    name: &str,
    created: &Arc<AtomicUsize>,
    scenario: F,
) where
    F: Fn(&mut Robot) -> TestResult<()> + Clone + Send + Sync + 'static,
{
    let created = Arc::clone(created);
    registry.register_factory(
        name,
        TestMeta::new(),
        Arc::new(move || {
            created.fetch_add(1, Ordering::SeqCst);
            Box::new(Scenario(scenario.clone())) as Box<dyn UiTest>
        }),
    );
}

#[test]
fn run_stops_at_first_failure() {
    let ui = launch_app();
    let notifier = Arc::new(RecordingNotifier::default());
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let third = Arc::new(AtomicUsize::new(0));

    let mut registry = TestRegistry::new();
    counted(&mut registry, "Greets", &first, |robot| {
        robot.expect("home", false).map(|_| ())
    });
    counted(&mut registry, "Counts", &second, |robot| {
        let buttons = robot.all_visible::<Button>();
        robot.assert("exactly one button", buttons.len() == 1)
    });
    counted(&mut registry, "Never", &third, |_| Ok(()));

    let result = Orchestrator::new(Arc::new(ui.clone()), registry)
        .with_settings(settings())
        .with_notifier(notifier.clone())
        .run()
        .expect("test-run thread starts")
        .wait();

    assert_eq!(
        result.status,
        RunStatus::Aborted {
            failed: "Counts".into()
        }
    );
    assert_eq!(result.outcome("Greets"), Some(&TestStatus::Succeeded));
    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 1);
    assert_eq!(third.load(Ordering::SeqCst), 0);
    assert_eq!(
        *notifier.messages.lock().unwrap(),
        vec![
            "Test \"Greets\" ran successfully".to_string(),
            "Test failed: \"Counts\"\n\nAssertion failed: exactly one button".to_string(),
        ]
    );
}

#[test]
fn successful_run_reports_completion() {
    let ui = launch_app();
    let notifier = Arc::new(RecordingNotifier::default());
    let created = Arc::new(AtomicUsize::new(0));
    let mut registry = TestRegistry::new();
    counted(&mut registry, "Opens", &created, |robot| {
        robot.tap_text("Open details")?;
        robot.find_by_text("Details").map(|_| ())
    });

    let result = Orchestrator::new(Arc::new(ui), registry)
        .with_settings(settings())
        .with_notifier(notifier.clone())
        .run_blocking();

    assert!(result.is_completed());
    assert_eq!(
        notifier.messages.lock().unwrap().last().map(String::as_str),
        Some(COMPLETED_MESSAGE)
    );
}

#[test]
fn tap_navigates_and_locate_waits_for_the_new_page() {
    let ui = launch_app();
    let robot = robot(&ui, &settings());

    robot.tap_text("Open details").expect("button exists");
    let title = robot.find_by_text("Details").expect("details page shows");

    assert_eq!(title.text(), "Details");
    assert_eq!(ui.current_page().as_deref(), Some("Details"));
}

#[test]
fn tap_and_await_resolves_after_nested_reaction() {
    let ui = launch_app();
    let robot = robot(&ui, &settings());
    robot.go_to("Details").expect("page exists");

    let save = robot.find_by_text("Save").expect("save button");
    let pending = robot.tap_and_await(&save);
    assert!(
        pending.wait_timeout(Duration::from_secs(5)),
        "tap never finished"
    );

    // No polling: the reaction must already be visible.
    let texts = robot.all_visible::<TextView>();
    assert!(texts.iter().any(|element| element.text() == "Saved"));
}

#[test]
fn typing_raises_change_and_submit_shows_toast() {
    let ui = launch_app();
    let robot = robot(&ui, &settings());

    robot.type_in("email", "ada").expect("input exists");
    robot.expect("Typed: ada", true).expect("echo updated");

    robot.submit_text("email", "grace").expect("input exists");
    robot
        .wait_for_popup("welcome, GRACE")
        .expect("toast shows up");
}

#[test]
fn missing_popup_reports_its_text() {
    let ui = launch_app();
    let robot = robot(&ui, &settings().with_popup_polling(3, Duration::from_millis(1)));

    assert_eq!(
        robot.wait_for_popup("Nothing"),
        Err(TestError::PopupNotFound {
            kind: "Toast",
            text: "Nothing".into()
        })
    );
}

#[test]
fn unknown_page_is_reported() {
    let ui = launch_app();
    let robot = robot(&ui, &settings());

    assert_eq!(
        robot.go_to("Settings"),
        Err(TestError::PageNotFound {
            page: "Settings".into()
        })
    );
}

#[test]
fn ambiguous_and_hidden_elements_are_not_found() {
    let ui = launch_app();
    let robot = robot(&ui, &settings().with_locate_attempts(5));

    match robot.find_by_text("Duplicate") {
        Err(TestError::NotFound {
            last_match_count, ..
        }) => assert_eq!(last_match_count, 2),
        other => panic!("expected ambiguity, got {other:?}"),
    }
    let second = robot
        .locate_nth::<Button>(|element| element.text() == "Duplicate", "Duplicate", 1)
        .expect("nth match");
    assert_eq!(second.bounds.y, 80.0);

    assert!(matches!(
        robot.find_by_text("Secret"),
        Err(TestError::NotFound { .. })
    ));
}

#[test]
fn overlay_follows_the_latest_located_element() {
    let ui = launch_app();
    let settings = settings();
    let robot = robot(&ui, &settings);

    robot.find_by_text("Home").expect("title");
    let button = robot.find_by_text("Open details").expect("button");

    let highlight = ui.highlight_state();
    assert_eq!(highlight.created, 1);
    assert!(highlight.visible);
    assert_eq!(
        highlight.bounds,
        Some(button.bounds.inflate(settings.highlight_margin))
    );
}

#[test]
fn carousel_steps_one_slide_per_swipe() {
    let ui = launch_app();
    let robot = robot(&ui, &settings());

    robot.swipe_carousel(Direction::Left).expect("carousel");
    robot.expect(SLIDES[1], true).expect("advanced");
    robot.swipe_carousel(Direction::Right).expect("carousel");
    robot.expect(SLIDES[0], true).expect("went back");
}

#[test]
fn bounded_wait_times_out() {
    let ui = launch_app();
    let robot = robot(&ui, &settings());

    let result = robot.wait_for::<TextView>(|element| element.text() == "Never", Timeout::millis(20));

    assert!(matches!(result, Err(TestError::Timeout { target: "TextView", .. })));
}

#[test]
fn touch_finds_buttons_by_id_or_text() {
    let ui = launch_app();
    let robot = robot(&ui, &settings());

    robot.touch("OPEN-DETAILS", false).expect("matched by id");
    robot.expect("Touches: 1", true).expect("first touch counted");
    robot.touch("Open details", true).expect("matched by text");
    robot.expect("Touches: 2", true).expect("second touch counted");

    // A touch is not a tap: the page stays put.
    assert_eq!(ui.current_page().as_deref(), Some("Home"));
    let counter = ui.find_by_id("touch-count").expect("counter exists");
    assert_eq!(ui.text_of(counter).as_deref(), Some("Touches: 2"));
}

#[test]
fn case_sensitive_touch_reports_the_missing_button() {
    let ui = launch_app();
    let robot = robot(&ui, &settings().with_locate_attempts(5));

    let error = robot.touch("open details", true).unwrap_err();

    assert_eq!(
        error.to_string(),
        "Not found: No button containing the phrase open details was found."
    );
    let counter = ui.find_by_id("touch-count").expect("counter exists");
    assert_eq!(ui.text_of(counter).as_deref(), Some("Touches: 0"));
}

#[test]
fn revealed_element_becomes_locatable() {
    let ui = launch_app();
    let impatient = robot(&ui, &settings().with_locate_attempts(5));
    assert!(impatient.find_by_text("Secret").is_err());

    let robot = robot(&ui, &settings());
    robot.tap_text("Reveal").expect("reveal button");

    let secret = robot
        .locate::<TextView>(|element| element.text() == "Secret", "Secret")
        .expect("visible after reveal");
    assert_eq!(secret.id(), "secret");
}
