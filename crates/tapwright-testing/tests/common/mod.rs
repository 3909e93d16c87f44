//! A small headless app shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tapwright_core::{Direction, EventTarget, ThreadExecutor, UiEvent, ViewTree};
use tapwright_headless::{HeadlessSettings, HeadlessUi, NodeSpec};
use tapwright_testing::{apply_speed_override, EngineSettings, Robot};

pub const SLIDES: [&str; 3] = ["Slide 1", "Slide 2", "Slide 3"];

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn settings() -> EngineSettings {
    EngineSettings::headless()
}

/// Launches the sample app and waits until its home page is built.
pub fn launch_app() -> HeadlessUi {
    init_logging();
    let ui = HeadlessUi::launch(
        HeadlessSettings::default().with_navigation_delay(Duration::from_millis(10)),
    )
    .expect("headless UI thread starts");

    ui.register_page("Home", build_home);
    ui.register_page("Details", build_details);
    ui.navigate("Home").expect("home page is registered");
    while ui.is_navigating() {
        thread::sleep(Duration::from_millis(2));
    }
    ui
}

pub fn robot(ui: &HeadlessUi, settings: &EngineSettings) -> Robot {
    apply_speed_override(ui.time(), settings);
    Robot::new(Arc::new(ui.clone()), settings, Arc::new(ThreadExecutor::new()))
}

fn build_home(ui: &HeadlessUi, root: tapwright_core::ElementHandle) {
    ui.add(root, NodeSpec::text("Home").at(20.0, 20.0).sized(200.0, 30.0));

    let open = ui.add(
        root,
        NodeSpec::button("Open details")
            .with_id("open-details")
            .at(20.0, 80.0),
    );
    ui.on_tap(open, |ui, _, _| {
        if let Err(err) = ui.navigate("Details") {
            log::error!("{err}");
        }
    });
    let touches = ui.add(root, NodeSpec::text("Touches: 0").with_id("touch-count").at(240.0, 80.0));
    let touched = Arc::new(AtomicUsize::new(0));
    ui.on(EventTarget::Element(open), "touched", move |ui, _, _| {
        let count = touched.fetch_add(1, Ordering::SeqCst) + 1;
        ui.set_text(touches, &format!("Touches: {count}"));
    });

    let email = ui.add(root, NodeSpec::input("email").at(20.0, 140.0).sized(300.0, 40.0));
    ui.on(EventTarget::Element(email), "text-submitted", move |ui, _, _| {
        let name = ui.text_of(email).unwrap_or_default();
        ui.show_toast(format!("Welcome, {name}"), Duration::from_millis(500));
    });
    let echo = ui.add(root, NodeSpec::text("").with_id("echo").at(20.0, 190.0));
    ui.on(EventTarget::Element(email), "text-changed", move |ui, _, _| {
        let typed = ui.text_of(email).unwrap_or_default();
        ui.set_text(echo, &format!("Typed: {typed}"));
    });

    let carousel = ui.add(
        root,
        NodeSpec::new(tapwright_core::ElementKind::Carousel)
            .with_id("slides")
            .at(20.0, 240.0)
            .sized(400.0, 200.0),
    );
    let label = ui.add(carousel, NodeSpec::text(SLIDES[0]).with_id("slide-label"));
    ui.on(EventTarget::Element(carousel), "carousel-step", move |ui, event, _| {
        let current = ui.text_of(label).unwrap_or_default();
        let index = SLIDES.iter().position(|slide| *slide == current).unwrap_or(0);
        let next = match event {
            UiEvent::CarouselStep {
                direction: Direction::Left,
            } => (index + 1).min(SLIDES.len() - 1),
            UiEvent::CarouselStep {
                direction: Direction::Right,
            } => index.saturating_sub(1),
            _ => index,
        };
        ui.set_text(label, SLIDES[next]);
    });

    ui.add(root, NodeSpec::button("Duplicate").at(500.0, 20.0));
    ui.add(root, NodeSpec::button("Duplicate").at(500.0, 80.0));
    let secret = ui.add(root, NodeSpec::text("Secret").with_id("secret").hidden());
    let reveal = ui.add(root, NodeSpec::button("Reveal").at(500.0, 140.0));
    ui.on_tap(reveal, move |ui, _, _| ui.set_visible(secret, true));
}

fn build_details(ui: &HeadlessUi, root: tapwright_core::ElementHandle) {
    ui.add(root, NodeSpec::text("Details").at(20.0, 20.0));
    let save = ui.add(root, NodeSpec::button("Save").at(20.0, 80.0));
    // The reaction finishes two scheduling turns after the tap itself.
    ui.on_tap(save, |ui, _, completion| {
        ui.run_on_ui(move |ui| {
            let completion = completion.clone();
            ui.run_on_ui(move |ui| {
                thread::sleep(Duration::from_millis(30));
                ui.add(ui.root_handle(), NodeSpec::text("Saved").at(20.0, 140.0));
                drop(completion);
            });
        });
    });
}
