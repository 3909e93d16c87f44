//! Screens of the demo shop.
//!
//! `SignIn` takes an email and moves on to `Shop`. The shop has a product
//! carousel and a cart whose "Add to cart" button updates the total after
//! two scheduling turns, so `tap_and_await` has something to wait for.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tapwright_core::{Direction, ElementHandle, ElementKind, EventTarget, UiEvent, ViewTree};
use tapwright_headless::{HeadlessSettings, HeadlessUi, NodeSpec};

pub const SIGN_IN: &str = "SignIn";
pub const SHOP: &str = "Shop";

pub const PRODUCTS: [(&str, u32); 3] = [("Lamp", 25), ("Chair", 80), ("Desk", 240)];

pub fn launch() -> std::io::Result<HeadlessUi> {
    let ui = HeadlessUi::launch(HeadlessSettings::default())?;
    ui.register_page(SIGN_IN, sign_in);
    ui.register_page(SHOP, shop);
    Ok(ui)
}

fn sign_in(ui: &HeadlessUi, root: ElementHandle) {
    ui.add(root, NodeSpec::text("Sign in to continue").at(40.0, 40.0).sized(400.0, 30.0));
    let email = ui.add(root, NodeSpec::input("email").at(40.0, 100.0).sized(400.0, 40.0));
    let hint = ui.add(root, NodeSpec::text("").with_id("email-hint").at(40.0, 150.0));

    ui.on(EventTarget::Element(email), "text-changed", move |ui, _, _| {
        let valid = ui.text_of(email).is_some_and(|text| text.contains('@'));
        ui.set_text(hint, if valid { "" } else { "Enter a valid email" });
    });

    let submit = ui.add(
        root,
        NodeSpec::button("Sign in")
            .with_id("sign-in")
            .at(40.0, 200.0),
    );
    ui.on_tap(submit, move |ui, _, _| {
        let email = ui.text_of(email).unwrap_or_default();
        if !email.contains('@') {
            ui.show_alert("Please check your email address");
            return;
        }
        log::info!("signed in as {email}");
        if let Err(err) = ui.navigate(SHOP) {
            log::error!("{err}");
        }
    });
}

fn shop(ui: &HeadlessUi, root: ElementHandle) {
    ui.add(root, NodeSpec::text("Welcome to the shop").at(40.0, 40.0).sized(400.0, 30.0));

    let carousel = ui.add(
        root,
        NodeSpec::new(ElementKind::Carousel)
            .with_id("products")
            .at(40.0, 100.0)
            .sized(400.0, 200.0),
    );
    let product = ui.add(
        carousel,
        NodeSpec::text(PRODUCTS[0].0)
            .with_id("product-name")
            .at(20.0, 20.0),
    );
    let selected = Arc::new(AtomicU32::new(0));
    let step_selected = Arc::clone(&selected);
    ui.on(EventTarget::Element(carousel), "carousel-step", move |ui, event, _| {
        let UiEvent::CarouselStep { direction } = event else {
            return;
        };
        let last = PRODUCTS.len() as u32 - 1;
        let current = step_selected.load(Ordering::SeqCst);
        let next = match direction {
            Direction::Left => (current + 1).min(last),
            Direction::Right => current.saturating_sub(1),
            Direction::Up | Direction::Down => current,
        };
        step_selected.store(next, Ordering::SeqCst);
        ui.set_text(product, PRODUCTS[next as usize].0);
    });

    let total = ui.add(root, NodeSpec::text("Total: $0").with_id("total").at(40.0, 320.0));
    let sum = Arc::new(AtomicU32::new(0));
    let add = ui.add(
        root,
        NodeSpec::button("Add to cart")
            .with_id("add-to-cart")
            .at(40.0, 380.0),
    );
    ui.on_tap(add, move |ui, _, completion| {
        let price = PRODUCTS[selected.load(Ordering::SeqCst) as usize].1;
        let sum = Arc::clone(&sum);
        // Pricing runs on a later turn, the total update on the one after.
        ui.run_on_ui(move |ui| {
            thread::sleep(Duration::from_millis(20));
            let next = sum.fetch_add(price, Ordering::SeqCst) + price;
            ui.run_on_ui(move |ui| {
                ui.set_text(total, &format!("Total: ${next}"));
                ui.show_toast("Added to cart", Duration::from_secs(2));
                drop(completion);
            });
        });
    });
}
