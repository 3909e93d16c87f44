//! The demo's UI test suite.

use crate::app::{SHOP, SIGN_IN};
use tapwright_testing::prelude::*;

#[derive(Default)]
pub struct RejectsInvalidEmail;

impl UiTest for RejectsInvalidEmail {
    fn run(&mut self, robot: &mut Robot) -> TestResult<()> {
        robot.go_to(SIGN_IN)?;
        robot.type_in("email", "not-an-email")?;
        robot.expect("Enter a valid email", true)?;
        robot.tap_text("Sign in")?;
        robot.wait_for_alert("check your email")
    }
}

#[derive(Default)]
pub struct SignsIn;

impl UiTest for SignsIn {
    fn run(&mut self, robot: &mut Robot) -> TestResult<()> {
        robot.go_to(SIGN_IN)?;
        robot.submit_text("email", "ada@example.com")?;
        robot.tap_id::<Button>("sign-in", true)?;
        robot.wait_until_visible::<TextView>(|element| element.text() == "Welcome to the shop")
    }
}

#[derive(Default)]
pub struct BrowsesProducts;

impl UiTest for BrowsesProducts {
    fn run(&mut self, robot: &mut Robot) -> TestResult<()> {
        robot.go_to(SHOP)?;
        robot.find_by_text("Lamp")?;
        robot.swipe_carousel(Direction::Left)?;
        robot.find_by_text("Chair")?;
        robot.swipe_carousel(Direction::Right)?;
        robot.find_by_text("Lamp").map(|_| ())
    }
}

#[derive(Default)]
pub struct AddsToCart;

impl UiTest for AddsToCart {
    fn run(&mut self, robot: &mut Robot) -> TestResult<()> {
        robot.go_to(SHOP)?;
        let add = robot.by_id::<Button>("add-to-cart")?;
        robot.tap_and_await(&add).wait();

        let total = robot.by_id::<TextView>("total")?;
        robot.assert("total reflects the lamp", total.text() == "Total: $25")?;
        robot.wait_for_popup("added to cart")
    }
}

pub fn registry() -> TestRegistry {
    ui_tests![
        RejectsInvalidEmail,
        SignsIn => order(0),
        BrowsesProducts,
        AddsToCart,
    ]
}
