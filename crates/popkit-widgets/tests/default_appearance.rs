//! The process-wide default is global state, so everything touching it lives
//! in one test.

use popkit_core::geometry::Size;
use popkit_widgets::modal::{AlertController, Appearance, Dialogue, Popup, TransitionStyle};

#[test]
fn default_appearance_applies_to_new_popups_only() {
    let before = Popup::blank();
    assert_eq!(before.appearance().width_multiplier, 0.8);

    Appearance::update_default(|a| {
        a.popup.width_multiplier = 0.5;
        a.popup.corner_radius = 2.0;
        a.animation.transition_style = TransitionStyle::Bounce;
        a.alert.alert_button_height = 30.0;
        a.dialogue.nav_bar_height = 52.0;
    });
    assert_eq!(Appearance::current().popup.width_multiplier, 0.5);

    let after = Popup::blank();
    assert_eq!(after.appearance().width_multiplier, 0.5);
    assert_eq!(after.appearance().corner_radius, 2.0);
    assert_eq!(
        after.animation_appearance().transition_style,
        TransitionStyle::Bounce
    );
    assert_eq!(before.appearance().width_multiplier, 0.8);

    let alert = AlertController::alert_view("T", None, Some("OK"));
    assert_eq!(alert.buttons_height(), 30.0);
    // Alert views pin their own transition.
    assert_eq!(
        alert.animation_appearance().transition_style,
        TransitionStyle::Zoom
    );

    let mut dialogue = Dialogue::new("T", None);
    assert_eq!(dialogue.dialogue_appearance_mut().nav_bar_height, 52.0);

    let mut popup = Popup::blank();
    popup.show(Size::new(400.0, 400.0)).unwrap();
    assert!((popup.container_frame().unwrap().width - 200.0).abs() < 1e-9);

    let mut replaced = Appearance::default();
    replaced.popup.enable_shadow = false;
    Appearance::set_default(replaced);
    assert!(!Popup::blank().appearance().enable_shadow);
    assert_eq!(Popup::blank().appearance().width_multiplier, 0.8);

    Appearance::reset_default();
    assert_eq!(*Appearance::current(), Appearance::default());
}
