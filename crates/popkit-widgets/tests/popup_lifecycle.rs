use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use popkit_core::color::PackedRgba;
use popkit_core::event::Event;
use popkit_core::geometry::{Rect, Size};
use popkit_widgets::modal::{
    Appearance, ContentKind, Dialogue, HostEvent, OptionPicker, Popup, PopupHost, PopupInfo,
    PresentationError, PresentationPhase, SolidView, TransitionDirection, TransitionStyle,
};

const HOST: Size = Size {
    width: 320.0,
    height: 480.0,
};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn appearance(style: TransitionStyle, direction: TransitionDirection) -> Appearance {
    let mut a = Appearance::default();
    a.animation.transition_style = style;
    a.animation.transition_direction = direction;
    a
}

fn view_frame(popup: &Popup) -> Rect {
    popup.tree().get(popup.view().unwrap()).unwrap().frame
}

#[test]
fn left_to_right_starts_one_host_width_left() {
    for style in [TransitionStyle::Plain, TransitionStyle::Fade, TransitionStyle::Bounce] {
        let mut popup = Popup::with_appearance(
            &appearance(style, TransitionDirection::LeftToRight),
            None,
        );
        popup.show(HOST).unwrap();
        let start = view_frame(&popup);
        popup.interrupt();
        let end = view_frame(&popup);
        assert!((start.x - (end.x - HOST.width)).abs() < 1e-9, "{style:?}");
        assert_eq!(start.y, end.y);
    }
}

#[test]
fn center_direction_starts_at_final_frame() {
    let mut popup = Popup::with_appearance(
        &appearance(TransitionStyle::Plain, TransitionDirection::Center),
        None,
    );
    popup.show(HOST).unwrap();
    let start = view_frame(&popup);
    popup.advance(ms(400));
    assert!(start.approx_eq(view_frame(&popup)));
}

#[test]
fn every_style_completes_exactly_once_per_transition() {
    let styles = [
        TransitionStyle::Plain,
        TransitionStyle::Zoom,
        TransitionStyle::Fade,
        TransitionStyle::Bounce,
        TransitionStyle::Custom,
    ];
    for style in styles {
        let mut popup =
            Popup::with_appearance(&appearance(style, TransitionDirection::TopToBottom), None);
        popup.show(HOST).unwrap();
        let mut changes = Vec::new();
        for _ in 0..60 {
            changes.extend(popup.advance(ms(10)));
        }
        assert_eq!(changes, vec![PresentationPhase::Presented], "{style:?}");

        popup.dismiss().unwrap();
        assert_eq!(popup.interrupt(), Some(PresentationPhase::Dismissed));
        assert_eq!(popup.interrupt(), None);
        assert_eq!(popup.presentation().last_finished(), Some(false));
    }
}

#[test]
fn second_action_is_a_no_op() {
    let fired = Rc::new(Cell::new(0));
    let (pos, neg) = (Rc::clone(&fired), Rc::clone(&fired));
    let mut popup = Popup::blank()
        .positive_action(move |_| pos.set(pos.get() + 1))
        .negative_action(move |_| neg.set(neg.get() + 10));
    popup.show(HOST).unwrap();
    popup.advance(ms(400));

    assert!(popup.invoke_positive_action(None));
    assert!(!popup.invoke_positive_action(None));
    assert!(!popup.invoke_negative_action(None));
    assert_eq!(fired.get(), 1);

    for _ in 0..30 {
        popup.advance(ms(16));
    }
    assert_eq!(popup.phase(), PresentationPhase::Dismissed);
    assert!(!popup.has_positive_action());
    assert!(!popup.has_negative_action());
    assert!(popup.view().is_none());
}

#[test]
fn dismissed_popup_cannot_be_shown_again() {
    let mut popup = Popup::blank();
    popup.show(HOST).unwrap();
    popup.interrupt();
    popup.dismiss().unwrap();
    popup.interrupt();
    assert!(matches!(
        popup.show(HOST),
        Err(PresentationError::InvalidPhase { .. })
    ));
}

#[test]
fn dialogue_confirm_passes_provider_data_through_host() {
    let received: Rc<RefCell<Vec<String>>> = Rc::default();
    let sink = Rc::clone(&received);
    let content = ContentKind::confirm_capable(SolidView::new(PackedRgba::WHITE), || {
        Some(PopupInfo::Text("payload".into()))
    });
    let popup = Dialogue::new("Pick", Some(content))
        .positive_action(move |info| {
            if let Some(PopupInfo::Text(text)) = info {
                sink.borrow_mut().push(text);
            }
        })
        .into_popup();

    let mut host = PopupHost::new(HOST);
    let id = host.pop_up(popup, None).unwrap();
    host.tick(ms(400));
    let confirm = find_center(host.get(id).unwrap(), "dialogue.confirm");
    assert!(host.handle_event(&Event::Tap { location: confirm }));
    let mut events = Vec::new();
    for _ in 0..30 {
        events.extend(host.tick(ms(16)));
    }
    assert_eq!(events, vec![HostEvent::Dismissed(id)]);
    assert_eq!(*received.borrow(), vec!["payload".to_string()]);
}

#[test]
fn option_picker_reports_selection_on_confirm() {
    let chosen: Rc<RefCell<Vec<String>>> = Rc::default();
    let sink = Rc::clone(&chosen);
    let mut picker = OptionPicker::multi(
        "Size",
        vec![vec!["S", "M", "L"], vec!["Red", "Blue"]],
    )
    .confirm_action(move |titles| *sink.borrow_mut() = titles);
    assert!(picker.select(0, 2));
    assert!(picker.select(1, 1));
    assert!(!picker.select(2, 0));

    let mut popup = picker.into_popup();
    popup.show(HOST).unwrap();
    popup.advance(ms(400));
    assert_eq!(popup.phase(), PresentationPhase::Presented);

    let confirm = find_center(&popup, "dialogue.confirm");
    assert!(popup.handle_event(&Event::Tap { location: confirm }));
    assert_eq!(*chosen.borrow(), vec!["L".to_string(), "Blue".to_string()]);
}

fn find_center(popup: &Popup, name: &str) -> popkit_core::geometry::Point {
    let tree = popup.tree();
    let id = tree
        .flatten(popup.view().unwrap())
        .into_iter()
        .map(|cmd| cmd.id)
        .find(|&id| tree.get(id).is_some_and(|n| n.name == name))
        .unwrap();
    tree.absolute_frame(id).unwrap().center()
}

#[test]
fn rotation_keeps_popup_centered() {
    let mut host = PopupHost::new(HOST);
    let id = host.pop_up(Popup::blank(), None).unwrap();
    host.tick(ms(400));
    host.resize(Size::new(480.0, 320.0));
    let frame = host.get(id).unwrap().container_frame().unwrap();
    assert!((frame.center().x - 240.0).abs() < 1e-9);
    assert!((frame.center().y - 160.0).abs() < 1e-9);
}
