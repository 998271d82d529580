use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use popkit_core::event::Event;
use popkit_core::geometry::{Point, Size};
use popkit_widgets::modal::{
    AlertController, AlertStyle, Appearance, HostEvent, Popup, PopupHost, PopupId,
    PresentationPhase,
};

const HOST: Size = Size {
    width: 320.0,
    height: 480.0,
};

type Log = Rc<RefCell<Vec<String>>>;

fn logged(alert: AlertController) -> (AlertController, Log) {
    let log: Log = Rc::default();
    let (canceled, confirmed) = (Rc::clone(&log), Rc::clone(&log));
    let alert = alert
        .on_canceled(move || canceled.borrow_mut().push("cancel".into()))
        .on_confirmed(move |i, t| confirmed.borrow_mut().push(format!("{i}:{t}")));
    (alert, log)
}

fn nth_button(popup: &Popup, n: usize) -> Point {
    let container = popup.container().unwrap().container();
    let id = popup
        .tree()
        .children(container)
        .iter()
        .copied()
        .filter(|&id| popup.tree().get(id).unwrap().name == "alert.button")
        .nth(n)
        .unwrap();
    popup.tree().absolute_frame(id).unwrap().center()
}

fn presented(host: &mut PopupHost, alert: AlertController) -> PopupId {
    let id = host.pop_up(alert.into_popup(), None).unwrap();
    let events = host.tick(Duration::from_millis(400));
    assert_eq!(events, vec![HostEvent::Presented(id)]);
    id
}

fn settle(host: &mut PopupHost) -> Vec<HostEvent> {
    let mut events = Vec::new();
    for _ in 0..40 {
        events.extend(host.tick(Duration::from_millis(16)));
    }
    events
}

#[test]
fn cancel_button_cancels_once_and_leaves_host() {
    let mut host = PopupHost::new(HOST);
    let (alert, log) = logged(AlertController::alert_view_confirm(
        "Overwatch",
        Some("M"),
        "Exit",
        "Go",
    ));
    let id = presented(&mut host, alert);

    let cancel = nth_button(host.get(id).unwrap(), 0);
    assert!(host.handle_event(&Event::Tap { location: cancel }));
    assert!(host.handle_event(&Event::Tap { location: cancel }));

    assert_eq!(settle(&mut host), vec![HostEvent::Dismissed(id)]);
    assert_eq!(*log.borrow(), vec!["cancel".to_string()]);
    assert!(host.is_empty());
}

#[test]
fn option_button_confirms_with_its_index() {
    let mut host = PopupHost::new(HOST);
    let (alert, log) = logged(AlertController::new(
        AlertStyle::AlertView,
        "Overwatch",
        None,
        Some("Skip"),
        ["A", "B", "C"],
    ));
    let id = presented(&mut host, alert);

    let third = nth_button(host.get(id).unwrap(), 3);
    host.handle_event(&Event::Tap { location: third });
    settle(&mut host);
    assert_eq!(*log.borrow(), vec!["2:C".to_string()]);
}

#[test]
fn action_sheet_option_confirms() {
    let mut host = PopupHost::new(HOST);
    let (sheet, log) = logged(AlertController::action_sheet(
        "Share",
        Some("Choose a target"),
        Some("Cancel"),
        ["Mail", "Messages"],
    ));
    let id = host.pop_up(sheet.into_popup(), None).unwrap();
    settle(&mut host);
    assert_eq!(host.phase(id), Some(PresentationPhase::Presented));

    let frame = host.get(id).unwrap().container_frame().unwrap();
    assert!((frame.bottom() - (HOST.height - 8.0)).abs() < 1e-9);

    let mail = nth_button(host.get(id).unwrap(), 1);
    host.handle_event(&Event::Tap { location: mail });
    settle(&mut host);
    assert_eq!(*log.borrow(), vec!["0:Mail".to_string()]);
}

#[test]
fn tapping_outside_cancels_by_default() {
    let mut host = PopupHost::new(HOST);
    let (alert, log) = logged(AlertController::alert_view("Overwatch", None, Some("OK")));
    let id = presented(&mut host, alert);
    host.handle_event(&Event::tap(4.0, 4.0));
    assert_eq!(settle(&mut host), vec![HostEvent::Dismissed(id)]);
    assert_eq!(*log.borrow(), vec!["cancel".to_string()]);
}

#[test]
fn tapping_outside_is_ignored_when_disabled() {
    let mut host = PopupHost::new(HOST);
    let (mut alert, log) = logged(AlertController::alert_view("Overwatch", None, Some("OK")));
    alert.appearance_mut().enable_touch_outside_to_dismiss = false;
    let id = presented(&mut host, alert);

    for corner in [(1.0, 1.0), (319.0, 1.0), (1.0, 479.0), (319.0, 479.0)] {
        assert!(host.handle_event(&Event::tap(corner.0, corner.1)));
    }
    assert!(settle(&mut host).is_empty());
    assert_eq!(host.phase(id), Some(PresentationPhase::Presented));
    assert!(log.borrow().is_empty());
}

#[test]
fn taps_during_entrance_are_swallowed() {
    let mut host = PopupHost::new(HOST);
    let (alert, log) = logged(AlertController::alert_view("Overwatch", None, Some("OK")));
    let id = host.pop_up(alert.into_popup(), None).unwrap();
    host.tick(Duration::from_millis(100));
    assert!(host.handle_event(&Event::tap(4.0, 4.0)));
    host.tick(Duration::from_millis(300));
    assert_eq!(host.phase(id), Some(PresentationPhase::Presented));
    assert!(log.borrow().is_empty());
}

#[test]
fn stacked_alerts_answer_top_first() {
    let mut host = PopupHost::new(HOST);
    let (first, first_log) = logged(AlertController::alert_view("First", None, Some("OK")));
    let (second, second_log) = logged(AlertController::alert_view("Second", None, Some("OK")));
    let bottom = presented(&mut host, first);
    let top = presented(&mut host, second);

    host.handle_event(&Event::tap(4.0, 4.0));
    assert_eq!(settle(&mut host), vec![HostEvent::Dismissed(top)]);
    assert!(first_log.borrow().is_empty());
    assert_eq!(second_log.borrow().len(), 1);
    assert_eq!(host.top_id(), Some(bottom));
}

#[test]
fn explicit_appearance_is_used_verbatim() {
    let mut appearance = Appearance::default();
    appearance.alert.alert_button_height = 50.0;
    let alert = AlertController::with_appearance(
        &appearance,
        AlertStyle::AlertView,
        "Overwatch",
        None,
        Some("Skip"),
        ["A", "B"],
    );
    assert_eq!(alert.buttons_height(), 150.0);
}
