use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use popkit_core::geometry::Size;
use popkit_widgets::modal::{AlertController, PopupHost};
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<String>>>);

#[derive(Default)]
struct Message(String);

impl Visit for Message {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: tracing::Subscriber> Layer<S> for Capture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut message = Message::default();
        event.record(&mut message);
        self.0.lock().unwrap().push(message.0);
    }
}

impl Capture {
    fn position(&self, needle: &str) -> Option<usize> {
        self.0.lock().unwrap().iter().position(|m| m == needle)
    }
}

#[test]
fn host_lifecycle_is_traced_in_order() {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());

    tracing::subscriber::with_default(subscriber, || {
        let mut host = PopupHost::new(Size::new(320.0, 480.0));
        let alert = AlertController::alert_view("Overwatch", None, Some("OK"));
        let id = host.pop_up(alert.into_popup(), None).unwrap();
        host.tick(Duration::from_millis(400));
        host.dismiss(id).unwrap();
        host.tick(Duration::from_millis(400));
        assert!(host.is_empty());
    });

    let pop_up = capture.position("pop up").unwrap();
    let requested = capture.position("dismiss requested").unwrap();
    let disappeared = capture.position("popup disappeared").unwrap();
    let removed = capture.position("popup removed").unwrap();
    assert!(pop_up < requested);
    assert!(requested < disappeared);
    assert!(disappeared < removed);
}
