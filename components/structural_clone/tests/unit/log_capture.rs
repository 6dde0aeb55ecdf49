//! Records warning events emitted while a closure runs

use std::fmt::Write as _;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// One captured warning, fields rendered as `name=value`
#[derive(Debug, Clone, Default)]
pub struct Captured {
    pub fields: String,
}

#[derive(Clone, Default)]
struct WarnLayer {
    events: Arc<Mutex<Vec<Captured>>>,
}

struct FieldWriter<'a>(&'a mut String);

impl Visit for FieldWriter<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let _ = write!(self.0, "{}={:?} ", field.name(), value);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        let _ = write!(self.0, "{}={} ", field.name(), value);
    }
}

impl<S: Subscriber> Layer<S> for WarnLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != Level::WARN {
            return;
        }
        let mut fields = String::new();
        event.record(&mut FieldWriter(&mut fields));
        self.events.lock().unwrap().push(Captured { fields });
    }
}

/// Run `f` and return its result with every WARN event it emitted
pub fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, Vec<Captured>) {
    let layer = WarnLayer::default();
    let events = Arc::clone(&layer.events);
    let subscriber = tracing_subscriber::registry().with(layer);
    let result = tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    (result, captured)
}
