use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub message: String,
}

/// Layer keeping every event, for assertions on what got logged
#[derive(Clone, Default)]
struct LogCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}

impl<S: Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message: visitor.0,
        });
    }
}

/// Runs `f` with a capturing subscriber on this thread and returns what it logged
/// at debug level or above
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, Vec<CapturedEvent>) {
    let capture = LogCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let result = tracing::subscriber::with_default(subscriber, f);

    let events = std::mem::take(&mut *capture.events.lock().unwrap());
    let events = events.into_iter().filter(|e| e.level <= Level::DEBUG).collect();
    (result, events)
}

pub fn count_level(events: &[CapturedEvent], level: Level) -> usize {
    events.iter().filter(|e| e.level == level).count()
}
