//! Captures events emitted by `switchyard_core` while tests run.

use std::fmt::Debug;
use std::sync::{Arc, Mutex, OnceLock};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

pub type EventLog = Arc<Mutex<Vec<CapturedEvent>>>;

#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub target: String,
    pub level: Level,
    pub fields: Vec<(String, String)>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find_map(|(key, value)| (key == name).then_some(value.as_str()))
    }

    pub fn message(&self) -> Option<&str> {
        self.field("message")
    }
}

/// Shared log of every `switchyard_core` event in this test binary.
///
/// The subscriber is global, so tests running in parallel see each other's
/// events. Assert on specific events, never on counts.
pub fn captured_events() -> EventLog {
    static LOG: OnceLock<EventLog> = OnceLock::new();

    LOG.get_or_init(|| {
        let log = EventLog::default();
        let layer = Recorder {
            log: Arc::clone(&log),
        }
        .with_filter(Targets::new().with_target("switchyard_core", Level::TRACE));

        tracing::subscriber::set_global_default(tracing_subscriber::registry().with(layer))
            .expect("a global subscriber is already installed");

        log
    })
    .clone()
}

struct Recorder {
    log: EventLog,
}

impl<S: Subscriber> Layer<S> for Recorder {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Fields::default();
        event.record(&mut fields);

        let meta = event.metadata();
        self.log.lock().unwrap().push(CapturedEvent {
            target: meta.target().to_owned(),
            level: *meta.level(),
            fields: fields.0,
        });
    }
}

#[derive(Default)]
struct Fields(Vec<(String, String)>);

impl Visit for Fields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.push((field.name().to_owned(), value.to_owned()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        self.0.push((field.name().to_owned(), format!("{value:?}")));
    }
}
