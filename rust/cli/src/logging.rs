//! Tracing setup for the binary and a capturing layer for tests.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use tracing::Level;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{Layer, Registry};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "warn,taixiu_engine=info";

/// Structured log entry captured by [`TestLogSubscriber`]
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Subscriber that captures log entries for verification
#[derive(Debug, Clone, Default)]
pub struct TestLogSubscriber {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn into_layer<S>(self) -> TestLayer<S>
    where
        S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    {
        TestLayer {
            subscriber: self,
            _phantom: PhantomData,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        self.entries.lock().unwrap_or_else(|p| p.into_inner())
    }
}

pub struct TestLayer<S> {
    subscriber: TestLogSubscriber,
    _phantom: PhantomData<S>,
}

impl<S> Layer<S> for TestLayer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let entry = LogEntry {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: visitor.message.unwrap_or_default(),
            fields: visitor.fields,
        };

        self.subscriber.lock().push(entry);
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let value_str = format!("{:?}", value);
        if field.name() == "message" {
            self.message = Some(value_str);
        } else {
            self.fields.push((field.name().to_string(), value_str));
        }
    }
}

/// Installs the global fmt subscriber, writing to stderr so command output
/// on stdout stays clean.
pub fn init_logging() -> Result<(), SetGlobalDefaultError> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}

/// Installs a capturing subscriber once per process and returns a cleared
/// handle to it.
pub fn init_test_logging() -> TestLogSubscriber {
    static SUBSCRIBER: OnceLock<TestLogSubscriber> = OnceLock::new();
    static REGISTERED: OnceLock<()> = OnceLock::new();

    let subscriber = SUBSCRIBER.get_or_init(TestLogSubscriber::new);

    REGISTERED.get_or_init(|| {
        let layer = subscriber.clone().into_layer::<Registry>();
        let registry = Registry::default().with(layer);
        // another subscriber already installed; entries just won't be captured
        let _ = tracing::subscriber::set_global_default(registry);
    });

    subscriber.clear();
    subscriber.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use taixiu_engine::config::GameConfig;
    use taixiu_engine::engine::Engine;
    use taixiu_engine::ledger::Side;
    use taixiu_engine::rng::SeededRandom;
    use tracing::{info, warn};

    fn capture<F: FnOnce()>(f: F) -> Vec<LogEntry> {
        let subscriber = TestLogSubscriber::new();
        let registry = Registry::default().with(subscriber.clone().into_layer::<Registry>());
        tracing::subscriber::with_default(registry, f);
        subscriber.entries()
    }

    #[test]
    fn captures_levels_and_fields() {
        let entries = capture(|| {
            info!(session_id = "abc123", "round started");
            warn!("bet rejected");
        });
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].level, Level::INFO);
        assert!(entries[0].message.contains("round started"));
        assert!(entries[0].field("session_id").unwrap().contains("abc123"));
        assert_eq!(entries[1].level, Level::WARN);
    }

    #[test]
    fn engine_rounds_are_logged() {
        let entries = capture(|| {
            let mut eng = Engine::with_rng(GameConfig::default(), SeededRandom::new(5)).unwrap();
            eng.start_round();
            eng.place_bet(Side::Tai, 0, false).unwrap_err();
            eng.place_bet(Side::Tai, 1_000, false).unwrap();
            eng.resolve_round().unwrap();
        });
        let started = entries
            .iter()
            .filter(|e| e.message.contains("round started"))
            .count();
        assert_eq!(started, 2);
        assert!(entries.iter().any(|e| e.level == Level::WARN
            && e.message.contains("bet rejected")
            && e.target.starts_with("taixiu_engine")));
        let settled = entries
            .iter()
            .find(|e| e.message.contains("round settled"))
            .expect("settlement logged");
        assert_eq!(settled.level, Level::INFO);
        assert!(settled.field("winnings").is_some());
    }

    #[test]
    fn clear_drops_entries() {
        let subscriber = TestLogSubscriber::new();
        let registry = Registry::default().with(subscriber.clone().into_layer::<Registry>());
        tracing::subscriber::with_default(registry, || info!("first"));
        assert_eq!(subscriber.entries().len(), 1);
        subscriber.clear();
        assert!(subscriber.entries().is_empty());
    }
}
