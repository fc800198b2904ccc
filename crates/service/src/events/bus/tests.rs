use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::Level;
use uuid::Uuid;

use super::*;
use crate::events::{BusCreated, BusDeleted, CategoryDeleted};
use crate::test_support::LogCapture;

/// Shared, ordered log of what the test handlers did.
#[derive(Clone, Default)]
struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Per-scope token, used to observe scope sharing.
#[derive(Clone, Debug, PartialEq)]
struct ScopeToken(Uuid);

struct First {
    journal: Journal,
}

impl FromScope for First {
    fn from_scope(scope: &Scope) -> Option<Self> {
        Some(Self { journal: scope.get()? })
    }
}

#[async_trait]
impl IntegrationEventHandler<BusDeleted> for First {
    async fn handle(&self, event: &BusDeleted) -> anyhow::Result<()> {
        self.journal.push(format!("first:start:{}", event.bus_id()));
        tokio::task::yield_now().await;
        self.journal.push(format!("first:end:{}", event.bus_id()));
        Ok(())
    }
}

struct Second {
    journal: Journal,
}

impl FromScope for Second {
    fn from_scope(scope: &Scope) -> Option<Self> {
        Some(Self { journal: scope.get()? })
    }
}

#[async_trait]
impl IntegrationEventHandler<BusDeleted> for Second {
    async fn handle(&self, event: &BusDeleted) -> anyhow::Result<()> {
        self.journal.push(format!("second:start:{}", event.bus_id()));
        self.journal.push(format!("second:end:{}", event.bus_id()));
        Ok(())
    }
}

struct Failing {
    journal: Journal,
}

impl FromScope for Failing {
    fn from_scope(scope: &Scope) -> Option<Self> {
        Some(Self { journal: scope.get()? })
    }
}

#[async_trait]
impl IntegrationEventHandler<BusDeleted> for Failing {
    async fn handle(&self, _event: &BusDeleted) -> anyhow::Result<()> {
        self.journal.push("failing");
        anyhow::bail!("simulated handler fault")
    }
}

/// Depends on something nobody registers.
struct Unresolvable;

impl FromScope for Unresolvable {
    fn from_scope(scope: &Scope) -> Option<Self> {
        scope.get::<Arc<AtomicUsize>>().map(|_| Unresolvable)
    }
}

#[async_trait]
impl IntegrationEventHandler<BusDeleted> for Unresolvable {
    async fn handle(&self, _event: &BusDeleted) -> anyhow::Result<()> {
        panic!("must never be resolved")
    }
}

struct Panicking {
    journal: Journal,
}

impl FromScope for Panicking {
    fn from_scope(scope: &Scope) -> Option<Self> {
        Some(Self { journal: scope.get()? })
    }
}

#[async_trait]
impl IntegrationEventHandler<BusDeleted> for Panicking {
    async fn handle(&self, event: &BusDeleted) -> anyhow::Result<()> {
        self.journal.push("panicking");
        panic!("menu store lost for bus {}", event.bus_id())
    }
}

struct TokenReader {
    journal: Journal,
    token: ScopeToken,
}

impl FromScope for TokenReader {
    fn from_scope(scope: &Scope) -> Option<Self> {
        Some(Self { journal: scope.get()?, token: scope.get()? })
    }
}

#[async_trait]
impl IntegrationEventHandler<BusCreated> for TokenReader {
    async fn handle(&self, _event: &BusCreated) -> anyhow::Result<()> {
        self.journal.push(self.token.0.to_string());
        Ok(())
    }
}

#[async_trait]
impl IntegrationEventHandler<BusDeleted> for TokenReader {
    async fn handle(&self, _event: &BusDeleted) -> anyhow::Result<()> {
        self.journal.push(self.token.0.to_string());
        Ok(())
    }
}

struct Chatty;

impl FromScope for Chatty {
    fn from_scope(_scope: &Scope) -> Option<Self> { Some(Chatty) }
}

#[async_trait]
impl IntegrationEventHandler<BusCreated> for Chatty {
    async fn handle(&self, event: &BusCreated) -> anyhow::Result<()> {
        tracing::info!(plate = event.plate_number(), "chatty handled");
        Ok(())
    }
}

fn bus_with_journal() -> (EventBus, Journal) {
    let journal = Journal::default();
    let provider = ServiceProvider::builder().singleton(journal.clone()).build();
    (EventBus::new(provider), journal)
}

#[tokio::test]
async fn publish_without_subscribers_is_a_no_op() {
    let (capture, _guard) = LogCapture::install();
    let (bus, journal) = bus_with_journal();
    bus.subscribe::<BusDeleted, First>();

    let outcome = bus.publish(CategoryDeleted::new(7, 3)).await;

    assert_eq!(outcome, PublishOutcome::default());
    assert!(journal.entries().is_empty());
    let traces = capture.with_message("no handlers subscribed");
    assert_eq!(traces.len(), 1);
    assert_eq!(traces[0].level, Level::DEBUG);
    assert_eq!(traces[0].field("event"), Some("CategoryDeleted"));
}

#[tokio::test]
async fn handlers_run_sequentially_in_registration_order() {
    let (bus, journal) = bus_with_journal();
    bus.subscribe::<BusDeleted, First>();
    bus.subscribe::<BusDeleted, Second>();

    let outcome = bus.publish(BusDeleted::new(42)).await;

    assert_eq!(outcome.handled, 2);
    assert_eq!(
        journal.entries(),
        vec!["first:start:42", "first:end:42", "second:start:42", "second:end:42"]
    );
}

#[tokio::test]
async fn failing_handler_does_not_block_siblings() {
    let (capture, _guard) = LogCapture::install();
    let (bus, journal) = bus_with_journal();
    bus.subscribe::<BusDeleted, Failing>();
    bus.subscribe::<BusDeleted, Second>();

    let outcome = bus.publish(BusDeleted::new(1)).await;

    assert_eq!(outcome, PublishOutcome { handled: 1, failed: 1, skipped: 0 });
    assert_eq!(journal.entries(), vec!["failing", "second:start:1", "second:end:1"]);

    let errors = capture.at_level(Level::ERROR);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field("event"), Some("BusDeleted"));
    assert!(errors[0].field("handler").unwrap().ends_with("Failing"));
    assert_eq!(errors[0].field("error"), Some("simulated handler fault"));
}

#[tokio::test]
async fn panicking_handler_is_contained() {
    let (capture, _guard) = LogCapture::install();
    let (bus, journal) = bus_with_journal();
    bus.subscribe::<BusDeleted, Panicking>();
    bus.subscribe::<BusDeleted, Second>();

    let outcome = bus.publish(BusDeleted::new(1)).await;

    assert_eq!(outcome, PublishOutcome { handled: 1, failed: 1, skipped: 0 });
    assert_eq!(journal.entries(), vec!["panicking", "second:start:1", "second:end:1"]);

    let panics = capture.with_message("integration event handler panicked");
    assert_eq!(panics.len(), 1);
    assert_eq!(panics[0].level, Level::ERROR);
    assert_eq!(panics[0].field("event"), Some("BusDeleted"));
    assert!(panics[0].field("handler").unwrap().ends_with("Panicking"));
    assert_eq!(panics[0].field("panic"), Some("menu store lost for bus 1"));
    assert_eq!(capture.with_message("event dispatched").len(), 1);
}

#[tokio::test]
async fn spawned_publish_survives_panicking_handler() {
    let (bus, journal) = bus_with_journal();
    bus.subscribe::<BusDeleted, Panicking>();
    let bus = Arc::new(bus);

    let task = tokio::spawn({
        let bus = Arc::clone(&bus);
        async move { bus.publish(BusDeleted::new(2)).await }
    });

    let outcome = task.await.expect("publish task must not panic");
    assert_eq!(outcome.failed, 1);
    assert_eq!(journal.entries(), vec!["panicking"]);
}

#[tokio::test]
async fn duplicate_subscription_registers_once() {
    let (capture, _guard) = LogCapture::install();
    let (bus, journal) = bus_with_journal();
    bus.subscribe::<BusDeleted, Second>();
    bus.subscribe::<BusDeleted, Second>();

    assert_eq!(bus.handlers_for::<BusDeleted>().len(), 1);
    let outcome = bus.publish(BusDeleted::new(5)).await;
    assert_eq!(outcome.invoked(), 1);
    assert_eq!(journal.entries().len(), 2);
    assert_eq!(capture.with_message("handler subscribed").len(), 1);
    assert_eq!(capture.with_message("handler already subscribed, ignoring").len(), 1);
}

#[tokio::test]
async fn unresolvable_handler_is_skipped() {
    let (bus, journal) = bus_with_journal();
    bus.subscribe::<BusDeleted, Unresolvable>();
    bus.subscribe::<BusDeleted, Second>();

    let outcome = bus.publish(BusDeleted::new(8)).await;

    assert_eq!(outcome, PublishOutcome { handled: 1, failed: 0, skipped: 1 });
    assert_eq!(journal.entries(), vec!["second:start:8", "second:end:8"]);
}

#[tokio::test]
async fn each_publish_opens_a_fresh_scope() {
    let journal = Journal::default();
    let provider = ServiceProvider::builder()
        .singleton(journal.clone())
        .scoped(|| ScopeToken(Uuid::new_v4()))
        .build();
    let bus = EventBus::new(provider);
    bus.subscribe::<BusDeleted, TokenReader>();
    bus.subscribe::<BusDeleted, First>();
    bus.subscribe::<BusCreated, TokenReader>();

    bus.publish(BusDeleted::new(1)).await;
    bus.publish(BusCreated::new(1, "A-1", None)).await;

    let entries = journal.entries();
    // TokenReader, First (start, end), TokenReader
    assert_eq!(entries.len(), 4);
    let first_publish_token = &entries[0];
    let second_publish_token = &entries[3];
    assert_ne!(first_publish_token, second_publish_token);
}

#[tokio::test]
async fn handler_records_are_nested_in_dispatch_span() {
    let (capture, _guard) = LogCapture::install();
    let bus = EventBus::new(ServiceProvider::default());
    bus.subscribe::<BusCreated, Chatty>();

    bus.publish(BusCreated::new(3, "34 TEST 1", Some("airport".into()))).await;

    let handled = capture.with_message("chatty handled");
    assert_eq!(handled.len(), 1);
    assert_eq!(handled[0].spans, vec!["event_bus", "dispatch"]);
    assert_eq!(handled[0].field("plate"), Some("34 TEST 1"));
}

#[tokio::test]
async fn explicit_span_parents_bus_records() {
    let (capture, _guard) = LogCapture::install();
    let span = tracing::info_span!("menu_service_bus");
    let bus = EventBus::with_span(ServiceProvider::default(), span);

    bus.publish(BusDeleted::new(99)).await;

    let traces = capture.with_message("no handlers subscribed");
    assert_eq!(traces.len(), 1);
    assert_eq!(traces[0].spans, vec!["menu_service_bus"]);
}

struct Counting {
    hits: Arc<AtomicUsize>,
}

impl FromScope for Counting {
    fn from_scope(scope: &Scope) -> Option<Self> {
        Some(Self { hits: scope.get()? })
    }
}

#[async_trait]
impl IntegrationEventHandler<LoadTick> for Counting {
    async fn handle(&self, _event: &LoadTick) -> anyhow::Result<()> {
        tokio::task::yield_now().await;
        self.hits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Test-only event type, distinct from the production set.
struct LoadTick {
    meta: crate::events::EventMeta,
}

impl IntegrationEvent for LoadTick {
    const NAME: &'static str = "LoadTick";
    fn meta(&self) -> &crate::events::EventMeta { &self.meta }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_publishes_are_all_delivered() {
    let hits = Arc::new(AtomicUsize::new(0));
    let provider = ServiceProvider::builder().singleton(Arc::clone(&hits)).build();
    let bus = Arc::new(EventBus::new(provider));
    bus.subscribe::<LoadTick, Counting>();

    let mut tasks = Vec::new();
    for _ in 0..32 {
        let bus = Arc::clone(&bus);
        tasks.push(tokio::spawn(async move {
            bus.publish(LoadTick { meta: crate::events::EventMeta::new() }).await
        }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap().handled, 1);
    }
    assert_eq!(hits.load(Ordering::SeqCst), 32);
}
