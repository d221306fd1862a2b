//! Event sink trait and implementations.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::PortfolioEvent;

/// Trait for receiving portfolio events.
///
/// # Design Rules
///
/// - `emit()` must be fast and non-blocking (no network calls, no storage writes)
/// - Failure to emit must not affect domain operations (best-effort)
pub trait PortfolioEventSink: Send + Sync {
    /// Emit a single event.
    fn emit(&self, event: PortfolioEvent);

    /// Emit multiple events.
    ///
    /// Default implementation calls `emit()` for each event.
    fn emit_batch(&self, events: Vec<PortfolioEvent>) {
        for event in events {
            self.emit(event);
        }
    }
}

/// No-op implementation for contexts that don't need events.
#[derive(Clone, Default)]
pub struct NoOpEventSink;

impl PortfolioEventSink for NoOpEventSink {
    fn emit(&self, _event: PortfolioEvent) {}
}

/// Mock sink for testing - collects emitted events.
#[derive(Clone, Default)]
pub struct MockEventSink {
    events: Arc<Mutex<Vec<PortfolioEvent>>>,
}

impl MockEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    pub fn events(&self) -> Vec<PortfolioEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Clears collected events.
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PortfolioEventSink for MockEventSink {
    fn emit(&self, event: PortfolioEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

/// Handle returned by [`EventHub::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Arc<dyn Fn(&PortfolioEvent) + Send + Sync>;

/// Explicit subscription registry.
///
/// Screens register a callback and get every event emitted afterwards, in
/// subscription order. Callbacks run on the emitting thread and must not call
/// back into the hub's `subscribe`/`unsubscribe`.
#[derive(Clone, Default)]
pub struct EventHub {
    subscribers: Arc<Mutex<BTreeMap<SubscriptionId, Subscriber>>>,
    next_id: Arc<AtomicU64>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&PortfolioEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.insert(id, Arc::new(callback));
        }
        id
    }

    /// Returns false if the subscription was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers
            .lock()
            .map(|mut subs| subs.remove(&id).is_some())
            .unwrap_or(false)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|s| s.len()).unwrap_or(0)
    }
}

impl PortfolioEventSink for EventHub {
    fn emit(&self, event: PortfolioEvent) {
        // Snapshot so callbacks run without holding the lock
        let subscribers: Vec<Subscriber> = match self.subscribers.lock() {
            Ok(subs) => subs.values().cloned().collect(),
            Err(_) => return,
        };
        for subscriber in subscribers {
            subscriber(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn created(id: &str) -> PortfolioEvent {
        PortfolioEvent::PortfolioCreated {
            portfolio_id: id.to_string(),
        }
    }

    #[test]
    fn test_noop_sink_does_not_panic() {
        let sink = NoOpEventSink;
        sink.emit(created("p1"));
        sink.emit_batch(vec![created("p2"), created("p3")]);
    }

    #[test]
    fn test_mock_sink_collects_events() {
        let sink = MockEventSink::new();
        assert!(sink.is_empty());

        sink.emit(created("p1"));
        assert_eq!(sink.len(), 1);

        sink.emit_batch(vec![
            PortfolioEvent::quote_updated("p1", "AAPL", dec!(150)),
            PortfolioEvent::position_removed("p1", "AAPL"),
        ]);
        assert_eq!(sink.len(), 3);

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_hub_delivers_to_subscribers_until_unsubscribed() {
        let hub = EventHub::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = seen.clone();
        let id = hub.subscribe(move |event| {
            seen_clone.lock().unwrap().push(event.clone());
        });
        assert_eq!(hub.subscriber_count(), 1);

        hub.emit(created("p1"));
        assert!(hub.unsubscribe(id));
        assert!(!hub.unsubscribe(id));
        hub.emit(created("p2"));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[created("p1")]);
    }

    #[test]
    fn test_hub_fans_out_in_subscription_order() {
        let hub = EventHub::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["chart", "list"] {
            let order = order.clone();
            hub.subscribe(move |_| order.lock().unwrap().push(tag));
        }

        hub.emit(created("p1"));
        assert_eq!(order.lock().unwrap().as_slice(), &["chart", "list"]);
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let json = serde_json::to_value(created("p1")).unwrap();
        assert_eq!(json["type"], "portfolio_created");
        assert_eq!(json["portfolio_id"], "p1");
    }
}
