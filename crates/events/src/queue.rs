use crate::messages::Event;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// The in-process FIFO that every component writes to and the dispatch loop
/// drains.
///
/// Cloning an `EventQueue` produces another handle onto the same underlying
/// queue, which is how the data handler, strategy, portfolio, and execution
/// handler all share one write surface while the loop keeps the only
/// consuming side. Producers and the consumer take strict turns within a
/// drain cycle, so the mutex is only ever contended by a single thread.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    inner: Arc<Mutex<VecDeque<Event>>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event. Events are immutable once pushed; production order
    /// is preserved exactly.
    pub fn push(&self, event: Event) {
        self.inner
            .lock()
            .expect("event queue mutex poisoned")
            .push_back(event);
    }

    /// Pops the oldest event without blocking. `None` signals an empty queue,
    /// which is the normal termination condition of a drain cycle, not an
    /// error.
    pub fn pop(&self) -> Option<Event> {
        self.inner
            .lock()
            .expect("event queue mutex poisoned")
            .pop_front()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("event queue mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{MarketEvent, SignalEvent};
    use chrono::{TimeZone, Utc};
    use core_types::SignalKind;
    use rust_decimal_macros::dec;

    #[test]
    fn pop_returns_events_in_production_order() {
        let queue = EventQueue::new();
        let t0 = Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2021, 3, 1, 0, 1, 0).unwrap();

        queue.push(Event::Market(MarketEvent { timestamp: t0 }));
        queue.push(Event::Signal(SignalEvent {
            symbol: "BTC-USDT".to_string(),
            timestamp: t0,
            kind: SignalKind::Long,
            strength: dec!(1.0),
        }));
        queue.push(Event::Market(MarketEvent { timestamp: t1 }));

        assert_eq!(queue.len(), 3);
        assert!(matches!(queue.pop(), Some(Event::Market(m)) if m.timestamp == t0));
        assert!(matches!(queue.pop(), Some(Event::Signal(_))));
        assert!(matches!(queue.pop(), Some(Event::Market(m)) if m.timestamp == t1));
        assert!(queue.pop().is_none());
    }

    #[test]
    fn cloned_handles_share_the_same_queue() {
        let queue = EventQueue::new();
        let producer = queue.clone();
        let t0 = Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap();

        producer.push(Event::Market(MarketEvent { timestamp: t0 }));

        assert_eq!(queue.len(), 1);
        assert!(queue.pop().is_some());
        assert!(producer.is_empty());
    }

    #[test]
    fn pop_on_empty_queue_is_none_and_harmless() {
        let queue = EventQueue::new();
        assert!(queue.pop().is_none());
        assert!(queue.pop().is_none());
        assert!(queue.is_empty());
    }
}
