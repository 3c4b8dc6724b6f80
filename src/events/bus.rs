//! Event bus implementation.
//!
//! Synchronous, single-threaded publish/subscribe. Handlers run on the emitting call
//! stack in global registration order; an emit from inside a handler completes fully
//! before the outer emit moves on to its next handler.

use super::matcher::Matcher;
use super::payload::EventPayload;
use crate::domain::Result;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

type Handler = Rc<dyn Fn(&EventPayload) -> Result<()>>;

struct Subscription {
    id: SubscriptionId,
    matcher: Matcher,
    handler: Handler,
}

/// Name/pattern based publish/subscribe broker.
///
/// Shared as `Rc<EventBus>`: every method takes `&self`, so handlers may subscribe,
/// unsubscribe or emit while an emit is in progress. An emit dispatches to the
/// subscriptions registered when it started.
#[derive(Default)]
pub struct EventBus {
    subscriptions: RefCell<Vec<Subscription>>,
    next_id: Cell<u64>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for every future emit whose name satisfies `matcher`.
    ///
    /// A handler returning `Err` is logged; the remaining handlers of the same emit
    /// still run.
    pub fn subscribe<F>(&self, matcher: impl Into<Matcher>, handler: F) -> SubscriptionId
    where
        F: Fn(&EventPayload) -> Result<()> + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);

        let matcher = matcher.into();
        tracing::trace!(subscription = %id, matcher = ?matcher, "subscription added");

        self.subscriptions.borrow_mut().push(Subscription {
            id,
            matcher,
            handler: Rc::new(handler),
        });
        id
    }

    /// Invokes every matching handler with `payload`, in registration order.
    pub fn emit(&self, name: &str, payload: &EventPayload) {
        let _span = tracing::trace_span!("emit", event = name).entered();

        let handlers: Vec<(SubscriptionId, Handler)> = self
            .subscriptions
            .borrow()
            .iter()
            .filter(|sub| sub.matcher.matches(name))
            .map(|sub| (sub.id, Rc::clone(&sub.handler)))
            .collect();

        if handlers.is_empty() {
            tracing::trace!("no subscribers");
            return;
        }

        tracing::trace!(handlers = handlers.len(), "dispatching");

        for (id, handler) in handlers {
            if let Err(e) = handler(payload) {
                tracing::warn!(
                    event = name,
                    subscription = %id,
                    error = %e,
                    "event handler failed"
                );
            }
        }
    }

    /// Removes one subscription. Returns `true` if it existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.borrow_mut();
        let before = subscriptions.len();
        subscriptions.retain(|sub| sub.id != id);
        let removed = subscriptions.len() != before;
        if removed {
            tracing::trace!(subscription = %id, "subscription removed");
        }
        removed
    }

    /// Removes every subscription that would receive an event called `name`.
    ///
    /// Returns the number of subscriptions removed.
    pub fn clear_event(&self, name: &str) -> usize {
        let mut subscriptions = self.subscriptions.borrow_mut();
        let before = subscriptions.len();
        subscriptions.retain(|sub| !sub.matcher.matches(name));
        before - subscriptions.len()
    }

    /// Removes all subscriptions.
    pub fn clear(&self) {
        self.subscriptions.borrow_mut().clear();
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.borrow().len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriber_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StorefrontError;

    fn recorder() -> Rc<RefCell<Vec<String>>> {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn push(log: &Rc<RefCell<Vec<String>>>, entry: &str) -> impl Fn(&EventPayload) -> Result<()> {
        let log = Rc::clone(log);
        let entry = entry.to_string();
        move |_| {
            log.borrow_mut().push(entry.clone());
            Ok(())
        }
    }

    #[test]
    fn suffix_subscriber_fires_once_for_matching_event() {
        let bus = EventBus::new();
        let log = recorder();
        bus.subscribe(Matcher::suffix(":change"), push(&log, "h"));

        bus.emit("order.address:change", &EventPayload::Empty);
        assert_eq!(*log.borrow(), vec!["h"]);

        bus.emit("unrelated:event", &EventPayload::Empty);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn handlers_run_in_global_registration_order() {
        let bus = EventBus::new();
        let log = recorder();
        bus.subscribe("basket-changed", push(&log, "h1"));
        bus.subscribe(Matcher::suffix("-changed"), push(&log, "h2"));
        bus.subscribe("basket-changed", push(&log, "h3"));

        bus.emit("basket-changed", &EventPayload::Empty);

        assert_eq!(*log.borrow(), vec!["h1", "h2", "h3"]);
    }

    #[test]
    fn reentrant_emit_completes_depth_first() {
        let bus = Rc::new(EventBus::new());
        let log = recorder();

        let inner_bus = Rc::downgrade(&bus);
        let outer_log = Rc::clone(&log);
        bus.subscribe("outer", move |_| {
            outer_log.borrow_mut().push("outer-1".into());
            if let Some(bus) = inner_bus.upgrade() {
                bus.emit("inner", &EventPayload::Empty);
            }
            Ok(())
        });
        bus.subscribe("outer", push(&log, "outer-2"));
        bus.subscribe("inner", push(&log, "inner"));

        bus.emit("outer", &EventPayload::Empty);

        assert_eq!(*log.borrow(), vec!["outer-1", "inner", "outer-2"]);
    }

    #[test]
    fn failing_handler_does_not_stop_the_rest() {
        let bus = EventBus::new();
        let log = recorder();
        bus.subscribe("e", |_| Err(StorefrontError::Config("boom".into())));
        bus.subscribe("e", push(&log, "after"));

        bus.emit("e", &EventPayload::Empty);

        assert_eq!(*log.borrow(), vec!["after"]);
    }

    #[test]
    fn subscribing_during_emit_affects_only_later_emits() {
        let bus = Rc::new(EventBus::new());
        let log = recorder();

        let weak = Rc::downgrade(&bus);
        let late_log = Rc::clone(&log);
        bus.subscribe("e", move |_| {
            if let Some(bus) = weak.upgrade() {
                let late_log = Rc::clone(&late_log);
                bus.subscribe("e", move |_| {
                    late_log.borrow_mut().push("late".into());
                    Ok(())
                });
            }
            Ok(())
        });

        bus.emit("e", &EventPayload::Empty);
        assert!(log.borrow().is_empty());

        bus.emit("e", &EventPayload::Empty);
        assert_eq!(*log.borrow(), vec!["late"]);
    }

    #[test]
    fn unsubscribe_and_clear() {
        let bus = EventBus::new();
        let log = recorder();
        let first = bus.subscribe("a", push(&log, "a1"));
        bus.subscribe("a", push(&log, "a2"));
        bus.subscribe(Matcher::prefix("b"), push(&log, "b"));

        assert!(bus.unsubscribe(first));
        assert!(!bus.unsubscribe(first));
        bus.emit("a", &EventPayload::Empty);
        assert_eq!(*log.borrow(), vec!["a2"]);

        assert_eq!(bus.clear_event("basket-open"), 1);
        assert_eq!(bus.subscriber_count(), 1);

        bus.clear();
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn payload_reaches_handler() {
        let bus = EventBus::new();
        let seen = Rc::new(Cell::new(None));
        let sink = Rc::clone(&seen);
        bus.subscribe("order-set-payment-type", move |payload| {
            sink.set(Some(*payload.payment("order-set-payment-type")?));
            Ok(())
        });

        bus.emit(
            "order-set-payment-type",
            &EventPayload::Payment(crate::domain::PaymentMethod::Online),
        );

        assert_eq!(seen.get(), Some(crate::domain::PaymentMethod::Online));
    }
}
