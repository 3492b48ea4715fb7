//! Publish/subscribe between the countdown and its listeners.
//!
//! Each event kind owns an ordered list of callbacks. Publishing runs the
//! callbacks registered for that kind in the order they subscribed.

use std::collections::HashMap;
use std::hash::Hash;

/// Events carry a cheap, hashable discriminant used for routing.
pub trait Event {
    type Kind: Copy + Eq + Hash;

    fn kind(&self) -> Self::Kind;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Callback<E> = Box<dyn FnMut(&E)>;

pub struct EventBus<E: Event> {
    subscribers: HashMap<E::Kind, Vec<(SubscriptionId, Callback<E>)>>,
    next_id: u64,
}

impl<E: Event> EventBus<E> {
    pub fn new() -> Self {
        Self {
            subscribers: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn subscribe<F>(&mut self, kind: E::Kind, callback: F) -> SubscriptionId
    where
        F: FnMut(&E) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers
            .entry(kind)
            .or_default()
            .push((id, Box::new(callback)));
        id
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        for callbacks in self.subscribers.values_mut() {
            if let Some(pos) = callbacks.iter().position(|(sub, _)| *sub == id) {
                callbacks.remove(pos);
                return true;
            }
        }
        false
    }

    /// Deliver `event` to every subscriber of its kind. Returns how many ran.
    pub fn publish(&mut self, event: &E) -> usize {
        let Some(callbacks) = self.subscribers.get_mut(&event.kind()) else {
            return 0;
        };
        for (_, callback) in callbacks.iter_mut() {
            callback(event);
        }
        callbacks.len()
    }

    pub fn subscriber_count(&self, kind: E::Kind) -> usize {
        self.subscribers.get(&kind).map_or(0, Vec::len)
    }

    pub fn clear(&mut self) {
        self.subscribers.clear();
    }
}

impl<E: Event> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> std::fmt::Debug for EventBus<E>
where
    E::Kind: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut counts: Vec<_> = self
            .subscribers
            .iter()
            .map(|(kind, callbacks)| (*kind, callbacks.len()))
            .collect();
        counts.sort_by_key(|(kind, _)| format!("{kind:?}"));
        f.debug_struct("EventBus")
            .field("subscribers", &counts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Kind {
        Ping,
        Pong,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Message {
        Ping(u32),
        Pong,
    }

    impl Event for Message {
        type Kind = Kind;

        fn kind(&self) -> Kind {
            match self {
                Message::Ping(_) => Kind::Ping,
                Message::Pong => Kind::Pong,
            }
        }
    }

    #[test]
    fn subscribers_run_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        for tag in ["first", "second", "third"] {
            let log = log.clone();
            bus.subscribe(Kind::Ping, move |msg: &Message| {
                log.borrow_mut().push((tag, msg.clone()));
            });
        }

        assert_eq!(bus.publish(&Message::Ping(7)), 3);
        let log = log.borrow();
        let tags: Vec<_> = log.iter().map(|(tag, _)| *tag).collect();
        assert_eq!(tags, ["first", "second", "third"]);
        assert!(log.iter().all(|(_, msg)| *msg == Message::Ping(7)));
    }

    #[test]
    fn events_only_reach_their_kind() {
        let pings = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        {
            let pings = pings.clone();
            bus.subscribe(Kind::Ping, move |_: &Message| *pings.borrow_mut() += 1);
        }

        assert_eq!(bus.publish(&Message::Pong), 0);
        assert_eq!(*pings.borrow(), 0);
        bus.publish(&Message::Ping(1));
        assert_eq!(*pings.borrow(), 1);
    }

    #[test]
    fn unsubscribe_removes_only_that_callback() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        let a = {
            let hits = hits.clone();
            bus.subscribe(Kind::Pong, move |_: &Message| hits.borrow_mut().push('a'))
        };
        {
            let hits = hits.clone();
            bus.subscribe(Kind::Pong, move |_: &Message| hits.borrow_mut().push('b'));
        }

        assert!(bus.unsubscribe(a));
        assert!(!bus.unsubscribe(a));
        assert_eq!(bus.subscriber_count(Kind::Pong), 1);

        bus.publish(&Message::Pong);
        assert_eq!(*hits.borrow(), vec!['b']);
    }

    #[test]
    fn subscription_ids_are_unique() {
        let mut bus: EventBus<Message> = EventBus::new();
        let a = bus.subscribe(Kind::Ping, |_| {});
        let b = bus.subscribe(Kind::Pong, |_| {});
        let c = bus.subscribe(Kind::Ping, |_| {});
        assert!(a != b && b != c && a != c);
    }
}
