//! Observer registry for store change notifications.
//!
//! Push-based: observers register callbacks against a [`Topic`] and are
//! invoked synchronously, in subscription order, after each applied update.
//! The registry holds the callbacks until they are unsubscribed or the
//! store is dropped.

use std::fmt;

use super::events::{StoreEvent, SubscriptionId, Topic};

type Callback = Box<dyn FnMut(&StoreEvent<'_>) + 'static>;

struct Subscriber {
    id: SubscriptionId,
    topic: Topic,
    callback: Callback,
}

/// Single-threaded registry of store observers.
#[derive(Default)]
pub struct ObserverRegistry {
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl ObserverRegistry {
    /// Create a registry with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for `topic`.
    pub fn subscribe(
        &mut self,
        topic: Topic,
        callback: impl FnMut(&StoreEvent<'_>) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            topic,
            callback: Box::new(callback),
        });
        id
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|subscriber| subscriber.id != id);
        self.subscribers.len() != before
    }

    /// Dispatch an event to every subscriber whose topic matches.
    ///
    /// Returns how many callbacks ran.
    pub fn notify(&mut self, event: &StoreEvent<'_>) -> usize {
        let mut notified = 0;
        for subscriber in self.subscribers.iter_mut() {
            if subscriber.topic.matches(event) {
                (subscriber.callback)(event);
                notified += 1;
            }
        }
        notified
    }

    /// Get the number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Clear all subscribers.
    pub fn clear(&mut self) {
        self.subscribers.clear();
    }
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("subscribers", &self.subscribers.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheets5e_domain::{CharacterRecord, FieldPath, SheetData, Slug};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn record(slug: &Slug) -> CharacterRecord {
        CharacterRecord {
            id: 1,
            player_id: 1,
            party_id: 1,
            name: "Douglas McTrickfoot".to_string(),
            slug: slug.clone(),
            class_: "Artilleur".to_string(),
            level: 4,
            data: SheetData::new(),
        }
    }

    #[test]
    fn test_subscribe_and_notify() {
        let slug = Slug::new("douglas-mctrickfoot").unwrap();
        let record = record(&slug);
        let changed = vec![FieldPath::data("Charismamod")];
        let event = StoreEvent {
            slug: &slug,
            changed: &changed,
            record: &record,
        };

        let mut registry = ObserverRegistry::new();
        let count = Rc::new(RefCell::new(0));
        let count_clone = Rc::clone(&count);
        registry.subscribe(Topic::All, move |_event| {
            *count_clone.borrow_mut() += 1;
        });

        assert_eq!(registry.subscriber_count(), 1);
        assert_eq!(registry.notify(&event), 1);
        assert_eq!(registry.notify(&event), 1);
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn test_only_matching_topics_fire() {
        let slug = Slug::new("douglas-mctrickfoot").unwrap();
        let record = record(&slug);
        let changed = vec![FieldPath::data("Strengthscore")];
        let event = StoreEvent {
            slug: &slug,
            changed: &changed,
            record: &record,
        };

        let mut registry = ObserverRegistry::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_str = Rc::clone(&seen);
        registry.subscribe(Topic::data_field(slug.clone(), "Strengthscore"), move |_| {
            seen_str.borrow_mut().push("strength");
        });
        let seen_cha = Rc::clone(&seen);
        registry.subscribe(Topic::data_field(slug.clone(), "Charismamod"), move |_| {
            seen_cha.borrow_mut().push("charisma");
        });

        assert_eq!(registry.notify(&event), 1);
        assert_eq!(*seen.borrow(), vec!["strength"]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut registry = ObserverRegistry::new();
        let first = registry.subscribe(Topic::All, |_| {});
        let second = registry.subscribe(Topic::All, |_| {});
        assert_ne!(first, second);

        assert!(registry.unsubscribe(first));
        assert!(!registry.unsubscribe(first));
        assert_eq!(registry.subscriber_count(), 1);

        registry.clear();
        assert_eq!(registry.subscriber_count(), 0);
    }
}
