//! Per-connection subscription manager.
//!
//! Tracks which topics a WebSocket client is subscribed to and provides
//! server-side filtering of broker publications.

use std::collections::HashSet;

use crate::domain::Topic;

/// Manages the set of topic subscriptions for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    topics: HashSet<Topic>,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a topic. Returns `false` if it was already subscribed.
    pub fn subscribe(&mut self, topic: Topic) -> bool {
        self.topics.insert(topic)
    }

    /// Removes a topic. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, topic: &Topic) -> bool {
        self.topics.remove(topic)
    }

    /// Returns `true` if publications on `topic` should be forwarded.
    #[must_use]
    pub fn matches(&self, topic: &Topic) -> bool {
        self.topics.contains(topic)
    }

    /// Returns the number of subscribed topics.
    #[must_use]
    pub fn count(&self) -> usize {
        self.topics.len()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::RoomId;

    fn room_chat(name: &str) -> Topic {
        let Ok(id) = RoomId::new(name) else {
            panic!("valid room id");
        };
        Topic::room_chat(&id)
    }

    #[test]
    fn empty_matches_nothing() {
        let mgr = SubscriptionManager::new();
        assert!(!mgr.matches(&Topic::public()));
    }

    #[test]
    fn subscribe_specific_topic() {
        let mut mgr = SubscriptionManager::new();
        assert!(mgr.subscribe(room_chat("movie1")));
        assert!(mgr.matches(&room_chat("movie1")));
        assert!(!mgr.matches(&room_chat("movie2")));
    }

    #[test]
    fn duplicate_subscribe_is_reported() {
        let mut mgr = SubscriptionManager::new();
        assert!(mgr.subscribe(Topic::public()));
        assert!(!mgr.subscribe(Topic::public()));
        assert_eq!(mgr.count(), 1);
    }

    #[test]
    fn unsubscribe_removes_topic() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(Topic::public());
        assert!(mgr.unsubscribe(&Topic::public()));
        assert!(!mgr.matches(&Topic::public()));
        assert!(!mgr.unsubscribe(&Topic::public()));
    }
}
