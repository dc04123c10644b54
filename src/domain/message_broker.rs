//! Topic-addressed broadcast channel.
//!
//! [`MessageBroker`] wraps a [`tokio::sync::broadcast`] channel of
//! [`Publication`]s. Every WebSocket connection holds one receiver and
//! forwards only the publications whose topic it subscribed to.

use serde::Serialize;
use tokio::sync::broadcast;

use super::room::RoomSnapshot;
use super::{ChatMessage, Topic, VideoAction};

/// Body of a publication, serialized without any wrapper.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// Relayed chat message.
    Chat(ChatMessage),
    /// Updated room state after a membership change.
    Room(RoomSnapshot),
    /// Relayed video control action.
    Video(VideoAction),
}

/// One message published on one topic.
#[derive(Debug, Clone)]
pub struct Publication {
    /// Destination topic.
    pub topic: Topic,
    /// Message body.
    pub payload: Payload,
}

/// Broadcast bus for [`Publication`]s.
///
/// When the ring buffer is full, the oldest publications are dropped for
/// lagging receivers. Publishing never blocks and never fails: a
/// publication with nobody listening is logged and discarded.
#[derive(Debug, Clone)]
pub struct MessageBroker {
    sender: broadcast::Sender<Publication>,
}

impl MessageBroker {
    /// Creates a new `MessageBroker` with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes a payload on a topic.
    ///
    /// Returns the number of receivers the publication reached.
    pub fn publish(&self, topic: Topic, payload: Payload) -> usize {
        match self.sender.send(Publication { topic, payload }) {
            Ok(receivers) => {
                tracing::trace!(receivers, "publication sent");
                receivers
            }
            Err(broadcast::error::SendError(publication)) => {
                tracing::debug!(topic = %publication.topic, "no subscribers, publication dropped");
                0
            }
        }
    }

    /// Creates a new receiver that will see all future publications.
    ///
    /// Each WebSocket connection should call this once on connect.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Publication> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
