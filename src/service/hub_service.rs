//! Broadcast hub: turns inbound events into registry updates and
//! publications.

use std::sync::Arc;

use crate::config::ChatAddressing;
use crate::domain::{
    ChatMessage, ConnectionId, MessageBroker, Payload, RoomId, RoomRegistry, RoomSnapshot, Topic,
    VideoAction,
};
use crate::error::HubError;

/// Orchestration layer between the transport and the pub/sub layer.
///
/// Owns references to [`RoomRegistry`] for membership state and
/// [`MessageBroker`] for fan-out. Every method follows the same pattern:
/// update the registry (lock held only inside the registry call), then
/// publish the resulting snapshot with no lock held.
#[derive(Debug, Clone)]
pub struct BroadcastHub {
    registry: Arc<RoomRegistry>,
    broker: MessageBroker,
    addressing: ChatAddressing,
}

impl BroadcastHub {
    /// Creates a new `BroadcastHub`.
    #[must_use]
    pub fn new(
        registry: Arc<RoomRegistry>,
        broker: MessageBroker,
        addressing: ChatAddressing,
    ) -> Self {
        Self {
            registry,
            broker,
            addressing,
        }
    }

    /// Returns a reference to the inner [`RoomRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<RoomRegistry> {
        &self.registry
    }

    /// Returns a reference to the inner [`MessageBroker`].
    #[must_use]
    pub fn broker(&self) -> &MessageBroker {
        &self.broker
    }

    /// Returns the configured chat addressing mode.
    #[must_use]
    pub const fn addressing(&self) -> ChatAddressing {
        self.addressing
    }

    /// Registers a freshly opened transport connection.
    pub async fn on_connect(&self, connection_id: &ConnectionId) {
        self.registry
            .register_connection(connection_id.clone())
            .await;
        tracing::debug!(%connection_id, "connection registered");
    }

    /// Relays a chat message unchanged and returns it.
    ///
    /// The published JSON is the client's object as received. The topic is
    /// chosen by [`Topic::chat`]: in room mode the message's own `roomId`
    /// wins, then the sender's current room.
    pub async fn on_chat_message(
        &self,
        connection_id: &ConnectionId,
        message: ChatMessage,
    ) -> ChatMessage {
        let room_id = match (self.addressing, message.room_id()) {
            (ChatAddressing::Room, None) => self.registry.room_of(connection_id).await,
            (_, explicit) => explicit.cloned(),
        };
        let topic = Topic::chat(self.addressing, room_id.as_ref());

        let receivers = self
            .broker
            .publish(topic.clone(), Payload::Chat(message.clone()));
        tracing::debug!(%connection_id, %topic, receivers, "chat message relayed");
        message
    }

    /// Joins a room and announces the new member list.
    ///
    /// If the connection switched rooms, the room it left is told too,
    /// unless nobody is left there.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::UnknownConnection`] if the connection is not
    /// registered.
    pub async fn on_join(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
        username: String,
    ) -> Result<RoomSnapshot, HubError> {
        let outcome = self.registry.join(connection_id, room_id, username).await?;

        if let Some(previous) = outcome.previous {
            tracing::info!(
                %connection_id,
                room_id = %previous.room_id,
                "user switched out of room"
            );
            self.publish_room(previous);
        }

        tracing::info!(
            %connection_id,
            room_id = %outcome.room.room_id,
            members = outcome.room.members.len(),
            "user joined room"
        );
        self.publish_room(outcome.room.clone());
        Ok(outcome.room)
    }

    /// Records and relays a video control action to the room's video topic.
    pub async fn on_video_action(&self, action: VideoAction) -> VideoAction {
        if !self.registry.record_playback(&action).await {
            tracing::debug!(room_id = %action.room_id, "video action for unknown room");
        }
        let topic = Topic::room_video(&action.room_id);
        let receivers = self
            .broker
            .publish(topic.clone(), Payload::Video(action.clone()));
        tracing::debug!(%topic, action = ?action.action, receivers, "video action relayed");
        action
    }

    /// Handles a transport disconnect.
    ///
    /// Removes the connection and, if it was in a room, publishes the
    /// room's updated state. Unknown or unjoined connections are a no-op,
    /// so duplicate disconnect notifications are harmless. The final
    /// snapshot of a room that just emptied is returned but not published.
    pub async fn on_disconnect(&self, connection_id: &ConnectionId) -> Option<RoomSnapshot> {
        let room = self.registry.drop_connection(connection_id).await?;
        tracing::info!(
            %connection_id,
            room_id = %room.room_id,
            "user disconnected from room"
        );
        self.publish_room(room.clone());
        Some(room)
    }

    /// Publishes a room snapshot. Snapshots may reach subscribers out of
    /// order when updates race; `revision` tells them which one is newest.
    fn publish_room(&self, room: RoomSnapshot) {
        let topic = Topic::room_chat(&room.room_id);
        if room.members.is_empty() {
            tracing::debug!(%topic, "room emptied, snapshot not published");
            return;
        }
        let receivers = self.broker.publish(topic.clone(), Payload::Room(room));
        tracing::debug!(%topic, receivers, "room state published");
    }
}
