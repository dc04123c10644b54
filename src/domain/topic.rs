//! Publish/subscribe topic names.

use std::fmt;

use serde::Serialize;

use super::RoomId;
use crate::config::ChatAddressing;
use crate::error::HubError;

const TOPIC_PREFIX: &str = "/topic/";
const PUBLIC_TOPIC: &str = "/topic/public";

/// Named publish/subscribe channel.
///
/// All subscribers of a topic receive every publication on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    /// Global chat topic, `/topic/public`.
    #[must_use]
    pub fn public() -> Self {
        Self(PUBLIC_TOPIC.to_string())
    }

    /// Room chat and room-state topic, `/topic/room/{roomId}/chat`.
    #[must_use]
    pub fn room_chat(room_id: &RoomId) -> Self {
        Self(format!("/topic/room/{room_id}/chat"))
    }

    /// Room video-control topic, `/topic/room/{roomId}/video`.
    #[must_use]
    pub fn room_video(room_id: &RoomId) -> Self {
        Self(format!("/topic/room/{room_id}/video"))
    }

    /// Resolves the topic a chat message is published on.
    ///
    /// With [`ChatAddressing::Room`] and a known room the room's chat
    /// topic is used; everything else falls back to the public topic.
    #[must_use]
    pub fn chat(addressing: ChatAddressing, room_id: Option<&RoomId>) -> Self {
        match (addressing, room_id) {
            (ChatAddressing::Room, Some(room_id)) => Self::room_chat(room_id),
            _ => Self::public(),
        }
    }

    /// Parses a client-supplied subscription destination.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::InvalidTopic`] unless the destination starts
    /// with `/topic/` and names something after the prefix.
    pub fn parse(destination: &str) -> Result<Self, HubError> {
        match destination.strip_prefix(TOPIC_PREFIX) {
            Some(rest) if !rest.is_empty() => Ok(Self(destination.to_string())),
            _ => Err(HubError::InvalidTopic(destination.to_string())),
        }
    }

    /// Returns the topic path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
