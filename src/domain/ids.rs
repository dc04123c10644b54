//! Type-safe connection and room identifiers.
//!
//! Both are string newtypes so that a connection ID can never be passed
//! where a room ID is expected. [`RoomId`] is validated on construction
//! because it is embedded in topic paths.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::HubError;

/// Opaque identifier of one live transport session.
///
/// Generated by the WebSocket layer on connect (UUID v4 text) and
/// dropped on disconnect.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Creates a new random `ConnectionId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ConnectionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ConnectionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Name of a room.
///
/// Non-empty after trimming and free of `/`, so it can be spliced into
/// `/topic/room/{roomId}/...` without ambiguity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomId(String);

impl RoomId {
    /// Validates and wraps a room name.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::InvalidRoomId`] if the name is blank or
    /// contains `/`.
    pub fn new(raw: impl Into<String>) -> Result<Self, HubError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.contains('/') {
            return Err(HubError::InvalidRoomId(raw));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the room name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RoomId {
    type Error = HubError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<RoomId> for String {
    fn from(id: RoomId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn new_connection_ids_are_unique() {
        let a = ConnectionId::new();
        let b = ConnectionId::new();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn room_id_is_trimmed() {
        let Ok(id) = RoomId::new("  movie1 ") else {
            panic!("valid room id");
        };
        assert_eq!(id.as_str(), "movie1");
    }

    #[test]
    fn blank_room_id_is_rejected() {
        assert!(RoomId::new("").is_err());
        assert!(RoomId::new("   ").is_err());
    }

    #[test]
    fn room_id_with_slash_is_rejected() {
        assert!(matches!(
            RoomId::new("a/b"),
            Err(HubError::InvalidRoomId(_))
        ));
    }

    #[test]
    fn room_id_deserialization_validates() {
        let ok: Result<RoomId, _> = serde_json::from_str("\"movie1\"");
        assert!(ok.is_ok());
        let bad: Result<RoomId, _> = serde_json::from_str("\"\"");
        assert!(bad.is_err());
    }

    #[test]
    fn connection_id_serializes_as_plain_string() {
        let id = ConnectionId::from("abc");
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, "\"abc\"");
    }
}
