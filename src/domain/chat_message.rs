//! Chat messages relayed between room members.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::RoomId;
use crate::error::HubError;

/// Kind of chat message as sent by the browser client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatMessageType {
    /// Regular chat line.
    Chat,
    /// Announcement that a user joined.
    Join,
    /// Announcement that a user left.
    Leave,
}

/// A chat message.
///
/// The client's JSON object is kept as received and serialized back
/// untouched: key names, unknown fields, spacing inside `roomId` and the
/// `timestamp` representation all survive the relay. Decoding only checks
/// that the fields the hub relies on are present and well formed.
///
/// Required: `sender` (string) and the text under either `text` or
/// `content`. Optional: `type` (`CHAT` | `JOIN` | `LEAVE`) and `roomId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct ChatMessage {
    fields: Map<String, Value>,
    message_type: Option<ChatMessageType>,
    room_id: Option<RoomId>,
}

impl ChatMessage {
    /// Builds a plain `{"sender", "text"}` message.
    #[must_use]
    pub fn new(sender: impl Into<String>, text: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("sender".to_string(), Value::String(sender.into()));
        fields.insert("text".to_string(), Value::String(text.into()));
        Self {
            fields,
            message_type: None,
            room_id: None,
        }
    }

    /// Addresses the message to a room.
    #[must_use]
    pub fn with_room_id(mut self, room_id: RoomId) -> Self {
        self.fields
            .insert("roomId".to_string(), Value::String(room_id.to_string()));
        self.room_id = Some(room_id);
        self
    }

    /// Message kind, if the client sent one.
    #[must_use]
    pub const fn message_type(&self) -> Option<ChatMessageType> {
        self.message_type
    }

    /// Display name of the sender.
    #[must_use]
    pub fn sender(&self) -> &str {
        self.fields
            .get("sender")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Message text, whichever key carried it.
    #[must_use]
    pub fn text(&self) -> &str {
        text_field(&self.fields).unwrap_or_default()
    }

    /// Room the client addressed explicitly, normalized for routing.
    #[must_use]
    pub const fn room_id(&self) -> Option<&RoomId> {
        self.room_id.as_ref()
    }

    /// The message exactly as it goes out on the wire.
    #[must_use]
    pub const fn as_json(&self) -> &Map<String, Value> {
        &self.fields
    }
}

fn text_field(fields: &Map<String, Value>) -> Option<&str> {
    fields
        .get("text")
        .or_else(|| fields.get("content"))
        .and_then(Value::as_str)
}

impl TryFrom<Map<String, Value>> for ChatMessage {
    type Error = HubError;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        if !fields.get("sender").is_some_and(Value::is_string) {
            return Err(HubError::MalformedFrame(
                "chat message needs a string `sender`".to_string(),
            ));
        }
        if text_field(&fields).is_none() {
            return Err(HubError::MalformedFrame(
                "chat message needs a string `text` or `content`".to_string(),
            ));
        }

        let message_type = match fields.get("type") {
            None | Some(Value::Null) => None,
            Some(raw) => Some(ChatMessageType::deserialize(raw).map_err(|err| {
                HubError::MalformedFrame(format!("chat message type: {err}"))
            })?),
        };
        let room_id = match fields.get("roomId") {
            None | Some(Value::Null) => None,
            Some(Value::String(raw)) => Some(RoomId::new(raw.as_str())?),
            Some(other) => return Err(HubError::InvalidRoomId(other.to_string())),
        };

        Ok(Self {
            fields,
            message_type,
            room_id,
        })
    }
}

impl From<ChatMessage> for Map<String, Value> {
    fn from(message: ChatMessage) -> Self {
        message.fields
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(input: &Value) -> ChatMessage {
        let Ok(msg) = serde_json::from_value::<ChatMessage>(input.clone()) else {
            panic!("valid chat message: {input}");
        };
        msg
    }

    #[test]
    fn minimal_message_round_trips_verbatim() {
        let input = json!({"sender": "A", "text": "hi"});
        let msg = decode(&input);
        assert_eq!(msg.message_type(), None);
        assert_eq!(serde_json::to_value(&msg).ok(), Some(input));
    }

    #[test]
    fn browser_payload_keeps_content_key() {
        let input = json!({"type": "CHAT", "sender": "bob", "content": "hello"});
        let msg = decode(&input);
        assert_eq!(msg.text(), "hello");
        assert_eq!(msg.message_type(), Some(ChatMessageType::Chat));
        assert_eq!(serde_json::to_value(&msg).ok(), Some(input));
    }

    #[test]
    fn unknown_fields_and_numeric_timestamps_survive() {
        let input = json!({
            "sender": "A",
            "text": "hi",
            "timestamp": 1_700_000_000_000_u64,
            "color": "#ff0000"
        });
        assert_eq!(serde_json::to_value(decode(&input)).ok(), Some(input));
    }

    #[test]
    fn room_id_is_normalized_for_routing_only() {
        let input = json!({"sender": "A", "roomId": " movie1 ", "text": "hi"});
        let msg = decode(&input);
        assert_eq!(msg.room_id().map(RoomId::as_str), Some("movie1"));
        assert_eq!(msg.as_json().get("roomId"), Some(&json!(" movie1 ")));
    }

    #[test]
    fn with_room_id_sets_wire_field() {
        let Ok(room_id) = RoomId::new("movie1") else {
            panic!("valid room id");
        };
        let msg = ChatMessage::new("A", "hi").with_room_id(room_id);
        assert_eq!(
            serde_json::to_value(&msg).ok(),
            Some(json!({"sender": "A", "text": "hi", "roomId": "movie1"}))
        );
    }

    #[test]
    fn malformed_messages_are_rejected() {
        for input in [
            json!({"sender": "A"}),
            json!({"text": "hi"}),
            json!({"sender": 7, "text": "hi"}),
            json!({"sender": "A", "text": "hi", "type": "SHOUT"}),
            json!({"sender": "A", "text": "hi", "roomId": "a/b"}),
            json!(["sender", "A"]),
        ] {
            assert!(serde_json::from_value::<ChatMessage>(input).is_err());
        }
    }
}
