//! WebSocket frame types: client commands and the server envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Publication;
use crate::error::HubError;

/// Frames a client can send, tagged by `command`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Start receiving publications on a topic.
    Subscribe {
        /// Client-chosen correlation ID, echoed in the receipt.
        #[serde(default)]
        id: Option<String>,
        /// Topic path, e.g. `/topic/room/movie1/chat`.
        destination: String,
    },
    /// Stop receiving publications on a topic.
    Unsubscribe {
        /// Client-chosen correlation ID, echoed in the receipt.
        #[serde(default)]
        id: Option<String>,
        /// Topic path.
        destination: String,
    },
    /// Deliver a body to an application destination.
    Send {
        /// Client-chosen correlation ID, echoed in the receipt.
        #[serde(default)]
        id: Option<String>,
        /// Application destination, e.g. `/app/chat.sendMessage`.
        destination: String,
        /// Destination-specific JSON body.
        #[serde(default)]
        body: serde_json::Value,
    },
}

/// Body accepted by `/app/room/{roomId}/join`: a bare username string or
/// an object carrying one.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum JoinBody {
    /// `"alice"`
    Name(String),
    /// `{"username": "alice"}`
    Object {
        /// Display name.
        username: String,
    },
}

impl JoinBody {
    /// Returns the display name.
    #[must_use]
    pub fn into_username(self) -> String {
        match self {
            Self::Name(username) | Self::Object { username } => username,
        }
    }
}

/// Discriminator for server frames.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FrameType {
    /// A publication on a subscribed topic.
    Message,
    /// Acknowledgement of a client command.
    Receipt,
    /// Rejected client command.
    Error,
}

/// Envelope for every server → client frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerFrame {
    /// Echoed client ID for receipts/errors; server-generated for messages.
    pub id: String,
    /// Frame type discriminator.
    #[serde(rename = "type")]
    pub frame_type: FrameType,
    /// Topic or destination the frame relates to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// ISO-8601 timestamp.
    pub timestamp: DateTime<Utc>,
    /// Frame-specific payload.
    pub payload: serde_json::Value,
}

impl ServerFrame {
    /// Wraps a broker publication for delivery to a subscriber.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Internal`] if the payload cannot be serialized.
    pub fn message(publication: &Publication) -> Result<Self, HubError> {
        let payload = serde_json::to_value(&publication.payload)
            .map_err(|e| HubError::Internal(e.to_string()))?;
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            frame_type: FrameType::Message,
            destination: Some(publication.topic.to_string()),
            timestamp: Utc::now(),
            payload,
        })
    }

    /// Acknowledges a client command.
    #[must_use]
    pub fn receipt(
        id: Option<String>,
        destination: Option<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: id.unwrap_or_default(),
            frame_type: FrameType::Receipt,
            destination,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Reports a rejected client command.
    #[must_use]
    pub fn error(id: Option<String>, destination: Option<String>, err: &HubError) -> Self {
        Self {
            id: id.unwrap_or_default(),
            frame_type: FrameType::Error,
            destination,
            timestamp: Utc::now(),
            payload: serde_json::to_value(err.to_body()).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::{ChatMessage, Payload, Topic};

    #[test]
    fn parses_send_frame() {
        let raw = json!({
            "command": "send",
            "destination": "/app/chat.sendMessage",
            "body": {"sender": "A", "text": "hi"}
        });
        let Ok(ClientFrame::Send { destination, body, id }) = serde_json::from_value(raw) else {
            panic!("expected send frame");
        };
        assert_eq!(destination, "/app/chat.sendMessage");
        assert_eq!(body["text"], "hi");
        assert!(id.is_none());
    }

    #[test]
    fn unknown_command_is_rejected() {
        let raw = json!({"command": "kick", "destination": "/topic/public"});
        assert!(serde_json::from_value::<ClientFrame>(raw).is_err());
    }

    #[test]
    fn join_body_accepts_both_shapes() {
        let Ok(bare) = serde_json::from_value::<JoinBody>(json!("alice")) else {
            panic!("bare name");
        };
        let Ok(obj) = serde_json::from_value::<JoinBody>(json!({"username": "bob"})) else {
            panic!("object");
        };
        assert_eq!(bare.into_username(), "alice");
        assert_eq!(obj.into_username(), "bob");
    }

    #[test]
    fn message_frame_carries_topic_and_payload() {
        let publication = Publication {
            topic: Topic::public(),
            payload: Payload::Chat(ChatMessage::new("A", "hi")),
        };
        let Ok(frame) = ServerFrame::message(&publication) else {
            panic!("serialization failed");
        };
        assert_eq!(frame.frame_type, FrameType::Message);
        assert_eq!(frame.destination.as_deref(), Some("/topic/public"));
        assert_eq!(frame.payload, json!({"sender": "A", "text": "hi"}));
    }

    #[test]
    fn error_frame_uses_error_body() {
        let frame = ServerFrame::error(
            Some("req-1".to_string()),
            None,
            &HubError::UnknownDestination("/app/nope".to_string()),
        );
        assert_eq!(frame.id, "req-1");
        assert_eq!(frame.payload["code"], 2003);
    }
}
