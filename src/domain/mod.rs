//! Domain layer: identifiers, payloads, room registry and message broker.
//!
//! This module holds the server-side model: connection and room
//! identity, the chat and video payloads relayed between members, the
//! room registry that tracks membership, and the broker that fans
//! publications out to subscribers.

pub mod chat_message;
pub mod ids;
pub mod message_broker;
pub mod room;
pub mod room_registry;
pub mod topic;
pub mod video_action;

pub use chat_message::{ChatMessage, ChatMessageType};
pub use ids::{ConnectionId, RoomId};
pub use message_broker::{MessageBroker, Payload, Publication};
pub use room::{Member, RoomSnapshot, RoomSummary};
pub use room_registry::{JoinOutcome, RoomRegistry};
pub use topic::Topic;
pub use video_action::{VideoAction, VideoActionType};
