//! Video playback control actions shared within a room.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::RoomId;

/// Playback command issued by a room member's player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VideoActionType {
    /// Start or resume playback at `timestamp`.
    Play,
    /// Pause playback at `timestamp`.
    Pause,
    /// Switch the room to a different video.
    ChangeVideo,
    /// Ask the host to push its current position.
    AskSync,
}

/// Video control action, relayed to `/topic/room/{roomId}/video`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoAction {
    /// Room the action applies to.
    #[schema(value_type = String)]
    pub room_id: RoomId,
    /// Display name of the member who issued the action.
    pub username: String,
    /// Action kind.
    #[serde(rename = "type")]
    pub action: VideoActionType,
    /// Video identifier, when the action carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    /// Playback position in seconds.
    #[serde(default)]
    pub timestamp: f64,
    /// Player backend discriminator (0 = YouTube).
    #[serde(default)]
    pub player_type: u8,
}
