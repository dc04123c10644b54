//! Room state held by the registry and the snapshots published from it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::video_action::{VideoAction, VideoActionType};
use super::{ConnectionId, RoomId};

#[derive(Debug, Clone)]
struct MemberEntry {
    username: String,
    joined_seq: u64,
}

/// Last known playback position of a room.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackState {
    /// Video currently loaded, if any member has picked one.
    pub video_id: Option<String>,
    /// Position in seconds at the last recorded action.
    pub position: f64,
    /// Whether the last recorded action left the room playing.
    pub is_playing: bool,
}

impl PlaybackState {
    /// Applies a video action. `ASK_SYNC` carries no state.
    pub fn apply(&mut self, action: &VideoAction) {
        match action.action {
            VideoActionType::Play | VideoActionType::Pause => {
                self.is_playing = action.action == VideoActionType::Play;
                self.position = action.timestamp;
                if action.video_id.is_some() {
                    self.video_id.clone_from(&action.video_id);
                }
            }
            VideoActionType::ChangeVideo => {
                self.video_id.clone_from(&action.video_id);
                self.position = action.timestamp;
                self.is_playing = false;
            }
            VideoActionType::AskSync => {}
        }
    }
}

/// Mutable room aggregate. Only ever touched under the registry lock.
#[derive(Debug)]
pub struct RoomState {
    room_id: RoomId,
    members: HashMap<ConnectionId, MemberEntry>,
    playback: PlaybackState,
    created_at: DateTime<Utc>,
    revision: u64,
}

impl RoomState {
    /// Creates an empty room.
    #[must_use]
    pub fn new(room_id: RoomId) -> Self {
        Self {
            room_id,
            members: HashMap::new(),
            playback: PlaybackState::default(),
            created_at: Utc::now(),
            revision: 0,
        }
    }

    /// Adds a member, or renames an existing one keeping its join order.
    ///
    /// `seq` comes from the registry-wide counter and becomes both the join
    /// order and the room's revision. Returns `true` if the connection was
    /// not a member before.
    pub fn insert(&mut self, connection_id: ConnectionId, username: String, seq: u64) -> bool {
        self.revision = seq;
        if let Some(entry) = self.members.get_mut(&connection_id) {
            entry.username = username;
            return false;
        }
        self.members.insert(
            connection_id,
            MemberEntry {
                username,
                joined_seq: seq,
            },
        );
        true
    }

    /// Removes a member, stamping the room with revision `seq`.
    ///
    /// Returns `true` if it was present; otherwise nothing changes.
    pub fn remove(&mut self, connection_id: &ConnectionId, seq: u64) -> bool {
        let removed = self.members.remove(connection_id).is_some();
        if removed {
            self.revision = seq;
        }
        removed
    }

    /// Returns `true` if the connection is a member.
    #[must_use]
    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.members.contains_key(connection_id)
    }

    /// Returns `true` if nobody is left in the room.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Mutable access to the playback state.
    pub fn playback_mut(&mut self) -> &mut PlaybackState {
        &mut self.playback
    }

    /// Display name of the earliest-joined member still present.
    #[must_use]
    pub fn host_name(&self) -> Option<&str> {
        self.members
            .values()
            .min_by_key(|entry| entry.joined_seq)
            .map(|entry| entry.username.as_str())
    }

    /// Copies the room into a publishable snapshot, members in join order.
    #[must_use]
    pub fn snapshot(&self) -> RoomSnapshot {
        let mut ordered: Vec<(&ConnectionId, &MemberEntry)> = self.members.iter().collect();
        ordered.sort_by_key(|(_, entry)| entry.joined_seq);
        RoomSnapshot {
            room_id: self.room_id.clone(),
            members: ordered
                .into_iter()
                .map(|(connection_id, entry)| Member {
                    connection_id: connection_id.clone(),
                    username: entry.username.clone(),
                })
                .collect(),
            host_name: self.host_name().map(str::to_string),
            current_video_id: self.playback.video_id.clone(),
            current_time: self.playback.position,
            is_playing: self.playback.is_playing,
            revision: self.revision,
        }
    }

    /// Lightweight listing entry.
    #[must_use]
    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            room_id: self.room_id.clone(),
            member_count: self.members.len(),
            host_name: self.host_name().map(str::to_string),
            created_at: self.created_at,
        }
    }
}

/// One member of a room as seen by subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Connection the member is attached through.
    #[schema(value_type = String)]
    pub connection_id: ConnectionId,
    /// Display name given at join time.
    pub username: String,
}

/// Immutable copy of a room, published after every membership change.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    /// Room identifier.
    #[schema(value_type = String)]
    pub room_id: RoomId,
    /// Members in join order.
    pub members: Vec<Member>,
    /// Display name of the current host.
    pub host_name: Option<String>,
    /// Video currently loaded in the room.
    pub current_video_id: Option<String>,
    /// Last recorded playback position in seconds.
    pub current_time: f64,
    /// Whether the room was playing at the last recorded action.
    pub is_playing: bool,
    /// Membership revision. Strictly increases with every member change
    /// across all rooms, so of two snapshots of one room the higher
    /// revision is the newer state.
    pub revision: u64,
}

impl RoomSnapshot {
    /// Returns `true` if the connection is listed as a member.
    #[must_use]
    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.members
            .iter()
            .any(|member| &member.connection_id == connection_id)
    }

    /// Connection IDs of all members in join order.
    #[must_use]
    pub fn member_ids(&self) -> Vec<ConnectionId> {
        self.members
            .iter()
            .map(|member| member.connection_id.clone())
            .collect()
    }
}

/// Lightweight room description for list endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    /// Room identifier.
    #[schema(value_type = String)]
    pub room_id: RoomId,
    /// Number of connected members.
    pub member_count: usize,
    /// Display name of the current host.
    pub host_name: Option<String>,
    /// First join time.
    pub created_at: DateTime<Utc>,
}
