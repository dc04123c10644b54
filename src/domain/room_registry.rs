//! Authoritative connection → room and room → members mapping.
//!
//! [`RoomRegistry`] keeps the live connection table, the membership index
//! and the rooms themselves behind a single [`tokio::sync::Mutex`], so
//! both directions of the mapping always change together. Callers get
//! [`RoomSnapshot`]s back and publish them after the lock is released.

use std::collections::{HashMap, HashSet};

use tokio::sync::Mutex;

use super::room::{RoomSnapshot, RoomState, RoomSummary};
use super::video_action::VideoAction;
use super::{ConnectionId, RoomId};
use crate::error::HubError;

/// Result of a [`RoomRegistry::join`].
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    /// Joined room after the change.
    pub room: RoomSnapshot,
    /// Room the connection was moved out of, if it switched rooms.
    pub previous: Option<RoomSnapshot>,
}

#[derive(Debug, Default)]
struct RegistryState {
    connections: HashSet<ConnectionId>,
    memberships: HashMap<ConnectionId, RoomId>,
    rooms: HashMap<RoomId, RoomState>,
    next_seq: u64,
}

impl RegistryState {
    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.saturating_add(1);
        seq
    }

    /// Removes the connection from its room, if any.
    fn remove_membership(
        &mut self,
        connection_id: &ConnectionId,
        retain_empty: bool,
    ) -> Option<RoomSnapshot> {
        let room_id = self.memberships.remove(connection_id)?;
        let seq = self.next_seq();
        let room = self.rooms.get_mut(&room_id)?;
        room.remove(connection_id, seq);
        let snapshot = room.snapshot();
        if room.is_empty() && !retain_empty {
            self.rooms.remove(&room_id);
            tracing::debug!(%room_id, "removed empty room");
        }
        Some(snapshot)
    }

    fn summaries(&self) -> Vec<RoomSummary> {
        let mut summaries: Vec<RoomSummary> =
            self.rooms.values().map(RoomState::summary).collect();
        summaries.sort_by(|a, b| a.room_id.cmp(&b.room_id));
        summaries
    }
}

/// Central store for connections and room membership.
///
/// # Concurrency
///
/// - Every operation takes the one registry lock, so a connection is in
///   at most one room at any instant.
/// - Snapshots are built under the lock; nothing is published while it
///   is held.
/// - `leave`/`drop_connection` are idempotent: of two racing calls for
///   the same connection exactly one observes the room.
/// - Callers publish after the lock is released, so snapshots of one room
///   can be published out of order when updates race. Every membership
///   change stamps the room with a fresh registry-wide sequence number,
///   exposed as [`RoomSnapshot::revision`]; subscribers keep the highest.
#[derive(Debug)]
pub struct RoomRegistry {
    state: Mutex<RegistryState>,
    retain_empty: bool,
}

impl RoomRegistry {
    /// Creates an empty registry.
    ///
    /// With `retain_empty` set, rooms stay listed after their last member
    /// leaves; otherwise they are removed.
    #[must_use]
    pub fn new(retain_empty: bool) -> Self {
        Self {
            state: Mutex::new(RegistryState::default()),
            retain_empty,
        }
    }

    /// Adds a connection to the live table. Registering twice is a no-op.
    pub async fn register_connection(&self, connection_id: ConnectionId) {
        let mut state = self.state.lock().await;
        state.connections.insert(connection_id);
    }

    /// Places a connection in `room_id`, removing it from any other room.
    ///
    /// Rejoining the same room leaves the member set unchanged and only
    /// refreshes the display name.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::UnknownConnection`] if the connection was never
    /// registered or has been dropped.
    pub async fn join(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
        username: String,
    ) -> Result<JoinOutcome, HubError> {
        let mut state = self.state.lock().await;
        if !state.connections.contains(connection_id) {
            return Err(HubError::UnknownConnection(connection_id.clone()));
        }

        let switching = state
            .memberships
            .get(connection_id)
            .is_some_and(|current| *current != room_id);
        let previous = if switching {
            state.remove_membership(connection_id, self.retain_empty)
        } else {
            None
        };

        let seq = state.next_seq();
        state
            .memberships
            .insert(connection_id.clone(), room_id.clone());
        let room = state
            .rooms
            .entry(room_id.clone())
            .or_insert_with(|| RoomState::new(room_id));
        room.insert(connection_id.clone(), username, seq);

        Ok(JoinOutcome {
            room: room.snapshot(),
            previous,
        })
    }

    /// Removes a connection from whatever room it is in.
    ///
    /// Returns the room's updated snapshot, or `None` (with no state
    /// change) when the connection was not in a room.
    pub async fn leave(&self, connection_id: &ConnectionId) -> Option<RoomSnapshot> {
        let mut state = self.state.lock().await;
        state.remove_membership(connection_id, self.retain_empty)
    }

    /// Forgets a connection entirely and leaves its room.
    pub async fn drop_connection(&self, connection_id: &ConnectionId) -> Option<RoomSnapshot> {
        let mut state = self.state.lock().await;
        state.connections.remove(connection_id);
        state.remove_membership(connection_id, self.retain_empty)
    }

    /// Updates a room's playback state. Unknown rooms are ignored.
    ///
    /// Returns `true` if the room exists.
    pub async fn record_playback(&self, action: &VideoAction) -> bool {
        let mut state = self.state.lock().await;
        match state.rooms.get_mut(&action.room_id) {
            Some(room) => {
                room.playback_mut().apply(action);
                true
            }
            None => false,
        }
    }

    /// Returns a snapshot of a single room.
    pub async fn room(&self, room_id: &RoomId) -> Option<RoomSnapshot> {
        let state = self.state.lock().await;
        state.rooms.get(room_id).map(RoomState::snapshot)
    }

    /// Returns summaries of all rooms, sorted by room ID.
    pub async fn rooms(&self) -> Vec<RoomSummary> {
        self.state.lock().await.summaries()
    }

    /// Returns room summaries and the live connection count, read under
    /// one lock so both describe the same moment.
    pub async fn overview(&self) -> (Vec<RoomSummary>, usize) {
        let state = self.state.lock().await;
        (state.summaries(), state.connections.len())
    }

    /// Returns the room a connection currently belongs to.
    pub async fn room_of(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        let state = self.state.lock().await;
        state.memberships.get(connection_id).cloned()
    }

    /// Number of live connections.
    pub async fn connection_count(&self) -> usize {
        self.state.lock().await.connections.len()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::video_action::VideoActionType;

    fn room(name: &str) -> RoomId {
        let Ok(id) = RoomId::new(name) else {
            panic!("valid room id");
        };
        id
    }

    async fn registered(registry: &RoomRegistry, id: &str) -> ConnectionId {
        let conn = ConnectionId::from(id);
        registry.register_connection(conn.clone()).await;
        conn
    }

    async fn join(registry: &RoomRegistry, conn: &ConnectionId, name: &str) -> JoinOutcome {
        let Ok(outcome) = registry.join(conn, room(name), conn.to_string()).await else {
            panic!("join failed");
        };
        outcome
    }

    #[tokio::test]
    async fn leave_removes_member_from_snapshot() {
        let registry = RoomRegistry::default();
        let a = registered(&registry, "a").await;
        let b = registered(&registry, "b").await;
        join(&registry, &a, "movie1").await;
        join(&registry, &b, "movie1").await;

        let Some(snapshot) = registry.leave(&a).await else {
            panic!("expected room");
        };
        assert!(!snapshot.contains(&a));
        assert_eq!(snapshot.member_ids(), vec![b]);
    }

    #[tokio::test]
    async fn leave_without_membership_is_noop() {
        let registry = RoomRegistry::default();
        let a = registered(&registry, "a").await;
        let b = registered(&registry, "b").await;
        join(&registry, &b, "movie1").await;
        let before = registry.room(&room("movie1")).await;

        assert!(registry.leave(&a).await.is_none());
        assert!(registry.leave(&ConnectionId::from("ghost")).await.is_none());

        assert_eq!(registry.room(&room("movie1")).await, before);
        assert_eq!(registry.connection_count().await, 2);
    }

    #[tokio::test]
    async fn rejoin_same_room_is_idempotent() {
        let registry = RoomRegistry::default();
        let a = registered(&registry, "a").await;
        let b = registered(&registry, "b").await;
        join(&registry, &a, "movie1").await;
        let first = join(&registry, &b, "movie1").await;
        let again = join(&registry, &a, "movie1").await;

        assert_eq!(first.room.member_ids(), again.room.member_ids());
        assert!(again.previous.is_none());
    }

    #[tokio::test]
    async fn joining_another_room_moves_connection() {
        let registry = RoomRegistry::new(true);
        let a = registered(&registry, "a").await;
        join(&registry, &a, "r1").await;
        let outcome = join(&registry, &a, "r2").await;

        let Some(previous) = outcome.previous else {
            panic!("expected previous room");
        };
        assert_eq!(previous.room_id, room("r1"));
        assert!(!previous.contains(&a));
        assert!(outcome.room.contains(&a));
        assert_eq!(registry.room_of(&a).await, Some(room("r2")));
    }

    #[tokio::test]
    async fn join_requires_registered_connection() {
        let registry = RoomRegistry::default();
        let result = registry
            .join(&ConnectionId::from("nobody"), room("movie1"), "x".to_string())
            .await;
        assert!(matches!(result, Err(HubError::UnknownConnection(_))));
    }

    #[tokio::test]
    async fn empty_rooms_are_removed_by_default() {
        let registry = RoomRegistry::default();
        let a = registered(&registry, "a").await;
        join(&registry, &a, "movie1").await;

        let Some(last) = registry.leave(&a).await else {
            panic!("expected room");
        };
        assert!(last.members.is_empty());
        assert!(registry.room(&room("movie1")).await.is_none());
        assert!(registry.rooms().await.is_empty());
    }

    #[tokio::test]
    async fn empty_rooms_can_be_retained() {
        let registry = RoomRegistry::new(true);
        let a = registered(&registry, "a").await;
        join(&registry, &a, "movie1").await;
        let _ = registry.leave(&a).await;

        let Some(snapshot) = registry.room(&room("movie1")).await else {
            panic!("room should be retained");
        };
        assert!(snapshot.members.is_empty());
        assert_eq!(registry.rooms().await.len(), 1);
    }

    #[tokio::test]
    async fn drop_connection_is_idempotent() {
        let registry = RoomRegistry::default();
        let a = registered(&registry, "a").await;
        join(&registry, &a, "movie1").await;

        assert!(registry.drop_connection(&a).await.is_some());
        assert!(registry.drop_connection(&a).await.is_none());
        assert_eq!(registry.connection_count().await, 0);
    }

    #[tokio::test]
    async fn host_is_promoted_when_host_leaves() {
        let registry = RoomRegistry::default();
        let a = registered(&registry, "alice").await;
        let b = registered(&registry, "bob").await;
        join(&registry, &a, "movie1").await;
        let outcome = join(&registry, &b, "movie1").await;
        assert_eq!(outcome.room.host_name.as_deref(), Some("alice"));

        let Some(snapshot) = registry.leave(&a).await else {
            panic!("expected room");
        };
        assert_eq!(snapshot.host_name.as_deref(), Some("bob"));
    }

    #[tokio::test]
    async fn record_playback_updates_known_rooms_only() {
        let registry = RoomRegistry::default();
        let a = registered(&registry, "a").await;
        join(&registry, &a, "movie1").await;

        let mut action = VideoAction {
            room_id: room("movie1"),
            username: "a".to_string(),
            action: VideoActionType::Play,
            video_id: Some("vid".to_string()),
            timestamp: 42.0,
            player_type: 0,
        };
        assert!(registry.record_playback(&action).await);
        let Some(snapshot) = registry.room(&room("movie1")).await else {
            panic!("expected room");
        };
        assert!(snapshot.is_playing);
        assert_eq!(snapshot.current_video_id.as_deref(), Some("vid"));

        action.room_id = room("elsewhere");
        assert!(!registry.record_playback(&action).await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_leave_observes_room_once() {
        for _ in 0..50 {
            let registry = Arc::new(RoomRegistry::default());
            let a = registered(&registry, "a").await;
            let b = registered(&registry, "b").await;
            join(&registry, &a, "movie1").await;
            join(&registry, &b, "movie1").await;

            let r1 = Arc::clone(&registry);
            let r2 = Arc::clone(&registry);
            let c1 = a.clone();
            let c2 = a.clone();
            let t1 = tokio::spawn(async move { r1.leave(&c1).await });
            let t2 = tokio::spawn(async move { r2.leave(&c2).await });
            let (Ok(o1), Ok(o2)) = (t1.await, t2.await) else {
                panic!("task panicked");
            };

            assert_eq!(usize::from(o1.is_some()) + usize::from(o2.is_some()), 1);
            let Some(snapshot) = registry.room(&room("movie1")).await else {
                panic!("room should remain");
            };
            assert_eq!(snapshot.member_ids(), vec![b]);
        }
    }
    #[tokio::test]
    async fn revision_increases_with_every_member_change() {
        let registry = RoomRegistry::default();
        let a = registered(&registry, "a").await;
        let b = registered(&registry, "b").await;
        let first = join(&registry, &a, "movie1").await.room.revision;
        let second = join(&registry, &b, "movie1").await.room.revision;
        let Some(after_leave) = registry.leave(&a).await else {
            panic!("expected room");
        };

        assert!(first < second);
        assert!(second < after_leave.revision);
    }

    #[tokio::test]
    async fn recreated_room_continues_past_old_revisions() {
        let registry = RoomRegistry::default();
        let a = registered(&registry, "a").await;
        join(&registry, &a, "movie1").await;
        let Some(emptied) = registry.leave(&a).await else {
            panic!("expected room");
        };

        let recreated = join(&registry, &a, "movie1").await;
        assert!(recreated.room.revision > emptied.revision);
    }

    #[tokio::test]
    async fn overview_reports_rooms_and_connections_together() {
        let registry = RoomRegistry::default();
        let a = registered(&registry, "a").await;
        let _idle = registered(&registry, "idle").await;
        join(&registry, &a, "movie1").await;

        let (rooms, connections) = registry.overview().await;
        assert_eq!(connections, 2);
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms.first().map(|r| r.member_count), Some(1));
    }
}
