//! Explicit routing table for inbound `/app/...` destinations.
//!
//! Built once at startup and shared by every connection. Patterns are
//! `/`-separated; a `{name}` segment captures one path segment.

use crate::domain::{ChatMessage, ConnectionId, RoomId, VideoAction};
use crate::error::HubError;
use crate::service::BroadcastHub;

use super::messages::JoinBody;

/// Operation a destination is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// Relay a chat message.
    SendChat,
    /// Join the room captured from the path.
    JoinRoom,
    /// Relay a video control action.
    VideoAction,
}

/// A resolved destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/app/chat.sendMessage`
    SendChat,
    /// `/app/room/{roomId}/join`
    JoinRoom(RoomId),
    /// `/app/video/action`
    VideoAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param,
}

#[derive(Debug, Clone)]
struct RouteEntry {
    pattern: String,
    segments: Vec<Segment>,
    kind: RouteKind,
}

impl RouteEntry {
    fn new(pattern: &str, kind: RouteKind) -> Self {
        let segments = split(pattern)
            .map(|seg| {
                if seg.starts_with('{') && seg.ends_with('}') {
                    Segment::Param
                } else {
                    Segment::Literal(seg.to_string())
                }
            })
            .collect();
        Self {
            pattern: pattern.to_string(),
            segments,
            kind,
        }
    }

    /// Returns captured parameters if `destination` matches.
    fn capture<'a>(&self, destination: &'a str) -> Option<Vec<&'a str>> {
        let parts: Vec<&str> = split(destination).collect();
        if parts.len() != self.segments.len() {
            return None;
        }
        let mut params = Vec::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(lit) if lit == part => {}
                Segment::Literal(_) => return None,
                Segment::Param => params.push(part),
            }
        }
        Some(params)
    }
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|seg| !seg.is_empty())
}

/// Destination → operation table.
#[derive(Debug, Clone, Default)]
pub struct DestinationRouter {
    routes: Vec<RouteEntry>,
}

impl DestinationRouter {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Router with every destination the hub serves.
    #[must_use]
    pub fn with_default_routes() -> Self {
        Self::new()
            .route("/app/chat.sendMessage", RouteKind::SendChat)
            .route("/app/room/{roomId}/join", RouteKind::JoinRoom)
            .route("/app/video/action", RouteKind::VideoAction)
    }

    /// Binds a destination pattern to an operation.
    #[must_use]
    pub fn route(mut self, pattern: &str, kind: RouteKind) -> Self {
        self.routes.push(RouteEntry::new(pattern, kind));
        self
    }

    /// Registered patterns, in registration order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|entry| entry.pattern.as_str())
    }

    /// Resolves a destination to a route. The first matching pattern wins.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::UnknownDestination`] if no pattern matches, or
    /// [`HubError::InvalidRoomId`] if a captured room ID is invalid.
    pub fn resolve(&self, destination: &str) -> Result<Route, HubError> {
        for entry in &self.routes {
            let Some(params) = entry.capture(destination) else {
                continue;
            };
            return match entry.kind {
                RouteKind::SendChat => Ok(Route::SendChat),
                RouteKind::VideoAction => Ok(Route::VideoAction),
                RouteKind::JoinRoom => {
                    let raw = params.first().ok_or_else(|| {
                        HubError::Internal(format!("{} has no room param", entry.pattern))
                    })?;
                    Ok(Route::JoinRoom(RoomId::new(*raw)?))
                }
            };
        }
        Err(HubError::UnknownDestination(destination.to_string()))
    }

    /// Resolves `destination`, decodes `body` and runs the bound hub
    /// operation. Returns the operation's result as JSON for the receipt.
    ///
    /// # Errors
    ///
    /// Returns a [`HubError`] if the destination is unknown, the body does
    /// not decode, or the hub rejects the operation.
    pub async fn dispatch(
        &self,
        hub: &BroadcastHub,
        connection_id: &ConnectionId,
        destination: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, HubError> {
        match self.resolve(destination)? {
            Route::SendChat => {
                let message: ChatMessage = serde_json::from_value(body)?;
                let relayed = hub.on_chat_message(connection_id, message).await;
                Ok(serde_json::to_value(relayed)?)
            }
            Route::JoinRoom(room_id) => {
                let username = serde_json::from_value::<JoinBody>(body)?.into_username();
                let snapshot = hub.on_join(connection_id, room_id, username).await?;
                Ok(serde_json::to_value(snapshot)?)
            }
            Route::VideoAction => {
                let action: VideoAction = serde_json::from_value(body)?;
                let relayed = hub.on_video_action(action).await;
                Ok(serde_json::to_value(relayed)?)
            }
        }
    }
}
