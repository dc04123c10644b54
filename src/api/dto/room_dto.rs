//! Room DTOs for list operations.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::RoomSummary;

/// Response body for `GET /rooms`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoomListResponse {
    /// Room summaries sorted by room ID.
    pub data: Vec<RoomSummary>,
    /// Number of rooms.
    pub total: usize,
    /// Number of live WebSocket connections, joined or not.
    pub connections: usize,
}
