//! Read-only room inspection handlers.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::RoomListResponse;
use crate::app_state::AppState;
use crate::domain::{RoomId, RoomSnapshot};
use crate::error::{ErrorResponse, HubError};

/// `GET /rooms`: List rooms with member counts.
#[utoipa::path(
    get,
    path = "/api/v1/rooms",
    tag = "Rooms",
    summary = "List rooms",
    description = "Returns every room currently known to the hub with its member count and host.",
    responses(
        (status = 200, description = "Room list", body = RoomListResponse),
    )
)]
pub async fn list_rooms(State(state): State<AppState>) -> impl IntoResponse {
    let (data, connections) = state.hub.registry().overview().await;

    Json(RoomListResponse {
        total: data.len(),
        data,
        connections,
    })
}

/// `GET /rooms/{room_id}`: Get the current state of one room.
///
/// # Errors
///
/// Returns [`HubError::RoomNotFound`] if the room does not exist and
/// [`HubError::InvalidRoomId`] if the ID is blank.
#[utoipa::path(
    get,
    path = "/api/v1/rooms/{room_id}",
    tag = "Rooms",
    summary = "Get room state",
    description = "Returns members, host and playback state of a single room.",
    params(
        ("room_id" = String, Path, description = "Room name"),
    ),
    responses(
        (status = 200, description = "Room state", body = RoomSnapshot),
        (status = 404, description = "Room not found", body = ErrorResponse),
    )
)]
pub async fn get_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomSnapshot>, HubError> {
    let room_id = RoomId::new(room_id)?;
    state
        .hub
        .registry()
        .room(&room_id)
        .await
        .map(Json)
        .ok_or_else(|| HubError::RoomNotFound(room_id.to_string()))
}

/// Room inspection routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rooms", get(list_rooms))
        .route("/rooms/{room_id}", get(get_room))
}
