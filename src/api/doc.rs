//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use super::dto::RoomListResponse;
use super::handlers::{room, system};
use crate::domain::{Member, RoomSnapshot, RoomSummary};
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI specification, served at `/api-docs/openapi.json`.
#[derive(Debug, OpenApi)]
#[openapi(
    paths(
        system::health_handler,
        system::destinations_handler,
        room::list_rooms,
        room::get_room,
    ),
    components(schemas(
        RoomListResponse,
        RoomSummary,
        RoomSnapshot,
        Member,
        ErrorResponse,
        ErrorBody,
        system::HealthResponse,
        system::DestinationsResponse,
    )),
    tags(
        (name = "System", description = "Health and configuration"),
        (name = "Rooms", description = "Room membership inspection"),
    )
)]
pub struct ApiDoc;
