//! Service layer: event orchestration.
//!
//! [`BroadcastHub`] applies inbound events to the
//! [`super::domain::RoomRegistry`] and publishes the results through the
//! [`super::domain::MessageBroker`].

pub mod hub_service;

pub use hub_service::BroadcastHub;
