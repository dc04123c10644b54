//! WebSocket layer: connection handling, destination routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` carries topic subscriptions and
//! `send` frames addressed to `/app/...` destinations.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod router;
pub mod subscription;
