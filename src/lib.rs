//! # watch-together-hub
//!
//! Room-scoped WebSocket publish/subscribe hub for watch-together sessions.
//!
//! Clients connect over WebSocket, join a room under a display name,
//! exchange chat messages and video control actions, and receive the
//! updated member list whenever someone joins or drops.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket, HTTP)
//!     │
//!     ├── WS Handler + DestinationRouter (ws/)
//!     ├── REST Handlers (api/)
//!     │
//!     ├── BroadcastHub (service/)
//!     │
//!     ├── RoomRegistry (domain/)
//!     └── MessageBroker (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod server;
pub mod service;
pub mod ws;
