//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::HubConfig;
use crate::domain::{MessageBroker, RoomRegistry};
use crate::service::BroadcastHub;
use crate::ws::router::DestinationRouter;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Broadcast hub for all room and chat operations.
    pub hub: Arc<BroadcastHub>,
    /// Broker that WebSocket connections subscribe to.
    pub broker: MessageBroker,
    /// Inbound destination routing table.
    pub router: Arc<DestinationRouter>,
}

impl AppState {
    /// Wires registry, broker, hub and router from configuration.
    #[must_use]
    pub fn from_config(config: &HubConfig) -> Self {
        let registry = Arc::new(RoomRegistry::new(config.retain_empty_rooms));
        let broker = MessageBroker::new(config.broker_capacity);
        let hub = Arc::new(BroadcastHub::new(
            registry,
            broker.clone(),
            config.chat_addressing,
        ));
        Self {
            hub,
            broker,
            router: Arc::new(DestinationRouter::with_default_routes()),
        }
    }
}
