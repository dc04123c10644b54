//! WebSocket connection loop.
//!
//! Handles the read/write loop for a single WebSocket connection:
//! registers it with the hub, dispatches incoming frames, forwards
//! subscribed publications, and reports the disconnect when the socket
//! closes.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{ClientFrame, ServerFrame};
use super::router::DestinationRouter;
use super::subscription::SubscriptionManager;
use crate::domain::{ConnectionId, Publication, Topic};
use crate::error::HubError;
use crate::service::BroadcastHub;

type WsSink = SplitSink<WebSocket, Message>;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Registers a fresh [`ConnectionId`] and tells the client about it.
/// - Reads frames from the client and dispatches them.
/// - Forwards matching publications from the [`broadcast::Receiver`].
/// - Calls [`BroadcastHub::on_disconnect`] once the loop ends, whatever
///   ended it.
pub async fn run_connection(
    socket: WebSocket,
    mut publications: broadcast::Receiver<Publication>,
    hub: Arc<BroadcastHub>,
    router: Arc<DestinationRouter>,
) {
    let connection_id = ConnectionId::new();
    hub.on_connect(&connection_id).await;

    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    let connected = ServerFrame::receipt(
        None,
        None,
        serde_json::json!({ "connected": connection_id }),
    );
    if send_frame(&mut ws_tx, &connected).await {
        loop {
            tokio::select! {
                msg = ws_rx.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            let reply = handle_text_message(
                                &text,
                                &connection_id,
                                &mut subs,
                                &hub,
                                &router,
                            )
                            .await;
                            if !send_frame(&mut ws_tx, &reply).await {
                                break;
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => break,
                        Some(Err(err)) => {
                            tracing::debug!(%connection_id, error = %err, "ws read failed");
                            break;
                        }
                        _ => {}
                    }
                }
                publication = publications.recv() => {
                    match publication {
                        Ok(publication) => {
                            if !subs.matches(&publication.topic) {
                                continue;
                            }
                            match ServerFrame::message(&publication) {
                                Ok(frame) => {
                                    if !send_frame(&mut ws_tx, &frame).await {
                                        break;
                                    }
                                }
                                Err(err) => {
                                    tracing::warn!(
                                        topic = %publication.topic,
                                        error = %err,
                                        "dropping unserializable publication"
                                    );
                                }
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            tracing::warn!(
                                %connection_id,
                                lagged = n,
                                "ws client lagged behind broker"
                            );
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            }
        }
    }

    hub.on_disconnect(&connection_id).await;
    tracing::debug!(%connection_id, "ws connection closed");
}

/// Serializes and sends a frame. Returns `false` once the socket is gone.
async fn send_frame(ws_tx: &mut WsSink, frame: &ServerFrame) -> bool {
    let json = match serde_json::to_string(frame) {
        Ok(json) => json,
        Err(err) => {
            tracing::warn!(error = %err, "failed to serialize ws frame");
            return true;
        }
    };
    ws_tx.send(Message::text(json)).await.is_ok()
}

/// Handles one text frame from the client and builds the reply.
async fn handle_text_message(
    text: &str,
    connection_id: &ConnectionId,
    subs: &mut SubscriptionManager,
    hub: &BroadcastHub,
    router: &DestinationRouter,
) -> ServerFrame {
    let frame = match serde_json::from_str::<ClientFrame>(text) {
        Ok(frame) => frame,
        Err(err) => {
            tracing::debug!(%connection_id, error = %err, "malformed ws frame");
            return ServerFrame::error(None, None, &HubError::from(err));
        }
    };

    match frame {
        ClientFrame::Subscribe { id, destination } => match Topic::parse(&destination) {
            Ok(topic) => {
                let added = subs.subscribe(topic);
                ServerFrame::receipt(
                    id,
                    Some(destination),
                    serde_json::json!({ "subscribed": added, "count": subs.count() }),
                )
            }
            Err(err) => ServerFrame::error(id, Some(destination), &err),
        },
        ClientFrame::Unsubscribe { id, destination } => match Topic::parse(&destination) {
            Ok(topic) => {
                let removed = subs.unsubscribe(&topic);
                ServerFrame::receipt(
                    id,
                    Some(destination),
                    serde_json::json!({ "unsubscribed": removed, "count": subs.count() }),
                )
            }
            Err(err) => ServerFrame::error(id, Some(destination), &err),
        },
        ClientFrame::Send {
            id,
            destination,
            body,
        } => match router.dispatch(hub, connection_id, &destination, body).await {
            Ok(result) => ServerFrame::receipt(id, Some(destination), result),
            Err(err) => {
                tracing::debug!(%connection_id, %destination, error = %err, "send rejected");
                ServerFrame::error(id, Some(destination), &err)
            }
        },
    }
}
