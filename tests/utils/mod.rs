//! Shared helpers: spawn the hub on an ephemeral port and drive it with a
//! small WebSocket client.

#![allow(dead_code, clippy::panic)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use watch_together_hub::app_state::AppState;
use watch_together_hub::config::HubConfig;
use watch_together_hub::server::build_app;

const FRAME_TIMEOUT: Duration = Duration::from_secs(5);

/// Starts a server for `config` and returns its address.
pub async fn spawn_server(config: HubConfig) -> SocketAddr {
    let listener = tokio_test::assert_ok!(tokio::net::TcpListener::bind("127.0.0.1:0").await);
    let addr = tokio_test::assert_ok!(listener.local_addr());
    let app = build_app(AppState::from_config(&config));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// WebSocket client that buffers frames it was not waiting for.
pub struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    pending: VecDeque<Value>,
    /// Connection ID assigned by the server.
    pub connection_id: String,
}

impl TestClient {
    /// Connects and reads the `connected` receipt.
    pub async fn connect(addr: SocketAddr) -> Self {
        let (stream, _) = tokio_test::assert_ok!(connect_async(format!("ws://{addr}/ws")).await);
        let mut client = Self {
            stream,
            pending: VecDeque::new(),
            connection_id: String::new(),
        };
        let hello = client.read_frame().await;
        assert_eq!(hello["type"], "receipt");
        let Some(id) = hello["payload"]["connected"].as_str() else {
            panic!("connected receipt without id: {hello}");
        };
        client.connection_id = id.to_string();
        client
    }

    async fn read_frame(&mut self) -> Value {
        loop {
            let next = tokio::time::timeout(FRAME_TIMEOUT, self.stream.next()).await;
            let Ok(Some(Ok(msg))) = next else {
                panic!("no frame within timeout");
            };
            if let Message::Text(_) = msg {
                let text = tokio_test::assert_ok!(msg.to_text());
                return tokio_test::assert_ok!(serde_json::from_str(text));
            }
        }
    }

    /// Returns the first frame matching `pred`, keeping the others queued.
    pub async fn wait_for(&mut self, pred: impl Fn(&Value) -> bool) -> Value {
        if let Some(pos) = self.pending.iter().position(&pred)
            && let Some(frame) = self.pending.remove(pos)
        {
            return frame;
        }
        loop {
            let frame = self.read_frame().await;
            if pred(&frame) {
                return frame;
            }
            self.pending.push_back(frame);
        }
    }

    /// Waits for a published message on `topic` matching `pred`.
    pub async fn message_on(&mut self, topic: &str, pred: impl Fn(&Value) -> bool) -> Value {
        let frame = self
            .wait_for(|f| {
                f["type"] == "message" && f["destination"] == topic && pred(&f["payload"])
            })
            .await;
        frame["payload"].clone()
    }

    async fn send_json(&mut self, value: Value) {
        tokio_test::assert_ok!(self.stream.send(Message::text(value.to_string())).await);
    }

    /// Subscribes to a topic and waits for the receipt.
    pub async fn subscribe(&mut self, topic: &str) {
        self.send_json(json!({"command": "subscribe", "destination": topic}))
            .await;
        let receipt = self
            .wait_for(|f| f["type"] != "message" && f["destination"] == topic)
            .await;
        assert_eq!(receipt["type"], "receipt", "subscribe failed: {receipt}");
    }

    /// Sends a body to an application destination and returns the
    /// receipt or error frame.
    pub async fn send_to(&mut self, destination: &str, body: Value) -> Value {
        self.send_json(json!({"command": "send", "destination": destination, "body": body}))
            .await;
        self.wait_for(|f| f["type"] != "message" && f["destination"] == destination)
            .await
    }

    /// Closes the socket.
    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}
