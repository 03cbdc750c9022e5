use futures::stream::SplitSink;
use futures::SinkExt;
use tokio::net::TcpStream;
use tokio::sync::RwLock;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::types::error::{FeedError, Result};

/// Lifecycle of the streaming connection.
///
/// `Failed` is terminal until [`manual_reconnect`](crate::FeedClient::manual_reconnect)
/// is invoked; every other state is transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
    Failed,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Reconnecting => "reconnecting",
            Self::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Owns the write half of the socket and the current connection state.
pub struct ConnectionManager {
    ws_write: RwLock<Option<WsSink>>,
    state: RwLock<ConnectionState>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            ws_write: RwLock::new(None),
            state: RwLock::new(ConnectionState::Disconnected),
        }
    }

    /// Sets the WebSocket write sink (called after a successful handshake)
    pub async fn set_writer(&self, writer: WsSink) {
        let mut ws = self.ws_write.write().await;
        *ws = Some(writer);
    }

    /// Drops the write sink without a close handshake
    pub async fn clear_writer(&self) {
        let mut ws = self.ws_write.write().await;
        *ws = None;
    }

    pub async fn state(&self) -> ConnectionState {
        *self.state.read().await
    }

    pub async fn set_state(&self, new_state: ConnectionState) {
        let mut state = self.state.write().await;
        *state = new_state;
    }

    pub async fn is_connected(&self) -> bool {
        *self.state.read().await == ConnectionState::Connected
    }

    /// Sends a text frame over the connection.
    pub async fn send_text(&self, text: &str) -> Result<()> {
        let mut ws_guard = self.ws_write.write().await;
        match ws_guard.as_mut() {
            Some(ws) => {
                ws.send(Message::Text(text.into())).await?;
                Ok(())
            }
            None => Err(FeedError::NotConnected),
        }
    }

    /// Closes the connection with a normal-closure frame.
    ///
    /// Delivery failures are ignored: the socket may already be dead, and a
    /// manual disconnect must succeed regardless.
    pub async fn close_normal(&self) {
        let mut ws_guard = self.ws_write.write().await;
        if let Some(ws) = ws_guard.as_mut() {
            let frame = CloseFrame {
                code: CloseCode::Normal,
                reason: "client disconnect".into(),
            };
            if let Err(e) = ws.send(Message::Close(Some(frame))).await {
                tracing::debug!("close frame not delivered: {}", e);
            }
            let _ = ws.close().await;
        }
        *ws_guard = None;
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}
