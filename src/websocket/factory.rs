use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::types::error::Result;

/// The stream type produced by the factory.
pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket factory for creating WebSocket connections
pub struct WebSocketFactory;

impl WebSocketFactory {
    /// Performs the WebSocket handshake against `url`.
    pub async fn create(url: &str) -> Result<WsStream> {
        tracing::debug!("opening WebSocket connection to {}", url);
        let (stream, response) = connect_async(url).await?;
        tracing::debug!("handshake completed with status {}", response.status());
        Ok(stream)
    }
}
