//! # livefeed-rs
//!
//! A resilient WebSocket client for a realtime chat-message feed.
//!
//! The client maintains a long-lived connection to the feed server, keeps it
//! alive with a ping/pong heartbeat plus a staleness watchdog, recovers from
//! transport failures with bounded exponential backoff, and retains a
//! bounded, deduplicated history of the most recent messages.
//!
//! ## Example
//!
//! ```no_run
//! use livefeed_rs::{FeedClient, FeedClientOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FeedClient::new("wss://feed.example.com/ws", FeedClientOptions::default())?;
//!
//!     client
//!         .on_message(|msg| println!("{}: {}", msg.author, msg.content))
//!         .await;
//!     client.connect().await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod infrastructure;
pub mod messaging;
pub mod types;
pub mod websocket;

pub use client::{ConnectionState, FeedClient, FeedClientBuilder, FeedClientOptions};
pub use infrastructure::Backoff;
pub use messaging::{decode_frame, DecodedFrame, MessageHistory};
pub use types::{ChatMessage, FeedError, Result};
