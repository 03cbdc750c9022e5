// Module declarations
mod builder;
mod connection;
mod core;
mod state;

// Public API exports
pub use builder::{FeedClientBuilder, FeedClientOptions};
pub use connection::{ConnectionManager, ConnectionState};
pub use core::FeedClient;
pub use state::{ClientState, MessageCallback};
