/// Heartbeat sentinel frames (magic strings layer)
pub mod heartbeat_frames {
    pub const PING: &str = "ping";
    pub const PONG: &str = "pong";
    /// `type` field value of the structured heartbeat payload
    pub const TYPE_MARKER: &str = "heartbeat";
}

/// Default heartbeat probe interval (milliseconds)
pub const HEARTBEAT_INTERVAL: u64 = 30_000;

/// Default staleness check period (milliseconds)
pub const STALENESS_CHECK_INTERVAL: u64 = 30_000;

/// Silence threshold before a connection is considered dead (milliseconds)
pub const STALENESS_THRESHOLD: u64 = 60_000;

/// Default handshake timeout (milliseconds)
pub const CONNECT_TIMEOUT: u64 = 60_000;

/// Reconnect budget before entering `Failed`
pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Exponential backoff bounds (milliseconds)
pub const INITIAL_RECONNECT_DELAY: u64 = 1_000;
pub const MAX_RECONNECT_DELAY: u64 = 30_000;

/// Pause between disconnect and dial during a manual reconnect (milliseconds)
pub const RECONNECT_SETTLE_DELAY: u64 = 100;

/// Bounded message history capacity
pub const HISTORY_CAPACITY: usize = 100;
