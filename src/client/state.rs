use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::infrastructure::TaskManager;
use crate::messaging::MessageHistory;
use crate::types::ChatMessage;

/// Single-slot message observer; registering a new one replaces the old one.
pub type MessageCallback = Arc<dyn Fn(ChatMessage) + Send + Sync>;

/// Consolidated mutable state for FeedClient
/// Using a single struct reduces lock contention
pub struct ClientState {
    /// Connection generation; bumped on every connect, disconnect and
    /// transport failure. Tasks and timers capture the epoch they were
    /// spawned for and stand down once it has advanced, so late callbacks
    /// from a superseded socket can never touch the state machine.
    pub epoch: u64,

    /// Reconnects scheduled since the last successful connection
    pub reconnect_attempts: u32,

    /// Instant of the most recent liveness evidence
    pub last_liveness: Instant,

    /// Bounded history of received messages; survives reconnects
    pub history: MessageHistory,

    /// Current message observer, if any
    pub message_callback: Option<MessageCallback>,

    /// Background tasks of the active connection generation
    pub task_manager: TaskManager,

    /// The one armed reconnect (or settle) timer, if any
    pub reconnect_timer: Option<JoinHandle<()>>,
}

impl ClientState {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            epoch: 0,
            reconnect_attempts: 0,
            last_liveness: Instant::now(),
            history: MessageHistory::with_capacity(history_capacity),
            message_callback: None,
            task_manager: TaskManager::new(),
            reconnect_timer: None,
        }
    }

    /// Arms the one-shot reconnect timer, replacing any previous one.
    pub fn arm_reconnect_timer(&mut self, handle: JoinHandle<()>) {
        self.cancel_reconnect_timer();
        self.reconnect_timer = Some(handle);
    }

    /// Cancels the armed reconnect timer, if any; idempotent.
    pub fn cancel_reconnect_timer(&mut self) {
        if let Some(timer) = self.reconnect_timer.take() {
            timer.abort();
        }
    }
}
