use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time;

use crate::client::{ClientState, ConnectionManager};
use crate::types::constants::{heartbeat_frames, HEARTBEAT_INTERVAL};

/// Periodic liveness probe sender.
///
/// While the connection is open, sends the plain `"ping"` sentinel at every
/// tick. The monitor never drives the connection lifecycle itself: a failed
/// probe only surfaces through the read half, which the state machine acts
/// on. The task exits once the client is dropped or the connection epoch it
/// was spawned for has been superseded.
pub struct HeartbeatMonitor {
    interval: Duration,
    connection: Weak<ConnectionManager>,
    state: Arc<RwLock<ClientState>>,
    epoch: u64,
}

impl HeartbeatMonitor {
    pub fn new(
        connection: Weak<ConnectionManager>,
        state: Arc<RwLock<ClientState>>,
        epoch: u64,
    ) -> Self {
        Self {
            interval: Duration::from_millis(HEARTBEAT_INTERVAL),
            connection,
            state,
            epoch,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Spawns the probe task that runs until stopped or superseded.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval_timer = time::interval(self.interval);
            interval_timer.set_missed_tick_behavior(time::MissedTickBehavior::Skip);
            // consume the immediate first tick; probes start one period in
            interval_timer.tick().await;

            loop {
                interval_timer.tick().await;

                let connection = match self.connection.upgrade() {
                    Some(conn) => conn,
                    None => break,
                };

                if self.state.read().await.epoch != self.epoch {
                    break;
                }

                if !connection.is_connected().await {
                    continue;
                }

                match connection.send_text(heartbeat_frames::PING).await {
                    Ok(_) => tracing::debug!("sent heartbeat probe"),
                    Err(e) => tracing::warn!("failed to send heartbeat probe: {}", e),
                }
            }
            tracing::debug!("heartbeat task finished");
        })
    }
}
