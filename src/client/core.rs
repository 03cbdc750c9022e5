use std::sync::Arc;
use std::time::Duration;

use futures::stream::{SplitStream, StreamExt};
use tokio::sync::{watch, RwLock};
use tokio::time::{self, Instant};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::Message;

use super::{ClientState, ConnectionManager, ConnectionState, FeedClientBuilder, FeedClientOptions};
use crate::infrastructure::{Backoff, HeartbeatMonitor};
use crate::messaging::{decode_frame, DecodedFrame};
use crate::types::constants::{
    CONNECT_TIMEOUT, HEARTBEAT_INTERVAL, INITIAL_RECONNECT_DELAY, MAX_RECONNECT_ATTEMPTS,
    MAX_RECONNECT_DELAY, RECONNECT_SETTLE_DELAY, STALENESS_CHECK_INTERVAL, STALENESS_THRESHOLD,
};
use crate::types::{ChatMessage, Result};
use crate::websocket::{WebSocketFactory, WsStream};

/// Resilient client for a realtime chat-message feed.
///
/// `FeedClient` owns the WebSocket connection to the feed server, keeps it
/// alive with a ping/pong heartbeat and a staleness watchdog, and recovers
/// from transport failures with bounded exponential backoff. Decoded chat
/// messages are retained in a bounded, deduplicated history and handed to a
/// single registered observer.
///
/// Transport failures never surface as errors from the public API after
/// construction; they are reported through the state, error and attempt
/// watchers instead.
///
/// # Example
///
/// ```no_run
/// use livefeed_rs::{FeedClient, FeedClientOptions};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = FeedClient::new("wss://feed.example.com/ws", FeedClientOptions::default())?;
///
/// client
///     .on_message(|msg| println!("{}: {}", msg.author, msg.content))
///     .await;
/// client.connect().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct FeedClient {
    pub(crate) endpoint: String,
    pub(crate) options: FeedClientOptions,

    // Connection manager (writer + lifecycle state)
    pub(crate) connection: Arc<ConnectionManager>,

    // Consolidated mutable state
    pub(crate) state: Arc<RwLock<ClientState>>,

    // Push-on-change observer channels
    pub(crate) state_tx: watch::Sender<ConnectionState>,
    pub(crate) error_tx: watch::Sender<Option<String>>,
    pub(crate) attempts_tx: watch::Sender<u32>,
}

impl FeedClient {
    /// Creates a new client without opening a connection.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Config`](crate::FeedError::Config) or
    /// [`FeedError::UrlParse`](crate::FeedError::UrlParse) if the endpoint is
    /// missing or malformed.
    pub fn new(endpoint: impl Into<String>, options: FeedClientOptions) -> Result<Self> {
        FeedClientBuilder::new(endpoint, options).map(|builder| builder.build())
    }

    /// Initiates a connection attempt.
    ///
    /// Returns once the attempt is underway; the handshake itself runs on a
    /// background task and the outcome is observable through
    /// [`watch_state`](Self::watch_state). No-op when already connected or
    /// connecting. A pending automatic reconnect timer is cancelled, so a
    /// direct `connect` always supersedes the scheduled one.
    pub async fn connect(&self) -> Result<()> {
        let mut state = self.state.write().await;

        let current = self.connection.state().await;
        if current == ConnectionState::Connected || current == ConnectionState::Connecting {
            return Ok(());
        }

        state.cancel_reconnect_timer();
        self.launch_attempt(&mut state).await;
        Ok(())
    }

    /// Manually closes the connection.
    ///
    /// Cancels any pending reconnect timer, stops the heartbeat, closes the
    /// socket with a normal-closure code and resets the attempt counter.
    /// This path never triggers an automatic reconnect.
    pub async fn disconnect(&self) -> Result<()> {
        tracing::info!("disconnecting from feed server");

        let mut state = self.state.write().await;
        state.epoch += 1;
        state.cancel_reconnect_timer();
        state.task_manager.abort_all();
        state.reconnect_attempts = 0;
        self.attempts_tx.send_replace(0);

        self.connection.close_normal().await;
        self.set_state_locked(ConnectionState::Disconnected).await;

        Ok(())
    }

    /// Disconnects, then reconnects from a clean slate after a short settle
    /// delay. Always starts from attempt 0, even when invoked from `Failed`.
    pub async fn manual_reconnect(&self) -> Result<()> {
        tracing::info!("manual reconnect requested");
        self.disconnect().await?;

        let settle = Duration::from_millis(
            self.options
                .reconnect_settle_delay
                .unwrap_or(RECONNECT_SETTLE_DELAY),
        );

        // The settle timer occupies the reconnect slot so that a disconnect
        // issued before it fires cancels it, leaving no orphaned dial.
        let mut state = self.state.write().await;
        let arm_epoch = state.epoch;
        let client = self.clone();
        let timer = tokio::spawn(async move {
            time::sleep(settle).await;
            client.connect_guarded(arm_epoch).await;
        });
        state.arm_reconnect_timer(timer);

        Ok(())
    }

    /// Registers the message observer. Single-slot: registering a new
    /// callback replaces the previous one. Fan-out to multiple consumers
    /// belongs in a dispatcher outside this client.
    pub async fn on_message<F>(&self, callback: F)
    where
        F: Fn(ChatMessage) + Send + Sync + 'static,
    {
        self.state.write().await.message_callback = Some(Arc::new(callback));
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state_tx.borrow()
    }

    /// Watcher that yields on every connection state change.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    /// Last transport error message, if any. Cleared when a connection
    /// attempt starts.
    pub fn last_error(&self) -> Option<String> {
        self.error_tx.borrow().clone()
    }

    /// Watcher that yields on every error message change.
    pub fn watch_error(&self) -> watch::Receiver<Option<String>> {
        self.error_tx.subscribe()
    }

    /// Reconnect attempts scheduled since the last successful connection.
    pub fn reconnect_attempts(&self) -> u32 {
        *self.attempts_tx.borrow()
    }

    /// Watcher that yields on every attempt-counter change.
    pub fn watch_attempts(&self) -> watch::Receiver<u32> {
        self.attempts_tx.subscribe()
    }

    pub async fn is_connected(&self) -> bool {
        self.connection.is_connected().await
    }

    /// Snapshot of the retained message history, oldest first.
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.state.read().await.history.snapshot()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    // ---- internals ----------------------------------------------------

    /// Mirrors the state into the connection manager and the watcher.
    /// Callers hold the `ClientState` write lock where atomicity with the
    /// rest of a transition matters.
    async fn set_state_locked(&self, new_state: ConnectionState) {
        self.connection.set_state(new_state).await;
        self.state_tx.send_replace(new_state);
        tracing::debug!("connection state -> {}", new_state);
    }

    /// Bumps the epoch and launches a handshake task. Caller holds the
    /// state lock, which is what makes "at most one in-flight attempt"
    /// hold under concurrent connect calls.
    async fn launch_attempt(&self, state: &mut ClientState) {
        state.epoch += 1;
        let epoch = state.epoch;

        self.error_tx.send_replace(None);
        self.set_state_locked(ConnectionState::Connecting).await;
        tracing::info!("connecting to {}", self.endpoint);

        let client = self.clone();
        let url = self.endpoint.clone();
        state
            .task_manager
            .spawn(async move { client.run_connect_attempt(epoch, url).await });
    }

    /// Timer-driven connect. Verifies under the state lock that the epoch
    /// the timer was armed for is still current, so a timer that lost a
    /// race with disconnect can never open a stray socket.
    fn connect_guarded(&self, armed_epoch: u64) -> futures::future::BoxFuture<'_, ()> {
        Box::pin(async move {
            let mut state = self.state.write().await;
            if state.epoch != armed_epoch {
                tracing::debug!("reconnect timer superseded, ignoring");
                return;
            }
            // the slot holds this task's own handle; clear without aborting
            state.reconnect_timer = None;
            self.launch_attempt(&mut state).await;
        })
    }

    async fn epoch_is_current(&self, epoch: u64) -> bool {
        self.state.read().await.epoch == epoch
    }

    fn backoff(&self) -> Backoff {
        Backoff::new(
            Duration::from_millis(
                self.options
                    .initial_reconnect_delay
                    .unwrap_or(INITIAL_RECONNECT_DELAY),
            ),
            Duration::from_millis(self.options.max_reconnect_delay.unwrap_or(MAX_RECONNECT_DELAY)),
        )
    }

    fn max_attempts(&self) -> u32 {
        self.options
            .max_reconnect_attempts
            .unwrap_or(MAX_RECONNECT_ATTEMPTS)
    }

    /// Runs the handshake for one connection attempt, racing it against the
    /// configured timeout.
    async fn run_connect_attempt(&self, epoch: u64, url: String) {
        let connect_timeout =
            Duration::from_millis(self.options.connect_timeout.unwrap_or(CONNECT_TIMEOUT));

        match time::timeout(connect_timeout, WebSocketFactory::create(&url)).await {
            Ok(Ok(ws_stream)) => self.finish_open(epoch, ws_stream).await,
            Ok(Err(e)) => {
                tracing::error!("WebSocket handshake failed: {}", e);
                self.handle_transport_failure(epoch, format!("connection failed: {}", e))
                    .await;
            }
            Err(_) => {
                tracing::error!("connection attempt timed out after {:?}", connect_timeout);
                self.handle_transport_failure(epoch, "connection timeout".to_string())
                    .await;
            }
        }
    }

    /// Completes a successful open: installs the writer, starts the read
    /// loop, heartbeat and staleness watchdog, and transitions to
    /// `Connected` with the attempt counter reset.
    async fn finish_open(&self, epoch: u64, ws_stream: WsStream) {
        let (write_half, read_half) = ws_stream.split();

        let mut state = self.state.write().await;
        if state.epoch != epoch {
            // superseded while handshaking; dropping both halves closes the
            // half-open socket
            tracing::debug!("discarding socket from superseded connect attempt");
            return;
        }

        self.connection.set_writer(write_half).await;
        state.reconnect_attempts = 0;
        state.last_liveness = Instant::now();

        let reader = self.clone();
        state
            .task_manager
            .spawn(async move { reader.run_read_loop(epoch, read_half).await });

        let heartbeat_interval =
            Duration::from_millis(self.options.heartbeat_interval.unwrap_or(HEARTBEAT_INTERVAL));
        let monitor =
            HeartbeatMonitor::new(Arc::downgrade(&self.connection), Arc::clone(&self.state), epoch)
                .with_interval(heartbeat_interval);
        state.task_manager.track(monitor.spawn());

        let watchdog = self.clone();
        state
            .task_manager
            .spawn(async move { watchdog.run_staleness_watchdog(epoch).await });

        self.attempts_tx.send_replace(0);
        self.error_tx.send_replace(None);
        self.set_state_locked(ConnectionState::Connected).await;
        drop(state);

        tracing::info!("connected to feed server");
    }

    /// Reads inbound frames until the connection dies or is superseded.
    async fn run_read_loop(&self, epoch: u64, mut read_half: SplitStream<WsStream>) {
        tracing::debug!("starting read task");

        while let Some(msg_result) = read_half.next().await {
            if !self.epoch_is_current(epoch).await {
                tracing::debug!("read task superseded, exiting");
                return;
            }

            match msg_result {
                Ok(Message::Text(text)) => self.handle_frame(&text).await,
                Ok(Message::Ping(data)) => {
                    tracing::debug!("received ping ({} bytes)", data.len());
                    self.record_liveness().await;
                }
                Ok(Message::Pong(data)) => {
                    tracing::debug!("received pong ({} bytes)", data.len());
                    self.record_liveness().await;
                }
                Ok(Message::Close(frame)) => {
                    let normal = frame
                        .as_ref()
                        .map(|f| f.code == CloseCode::Normal)
                        .unwrap_or(false);
                    if normal {
                        tracing::info!("server closed connection normally");
                        self.handle_normal_close(epoch).await;
                    } else {
                        tracing::warn!("server closed connection: {:?}", frame);
                        self.handle_transport_failure(
                            epoch,
                            "connection closed unexpectedly".to_string(),
                        )
                        .await;
                    }
                    return;
                }
                Ok(Message::Binary(data)) => {
                    tracing::warn!("received unexpected binary message ({} bytes)", data.len());
                }
                Ok(Message::Frame(_)) => {
                    tracing::debug!("received raw frame (internal)");
                }
                Err(e) => {
                    tracing::error!("WebSocket read error: {}", e);
                    self.handle_transport_failure(epoch, format!("connection error: {}", e))
                        .await;
                    return;
                }
            }
        }

        // stream ended without a close frame
        tracing::warn!("server connection dropped");
        self.handle_transport_failure(epoch, "connection closed unexpectedly".to_string())
            .await;
    }

    /// Classifies one inbound text frame and acts on it. Malformed frames
    /// are dropped without touching the state machine.
    async fn handle_frame(&self, raw: &str) {
        match decode_frame(raw) {
            DecodedFrame::Heartbeat => {
                tracing::debug!("heartbeat received");
                self.record_liveness().await;
            }
            DecodedFrame::Event(message) => {
                tracing::debug!("received message {} from {}", message.id, message.author);
                let callback = {
                    let mut state = self.state.write().await;
                    state.last_liveness = Instant::now();
                    state.history.insert(message.clone());
                    state.message_callback.clone()
                };
                if let Some(callback) = callback {
                    callback(message);
                }
            }
            DecodedFrame::Unrecognized => {
                tracing::debug!("dropping unrecognized frame: {}", raw);
            }
        }
    }

    async fn record_liveness(&self) {
        self.state.write().await.last_liveness = Instant::now();
    }

    /// Periodically checks for a silently dead connection: `Connected` but
    /// no liveness evidence within the staleness threshold. Some transports
    /// never fire a close event on a network partition, so this is the only
    /// signal that the socket is gone.
    async fn run_staleness_watchdog(&self, epoch: u64) {
        let period = Duration::from_millis(
            self.options
                .staleness_check_interval
                .unwrap_or(STALENESS_CHECK_INTERVAL),
        );
        let threshold =
            Duration::from_millis(self.options.staleness_threshold.unwrap_or(STALENESS_THRESHOLD));

        let mut interval_timer = time::interval(period);
        interval_timer.set_missed_tick_behavior(time::MissedTickBehavior::Skip);
        interval_timer.tick().await;

        loop {
            interval_timer.tick().await;

            let age = {
                let state = self.state.read().await;
                if state.epoch != epoch {
                    return;
                }
                state.last_liveness.elapsed()
            };

            if !self.connection.is_connected().await {
                continue;
            }

            if age > threshold {
                tracing::warn!("no liveness evidence for {:?}, treating connection as dead", age);
                self.handle_transport_failure(epoch, "connection stale".to_string())
                    .await;
                return;
            }
        }
    }

    /// Handles a server-initiated normal closure: no reconnect.
    async fn handle_normal_close(&self, epoch: u64) {
        let mut state = self.state.write().await;
        if state.epoch != epoch {
            return;
        }
        state.epoch += 1;
        state.cancel_reconnect_timer();
        state.reconnect_attempts = 0;
        self.attempts_tx.send_replace(0);

        self.connection.clear_writer().await;
        self.set_state_locked(ConnectionState::Disconnected).await;
    }

    /// Routes an unexpected close, error, timeout or stale connection into
    /// the backoff path. Processed at most once per connection epoch, so a
    /// close event racing an error event cannot double-schedule.
    async fn handle_transport_failure(&self, epoch: u64, reason: String) {
        let max_attempts = self.max_attempts();
        let backoff = self.backoff();

        let mut state = self.state.write().await;
        if state.epoch != epoch {
            return;
        }
        state.epoch += 1;
        state.cancel_reconnect_timer();

        self.connection.clear_writer().await;
        self.error_tx.send_replace(Some(reason.clone()));

        if state.reconnect_attempts < max_attempts {
            // backoff is keyed to the pre-increment attempt number so the
            // delay matches the "attempt N of max" shown to observers
            let delay = backoff.delay(state.reconnect_attempts);
            state.reconnect_attempts += 1;
            let attempt = state.reconnect_attempts;
            self.attempts_tx.send_replace(attempt);
            self.set_state_locked(ConnectionState::Reconnecting).await;
            tracing::info!(
                "reconnecting in {:?} (attempt {} of {}): {}",
                delay,
                attempt,
                max_attempts,
                reason
            );

            let arm_epoch = state.epoch;
            let client = self.clone();
            let timer = tokio::spawn(async move {
                time::sleep(delay).await;
                client.connect_guarded(arm_epoch).await;
            });
            state.arm_reconnect_timer(timer);
        } else {
            tracing::error!("giving up after {} reconnect attempts: {}", max_attempts, reason);
            self.error_tx.send_replace(Some(format!(
                "{} (gave up after {} attempts)",
                reason, max_attempts
            )));
            self.set_state_locked(ConnectionState::Failed).await;
        }
    }
}
