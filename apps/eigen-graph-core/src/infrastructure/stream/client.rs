//! Live Price Stream Client
//!
//! Owns the WebSocket connection lifecycle for one price subscription:
//! connect, validate and batch inbound frames, detect dead connections
//! through the idle timer, and reconnect with exponential backoff. The
//! client is a cheap handle; all work happens on a spawned worker task
//! that publishes status and the bounded point sequence through watch
//! channels.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;

use crate::domain::streaming::{LiveStatus, PointBuffer, StreamPoint};
use crate::infrastructure::config::StreamSettings;

use super::backoff::{BackoffConfig, BackoffPolicy};
use super::codec::decode_point;
use super::heartbeat::IdleTimeout;

/// Capacity of the control command channel.
const COMMAND_CAPACITY: usize = 16;

/// Errors surfaced by the client handle.
#[derive(Debug, thiserror::Error)]
pub enum StreamClientError {
    /// The worker task has stopped and can no longer accept commands.
    #[error("stream worker is not running")]
    WorkerStopped,
}

/// Control commands sent from the handle to the worker.
#[derive(Debug)]
enum Command {
    /// Switch to a new subscription, or tear the stream down on `None`.
    SetSymbol(Option<String>),
    /// Close the connection and hold reconnection until resumed.
    Pause,
    /// Leave the paused state and reconnect.
    Resume,
}

/// Why a connection stopped being driven.
enum ConnectionEnd {
    /// The worker was cancelled.
    Shutdown,
    /// A command changed the subscription or paused the stream.
    Reconfigured,
    /// The transport failed or went idle; reconnect after backoff.
    Failed,
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Handle to a running price stream worker.
///
/// Dropping the handle cancels the worker.
#[derive(Debug)]
pub struct PriceStreamClient {
    command_tx: mpsc::Sender<Command>,
    status_rx: watch::Receiver<LiveStatus>,
    points_rx: watch::Receiver<Vec<StreamPoint>>,
    cancel: CancellationToken,
    worker: Option<tokio::task::JoinHandle<()>>,
}

impl PriceStreamClient {
    /// Spawn a stream worker, optionally subscribed to `symbol` from the
    /// start.
    #[must_use]
    pub fn start(settings: StreamSettings, symbol: Option<String>) -> Self {
        let initial_status = if symbol.is_some() {
            LiveStatus::Idle
        } else {
            LiveStatus::Unavailable
        };
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (status_tx, status_rx) = watch::channel(initial_status);
        let (points_tx, points_rx) = watch::channel(Vec::new());
        let cancel = CancellationToken::new();

        let worker = StreamWorker::new(settings, symbol, command_rx, status_tx, points_tx, cancel.clone());
        let handle = tokio::spawn(worker.run());

        Self {
            command_tx,
            status_rx,
            points_rx,
            cancel,
            worker: Some(handle),
        }
    }

    /// Subscribe to `symbol`, replacing any current subscription.
    ///
    /// The point sequence restarts from empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker has stopped.
    pub async fn start_stream(&self, symbol: impl Into<String>) -> Result<(), StreamClientError> {
        self.send(Command::SetSymbol(Some(symbol.into()))).await
    }

    /// Tear down the current subscription; status becomes `Unavailable`.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker has stopped.
    pub async fn stop_stream(&self) -> Result<(), StreamClientError> {
        self.send(Command::SetSymbol(None)).await
    }

    /// Close the connection and hold reconnection until [`Self::resume`].
    ///
    /// Buffered points are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker has stopped.
    pub async fn pause(&self) -> Result<(), StreamClientError> {
        self.send(Command::Pause).await
    }

    /// Leave the paused state and reconnect.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker has stopped.
    pub async fn resume(&self) -> Result<(), StreamClientError> {
        self.send(Command::Resume).await
    }

    /// Current stream status.
    #[must_use]
    pub fn status(&self) -> LiveStatus {
        *self.status_rx.borrow()
    }

    /// Watch channel carrying every status transition.
    #[must_use]
    pub fn subscribe_status(&self) -> watch::Receiver<LiveStatus> {
        self.status_rx.clone()
    }

    /// Current point sequence, oldest first.
    #[must_use]
    pub fn points(&self) -> Vec<StreamPoint> {
        self.points_rx.borrow().clone()
    }

    /// Watch channel carrying each flushed point sequence.
    #[must_use]
    pub fn subscribe_points(&self) -> watch::Receiver<Vec<StreamPoint>> {
        self.points_rx.clone()
    }

    /// Cancel the worker and wait for it to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.worker.take() {
            let _ = handle.await;
        }
    }

    async fn send(&self, command: Command) -> Result<(), StreamClientError> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| StreamClientError::WorkerStopped)
    }
}

impl Drop for PriceStreamClient {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// The worker task driving the connection lifecycle.
struct StreamWorker {
    settings: StreamSettings,
    symbol: Option<String>,
    paused: bool,
    command_rx: mpsc::Receiver<Command>,
    status_tx: watch::Sender<LiveStatus>,
    points_tx: watch::Sender<Vec<StreamPoint>>,
    cancel: CancellationToken,
    buffer: PointBuffer,
    backoff: BackoffPolicy,
    pending: Vec<StreamPoint>,
    watermark: i64,
}

impl StreamWorker {
    fn new(
        settings: StreamSettings,
        symbol: Option<String>,
        command_rx: mpsc::Receiver<Command>,
        status_tx: watch::Sender<LiveStatus>,
        points_tx: watch::Sender<Vec<StreamPoint>>,
        cancel: CancellationToken,
    ) -> Self {
        let buffer = PointBuffer::new(settings.max_points);
        let backoff = BackoffPolicy::new(BackoffConfig {
            base_delay: settings.backoff_base,
            max_delay: settings.backoff_max,
        });
        Self {
            settings,
            symbol,
            paused: false,
            command_rx,
            status_tx,
            points_tx,
            cancel,
            buffer,
            backoff,
            pending: Vec::new(),
            watermark: 0,
        }
    }

    /// Run the connection lifecycle until cancelled.
    async fn run(mut self) {
        loop {
            if self.cancel.is_cancelled() {
                tracing::debug!("Stream worker cancelled");
                return;
            }

            if self.paused || self.symbol.is_none() {
                if !self.wait_for_command().await {
                    return;
                }
                continue;
            }
            let Some(symbol) = self.symbol.clone() else {
                continue;
            };

            self.set_status(LiveStatus::Connecting);
            let url = self.settings.stream_url(&symbol);
            tracing::info!(%symbol, "Connecting to price stream");

            match tokio_tungstenite::connect_async(&url).await {
                Ok((ws_stream, _response)) => {
                    self.backoff.reset();
                    match self.drive_connection(ws_stream).await {
                        ConnectionEnd::Shutdown => return,
                        ConnectionEnd::Reconfigured => continue,
                        ConnectionEnd::Failed => {}
                    }
                }
                Err(error) => {
                    tracing::warn!(%symbol, %error, "Price stream connection failed");
                    self.set_status(LiveStatus::Error);
                }
            }

            let delay = self.backoff.next_delay();
            tracing::info!(delay_ms = delay.as_millis(), "Reconnecting after backoff");
            tokio::select! {
                () = self.cancel.cancelled() => return,
                () = tokio::time::sleep(delay) => {}
                command = self.command_rx.recv() => {
                    match command {
                        Some(command) => {
                            self.apply(command);
                        }
                        None => return,
                    }
                }
            }
        }
    }

    /// Process frames on an open connection until it ends.
    async fn drive_connection(&mut self, ws_stream: WsStream) -> ConnectionEnd {
        let (mut write, mut read) = ws_stream.split();
        let mut idle = IdleTimeout::new(self.settings.heartbeat_timeout);
        let mut flush = tokio::time::interval(self.settings.flush_interval);
        flush.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                () = self.cancel.cancelled() => {
                    let _ = write.close().await;
                    return ConnectionEnd::Shutdown;
                }
                command = self.command_rx.recv() => {
                    let Some(command) = command else {
                        let _ = write.close().await;
                        return ConnectionEnd::Shutdown;
                    };
                    if self.apply(command) {
                        self.flush_pending();
                        let _ = write.close().await;
                        return ConnectionEnd::Reconfigured;
                    }
                }
                () = tokio::time::sleep_until(idle.deadline()) => {
                    tracing::warn!(
                        timeout_ms = self.settings.heartbeat_timeout.as_millis(),
                        "Heartbeat timeout, closing connection"
                    );
                    self.flush_pending();
                    self.set_status(LiveStatus::Error);
                    let _ = write.close().await;
                    return ConnectionEnd::Failed;
                }
                _ = flush.tick() => {
                    self.flush_pending();
                }
                message = read.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            idle.reset();
                            self.handle_frame(&text);
                        }
                        Some(Ok(Message::Ping(data))) => {
                            idle.reset();
                            let _ = write.send(Message::Pong(data)).await;
                        }
                        Some(Ok(Message::Close(_))) => {
                            tracing::info!("Server closed the price stream");
                            self.flush_pending();
                            self.set_status(LiveStatus::Error);
                            return ConnectionEnd::Failed;
                        }
                        Some(Ok(_)) => {
                            idle.reset();
                        }
                        Some(Err(error)) => {
                            tracing::warn!(%error, "Price stream transport error");
                            self.flush_pending();
                            self.set_status(LiveStatus::Error);
                            return ConnectionEnd::Failed;
                        }
                        None => {
                            tracing::info!("Price stream ended");
                            self.flush_pending();
                            self.set_status(LiveStatus::Error);
                            return ConnectionEnd::Failed;
                        }
                    }
                }
            }
        }
    }

    /// Validate one text frame and stage the point for the next flush.
    fn handle_frame(&mut self, text: &str) {
        match decode_point(text, self.watermark) {
            Ok(Some(point)) => {
                self.watermark = point.timestamp_millis;
                self.pending.push(point);
                self.set_status(LiveStatus::Live);
            }
            Ok(None) => {
                tracing::debug!("Dropped invalid or out-of-order frame");
            }
            Err(error) => {
                tracing::warn!(%error, "Dropped malformed frame");
            }
        }
    }

    /// Move staged points into the buffer and publish a new snapshot.
    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        self.buffer.extend_batch(self.pending.drain(..));
        let _ = self.points_tx.send(self.buffer.snapshot());
    }

    /// Block on the next command while idle or paused.
    ///
    /// Returns `false` when the worker should exit.
    async fn wait_for_command(&mut self) -> bool {
        tokio::select! {
            () = self.cancel.cancelled() => false,
            command = self.command_rx.recv() => match command {
                Some(command) => {
                    self.apply(command);
                    true
                }
                None => false,
            },
        }
    }

    /// Apply a control command.
    ///
    /// Returns `true` when the current connection, if any, must be torn
    /// down.
    fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::SetSymbol(symbol) => {
                if symbol == self.symbol {
                    return false;
                }
                tracing::info!(symbol = ?symbol, "Switching price subscription");
                self.symbol = symbol;
                self.pending.clear();
                self.buffer.clear();
                self.watermark = 0;
                // A new subscription starts a fresh backoff schedule.
                self.backoff.reset();
                let _ = self.points_tx.send(Vec::new());
                if self.symbol.is_none() {
                    self.set_status(LiveStatus::Unavailable);
                } else {
                    self.set_status(LiveStatus::Idle);
                }
                true
            }
            Command::Pause => {
                if self.paused {
                    return false;
                }
                tracing::debug!("Pausing price stream");
                self.paused = true;
                true
            }
            Command::Resume => {
                if !self.paused {
                    return false;
                }
                tracing::debug!("Resuming price stream");
                self.paused = false;
                false
            }
        }
    }

    fn set_status(&self, status: LiveStatus) {
        self.status_tx.send_if_modified(|current| {
            if *current == status {
                false
            } else {
                *current = status;
                true
            }
        });
    }
}
