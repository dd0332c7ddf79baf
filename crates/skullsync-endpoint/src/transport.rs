//! A stream-backed endpoint and its polling loop.
//!
//! One poll step is one bounded read attempt:
//!
//! 1. flush queued notifications;
//! 2. wait up to `poll_interval` for a line;
//! 3. end of stream or an I/O fault suspends the endpoint;
//! 4. nothing arrived: return;
//! 5. a blocking prompt is waiting: store the line as its answer;
//! 6. the armed deadline has passed: drop the line;
//! 7. nothing was asked: drop the line;
//! 8. otherwise: settle and deliver the line as a [`Decision`].

use std::time::Duration;

use skullsync_protocol::{Codec, Frame, JsonCodec, Update};
use skullsync_transport::{ConnectionId, LineConnection, TransportError};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::endpoint::parse_selection;
use crate::notifier::{self, Notifications, Notifier};
use crate::{Decision, Endpoint, EndpointConfig, EndpointError, EndpointFlags, EndpointState};

/// Outcome of one [`TransportEndpoint::poll`] step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polled {
    /// No line arrived within the poll interval.
    Idle,
    /// A line was stored for the waiting blocking prompt.
    Answered,
    /// A line was forwarded as a [`Decision`].
    Delivered,
    /// A line answered an expired offer and was dropped.
    Late,
    /// A line arrived while nothing was asked and was dropped.
    Stray,
    /// The endpoint is (now) suspended.
    Suspended,
}

/// Result of one bounded read attempt.
pub(crate) enum Read {
    Line(String),
    Idle,
    Closed,
    Failed(TransportError),
}

/// An [`Endpoint`] over one [`LineConnection`].
///
/// Must be polled for input to be observed; [`spawn_endpoint`] does
/// that from a dedicated task.
///
/// [`spawn_endpoint`]: crate::spawn_endpoint
pub struct TransportEndpoint<C: LineConnection, K: Codec = JsonCodec> {
    conn: C,
    codec: K,
    config: EndpointConfig,
    flags: EndpointFlags,
    answer: Option<String>,
    notifier: Notifier,
    notifications: Notifications,
    decisions: mpsc::UnboundedSender<Decision>,
}

impl<C: LineConnection> TransportEndpoint<C> {
    /// Creates a JSON endpoint with the default configuration.
    pub fn new(conn: C, decisions: mpsc::UnboundedSender<Decision>) -> Self {
        Self::with_codec(conn, JsonCodec, EndpointConfig::default(), decisions)
    }
}

impl<C: LineConnection, K: Codec> TransportEndpoint<C, K> {
    pub fn with_codec(
        conn: C,
        codec: K,
        config: EndpointConfig,
        decisions: mpsc::UnboundedSender<Decision>,
    ) -> Self {
        let (notifier, notifications) = notifier::channel();
        Self {
            conn,
            codec,
            config,
            flags: EndpointFlags::default(),
            answer: None,
            notifier,
            notifications,
            decisions,
        }
    }

    /// A queue the domain engine can post updates into.
    pub fn notifier(&self) -> Notifier {
        self.notifier.clone()
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    pub fn flags(&self) -> &EndpointFlags {
        &self.flags
    }

    pub fn state(&self) -> EndpointState {
        self.flags.state()
    }

    /// Runs one step of the polling loop.
    pub async fn poll(&mut self) -> Polled {
        if self.flush_notifications().await.is_err() {
            return Polled::Suspended;
        }
        let read = self.read().await;
        self.on_read(read).await
    }

    // -- Polling internals --------------------------------------------------

    /// One bounded read attempt. Cancel safe.
    pub(crate) async fn read(&self) -> Read {
        if self.flags.is_suspended() {
            return Read::Closed;
        }
        match tokio::time::timeout(self.config.poll_interval, self.conn.recv_line()).await {
            Err(_elapsed) => Read::Idle,
            Ok(Ok(Some(line))) => Read::Line(line),
            Ok(Ok(None)) => Read::Closed,
            Ok(Err(e)) => Read::Failed(e),
        }
    }

    pub(crate) async fn on_read(&mut self, read: Read) -> Polled {
        let line = match read {
            Read::Idle => return Polled::Idle,
            Read::Line(line) => line,
            Read::Closed => {
                if !self.flags.is_suspended() {
                    tracing::info!(conn_id = %self.id(), "peer closed the connection");
                    self.suspend_now().await;
                }
                return Polled::Suspended;
            }
            Read::Failed(e) => {
                tracing::warn!(conn_id = %self.id(), error = %e, "read failed");
                self.suspend_now().await;
                return Polled::Suspended;
            }
        };
        tracing::trace!(conn_id = %self.id(), len = line.len(), "line received");

        if self.flags.is_waiting() {
            self.answer = Some(line);
            self.flags.answer_stored();
            return Polled::Answered;
        }

        if self.flags.is_expired(Instant::now()) {
            tracing::debug!(conn_id = %self.id(), "answer after deadline dropped");
            self.flags.settle();
            return Polled::Late;
        }

        if !self.flags.is_busy() {
            tracing::debug!(conn_id = %self.id(), "unrequested input dropped");
            return Polled::Stray;
        }

        self.flags.settle();
        let decision = Decision {
            connection: self.id(),
            answer: line,
        };
        if self.decisions.send(decision).is_err() {
            tracing::debug!(conn_id = %self.id(), "no decision observer, answer dropped");
        }
        Polled::Delivered
    }

    // -- Sending ------------------------------------------------------------

    pub(crate) async fn flush_notifications(&mut self) -> Result<(), EndpointError> {
        if self.flags.is_suspended() {
            return Err(EndpointError::Suspended);
        }
        while let Some(update) = self.notifications.next_pending() {
            self.write(&Frame::Update(update)).await?;
        }
        Ok(())
    }

    /// Flushes queued notifications, then sends `frame`.
    async fn send(&mut self, frame: &Frame) -> Result<(), EndpointError> {
        self.flush_notifications().await?;
        self.write(frame).await
    }

    async fn write(&mut self, frame: &Frame) -> Result<(), EndpointError> {
        let line = self.codec.encode_line(frame)?;
        let sent = self.conn.send_line(&line).await;
        if let Err(e) = sent {
            tracing::warn!(conn_id = %self.id(), error = %e, "send failed");
            self.suspend_now().await;
            return Err(EndpointError::Suspended);
        }
        tracing::trace!(conn_id = %self.id(), head = frame.head(), "frame sent");
        Ok(())
    }

    async fn offer(&mut self, frame: Frame, deadline: Option<Duration>) -> Result<(), EndpointError> {
        if self.flags.is_suspended() {
            return Err(EndpointError::Suspended);
        }
        self.expire_stale_offer();
        if self.flags.is_busy() {
            tracing::debug!(conn_id = %self.id(), "offer while busy ignored");
            return Ok(());
        }
        self.send(&frame).await?;
        self.flags.begin_offer(deadline.map(|d| Instant::now() + d));
        Ok(())
    }

    /// Sends `frame` and re-enters the poll step until its answer lands.
    async fn ask(&mut self, frame: Frame) -> Result<String, EndpointError> {
        if self.flags.is_suspended() {
            return Err(EndpointError::Suspended);
        }
        self.expire_stale_offer();
        if self.flags.is_busy() {
            return Err(EndpointError::Busy);
        }
        self.send(&frame).await?;
        self.answer = None;
        self.flags.begin_wait();

        let give_up = self.config.answer_timeout.map(|t| Instant::now() + t);
        loop {
            if let Some(answer) = self.answer.take() {
                self.flags.settle();
                return Ok(answer);
            }
            if self.flags.is_suspended() {
                return Err(EndpointError::Suspended);
            }
            if give_up.is_some_and(|at| Instant::now() >= at) {
                tracing::debug!(conn_id = %self.id(), "blocking prompt timed out");
                self.flags.settle();
                return Err(EndpointError::AnswerTimeout);
            }
            self.poll().await;
        }
    }

    /// An offer whose deadline passed unanswered no longer holds the
    /// connection.
    fn expire_stale_offer(&mut self) {
        if self.flags.is_busy() && self.flags.is_expired(Instant::now()) {
            tracing::debug!(conn_id = %self.id(), "unanswered offer expired");
            self.flags.settle();
        }
    }

    async fn suspend_now(&mut self) {
        if self.flags.is_suspended() {
            return;
        }
        self.flags.suspend();
        self.answer = None;
        self.notifications.close();
        if let Err(e) = self.conn.close().await {
            tracing::debug!(conn_id = %self.id(), error = %e, "close failed");
        }
        tracing::info!(conn_id = %self.id(), "endpoint suspended");
    }
}

impl<C: LineConnection, K: Codec> Endpoint for TransportEndpoint<C, K> {
    fn id(&self) -> ConnectionId {
        self.conn.id()
    }

    async fn announce(&mut self, update: Update) -> Result<(), EndpointError> {
        if self.flags.is_suspended() {
            return Err(EndpointError::Suspended);
        }
        self.send(&Frame::Update(update)).await
    }

    async fn display(&mut self, text: &str) -> Result<(), EndpointError> {
        if self.flags.is_suspended() {
            return Err(EndpointError::Suspended);
        }
        self.send(&Frame::Message { text: text.to_owned() }).await
    }

    async fn offer_choices(&mut self, prompt: &str, options: &[String]) -> Result<(), EndpointError> {
        self.offer(Frame::options(prompt, options), None).await
    }

    async fn offer_choices_with_deadline(
        &mut self,
        prompt: &str,
        options: &[String],
        deadline: Duration,
    ) -> Result<(), EndpointError> {
        self.offer(Frame::options(prompt, options), Some(deadline)).await
    }

    async fn ask_blocking(&mut self, prompt: &str, options: &[String]) -> Result<usize, EndpointError> {
        let answer = self.ask(Frame::options(prompt, options)).await?;
        parse_selection(&answer)
    }

    async fn prompt_text(&mut self, prompt: &str, max_len: usize) -> Result<String, EndpointError> {
        let frame = Frame::Request {
            text: prompt.to_owned(),
            length: max_len,
        };
        let answer = self.ask(frame).await?;
        Ok(answer.chars().take(max_len).collect())
    }

    async fn suspend(&mut self) {
        self.suspend_now().await;
    }

    async fn shutdown(&mut self) {
        if self.flags.is_suspended() {
            return;
        }
        tracing::info!(conn_id = %self.id(), "shutting endpoint down");
        if self.send(&Frame::Shutdown).await.is_ok() {
            self.suspend_now().await;
        }
    }

    fn is_suspended(&self) -> bool {
        self.flags.is_suspended()
    }
}
