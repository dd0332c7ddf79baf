//! The domain engine's side channel into an endpoint.
//!
//! The engine may queue updates for a player at any time, even while the
//! player's endpoint is halfway through an interaction. Queued updates
//! are drained by the endpoint itself, in order, before each of its own
//! sends and on every poll step, so each is delivered exactly once.

use skullsync_protocol::Update;
use tokio::sync::mpsc;

use crate::EndpointError;

/// Queues updates for one endpoint. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: mpsc::UnboundedSender<Update>,
}

impl Notifier {
    /// Queues `update` for delivery.
    ///
    /// Fails once the endpoint is suspended or dropped.
    pub fn notify(&self, update: Update) -> Result<(), EndpointError> {
        self.sender
            .send(update)
            .map_err(|_| EndpointError::Suspended)
    }
}

/// The endpoint's end of the queue.
#[derive(Debug)]
pub(crate) struct Notifications {
    receiver: mpsc::UnboundedReceiver<Update>,
}

impl Notifications {
    /// Takes the oldest queued update without waiting.
    pub(crate) fn next_pending(&mut self) -> Option<Update> {
        self.receiver.try_recv().ok()
    }

    /// Refuses further updates and discards everything queued.
    pub(crate) fn close(&mut self) {
        self.receiver.close();
        while self.receiver.try_recv().is_ok() {}
    }
}

pub(crate) fn channel() -> (Notifier, Notifications) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (Notifier { sender }, Notifications { receiver })
}
