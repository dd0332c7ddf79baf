//! The player-facing interaction contract, independent of transport.

use std::future::Future;
use std::time::Duration;

use skullsync_protocol::Update;
use skullsync_transport::ConnectionId;
use tokio::time::Instant;

use crate::{EndpointError, EndpointState};

/// A player's answer to an offered choice, delivered to the domain engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub connection: ConnectionId,
    /// The raw reply line.
    pub answer: String,
}

impl Decision {
    /// Parses the answer as an option index.
    pub fn selection(&self) -> Result<usize, EndpointError> {
        parse_selection(&self.answer)
    }
}

pub(crate) fn parse_selection(answer: &str) -> Result<usize, EndpointError> {
    answer
        .trim()
        .parse()
        .map_err(|_| EndpointError::InvalidSelection(answer.to_owned()))
}

/// What every connection endpoint offers the domain engine.
///
/// One interaction is outstanding at a time. An asynchronous offer marks
/// the endpoint busy until its answer is consumed; further offers are
/// dropped meanwhile, and blocking prompts fail with
/// [`EndpointError::Busy`].
///
/// Every operation on a suspended endpoint fails with
/// [`EndpointError::Suspended`] without touching the transport.
pub trait Endpoint: Send {
    fn id(&self) -> ConnectionId;

    /// Sends a state update. Returns once it is handed to the transport.
    fn announce(
        &mut self,
        update: Update,
    ) -> impl Future<Output = Result<(), EndpointError>> + Send;

    /// Sends informational text; no answer is expected.
    fn display(
        &mut self,
        text: &str,
    ) -> impl Future<Output = Result<(), EndpointError>> + Send;

    /// Offers `options` and returns at once. The answer arrives later as
    /// a [`Decision`].
    fn offer_choices(
        &mut self,
        prompt: &str,
        options: &[String],
    ) -> impl Future<Output = Result<(), EndpointError>> + Send;

    /// Like [`offer_choices`](Self::offer_choices), but an answer arriving
    /// after `deadline` is dropped instead of delivered.
    fn offer_choices_with_deadline(
        &mut self,
        prompt: &str,
        options: &[String],
        deadline: Duration,
    ) -> impl Future<Output = Result<(), EndpointError>> + Send;

    /// Offers `options` and waits for the chosen index.
    fn ask_blocking(
        &mut self,
        prompt: &str,
        options: &[String],
    ) -> impl Future<Output = Result<usize, EndpointError>> + Send;

    /// Requests free text of at most `max_len` characters and waits for it.
    fn prompt_text(
        &mut self,
        prompt: &str,
        max_len: usize,
    ) -> impl Future<Output = Result<String, EndpointError>> + Send;

    /// Marks the endpoint terminal and releases the transport.
    fn suspend(&mut self) -> impl Future<Output = ()> + Send;

    /// Tells the remote side the session is ending, then suspends.
    fn shutdown(&mut self) -> impl Future<Output = ()> + Send;

    fn is_suspended(&self) -> bool;
}

// ---------------------------------------------------------------------------
// EndpointFlags
// ---------------------------------------------------------------------------

/// The busy / waiting / suspended / deadline flags every endpoint keeps.
///
/// `suspended` is sticky: once set, no other transition applies.
#[derive(Debug, Clone, Default)]
pub struct EndpointFlags {
    busy: bool,
    waiting: bool,
    suspended: bool,
    deadline: Option<Instant>,
}

impl EndpointFlags {
    pub fn state(&self) -> EndpointState {
        if self.suspended {
            EndpointState::Suspended
        } else if self.waiting {
            EndpointState::Waiting
        } else if self.busy {
            EndpointState::Busy
        } else {
            EndpointState::Active
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` if a deadline is armed and has passed at `now`.
    pub fn is_expired(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|d| now >= d)
    }

    /// A prompt went out; its answer is now awaited.
    pub fn begin_offer(&mut self, deadline: Option<Instant>) {
        if self.suspended {
            return;
        }
        self.busy = true;
        self.deadline = deadline;
    }

    /// A blocking prompt went out and is draining input.
    pub fn begin_wait(&mut self) {
        if self.suspended {
            return;
        }
        self.busy = true;
        self.waiting = true;
    }

    /// The waiting caller's line arrived.
    pub fn answer_stored(&mut self) {
        self.waiting = false;
    }

    /// The outstanding answer was consumed, dropped, or given up on.
    pub fn settle(&mut self) {
        self.busy = false;
        self.waiting = false;
        self.deadline = None;
    }

    pub fn suspend(&mut self) {
        self.settle();
        self.suspended = true;
    }
}
