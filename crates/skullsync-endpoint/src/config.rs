//! Endpoint configuration and state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// EndpointConfig
// ---------------------------------------------------------------------------

/// Configuration for one endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// How long one read attempt of the polling loop waits for a line.
    pub poll_interval: Duration,

    /// Overall limit for a blocking prompt. `None` waits until an answer
    /// arrives or the connection is lost.
    pub answer_timeout: Option<Duration>,

    /// Capacity of a spawned worker's command channel.
    pub command_buffer: usize,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            answer_timeout: None,
            command_buffer: 64,
        }
    }
}

// ---------------------------------------------------------------------------
// EndpointState
// ---------------------------------------------------------------------------

/// Where an endpoint is in its interaction cycle.
///
/// ```text
/// Active → Busy → Waiting → Suspended
///   ↑       │        │
///   └───────┴────────┘  (answer consumed)
/// ```
///
/// - **Active**: idle; updates and prompts can go out.
/// - **Busy**: a prompt was sent and its answer not consumed yet.
/// - **Waiting**: a blocking prompt is draining input for its answer.
/// - **Suspended**: the connection is gone. Terminal.
///
/// A pending deadline is tracked separately; it only ever overlays
/// `Busy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndpointState {
    Active,
    Busy,
    Waiting,
    Suspended,
}

impl EndpointState {
    /// Returns `true` if a new prompt may be sent.
    pub fn accepts_prompts(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for EndpointState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Busy => write!(f, "Busy"),
            Self::Waiting => write!(f, "Waiting"),
            Self::Suspended => write!(f, "Suspended"),
        }
    }
}
