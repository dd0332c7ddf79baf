//! Per-connection interaction endpoints for Skullsync.
//!
//! An endpoint multiplexes three kinds of traffic onto one line
//! connection: outgoing state updates, outgoing prompts, and incoming
//! answers. At most one prompt is outstanding at a time.
//!
//! - [`Endpoint`] is the transport-independent contract, and
//!   [`EndpointFlags`] the busy / waiting / suspended state it implies.
//! - [`TransportEndpoint`] implements it over any
//!   [`LineConnection`](skullsync_transport::LineConnection) with an
//!   explicit, testable [`poll`](TransportEndpoint::poll) step.
//! - [`spawn_endpoint`] moves a `TransportEndpoint` into its own task and
//!   returns a cloneable [`EndpointHandle`].
//! - [`Notifier`] lets the domain engine queue updates for a player
//!   without interleaving them with the endpoint's own frames.
//!
//! Answers to asynchronous offers come out as [`Decision`]s on the
//! channel passed in at construction.

mod config;
mod endpoint;
mod error;
mod notifier;
mod transport;
mod worker;

pub use config::{EndpointConfig, EndpointState};
pub use endpoint::{Decision, Endpoint, EndpointFlags};
pub use error::EndpointError;
pub use notifier::Notifier;
pub use transport::{Polled, TransportEndpoint};
pub use worker::{EndpointHandle, spawn_endpoint};
