//! Endpoint worker: one Tokio task per connection.
//!
//! The worker owns its [`TransportEndpoint`] and is the only code that
//! touches it. Between commands it keeps the polling loop running, so
//! answers to asynchronous offers are delivered even when the domain
//! engine is not talking to this player.

use std::time::Duration;

use skullsync_protocol::{Codec, Update};
use skullsync_transport::{ConnectionId, LineConnection};
use tokio::sync::{mpsc, oneshot, watch};

use crate::{Endpoint, EndpointError, TransportEndpoint};

type Reply<T> = oneshot::Sender<Result<T, EndpointError>>;

/// Commands sent to an endpoint worker through its channel.
enum Command {
    Announce(Update),
    Display(String),
    Offer {
        prompt: String,
        options: Vec<String>,
        deadline: Option<Duration>,
        reply: Reply<()>,
    },
    Ask {
        prompt: String,
        options: Vec<String>,
        reply: Reply<usize>,
    },
    PromptText {
        prompt: String,
        max_len: usize,
        reply: Reply<String>,
    },
    Suspend {
        reply: oneshot::Sender<()>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Handle to a running endpoint worker.
///
/// Cheap to clone; every clone talks to the same worker. When the last
/// handle is dropped the worker shuts its endpoint down.
#[derive(Clone)]
pub struct EndpointHandle {
    id: ConnectionId,
    commands: mpsc::Sender<Command>,
    suspended: watch::Receiver<bool>,
}

impl EndpointHandle {
    /// Completes once the endpoint is suspended.
    pub async fn suspended(&self) {
        let mut suspended = self.suspended.clone();
        // A closed channel means the worker is gone, which is as final.
        let _ = suspended.wait_for(|s| *s).await;
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(Reply<T>) -> Command,
    ) -> Result<T, EndpointError> {
        if self.is_suspended() {
            return Err(EndpointError::Suspended);
        }
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(command(reply_tx))
            .await
            .map_err(|_| EndpointError::Suspended)?;
        reply_rx.await.map_err(|_| EndpointError::Suspended)?
    }

    async fn post(&self, command: Command) -> Result<(), EndpointError> {
        if self.is_suspended() {
            return Err(EndpointError::Suspended);
        }
        self.commands
            .send(command)
            .await
            .map_err(|_| EndpointError::Suspended)
    }

    async fn finish(&self, command: impl FnOnce(oneshot::Sender<()>) -> Command) {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.commands.send(command(reply_tx)).await.is_ok() {
            let _ = reply_rx.await;
        }
    }
}

impl Endpoint for EndpointHandle {
    fn id(&self) -> ConnectionId {
        self.id
    }

    async fn announce(&mut self, update: Update) -> Result<(), EndpointError> {
        self.post(Command::Announce(update)).await
    }

    async fn display(&mut self, text: &str) -> Result<(), EndpointError> {
        self.post(Command::Display(text.to_owned())).await
    }

    async fn offer_choices(&mut self, prompt: &str, options: &[String]) -> Result<(), EndpointError> {
        let (prompt, options) = (prompt.to_owned(), options.to_vec());
        self.request(|reply| Command::Offer {
            prompt,
            options,
            deadline: None,
            reply,
        })
        .await
    }

    async fn offer_choices_with_deadline(
        &mut self,
        prompt: &str,
        options: &[String],
        deadline: Duration,
    ) -> Result<(), EndpointError> {
        let (prompt, options) = (prompt.to_owned(), options.to_vec());
        self.request(|reply| Command::Offer {
            prompt,
            options,
            deadline: Some(deadline),
            reply,
        })
        .await
    }

    async fn ask_blocking(&mut self, prompt: &str, options: &[String]) -> Result<usize, EndpointError> {
        let (prompt, options) = (prompt.to_owned(), options.to_vec());
        self.request(|reply| Command::Ask {
            prompt,
            options,
            reply,
        })
        .await
    }

    async fn prompt_text(&mut self, prompt: &str, max_len: usize) -> Result<String, EndpointError> {
        let prompt = prompt.to_owned();
        self.request(|reply| Command::PromptText {
            prompt,
            max_len,
            reply,
        })
        .await
    }

    async fn suspend(&mut self) {
        self.finish(|reply| Command::Suspend { reply }).await;
    }

    async fn shutdown(&mut self) {
        self.finish(|reply| Command::Shutdown { reply }).await;
    }

    fn is_suspended(&self) -> bool {
        *self.suspended.borrow()
    }
}

/// The internal worker state. Runs inside a Tokio task.
struct EndpointWorker<C: LineConnection, K: Codec> {
    endpoint: TransportEndpoint<C, K>,
    commands: mpsc::Receiver<Command>,
    suspended: watch::Sender<bool>,
}

impl<C: LineConnection, K: Codec> EndpointWorker<C, K> {
    /// Alternates between commands and poll steps until suspended.
    async fn run(mut self) {
        let conn_id = self.endpoint.id();
        tracing::info!(%conn_id, "endpoint worker started");

        while !self.endpoint.is_suspended() {
            if self.endpoint.flush_notifications().await.is_err() {
                break;
            }
            // Both branches are cancel safe; a read abandoned for a
            // command keeps its partial line.
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle(command).await,
                    None => {
                        tracing::debug!(%conn_id, "all handles dropped");
                        self.endpoint.shutdown().await;
                    }
                },
                read = self.endpoint.read() => {
                    self.endpoint.on_read(read).await;
                }
            }
            self.publish();
        }

        self.publish();
        // Answer whatever is still queued so no caller waits forever.
        self.commands.close();
        while let Ok(command) = self.commands.try_recv() {
            self.handle(command).await;
        }
        tracing::info!(%conn_id, "endpoint worker stopped");
    }

    async fn handle(&mut self, command: Command) {
        match command {
            Command::Announce(update) => {
                if let Err(e) = self.endpoint.announce(update).await {
                    tracing::debug!(error = %e, "announce dropped");
                }
            }
            Command::Display(text) => {
                if let Err(e) = self.endpoint.display(&text).await {
                    tracing::debug!(error = %e, "display dropped");
                }
            }
            Command::Offer {
                prompt,
                options,
                deadline,
                reply,
            } => {
                let result = match deadline {
                    Some(d) => {
                        self.endpoint
                            .offer_choices_with_deadline(&prompt, &options, d)
                            .await
                    }
                    None => self.endpoint.offer_choices(&prompt, &options).await,
                };
                self.publish();
                let _ = reply.send(result);
            }
            Command::Ask {
                prompt,
                options,
                reply,
            } => {
                let result = self.endpoint.ask_blocking(&prompt, &options).await;
                self.publish();
                let _ = reply.send(result);
            }
            Command::PromptText {
                prompt,
                max_len,
                reply,
            } => {
                let result = self.endpoint.prompt_text(&prompt, max_len).await;
                self.publish();
                let _ = reply.send(result);
            }
            Command::Suspend { reply } => {
                self.endpoint.suspend().await;
                self.publish();
                let _ = reply.send(());
            }
            Command::Shutdown { reply } => {
                self.endpoint.shutdown().await;
                self.publish();
                let _ = reply.send(());
            }
        }
    }

    fn publish(&self) {
        self.suspended.send_replace(self.endpoint.is_suspended());
    }
}

/// Spawns a worker task for `endpoint` and returns a handle to it.
///
/// The command channel holds `command_buffer` commands from the
/// endpoint's configuration; senders wait when it is full.
pub fn spawn_endpoint<C, K>(endpoint: TransportEndpoint<C, K>) -> EndpointHandle
where
    C: LineConnection,
    K: Codec,
{
    let (tx, rx) = mpsc::channel(endpoint.config().command_buffer.max(1));
    let (suspended_tx, suspended_rx) = watch::channel(endpoint.is_suspended());
    let id = endpoint.id();

    let worker = EndpointWorker {
        endpoint,
        commands: rx,
        suspended: suspended_tx,
    };
    tokio::spawn(worker.run());

    EndpointHandle {
        id,
        commands: tx,
        suspended: suspended_rx,
    }
}
