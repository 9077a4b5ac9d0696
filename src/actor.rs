//! Session task.
//!
//! Runs a [`Client`] on its own Tokio task so frames from the transport and
//! calls from the application are applied one at a time, in arrival order.
//!
//! # Architecture
//!
//! - **State Ownership**: The task owns the client and its resource graph.
//! - **Message Passing**: Frames and closures reach it through a bounded mailbox.
//! - **Shutdown**: The loop ends when the session closes, on a fatal error, or
//!   when every handle is dropped. The join handle yields the client back.

use crate::client::Client;
use crate::dispatch::Dispatcher;
use crate::error::{ClientError, ClientResult};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{info, warn};

const MAILBOX_CAPACITY: usize = 100;

type Job<D> = Box<dyn FnOnce(&mut Client<D>) + Send>;

/// Work delivered to the session task.
pub enum SessionCommand<D> {
    /// A raw JSON frame from the transport.
    Frame(String),
    /// Run a closure against the client.
    Run(Job<D>),
}

/// Sending half of a session task's mailbox.
pub struct SessionHandle<D> {
    tx: mpsc::Sender<SessionCommand<D>>,
}

impl<D> Clone for SessionHandle<D> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<D: Dispatcher + Send + 'static> SessionHandle<D> {
    /// Move `client` onto a new task.
    pub fn spawn(client: Client<D>) -> (Self, JoinHandle<ClientResult<Client<D>>>) {
        let (tx, rx) = mpsc::channel(MAILBOX_CAPACITY);
        let task = tokio::spawn(run(client, rx));
        (Self { tx }, task)
    }

    /// Queue a frame for processing.
    pub async fn deliver(&self, frame: impl Into<String>) -> ClientResult<()> {
        self.tx
            .send(SessionCommand::Frame(frame.into()))
            .await
            .map_err(|_| ClientError::SessionClosed)
    }

    /// Run `f` against the client on the session task and return its result.
    pub async fn with<T, F>(&self, f: F) -> ClientResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Client<D>) -> T + Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let job: Job<D> = Box::new(move |client| {
            let _ = reply_tx.send(f(client));
        });
        self.tx
            .send(SessionCommand::Run(job))
            .await
            .map_err(|_| ClientError::SessionClosed)?;
        reply_rx.await.map_err(|_| ClientError::SessionClosed)
    }

    /// Whether the task has stopped accepting work.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// The session loop.
async fn run<D: Dispatcher>(
    mut client: Client<D>,
    mut rx: mpsc::Receiver<SessionCommand<D>>,
) -> ClientResult<Client<D>> {
    while let Some(command) = rx.recv().await {
        match command {
            SessionCommand::Frame(frame) => {
                if let Err(e) = client.receive(&frame) {
                    if e.is_fatal() {
                        warn!(error = %e, code = e.error_code(), "Stopping session");
                        return Err(e);
                    }
                    warn!(error = %e, code = e.error_code(), "Dropping message");
                }
            }
            SessionCommand::Run(job) => job(&mut client),
        }

        if let Some(reason) = client.session().close_reason() {
            info!(reason, "Session closed");
            break;
        }
    }
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::error::RemoteCallError;
    use crate::handlers::Registry;
    use crate::resource::Attributes;
    use std::sync::Arc;

    struct Offline;

    impl Dispatcher for Offline {
        fn call(&mut self, command: &str, _params: Attributes) -> Result<Attributes, RemoteCallError> {
            Err(RemoteCallError::new(command, "offline"))
        }
    }

    fn client() -> Client<Offline> {
        let config = ClientConfig::new("me").with_room("r1");
        Client::new(config, Arc::new(Registry::standard()), Offline)
    }

    #[tokio::test]
    async fn frames_are_applied_in_order() {
        let (handle, task) = SessionHandle::spawn(client());
        handle
            .deliver(r#"{"command":"registered","roomid":"r1","user":[{"userid":"u1","name":"Ann"}]}"#)
            .await
            .unwrap();
        handle
            .deliver(r#"{"command":"registered","roomid":"r1","user":[{"userid":"u2","name":"Bo"}]}"#)
            .await
            .unwrap();

        let listeners = handle
            .with(|client| {
                let room = client.world().current_room().unwrap();
                room.listeners().into_iter().map(String::from).collect::<Vec<_>>()
            })
            .await
            .unwrap();
        assert_eq!(listeners, vec!["u1", "u2"]);

        drop(handle);
        assert!(task.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn malformed_frame_is_not_fatal() {
        let (handle, _task) = SessionHandle::spawn(client());
        handle.deliver("{not json").await.unwrap();
        let closed = handle.with(|client| client.session().is_closed()).await.unwrap();
        assert!(!closed);
    }

    #[tokio::test]
    async fn unknown_command_stops_the_session() {
        let (handle, task) = SessionHandle::spawn(client());
        handle.deliver(r#"{"command":"bogus"}"#).await.unwrap();
        let err = task.await.unwrap().err().unwrap();
        assert_eq!(err.error_code(), "unknown_command");
        assert!(matches!(
            handle.with(|_| ()).await,
            Err(ClientError::SessionClosed)
        ));
    }

    #[tokio::test]
    async fn session_end_returns_the_client() {
        let (handle, task) = SessionHandle::spawn(client());
        handle
            .deliver(r#"{"command":"killdashnine","roomid":"r1","reason":"bye"}"#)
            .await
            .unwrap();
        let client = task.await.unwrap().unwrap();
        assert_eq!(client.session().close_reason(), Some("bye"));
    }
}
