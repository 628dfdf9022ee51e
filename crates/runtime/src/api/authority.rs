//! Cloneable façade for an authoritative host.
use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::debug;

use janggi_core::{Commit, MoveIntent, Session, SnapshotBatch};

use super::errors::{Result, RuntimeError};
use crate::remote::{MoveNotifier, NotifyError};
use crate::workers::AuthorityCommand;

#[derive(Clone)]
pub struct AuthorityHandle {
    command_tx: mpsc::Sender<AuthorityCommand>,
}

impl AuthorityHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<AuthorityCommand>) -> Self {
        Self { command_tx }
    }

    /// Apply a move intent to the canonical session. Subscribers receive the
    /// new batch before this returns.
    pub async fn submit(&self, intent: MoveIntent) -> Result<Commit> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(AuthorityCommand::Submit {
                intent,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Parse and submit a JSON move intent.
    pub async fn submit_json(&self, json: &str) -> Result<Commit> {
        self.submit(MoveIntent::from_json(json)?).await
    }

    /// The current batch plus a receiver for every later one.
    pub async fn subscribe(&self) -> Result<(SnapshotBatch, broadcast::Receiver<SnapshotBatch>)> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(AuthorityCommand::Subscribe { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    pub async fn query_session(&self) -> Result<Session> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(AuthorityCommand::QuerySession { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Ask the worker to stop. A worker that is already gone is not an error.
    pub(crate) async fn request_shutdown(&self) {
        if self.command_tx.send(AuthorityCommand::Shutdown).await.is_err() {
            debug!("AuthorityWorker already stopped");
        }
    }
}

/// Lets a replica post its moves straight to an in-process host.
#[async_trait]
impl MoveNotifier for AuthorityHandle {
    async fn notify(&self, intent: MoveIntent) -> std::result::Result<(), NotifyError> {
        match self.submit(intent).await {
            Ok(_) => Ok(()),
            Err(error) if error.is_closed() => Err(NotifyError::ChannelClosed),
            Err(error) => Err(NotifyError::Rejected(error.to_string())),
        }
    }
}
