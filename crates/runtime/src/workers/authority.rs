//! Authoritative host worker.
//!
//! Owns the canonical session for a set of tables, applies submitted move
//! intents in arrival order and broadcasts the full snapshot batch after
//! every accepted commit. New subscribers receive the current batch first.

use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, warn};

use janggi_core::{Commit, MoveIntent, Session, SnapshotBatch};

use crate::api::Result;

pub enum AuthorityCommand {
    /// Apply a move intent to the canonical session.
    Submit {
        intent: MoveIntent,
        reply: oneshot::Sender<Result<Commit>>,
    },
    /// Current batch plus a receiver for every later one.
    Subscribe {
        reply: oneshot::Sender<(SnapshotBatch, broadcast::Receiver<SnapshotBatch>)>,
    },
    QuerySession { reply: oneshot::Sender<Session> },
    /// Stop the worker even while handles are still alive.
    Shutdown,
}

pub struct AuthorityWorker {
    session: Session,
    command_rx: mpsc::Receiver<AuthorityCommand>,
    snapshots: broadcast::Sender<SnapshotBatch>,
}

impl AuthorityWorker {
    pub fn new(
        session: Session,
        command_rx: mpsc::Receiver<AuthorityCommand>,
        snapshot_buffer: usize,
    ) -> Self {
        info!(
            tables = session.len(),
            linked = session.is_linked(),
            "AuthorityWorker initialized"
        );

        Self {
            session,
            command_rx,
            snapshots: broadcast::channel(snapshot_buffer.max(1)).0,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(AuthorityCommand::Shutdown) => {
                        info!("Shutdown command received");
                        break;
                    }
                    Some(cmd) => self.handle_command(cmd),
                    None => {
                        debug!("Command channel closed");
                        break;
                    }
                },
            }
        }
        debug!("AuthorityWorker stopped");
    }

    fn handle_command(&mut self, cmd: AuthorityCommand) {
        match cmd {
            AuthorityCommand::Submit { intent, reply } => {
                let result = self.handle_submit(intent);
                if reply.send(result).is_err() {
                    debug!("Submit reply channel closed (caller dropped)");
                }
            }
            AuthorityCommand::Subscribe { reply } => {
                let current = SnapshotBatch::encode(&self.session);
                if reply.send((current, self.snapshots.subscribe())).is_err() {
                    debug!("Subscribe reply channel closed (caller dropped)");
                }
            }
            AuthorityCommand::QuerySession { reply } => {
                if reply.send(self.session.clone()).is_err() {
                    debug!("QuerySession reply channel closed (caller dropped)");
                }
            }
            AuthorityCommand::Shutdown => {}
        }
    }

    fn handle_submit(&mut self, intent: MoveIntent) -> Result<Commit> {
        let table = intent.table_id();
        let commit = self
            .commit(intent)
            .inspect_err(|error| warn!(%error, ?intent, "move intent dropped"))?;

        info!(%table, command = %commit.command, "move applied");
        let batch = SnapshotBatch::encode(&self.session);
        if self.snapshots.send(batch).is_err() {
            tracing::trace!("No snapshot subscribers");
        }
        Ok(commit)
    }

    fn commit(&mut self, intent: MoveIntent) -> Result<Commit> {
        let command = intent.command()?;
        Ok(self.session.commit(intent.table_id(), command)?)
    }
}
