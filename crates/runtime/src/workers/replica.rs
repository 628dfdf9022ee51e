//! Replica worker that owns the local [`janggi_core::Session`].
//!
//! Receives commands from [`crate::RuntimeHandle`], routes picks through the
//! [`SelectionMachine`], overwrites tables with remote snapshots, and
//! publishes what happened to the EventBus. Committed moves are handed to
//! the configured [`MoveNotifier`] on a detached task so the worker never
//! waits on the network.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use janggi_core::{
    Commit, MoveCommand, MoveIntent, MoveValidator, Origin, PickEffect, SelectionMachine,
    Session, SnapshotBatch, TableId, TableSnapshot, TableState, Unrestricted,
};

use crate::api::Result;
use crate::events::{EventBus, SyncEvent, TableEvent};
use crate::remote::MoveNotifier;

/// Commands that can be sent to the replica worker
pub enum Command {
    /// Interpret a pick on one table.
    Pick {
        table: TableId,
        origin: Origin,
        reply: oneshot::Sender<Result<PickEffect>>,
    },
    /// Overwrite tables with an authoritative batch.
    ApplySnapshot {
        batch: SnapshotBatch,
        reply: oneshot::Sender<Result<Vec<TableId>>>,
    },
    /// Query the current session (read-only).
    QuerySession { reply: oneshot::Sender<Session> },
    /// Stop the worker even while handles are still alive.
    Shutdown,
}

/// Validator that can be moved into the worker task.
#[derive(Clone)]
pub struct SharedValidator(Arc<dyn MoveValidator + Send + Sync>);

impl SharedValidator {
    pub fn new(validator: impl MoveValidator + Send + Sync + 'static) -> Self {
        Self(Arc::new(validator))
    }
}

impl Default for SharedValidator {
    fn default() -> Self {
        Self::new(Unrestricted)
    }
}

impl MoveValidator for SharedValidator {
    fn is_legal(&self, table: &TableState, command: &MoveCommand) -> bool {
        self.0.is_legal(table, command)
    }
}

/// Background task that processes picks and snapshots.
pub struct ReplicaWorker {
    session: Session,
    machine: SelectionMachine<SharedValidator>,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    notifier: Option<Arc<dyn MoveNotifier>>,
}

impl ReplicaWorker {
    pub fn new(
        session: Session,
        validator: SharedValidator,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        notifier: Option<Arc<dyn MoveNotifier>>,
    ) -> Self {
        info!(
            tables = session.len(),
            linked = session.is_linked(),
            online = notifier.is_some(),
            "ReplicaWorker initialized"
        );

        Self {
            session,
            machine: SelectionMachine::with_validator(validator),
            command_rx,
            event_bus,
            notifier,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(Command::Shutdown) => {
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
        debug!("ReplicaWorker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Pick {
                table,
                origin,
                reply,
            } => {
                let result = self.handle_pick(table, origin);
                if reply.send(result).is_err() {
                    debug!("Pick reply channel closed (caller dropped)");
                }
            }
            Command::ApplySnapshot { batch, reply } => {
                let result = self.handle_snapshot(&batch);
                if reply.send(result).is_err() {
                    debug!("ApplySnapshot reply channel closed (caller dropped)");
                }
            }
            Command::QuerySession { reply } => {
                if reply.send(self.session.clone()).is_err() {
                    debug!("QuerySession reply channel closed (caller dropped)");
                }
            }
            Command::Shutdown => {}
        }
    }

    fn handle_pick(&mut self, table: TableId, origin: Origin) -> Result<PickEffect> {
        let effect = self.session.handle_pick(&self.machine, table, origin)?;
        let state = self.session.table(table)?;

        match &effect {
            PickEffect::Selected(_) | PickEffect::Cleared => {
                debug!(%table, %origin, selection = ?state.selection, "selection changed");
                self.event_bus.publish(TableEvent::SelectionChanged {
                    table,
                    selection: state.selection,
                });
            }
            PickEffect::Ignored(reason) => {
                debug!(%table, %origin, ?reason, "pick ignored");
                self.event_bus.publish(TableEvent::PickIgnored {
                    table,
                    reason: *reason,
                });
            }
            PickEffect::Aborted(error) => {
                warn!(%table, %origin, %error, "stale selection dropped");
                self.event_bus.publish(TableEvent::CommitAborted {
                    table,
                    error: error.to_string(),
                });
            }
            PickEffect::Committed(commit) => {
                info!(%table, command = %commit.command, turn = %state.turn, "move committed");
                self.event_bus.publish(TableEvent::Committed {
                    table,
                    commit: *commit,
                    turn: state.turn,
                });
                self.notify(table, commit);
            }
        }

        Ok(effect)
    }

    /// Hands the commit to the notifier without waiting for it.
    fn notify(&self, table: TableId, commit: &Commit) {
        let Some(notifier) = &self.notifier else {
            return;
        };

        // Single-table sessions keep the original intent shape.
        let target = (self.session.len() > 1).then_some(table);
        let intent = MoveIntent::new(target, &commit.command);
        let notifier = Arc::clone(notifier);
        let event_bus = self.event_bus.clone();

        tokio::spawn(async move {
            match notifier.notify(intent).await {
                Ok(()) => {
                    debug!(?intent, "move intent delivered");
                    event_bus.publish(SyncEvent::NotifySent { intent });
                }
                Err(error) => {
                    warn!(%error, ?intent, "move intent delivery failed");
                    event_bus.publish(SyncEvent::NotifyFailed {
                        intent,
                        error: error.to_string(),
                    });
                }
            }
        });
    }

    /// Applies a batch to every table it targets, or to none.
    fn handle_snapshot(&mut self, batch: &SnapshotBatch) -> Result<Vec<TableId>> {
        let decoded = self.decode_batch(batch).inspect_err(|error| {
            warn!(%error, "snapshot dropped");
            self.event_bus.publish(SyncEvent::SnapshotDropped {
                error: error.to_string(),
            });
        })?;

        let mut tables = Vec::with_capacity(decoded.len());
        for (table, snapshot) in &decoded {
            self.session.apply_snapshot(*table, snapshot)?;
            tables.push(*table);
        }

        debug!(?tables, "snapshot applied");
        self.event_bus.publish(SyncEvent::SnapshotApplied {
            tables: tables.clone(),
        });
        Ok(tables)
    }

    fn decode_batch(&self, batch: &SnapshotBatch) -> Result<Vec<(TableId, TableSnapshot)>> {
        let decoded = batch.decode()?;
        for (table, _) in &decoded {
            self.session.table(*table)?;
        }
        Ok(decoded)
    }
}
