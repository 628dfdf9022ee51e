//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! picking, applying snapshots, and streaming events from specific topics.
use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, warn};

use janggi_core::{Origin, PickEffect, Session, SnapshotBatch, TableId};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, SyncEvent, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    /// Route a pick on `table` through its selection machine.
    pub async fn pick(&self, table: TableId, origin: Origin) -> Result<PickEffect> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Pick {
                table,
                origin,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Apply an already decoded batch. Returns the tables it overwrote.
    pub async fn apply_decoded(&self, batch: SnapshotBatch) -> Result<Vec<TableId>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::ApplySnapshot {
                batch,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Parse and apply a JSON batch as received from the remote source.
    ///
    /// Malformed payloads are reported on [`Topic::Sync`] and leave every
    /// table untouched.
    pub async fn apply_snapshot(&self, json: &str) -> Result<Vec<TableId>> {
        let batch = match SnapshotBatch::from_json(json) {
            Ok(batch) => batch,
            Err(error) => {
                warn!(%error, "snapshot dropped");
                self.event_bus.publish(SyncEvent::SnapshotDropped {
                    error: error.to_string(),
                });
                return Err(error.into());
            }
        };
        self.apply_decoded(batch).await
    }

    /// Clone of the current session.
    pub async fn query_session(&self) -> Result<Session> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QuerySession { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Ask the worker to stop. A worker that is already gone is not an error.
    pub(crate) async fn request_shutdown(&self) {
        if self.command_tx.send(Command::Shutdown).await.is_err() {
            debug!("ReplicaWorker already stopped");
        }
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Table` - Selection changes, commits and ignored picks
    /// - `Topic::Sync` - Snapshot application and move notification
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
