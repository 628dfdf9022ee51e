//! In-process authoritative host.
//!
//! Holds the canonical session that replicas post move intents to and
//! follow snapshots from. Captures are routed between linked tables here,
//! so replicas only ever see the converted pieces arrive in their pools.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use janggi_core::Session;

use crate::api::{AuthorityHandle, Result, RuntimeError};
use crate::workers::{AuthorityCommand, AuthorityWorker};

#[derive(Clone, Debug)]
pub struct AuthorityConfig {
    pub command_buffer_size: usize,
    /// Batches a slow subscriber may fall behind before skipping ahead.
    pub snapshot_buffer_size: usize,
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            command_buffer_size: 32,
            snapshot_buffer_size: 16,
        }
    }
}

pub struct Authority {
    handle: AuthorityHandle,
    worker_handle: JoinHandle<()>,
}

impl Authority {
    /// Start a host for `session`.
    pub fn spawn(session: Session, config: AuthorityConfig) -> Self {
        let (command_tx, command_rx) =
            mpsc::channel::<AuthorityCommand>(config.command_buffer_size.max(1));
        let worker = AuthorityWorker::new(session, command_rx, config.snapshot_buffer_size);
        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Self {
            handle: AuthorityHandle::new(command_tx),
            worker_handle,
        }
    }

    pub fn handle(&self) -> AuthorityHandle {
        self.handle.clone()
    }

    /// Stops the worker and waits for it. Outstanding handles, including
    /// replicas notifying through one, fail with
    /// [`RuntimeError::CommandChannelClosed`] afterwards.
    pub async fn shutdown(self) -> Result<()> {
        self.handle.request_shutdown().await;
        drop(self.handle);
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)
    }
}
