//! High-level runtime orchestrator.
//!
//! The runtime owns the replica worker and the inbound snapshot task, wires
//! up command/event channels, and exposes a builder-based API for clients
//! to drive play.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use janggi_core::{MoveValidator, Session, SnapshotBatch};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::config::RuntimeConfig;
use crate::events::{Event, EventBus, Topic};
use crate::remote::{
    EventStreamSource, HttpNotifier, MoveNotifier, SnapshotSource, StreamError,
};
use crate::workers::{Command, ReplicaWorker, SharedValidator};

/// Main runtime that plays one session against an optional remote source.
///
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    replica_worker_handle: JoinHandle<()>,
    inbound_handle: Option<JoinHandle<()>>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Subscribe to events from a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Shutdown the runtime gracefully
    ///
    /// Stops following the remote source, then stops the replica worker and
    /// waits for it. Handles still held by clients fail with
    /// [`RuntimeError::CommandChannelClosed`] afterwards.
    pub async fn shutdown(self) -> Result<()> {
        if let Some(inbound) = self.inbound_handle {
            inbound.abort();
            match inbound.await {
                Err(error) if !error.is_cancelled() => {
                    return Err(RuntimeError::WorkerJoin(error));
                }
                _ => {}
            }
        }

        self.handle.request_shutdown().await;
        drop(self.handle);

        self.replica_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    session: Option<Session>,
    validator: Option<SharedValidator>,
    notifier: Option<Arc<dyn MoveNotifier>>,
    source: Option<SnapshotSource>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            session: None,
            validator: None,
            notifier: None,
            source: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide the initial session
    ///
    /// If not provided, one is built from the configured table layout.
    pub fn session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Legality check consulted before every commit (optional)
    pub fn validator(mut self, validator: impl MoveValidator + Send + Sync + 'static) -> Self {
        self.validator = Some(SharedValidator::new(validator));
        self
    }

    /// Set the outbound move notifier
    ///
    /// Overrides the HTTP notifier that online mode would otherwise create.
    pub fn notifier(mut self, notifier: impl MoveNotifier + 'static) -> Self {
        self.notifier = Some(Arc::new(notifier));
        self
    }

    /// Set the inbound snapshot source
    ///
    /// Overrides the event stream that online mode would otherwise follow.
    pub fn snapshot_source(mut self, source: impl Into<SnapshotSource>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Build the runtime
    pub async fn build(self) -> Result<Runtime> {
        let config = self.config;
        let session = self.session.unwrap_or_else(|| config.session());

        let (notifier, source) = if config.remote.online {
            let host = config
                .remote
                .api_host
                .as_deref()
                .ok_or(RuntimeError::MissingApiHost)?;
            let notifier = self
                .notifier
                .unwrap_or_else(|| Arc::new(HttpNotifier::new(host)) as Arc<dyn MoveNotifier>);
            let source = self
                .source
                .unwrap_or_else(|| EventStreamSource::new(host).into());
            (Some(notifier), Some(source))
        } else {
            (self.notifier, self.source)
        };

        let (command_tx, command_rx) = mpsc::channel::<Command>(config.command_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(config.event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let replica_worker = ReplicaWorker::new(
            session,
            self.validator.unwrap_or_default(),
            command_rx,
            event_bus,
            notifier,
        );
        let replica_worker_handle = tokio::spawn(async move {
            replica_worker.run().await;
        });

        let inbound_handle = source.map(|source| {
            let handle = handle.clone();
            let reconnect_delay = config.remote.reconnect_delay;
            tokio::spawn(async move {
                follow(source, handle, reconnect_delay).await;
            })
        });

        info!(
            online = config.remote.online,
            inbound = inbound_handle.is_some(),
            "runtime started"
        );

        Ok(Runtime {
            handle,
            replica_worker_handle,
            inbound_handle,
        })
    }
}

async fn follow(source: SnapshotSource, handle: RuntimeHandle, reconnect_delay: Duration) {
    match source {
        SnapshotSource::EventStream(stream) => loop {
            match stream.run(&handle).await {
                Ok(()) => debug!(url = stream.url(), "snapshot stream ended, reconnecting"),
                Err(StreamError::RuntimeClosed) => break,
                Err(error) => warn!(%error, url = stream.url(), "snapshot stream failed"),
            }
            tokio::time::sleep(reconnect_delay).await;
        },
        SnapshotSource::Broadcast(receiver) => relay(receiver, handle).await,
    }
}

async fn relay(mut receiver: broadcast::Receiver<SnapshotBatch>, handle: RuntimeHandle) {
    loop {
        match receiver.recv().await {
            Ok(batch) => {
                if let Err(error) = handle.apply_decoded(batch).await
                    && error.is_closed()
                {
                    break;
                }
            }
            // Every batch is a full state, so skipping ahead loses nothing.
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                debug!(skipped, "snapshot relay lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    debug!("snapshot relay stopped");
}
