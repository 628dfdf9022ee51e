//! Adapters between a runtime and its remote source.
//!
//! Outbound, a [`MoveNotifier`] carries committed moves as
//! [`MoveIntent`]s. Inbound, a [`SnapshotSource`] feeds snapshot batches
//! back into the replica.

mod channel;
mod http;
mod sse;

pub use channel::ChannelNotifier;
pub use http::HttpNotifier;
pub use sse::{EventStreamSource, SseDecoder, StreamError};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;

use janggi_core::{MoveIntent, SnapshotBatch};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("move intent request failed")]
    Http(#[from] reqwest::Error),

    #[error("move intent channel closed")]
    ChannelClosed,

    #[error("remote host rejected the intent: {0}")]
    Rejected(String),
}

/// Delivers committed moves to the remote source.
///
/// Delivery is fire-and-forget from the replica's point of view: a failure
/// is reported but never rolls back local state.
#[async_trait]
pub trait MoveNotifier: Send + Sync {
    async fn notify(&self, intent: MoveIntent) -> Result<(), NotifyError>;
}

/// Notifier for offline play. Accepts and discards every intent.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullNotifier;

#[async_trait]
impl MoveNotifier for NullNotifier {
    async fn notify(&self, _intent: MoveIntent) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Where authoritative snapshots come from.
pub enum SnapshotSource {
    /// A `text/event-stream` endpoint carrying JSON batches.
    EventStream(EventStreamSource),
    /// An in-process broadcast, such as an authority's subscription.
    Broadcast(broadcast::Receiver<SnapshotBatch>),
}

impl From<EventStreamSource> for SnapshotSource {
    fn from(source: EventStreamSource) -> Self {
        SnapshotSource::EventStream(source)
    }
}

impl From<broadcast::Receiver<SnapshotBatch>> for SnapshotSource {
    fn from(receiver: broadcast::Receiver<SnapshotBatch>) -> Self {
        SnapshotSource::Broadcast(receiver)
    }
}
