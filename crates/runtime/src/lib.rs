//! Async runtime for linked drop-janggi tables.
//!
//! A [`Runtime`] owns one replica session and serializes every pick and
//! remote snapshot through a single worker. Committed moves are posted to a
//! [`remote::MoveNotifier`]; authoritative snapshots arrive from a
//! [`remote::SnapshotSource`]. [`Authority`] hosts the canonical session for
//! in-process play and tests.
//!
//! Modules:
//! - [`api`]: handles and errors exposed to clients
//! - [`events`]: topic-based event bus
//! - [`remote`]: notifier and snapshot source adapters
//! - [`workers`]: replica and authority workers
pub mod api;
pub mod authority;
pub mod config;
pub mod events;
pub mod remote;
pub mod runtime;
pub mod workers;

pub use api::{AuthorityHandle, Result, RuntimeError, RuntimeHandle};
pub use authority::{Authority, AuthorityConfig};
pub use config::{RemoteConfig, RuntimeConfig, TableLayout};
pub use events::{Event, EventBus, SyncEvent, TableEvent, Topic};
pub use remote::{
    ChannelNotifier, EventStreamSource, HttpNotifier, MoveNotifier, NotifyError, NullNotifier,
    SnapshotSource, SseDecoder, StreamError,
};
pub use runtime::{Runtime, RuntimeBuilder};
