//! Event bus and topic-specific event types.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{SyncEvent, TableEvent};
