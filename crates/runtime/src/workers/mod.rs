//! Background workers that own session state.

mod authority;
mod replica;

pub use authority::{AuthorityCommand, AuthorityWorker};
pub use replica::{Command, ReplicaWorker, SharedValidator};
