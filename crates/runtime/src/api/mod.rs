//! Public API surface of the runtime.

mod authority;
mod errors;
mod handle;

pub use authority::AuthorityHandle;
pub use errors::{Result, RuntimeError};
pub use handle::RuntimeHandle;
