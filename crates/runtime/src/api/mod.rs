//! Public API surface for runtime consumers.
//!
//! Re-exports the handle, provider trait and error types clients embed.
mod errors;
mod handle;
mod providers;

pub use errors::{Result, RuntimeError};
pub use handle::{RuntimeHandle, SpawnRequest};
pub use providers::{CastCommand, CastProvider, IdleProvider, ScriptedProvider};
