//! Error type for the habits application.
//!
//! Habit operations themselves never fail; errors come from the store
//! runtime (shutdown, closed channels) and from encoding the JSON snapshot.
//! Startup and terminal failures are reported by the binary with `anyhow`.

use habitkit_runtime::StoreError;
use thiserror::Error;

/// Errors surfaced by the habits application
#[derive(Error, Debug)]
pub enum HabitsError {
    /// The store rejected an action or timed out
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The snapshot could not be encoded
    #[error("failed to encode snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for the habits application
pub type Result<T> = std::result::Result<T, HabitsError>;
