//! Error types for the gcalsync engine.

use thiserror::Error;

/// Errors that can occur while syncing.
///
/// Dangling mappings and title drift are deliberately not represented
/// here: they never propagate as errors but are reported as outcomes
/// by the reconcilers (see [`crate::reconcile`]).
#[derive(Error, Debug)]
pub enum SyncError {
    /// The mapping-store schema could not be created or read.
    /// Fatal to the whole run.
    #[error("storage initialization failed: {0}")]
    StorageInit(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("create failed: {0}")]
    Create(String),
}

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;
