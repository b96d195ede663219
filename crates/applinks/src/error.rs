//! App-links error types.

use thiserror::Error;

/// Errors from the external app-resolution oracle.
///
/// The engine never propagates these to the driver: any resolver failure
/// degrades to an empty candidate set, so a broken oracle can stop handoffs
/// but can never trigger one.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("resolution service unavailable: {0}")]
    Unavailable(String),

    #[error("resolution timed out: {0}")]
    Timeout(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
