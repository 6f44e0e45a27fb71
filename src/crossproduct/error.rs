//! Cross-product environment errors.

use crate::checkpoint::CheckpointError;
use crate::machine::TransitionError;
use thiserror::Error;

/// Boxed error raised by a ground environment or labelling function.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while driving a cross-product environment.
#[derive(Debug, Error)]
pub enum CrossProductError {
    #[error("No active episode. Call .reset() before .step()")]
    NotReset,

    #[error("Ground environment failed: {0}")]
    Ground(#[source] BoxError),

    #[error("Labelling function failed: {0}")]
    Labelling(#[source] BoxError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
}

impl CrossProductError {
    pub(crate) fn ground<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CrossProductError::Ground(Box::new(err))
    }

    pub(crate) fn labelling<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CrossProductError::Labelling(Box::new(err))
    }
}
