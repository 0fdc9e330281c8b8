//! Error types for the Ring actor.

use crate::model::{RingId, StopId};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RingError {
    #[error("Ring validation error: {0}")]
    Validation(String),

    #[error("Ring not found: {0}")]
    NotFound(String),

    #[error("Stop {stop} not found on {ring}")]
    StopNotFound { ring: RingId, stop: StopId },

    /// Two stops of one ring cannot share a position.
    #[error("Sort order {0} is already used on this ring")]
    DuplicateSortOrder(u32),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for RingError {
    fn from(msg: String) -> Self {
        RingError::ActorCommunicationError(msg)
    }
}
