//! Error types for the PriceList actor.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PriceListError {
    #[error("Price list validation error: {0}")]
    Validation(String),

    #[error("Price list not found: {0}")]
    NotFound(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for PriceListError {
    fn from(msg: String) -> Self {
        PriceListError::ActorCommunicationError(msg)
    }
}
