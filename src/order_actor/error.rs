//! Error types for the Order actor and the order workflows built on it.

use crate::model::{InvoiceNumber, LineId, OrderStatus, RingId, Sku, StopId};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// Missing or malformed input.
    #[error("Order validation error: {0}")]
    Validation(String),

    #[error("Ring not found: {0}")]
    RingNotFound(RingId),

    #[error("Stop {stop} not found on {ring}")]
    StopNotFound { ring: RingId, stop: StopId },

    /// The ring is closed or cancelled.
    #[error("Ring {0} is not taking orders")]
    RingClosed(RingId),

    #[error("Cutoff for {ring} passed at {cutoff_at}")]
    CutoffPassed {
        ring: RingId,
        cutoff_at: DateTime<Utc>,
    },

    #[error("Ring {0} is at capacity")]
    RingFull(RingId),

    /// Unknown or inactive sku.
    #[error("Product not found: {0}")]
    ProductNotFound(Sku),

    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Line {0} not found")]
    LineNotFound(LineId),

    /// Packed weights only apply to catch-weight lines.
    #[error("Line {0} is not a catch-weight line")]
    NotCatchWeight(LineId),

    #[error("Order already invoiced as {0}")]
    AlreadyInvoiced(InvoiceNumber),

    #[error("Illegal status transition {from} -> {to}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },

    /// All four-digit invoice numbers of the year are used.
    #[error("Invoice numbers for {0} are exhausted")]
    InvoiceNumbersExhausted(i32),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for OrderError {
    fn from(msg: String) -> Self {
        OrderError::ActorCommunicationError(msg)
    }
}

/// Coarse category of an [`OrderError`], for callers that translate errors into
/// responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    NotFound,
    DomainRule,
    Server,
}

impl ErrorClass {
    pub fn http_status(self) -> u16 {
        match self {
            ErrorClass::Validation => 400,
            ErrorClass::NotFound => 404,
            ErrorClass::DomainRule => 422,
            ErrorClass::Server => 500,
        }
    }
}

impl OrderError {
    pub fn class(&self) -> ErrorClass {
        match self {
            OrderError::Validation(_) => ErrorClass::Validation,
            OrderError::RingNotFound(_)
            | OrderError::StopNotFound { .. }
            | OrderError::ProductNotFound(_)
            | OrderError::NotFound(_)
            | OrderError::LineNotFound(_) => ErrorClass::NotFound,
            OrderError::RingClosed(_)
            | OrderError::CutoffPassed { .. }
            | OrderError::RingFull(_)
            | OrderError::NotCatchWeight(_)
            | OrderError::AlreadyInvoiced(_)
            | OrderError::IllegalTransition { .. }
            | OrderError::InvoiceNumbersExhausted(_) => ErrorClass::DomainRule,
            OrderError::ActorCommunicationError(_) => ErrorClass::Server,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn cutoff_is_a_domain_rule() {
        let err = OrderError::CutoffPassed {
            ring: RingId(3),
            cutoff_at: Utc.with_ymd_and_hms(2025, 10, 6, 23, 59, 0).unwrap(),
        };
        assert_eq!(err.class(), ErrorClass::DomainRule);
        assert_eq!(err.class().http_status(), 422);
        assert_eq!(
            err.to_string(),
            "Cutoff for ring_3 passed at 2025-10-06 23:59:00 UTC"
        );
    }

    #[test]
    fn statuses_map_by_class() {
        assert_eq!(OrderError::Validation("x".into()).class().http_status(), 400);
        assert_eq!(OrderError::ProductNotFound(Sku::new("x")).class().http_status(), 404);
        assert_eq!(OrderError::ActorCommunicationError("x".into()).class().http_status(), 500);
    }
}
