//! Operator-selectable business rules.

use serde::{Deserialize, Serialize};

/// How staff status changes are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Any status may follow any other, except that `Invoiced` needs an invoice.
    #[default]
    Permissive,
    /// Only moves allowed by [`OrderStatus::can_transition_to`](crate::model::OrderStatus::can_transition_to).
    Strict,
}

/// What happens when a submission targets a ring at capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityPolicy {
    /// Accept the order and log a warning for dispatch.
    #[default]
    Advisory,
    /// Reject with [`OrderError::RingFull`](crate::order_actor::OrderError::RingFull).
    Enforce,
}
