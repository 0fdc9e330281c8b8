//! Custom actions for the Ring actor.

use crate::model::{Stop, StopCreate, StopId};

#[derive(Debug, Clone)]
pub enum RingAction {
    /// Adds a stop. Fails if its sort order is taken.
    AddStop(StopCreate),
    /// Removes a stop. Orders already booked on it keep the id.
    RemoveStop(StopId),
    /// Moves a stop to a free sort order.
    MoveStop { stop: StopId, sort_order: u32 },
}

/// Results from RingActions - variants match 1:1 with RingAction
#[derive(Debug, Clone, PartialEq)]
pub enum RingActionResult {
    AddStop(StopId),
    RemoveStop(Stop),
    MoveStop(()),
}
