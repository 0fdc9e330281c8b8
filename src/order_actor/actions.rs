//! Custom actions for the Order actor.

use crate::model::{InvoiceSummary, LineCreate, LineId, OrderLine};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Records the weight a catch-weight line was packed at.
    ///
    /// # Errors
    /// Fails for unknown lines, non-catch-weight lines, non-positive weights and
    /// invoiced orders.
    RecordPackedWeight { line: LineId, weight: Decimal },
    /// Appends a line entered by staff.
    AddLine(LineCreate),
    /// Assigns the next invoice number and settles the order.
    Invoice { at: DateTime<Utc> },
}

/// Results from OrderActions - variants match 1:1 with OrderAction
#[derive(Debug, Clone, PartialEq)]
pub enum OrderActionResult {
    RecordPackedWeight(OrderLine),
    AddLine(LineId),
    Invoice(InvoiceSummary),
}
