//! Per-year invoice numbering.

use crate::model::InvoiceNumber;
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

/// Highest per-year sequence the `YYYY-NNNN` format can show.
pub const MAX_INVOICE_SEQ: u32 = 9999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invoice numbers for {0} are exhausted")]
pub struct SequenceExhausted(pub i32);

/// Hands out strictly increasing invoice numbers, restarting at 1 every calendar year.
///
/// Shared behind an `Arc`; `next` is atomic, so numbers are never reused even when
/// several tasks invoice at once.
#[derive(Debug, Default)]
pub struct InvoiceSequence {
    last: Mutex<BTreeMap<i32, u32>>,
}

impl InvoiceSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continues numbering after previously issued invoices.
    pub fn seeded(issued: impl IntoIterator<Item = InvoiceNumber>) -> Self {
        let sequence = Self::new();
        for number in issued {
            sequence.observe(number);
        }
        sequence
    }

    /// Records an externally issued number so later numbers of that year follow it.
    pub fn observe(&self, number: InvoiceNumber) {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        let seq = last.entry(number.year).or_insert(0);
        *seq = (*seq).max(number.seq);
    }

    /// Draws the next number of `year`. Fails once `MAX_INVOICE_SEQ` has been issued;
    /// a failed draw consumes nothing.
    pub fn next(&self, year: i32) -> Result<InvoiceNumber, SequenceExhausted> {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        let seq = last.entry(year).or_insert(0);
        if *seq >= MAX_INVOICE_SEQ {
            return Err(SequenceExhausted(year));
        }
        *seq += 1;
        Ok(InvoiceNumber { year, seq: *seq })
    }

    /// Last number issued in `year`, if any.
    pub fn last(&self, year: i32) -> Option<InvoiceNumber> {
        let last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        last.get(&year).map(|&seq| InvoiceNumber { year, seq })
    }
}
