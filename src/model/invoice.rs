//! Invoice numbers and invoice totals.

use crate::model::{Order, OrderId, Sku, Unit};
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Rounds a money amount to cents, halves away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `YYYY-NNNN`: the calendar year of issue and a per-year sequence from 1 to 9999.
///
/// Ordering follows issue order (year, then sequence).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InvoiceNumber {
    pub year: i32,
    pub seq: u32,
}

impl Display for InvoiceNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:04}", self.year, self.seq)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Malformed invoice number: {0:?}")]
pub struct MalformedInvoiceNumber(pub String);

impl FromStr for InvoiceNumber {
    type Err = MalformedInvoiceNumber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || MalformedInvoiceNumber(s.to_string());
        let (year, seq) = s.split_once('-').ok_or_else(malformed)?;
        let digits = |part: &str| part.len() == 4 && part.bytes().all(|b| b.is_ascii_digit());
        if !digits(year) || !digits(seq) {
            return Err(malformed());
        }
        let year = year.parse().map_err(|_| malformed())?;
        let seq: u32 = seq.parse().map_err(|_| malformed())?;
        if seq == 0 {
            return Err(malformed());
        }
        Ok(Self { year, seq })
    }
}

impl TryFrom<String> for InvoiceNumber {
    type Error = MalformedInvoiceNumber;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<InvoiceNumber> for String {
    fn from(number: InvoiceNumber) -> Self {
        number.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub sku: Sku,
    pub name: String,
    pub unit: Unit,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total: Decimal,
}

/// Settled amounts of an invoiced order. Line prices are net; VAT is added on the
/// subtotal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    pub number: InvoiceNumber,
    pub order_id: OrderId,
    pub issued_at: DateTime<Utc>,
    pub lines: Vec<InvoiceLine>,
    /// Lines still waiting for an agreed price; not part of any amount below.
    pub unpriced_lines: usize,
    pub subtotal: Decimal,
    pub vat_rate: Decimal,
    pub vat: Decimal,
    pub total: Decimal,
}

impl InvoiceSummary {
    pub fn for_order(
        order: &Order,
        number: InvoiceNumber,
        issued_at: DateTime<Utc>,
        vat_rate: Decimal,
    ) -> Self {
        let lines: Vec<InvoiceLine> = order
            .lines
            .iter()
            .filter_map(|line| {
                let unit_price = line.unit_price?;
                Some(InvoiceLine {
                    sku: line.sku.clone(),
                    name: line.product_name.clone(),
                    unit: line.unit,
                    quantity: line.settlement_qty(),
                    unit_price,
                    total: line.line_total()?,
                })
            })
            .collect();
        let subtotal = round_money(lines.iter().map(|line| line.total).sum());
        let vat = round_money(subtotal * vat_rate);
        Self {
            number,
            order_id: order.id,
            issued_at,
            unpriced_lines: order.lines.len() - lines.len(),
            lines,
            subtotal,
            vat_rate,
            vat,
            total: subtotal + vat,
        }
    }
}
