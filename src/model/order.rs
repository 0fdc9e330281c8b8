//! Customer orders, their lines and the settlement arithmetic.
//!
//! # Actor Framework
//! [`Order`] implements [`ActorEntity`](crate::framework::ActorEntity) in
//! [`crate::order_actor::entity`]; see it for the create, update and action hooks.

use crate::model::invoice::round_money;
use crate::model::{CustomerId, InvoiceNumber, RingId, Sku, StopId, Unit};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u32);

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LineId(pub u32);

impl Display for LineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderChannel {
    #[default]
    Web,
    Phone,
    Facebook,
    Email,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryType {
    #[default]
    Stop,
    Home,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Transfer,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    New,
    Accepted,
    Fulfilling,
    Ready,
    OnTheWay,
    Done,
    Cancelled,
    Invoiced,
    Credit,
}

impl OrderStatus {
    /// Terminal for reporting: the order no longer counts as open work.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OrderStatus::Cancelled | OrderStatus::Done | OrderStatus::Invoiced | OrderStatus::Credit
        )
    }

    /// The lifecycle table: the fulfilment chain, cancellation of open orders, and the
    /// financial states after delivery.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (New, Accepted)
            | (Accepted, Fulfilling)
            | (Fulfilling, Ready)
            | (Ready, OnTheWay)
            | (OnTheWay, Done)
            | (Done, Invoiced)
            | (Done, Credit)
            | (Invoiced, Credit) => true,
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            OrderStatus::New => "NEW",
            OrderStatus::Accepted => "ACCEPTED",
            OrderStatus::Fulfilling => "FULFILLING",
            OrderStatus::Ready => "READY",
            OrderStatus::OnTheWay => "ON_THE_WAY",
            OrderStatus::Done => "DONE",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Invoiced => "INVOICED",
            OrderStatus::Credit => "CREDIT",
        };
        f.write_str(label)
    }
}

/// One product on an order. Name, unit and catch-weight flag are snapshots taken when
/// the line was added, so later catalog edits do not rewrite history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: LineId,
    pub sku: Sku,
    pub product_name: String,
    pub unit: Unit,
    pub catch_weight: bool,
    pub requested_qty: Decimal,
    pub packed_weight: Option<Decimal>,
    /// `None` while the price is still to be agreed.
    pub unit_price: Option<Decimal>,
    pub substitution_allowed: bool,
}

impl OrderLine {
    /// Quantity the customer pays for: the packed weight once known.
    pub fn settlement_qty(&self) -> Decimal {
        self.packed_weight.unwrap_or(self.requested_qty)
    }

    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price
            .map(|price| round_money(price * self.settlement_qty()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineCreate {
    pub sku: Sku,
    pub product_name: String,
    pub unit: Unit,
    pub catch_weight: bool,
    pub requested_qty: Decimal,
    pub unit_price: Option<Decimal>,
    pub substitution_allowed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub created_at: DateTime<Utc>,
    pub channel: OrderChannel,
    pub customer_id: CustomerId,
    pub contact_phone: String,
    pub ring_id: RingId,
    pub stop_id: StopId,
    pub delivery_type: DeliveryType,
    pub delivery_address: Option<String>,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub notes_customer: String,
    pub notes_internal: String,
    pub invoice_number: Option<InvoiceNumber>,
    pub invoiced_at: Option<DateTime<Utc>>,
    pub lines: Vec<OrderLine>,
    pub next_line_id: u32,
}

/// Payload for creating an order. Built by
/// [`OrderClient::submit_order`](crate::clients::OrderClient::submit_order) after every
/// reference has been resolved.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub created_at: DateTime<Utc>,
    pub channel: OrderChannel,
    pub customer_id: CustomerId,
    pub contact_phone: String,
    pub ring_id: RingId,
    pub stop_id: StopId,
    pub delivery_type: DeliveryType,
    pub delivery_address: Option<String>,
    pub payment_method: PaymentMethod,
    pub notes_customer: String,
    pub lines: Vec<LineCreate>,
}

/// Staff edits. Status changes are checked against the configured transition policy.
#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub notes_internal: Option<String>,
    pub payment_method: Option<PaymentMethod>,
}

impl Order {
    pub fn new(id: OrderId, params: OrderCreate) -> Self {
        let mut order = Self {
            id,
            created_at: params.created_at,
            channel: params.channel,
            customer_id: params.customer_id,
            contact_phone: params.contact_phone,
            ring_id: params.ring_id,
            stop_id: params.stop_id,
            delivery_type: params.delivery_type,
            delivery_address: params.delivery_address,
            status: OrderStatus::New,
            payment_method: params.payment_method,
            notes_customer: params.notes_customer,
            notes_internal: String::new(),
            invoice_number: None,
            invoiced_at: None,
            lines: Vec::with_capacity(params.lines.len()),
            next_line_id: 1,
        };
        for line in params.lines {
            order.push_line(line);
        }
        order
    }

    pub fn line(&self, id: LineId) -> Option<&OrderLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    pub fn line_mut(&mut self, id: LineId) -> Option<&mut OrderLine> {
        self.lines.iter_mut().find(|line| line.id == id)
    }

    pub(crate) fn push_line(&mut self, params: LineCreate) -> LineId {
        let id = LineId(self.next_line_id);
        self.next_line_id += 1;
        self.lines.push(OrderLine {
            id,
            sku: params.sku,
            product_name: params.product_name,
            unit: params.unit,
            catch_weight: params.catch_weight,
            requested_qty: params.requested_qty,
            packed_weight: None,
            unit_price: params.unit_price,
            substitution_allowed: params.substitution_allowed,
        });
        id
    }

    /// Sum of priced line totals. Unpriced lines are left out.
    pub fn total(&self) -> Decimal {
        self.lines.iter().filter_map(OrderLine::line_total).sum()
    }

    pub fn has_unpriced_lines(&self) -> bool {
        self.lines.iter().any(|line| line.unit_price.is_none())
    }

    /// Weight this order puts on its ring, counting kilogram lines only.
    pub fn weight_kg(&self) -> Decimal {
        self.lines
            .iter()
            .filter(|line| line.unit.is_weight())
            .map(OrderLine::settlement_qty)
            .sum()
    }
}
