//! # Notifications
//!
//! Outbound customer messages: order confirmations and invoices. Delivery itself (email,
//! SMS) is an external concern behind the [`Notifier`] trait. Order workflows treat
//! every notification as best effort: a failure is logged and never undoes the order
//! or the invoice.

pub mod log;
pub mod recording;

pub use log::LogNotifier;
pub use recording::RecordingNotifier;

use crate::model::{DeliveryType, InvoiceSummary, OrderId, PaymentMethod, Sku, Unit};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Notification rejected: {0}")]
    Rejected(String),
    #[error("Notification could not be encoded: {0}")]
    Encoding(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfirmationLine {
    pub sku: Sku,
    pub name: String,
    pub unit: Unit,
    pub quantity: Decimal,
    /// `None` when the price is still to be agreed.
    pub unit_price: Option<Decimal>,
    pub substitution_allowed: bool,
}

/// Sent after a successful submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    pub customer_email: String,
    pub customer_name: String,
    pub ring_date: NaiveDate,
    pub region: String,
    pub stop_name: String,
    pub meeting_point: String,
    pub time_start: Option<NaiveTime>,
    pub delivery_type: DeliveryType,
    pub delivery_address: Option<String>,
    pub payment_method: PaymentMethod,
    pub lines: Vec<ConfirmationLine>,
    /// Total of the priced lines at requested quantities; weights may still change it.
    pub estimated_total: Decimal,
    pub has_unpriced_lines: bool,
}

/// Sent when an order is invoiced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceMessage {
    pub customer_email: String,
    pub customer_name: String,
    pub org_name: Option<String>,
    pub reg_code: Option<String>,
    pub payment_method: PaymentMethod,
    pub invoice: InvoiceSummary,
}

/// Delivery channel for customer messages.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_confirmation(&self, message: &OrderConfirmation) -> Result<(), NotifyError>;

    async fn send_invoice(&self, message: &InvoiceMessage) -> Result<(), NotifyError>;
}
