//! Inbound order forms and staff-entered lines.

use crate::model::{
    normalize_email, normalize_phone, CustomerCreate, CustomerId, OrderChannel, OrderId,
    PaymentMethod, RingId, Sku, StopId, Unit,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Contact details from a public order form.
///
/// Carries no segment: pricing tiers are assigned by staff only, so a form can neither
/// set nor change one. Unknown fields such as `segment` are ignored when parsing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactDetails {
    pub email: String,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub org_name: Option<String>,
    #[serde(default)]
    pub reg_code: Option<String>,
    #[serde(default)]
    pub marketing_consent: bool,
    #[serde(default)]
    pub terms_accepted: bool,
}

impl From<ContactDetails> for CustomerCreate {
    fn from(contact: ContactDetails) -> Self {
        Self {
            email: contact.email,
            name: contact.name,
            phone: contact.phone,
            org_name: contact.org_name,
            reg_code: contact.reg_code,
            segment: None,
            marketing_consent: contact.marketing_consent,
            terms_accepted: contact.terms_accepted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedLine {
    pub sku: Sku,
    pub quantity: Decimal,
    #[serde(default)]
    pub substitution_allowed: bool,
}

/// An order as a customer (or staff on their behalf) submits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSubmission {
    #[serde(default)]
    pub channel: OrderChannel,
    pub customer: ContactDetails,
    pub ring_id: RingId,
    pub stop_id: StopId,
    /// Only used by stop rings; home rings take the address from the customer notes.
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub notes_customer: String,
    pub lines: Vec<SubmittedLine>,
}

impl OrderSubmission {
    /// Checks the form in isolation, before any lookup.
    pub fn validate(&self) -> Result<(), String> {
        if normalize_email(&self.customer.email).is_empty() {
            return Err("email is required".into());
        }
        if self.customer.name.trim().is_empty() {
            return Err("name is required".into());
        }
        if normalize_phone(&self.customer.phone).is_empty() {
            return Err("phone is required".into());
        }
        if self.lines.is_empty() {
            return Err("at least one line is required".into());
        }
        for line in &self.lines {
            if line.sku.is_empty() {
                return Err("line sku is required".into());
            }
            if line.quantity <= Decimal::ZERO {
                return Err(format!("quantity for {} must be positive", line.sku));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    /// Another order from the same phone for the same ring and stop was placed recently.
    /// The order is created regardless; staff decide.
    pub duplicate: bool,
}

/// A line staff add to an existing order. The price is always explicit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdHocLine {
    /// Catalog sku, if the item has one. Unknown items get a synthesized inactive product.
    #[serde(default)]
    pub sku: Option<Sku>,
    pub name: String,
    pub unit: Unit,
    #[serde(default)]
    pub catch_weight: bool,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

/// Catalog sku for an item without one: `ADHOC-` and the name in upper-case words.
pub fn ad_hoc_sku(name: &str) -> Sku {
    let slug = name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    Sku::new(format!("ADHOC-{slug}"))
}
