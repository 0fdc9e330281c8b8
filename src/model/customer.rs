use crate::model::Segment;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub u32);

impl From<u32> for CustomerId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "customer_{}", self.0)
    }
}

/// Emails identify customers; `Ann@Example.com ` and `ann@example.com` are one person.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Phone numbers are compared with all whitespace removed.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

/// A person or business that orders.
///
/// # Actor Framework
/// Implements [`ActorEntity`](crate::framework::ActorEntity) with the normalized email as
/// natural key, so a submission either creates the customer or refreshes its contact
/// details in one serialized step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub org_name: Option<String>,
    pub reg_code: Option<String>,
    pub segment: Segment,
    pub marketing_consent: bool,
    pub terms_accepted: bool,
}

/// Contact details as captured on an order form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomerCreate {
    pub email: String,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub org_name: Option<String>,
    #[serde(default)]
    pub reg_code: Option<String>,
    /// Only staff set this; `None` keeps the stored segment (Retail for new customers).
    #[serde(default)]
    pub segment: Option<Segment>,
    #[serde(default)]
    pub marketing_consent: bool,
    #[serde(default)]
    pub terms_accepted: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub segment: Option<Segment>,
    pub marketing_consent: Option<bool>,
}

impl Customer {
    pub fn new(id: CustomerId, params: CustomerCreate) -> Self {
        Self {
            id,
            email: normalize_email(&params.email),
            name: params.name.trim().to_string(),
            phone: normalize_phone(&params.phone),
            org_name: params.org_name,
            reg_code: params.reg_code,
            segment: params.segment.unwrap_or_default(),
            marketing_consent: params.marketing_consent,
            terms_accepted: params.terms_accepted,
        }
    }

    /// Refreshes contact details from a newer submission.
    ///
    /// Terms acceptance is never withdrawn by a later form.
    pub fn merge(&mut self, params: CustomerCreate) {
        self.name = params.name.trim().to_string();
        self.phone = normalize_phone(&params.phone);
        self.org_name = params.org_name;
        self.reg_code = params.reg_code;
        if let Some(segment) = params.segment {
            self.segment = segment;
        }
        self.marketing_consent = params.marketing_consent;
        self.terms_accepted |= params.terms_accepted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> CustomerCreate {
        CustomerCreate {
            email: " Ann@Example.com".into(),
            name: "Ann Tamm".into(),
            phone: "+372 555 12345".into(),
            terms_accepted: true,
            ..Default::default()
        }
    }

    #[test]
    fn new_customer_is_normalized_retail() {
        let customer = Customer::new(CustomerId(1), form());
        assert_eq!(customer.email, "ann@example.com");
        assert_eq!(customer.phone, "+37255512345");
        assert_eq!(customer.segment, Segment::Retail);
    }

    #[test]
    fn merging_identical_form_changes_nothing() {
        let mut customer = Customer::new(CustomerId(1), form());
        let before = customer.clone();
        customer.merge(form());
        assert_eq!(customer, before);
    }

    #[test]
    fn merge_keeps_segment_and_terms() {
        let mut customer = Customer::new(CustomerId(1), form());
        customer.segment = Segment::Restaurant;
        customer.merge(CustomerCreate {
            name: "Ann T.".into(),
            terms_accepted: false,
            ..form()
        });
        assert_eq!(customer.name, "Ann T.");
        assert_eq!(customer.segment, Segment::Restaurant);
        assert!(customer.terms_accepted);
    }
}
