//! Entity trait implementation for the Customer domain type.

use crate::customer_actor::CustomerError;
use crate::framework::ActorEntity;
use crate::model::{normalize_email, normalize_phone, Customer, CustomerCreate, CustomerId, CustomerUpdate};
use async_trait::async_trait;

/// Checks the contact fields every stored customer must have.
pub fn validate_contact(params: &CustomerCreate) -> Result<(), CustomerError> {
    let email = normalize_email(&params.email);
    if email.is_empty() {
        return Err(CustomerError::Validation("email is required".into()));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
        _ => return Err(CustomerError::Validation(format!("invalid email {email:?}"))),
    }
    if params.name.trim().is_empty() {
        return Err(CustomerError::Validation("name is required".into()));
    }
    if normalize_phone(&params.phone).is_empty() {
        return Err(CustomerError::Validation("phone is required".into()));
    }
    Ok(())
}

#[async_trait]
impl ActorEntity for Customer {
    type Id = CustomerId;
    type Create = CustomerCreate;
    type Update = CustomerUpdate;
    type Action = ();
    type ActionResult = ();
    type Context = ();
    type Error = CustomerError;

    fn from_create_params(id: CustomerId, params: CustomerCreate) -> Result<Self, Self::Error> {
        validate_contact(&params)?;
        Ok(Self::new(id, params))
    }

    fn natural_key(&self) -> Option<String> {
        Some(self.email.clone())
    }

    fn create_key(params: &CustomerCreate) -> Option<String> {
        Some(normalize_email(&params.email))
    }

    async fn on_update(&mut self, update: CustomerUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(CustomerError::Validation("name is required".into()));
            }
            self.name = name.trim().to_string();
        }
        if let Some(phone) = update.phone {
            self.phone = normalize_phone(&phone);
        }
        if let Some(segment) = update.segment {
            self.segment = segment;
        }
        if let Some(consent) = update.marketing_consent {
            self.marketing_consent = consent;
        }
        Ok(())
    }

    async fn on_upsert(&mut self, params: CustomerCreate, _ctx: &()) -> Result<(), Self::Error> {
        validate_contact(&params)?;
        self.merge(params);
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(email: &str) -> CustomerCreate {
        CustomerCreate {
            email: email.into(),
            name: "Ann Tamm".into(),
            phone: "+372 5551 2345".into(),
            ..Default::default()
        }
    }

    #[test]
    fn email_key_is_case_insensitive() {
        assert_eq!(
            Customer::create_key(&form("Ann@Example.COM ")),
            Customer::create_key(&form("ann@example.com"))
        );
    }

    #[test]
    fn contact_fields_are_required() {
        assert!(validate_contact(&form("ann@example.com")).is_ok());
        assert!(validate_contact(&form("")).is_err());
        assert!(validate_contact(&form("not-an-email")).is_err());
        let mut no_phone = form("ann@example.com");
        no_phone.phone = "  ".into();
        assert!(validate_contact(&no_phone).is_err());
    }
}
