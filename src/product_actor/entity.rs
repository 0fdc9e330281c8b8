//! Entity trait implementation for the Product domain type.
//!
//! See the trait implementation on [`Product`] for method documentation.

use crate::framework::ActorEntity;
use crate::model::{Product, ProductCreate, ProductId, ProductUpdate};
use crate::product_actor::ProductError;
use async_trait::async_trait;

fn validate(sku_empty: bool, name: &str) -> Result<(), ProductError> {
    if sku_empty {
        return Err(ProductError::Validation("sku is required".into()));
    }
    if name.trim().is_empty() {
        return Err(ProductError::Validation("name is required".into()));
    }
    Ok(())
}

#[async_trait]
impl ActorEntity for Product {
    type Id = ProductId;
    type Create = ProductCreate;
    type Update = ProductUpdate;
    type Action = ();
    type ActionResult = ();
    type Context = ();
    type Error = ProductError;

    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, Self::Error> {
        validate(params.sku.is_empty(), &params.name)?;
        Ok(Self::new(id, params))
    }

    fn natural_key(&self) -> Option<String> {
        Some(self.sku.to_string())
    }

    fn create_key(params: &ProductCreate) -> Option<String> {
        Some(params.sku.to_string())
    }

    /// Administrative correction. The sku is immutable.
    async fn on_update(&mut self, update: ProductUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(name) = update.name {
            validate(false, &name)?;
            self.name = name;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(unit) = update.unit {
            self.unit = unit;
        }
        if let Some(catch_weight) = update.catch_weight {
            self.catch_weight = catch_weight;
        }
        if let Some(active) = update.active {
            self.active = active;
        }
        Ok(())
    }

    /// Catalog sync: the feed record replaces every field except the id.
    async fn on_upsert(&mut self, params: ProductCreate, _ctx: &()) -> Result<(), Self::Error> {
        validate(params.sku.is_empty(), &params.name)?;
        *self = Self::new(self.id.clone(), params);
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), Self::Error> {
        Ok(())
    }
}
