//! Entity trait implementation for the PriceList domain type.

use super::actions::{PriceListAction, PriceListActionResult};
use crate::framework::ActorEntity;
use crate::model::{PriceList, PriceListCreate, PriceListId, PriceListUpdate};
use crate::price_list_actor::PriceListError;
use async_trait::async_trait;
use rust_decimal::Decimal;

impl PriceList {
    fn check_window(&self) -> Result<(), PriceListError> {
        match self.valid_to {
            Some(end) if end < self.valid_from => Err(PriceListError::Validation(format!(
                "valid_to {end} is before valid_from {}",
                self.valid_from
            ))),
            _ => Ok(()),
        }
    }
}

fn check_price(price: Decimal) -> Result<(), PriceListError> {
    if price.is_sign_negative() {
        return Err(PriceListError::Validation(format!("negative price {price}")));
    }
    Ok(())
}

#[async_trait]
impl ActorEntity for PriceList {
    type Id = PriceListId;
    type Create = PriceListCreate;
    type Update = PriceListUpdate;
    type Action = PriceListAction;
    type ActionResult = PriceListActionResult;
    type Context = ();
    type Error = PriceListError;

    fn from_create_params(id: PriceListId, params: PriceListCreate) -> Result<Self, Self::Error> {
        if params.name.trim().is_empty() {
            return Err(PriceListError::Validation("name is required".into()));
        }
        for (_, price) in &params.items {
            check_price(*price)?;
        }
        let list = Self {
            id,
            name: params.name,
            segment: params.segment,
            valid_from: params.valid_from,
            valid_to: params.valid_to,
            // Later entries for the same sku win.
            items: params.items.into_iter().collect(),
        };
        list.check_window()?;
        Ok(list)
    }

    async fn on_update(&mut self, update: PriceListUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(valid_from) = update.valid_from {
            self.valid_from = valid_from;
        }
        if let Some(valid_to) = update.valid_to {
            self.valid_to = valid_to;
        }
        self.check_window()
    }

    async fn handle_action(
        &mut self,
        action: PriceListAction,
        _ctx: &(),
    ) -> Result<PriceListActionResult, Self::Error> {
        match action {
            PriceListAction::SetPrice { sku, price } => {
                check_price(price)?;
                Ok(PriceListActionResult::SetPrice(self.items.insert(sku, price)))
            }
            PriceListAction::RemovePrice(sku) => {
                Ok(PriceListActionResult::RemovePrice(self.items.remove(&sku)))
            }
        }
    }
}
