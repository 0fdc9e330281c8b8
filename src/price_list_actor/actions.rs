//! Custom actions for the PriceList actor.

use crate::model::Sku;
use rust_decimal::Decimal;

/// Item-level edits of a price list.
#[derive(Debug, Clone)]
pub enum PriceListAction {
    /// Sets the unit price of a sku, replacing any existing price.
    SetPrice { sku: Sku, price: Decimal },
    /// Removes a sku from the list.
    RemovePrice(Sku),
}

/// Results from PriceListActions - variants match 1:1 with PriceListAction.
/// Both carry the price the sku had before the edit.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceListActionResult {
    SetPrice(Option<Decimal>),
    RemovePrice(Option<Decimal>),
}
