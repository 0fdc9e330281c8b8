//! Segment price lists and unit price resolution.

use crate::model::Sku;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

/// Type-safe identifier for PriceLists.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PriceListId(pub u32);

impl From<u32> for PriceListId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for PriceListId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "price_list_{}", self.0)
    }
}

/// Customer segment; selects which price lists apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Segment {
    #[default]
    Retail,
    Restaurant,
    Wholesale,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceList {
    pub id: PriceListId,
    pub name: String,
    pub segment: Segment,
    pub valid_from: DateTime<Utc>,
    /// Open-ended when `None`.
    pub valid_to: Option<DateTime<Utc>>,
    /// One price per sku.
    pub items: BTreeMap<Sku, Decimal>,
}

#[derive(Debug, Clone)]
pub struct PriceListCreate {
    pub name: String,
    pub segment: Segment,
    pub valid_from: DateTime<Utc>,
    pub valid_to: Option<DateTime<Utc>>,
    pub items: Vec<(Sku, Decimal)>,
}

#[derive(Debug, Clone, Default)]
pub struct PriceListUpdate {
    pub name: Option<String>,
    pub valid_from: Option<DateTime<Utc>>,
    /// `Some(None)` reopens the list, `Some(Some(t))` closes it at `t`.
    pub valid_to: Option<Option<DateTime<Utc>>>,
}

impl PriceList {
    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        self.valid_from <= at && self.valid_to.map_or(true, |end| at <= end)
    }

    pub fn price_of(&self, sku: &Sku) -> Option<Decimal> {
        self.items.get(sku).copied()
    }
}

/// Resolves the unit price of `sku` for `segment` at instant `at`.
///
/// Among lists of the segment that are valid at `at` and price the sku, the one with the
/// latest `valid_from` wins; ties go to the most recently created list. `None` means the
/// price is to be agreed.
pub fn resolve_price<'a>(
    lists: impl IntoIterator<Item = &'a PriceList>,
    sku: &Sku,
    segment: Segment,
    at: DateTime<Utc>,
) -> Option<Decimal> {
    lists
        .into_iter()
        .filter(|list| list.segment == segment && list.is_valid_at(at))
        .filter_map(|list| list.price_of(sku).map(|price| (list, price)))
        .max_by(|(a, _), (b, _)| a.valid_from.cmp(&b.valid_from).then(a.id.cmp(&b.id)))
        .map(|(_, price)| price)
}
