//! Catalog products.
//!
//! # Actor Framework
//! [`Product`] implements [`ActorEntity`](crate::framework::ActorEntity) in
//! [`crate::product_actor::entity`]; the sku is its natural key, so catalog feeds can be
//! upserted idempotently.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Type-safe identifier for Products.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductId(pub u32);

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "product_{}", self.0)
    }
}

/// Stock keeping unit: the stable business identifier of a product.
///
/// Stored trimmed and upper-cased so `pork-004` and `PORK-004` are the same product.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Sku(String);

impl Sku {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Sku {
    fn from(raw: String) -> Self {
        Sku::new(raw)
    }
}

impl From<&str> for Sku {
    fn from(raw: &str) -> Self {
        Sku::new(raw)
    }
}

impl From<Sku> for String {
    fn from(sku: Sku) -> Self {
        sku.0
    }
}

impl Display for Sku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unit of measure. Weight products are sold per kilogram, count products per piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "KG")]
    Kg,
    #[serde(rename = "TK")]
    Piece,
}

impl Unit {
    pub fn code(self) -> &'static str {
        match self {
            Unit::Kg => "KG",
            Unit::Piece => "TK",
        }
    }

    pub fn is_weight(self) -> bool {
        matches!(self, Unit::Kg)
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown unit of measure: {0}")]
pub struct UnknownUnit(pub String);

impl FromStr for Unit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "KG" => Ok(Unit::Kg),
            "TK" | "PCS" | "PC" => Ok(Unit::Piece),
            _ => Err(UnknownUnit(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub sku: Sku,
    pub name: String,
    pub category: String,
    pub unit: Unit,
    /// The delivered quantity is only known once the item is packed.
    pub catch_weight: bool,
    pub active: bool,
}

/// Payload for creating or upserting a product. Also the record shape of catalog feeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCreate {
    pub sku: Sku,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub unit: Unit,
    #[serde(default)]
    pub catch_weight: bool,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Administrative correction of a product. The sku never changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub unit: Option<Unit>,
    pub catch_weight: Option<bool>,
    pub active: Option<bool>,
}

impl Product {
    pub fn new(id: ProductId, params: ProductCreate) -> Self {
        Self {
            id,
            sku: params.sku,
            name: params.name,
            category: params.category,
            unit: params.unit,
            catch_weight: params.catch_weight,
            active: params.active,
        }
    }
}
