//! # Product Actor
//!
//! Owns the product catalog. Products are addressed by generated id or by sku, the
//! natural key, which makes catalog feeds idempotent: upserting the same feed twice
//! leaves one product per sku with the last written fields.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for [`Product`]
//! - [`error`] - [`ProductError`] type for type-safe error handling
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Usage
//!
//! ```rust
//! use farm_orders::clients::ProductClient;
//! use farm_orders::model::{ProductCreate, Sku, Unit};
//! use farm_orders::product_actor;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, generic_client) = product_actor::new(32);
//!     let client = ProductClient::new(generic_client);
//!     tokio::spawn(actor.run(()));
//!
//!     let report = client
//!         .sync_catalog(vec![ProductCreate {
//!             sku: Sku::new("PORK-004"),
//!             name: "Pork sausages".to_string(),
//!             category: "Pork".to_string(),
//!             unit: Unit::Piece,
//!             catch_weight: false,
//!             active: true,
//!         }])
//!         .await?;
//!     assert_eq!(report.created, 1);
//!     Ok(())
//! }
//! ```

pub mod entity;
pub mod error;

pub use error::*;

use crate::framework::{ResourceActor, ResourceClient};
use crate::model::Product;

/// Creates a new Product actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Product>, ResourceClient<Product>) {
    ResourceActor::new(buffer_size)
}
