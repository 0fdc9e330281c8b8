//! # Price List Actor
//!
//! Owns the segment price lists. Prices are edited item by item through
//! [`PriceListAction`]s; resolution across lists happens on the client side with
//! [`resolve_price`](crate::model::resolve_price), over the lists the actor returns.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for [`PriceList`]
//! - [`error`] - [`PriceListError`]
//! - [`actions`] - [`PriceListAction`] and [`PriceListActionResult`]
//! - [`new()`] - Factory function that creates the actor and client

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::framework::{ResourceActor, ResourceClient};
use crate::model::PriceList;

/// Creates a new PriceList actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<PriceList>, ResourceClient<PriceList>) {
    ResourceActor::new(buffer_size)
}
