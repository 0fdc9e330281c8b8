//! # Order Actor
//!
//! Owns orders and their lines. Everything that changes an existing order goes through
//! this actor, one request at a time: staff status changes, packed weights, ad-hoc
//! lines and invoicing.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for [`Order`]
//! - [`error`] - [`OrderError`] and its [`ErrorClass`]
//! - [`actions`] - [`OrderAction`] and [`OrderActionResult`]
//! - [`sequence`] - [`InvoiceSequence`], the per-year invoice counter
//! - [`policy`] - [`TransitionPolicy`] and [`CapacityPolicy`]
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Context
//!
//! The actor runs with an [`OrderContext`]. Invoice numbers are drawn from the shared
//! [`InvoiceSequence`] inside the `Invoice` action, so two invoices can never be given
//! the same number.
//!
//! ```rust
//! use farm_orders::order_actor::{self, InvoiceSequence, OrderContext, TransitionPolicy};
//! use rust_decimal_macros::dec;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = order_actor::new(32);
//!     let context = OrderContext {
//!         invoices: Arc::new(InvoiceSequence::new()),
//!         transitions: TransitionPolicy::Strict,
//!         vat_rate: dec!(0.20),
//!     };
//!     let handle = tokio::spawn(actor.run(context));
//!     drop(client);
//!     handle.await.unwrap();
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;
pub mod policy;
pub mod sequence;

pub use actions::*;
pub use error::*;
pub use policy::*;
pub use sequence::*;

use crate::framework::{ResourceActor, ResourceClient};
use crate::model::Order;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Dependencies injected into the Order actor.
#[derive(Debug, Clone)]
pub struct OrderContext {
    pub invoices: Arc<InvoiceSequence>,
    pub transitions: TransitionPolicy,
    /// VAT added to invoice subtotals, e.g. `0.20`.
    pub vat_rate: Decimal,
}

/// Creates a new Order actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Order>, ResourceClient<Order>) {
    ResourceActor::new(buffer_size)
}
