//! # Farm Orders
//!
//! Order core for farm-direct meat sales: customers pick a delivery ring and stop,
//! order from the catalog, staff pack and weigh, and the order is invoiced.
//!
//! ## Core Components
//!
//! - **[framework]**: the generic [`ResourceActor`](framework::ResourceActor) and the
//!   [`ActorEntity`](framework::ActorEntity) trait every resource implements.
//! - **[model]**: products, price lists, rings, customers and orders, with the
//!   settlement and pricing arithmetic.
//! - **Actors**: [`product_actor`], [`price_list_actor`], [`ring_actor`],
//!   [`customer_actor`], [`order_actor`] - hooks, actions and errors per resource.
//! - **[clients]**: typed wrappers that hide message passing and run the order
//!   workflows (submission, packing, invoicing, listing).
//! - **[notify]**: confirmation and invoice delivery behind the
//!   [`Notifier`](notify::Notifier) trait.
//! - **[lifecycle]**: [`FarmSystem`](lifecycle::FarmSystem), configuration, clock and
//!   tracing setup.
//!
//! ## Testing
//!
//! See [`framework::mock`] for utilities to test clients without spawning full actors,
//! and [`lifecycle::FixedClock`] / [`notify::RecordingNotifier`] for deterministic
//! end-to-end scenarios.

pub mod clients;
pub mod customer_actor;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod notify;
pub mod order_actor;
pub mod price_list_actor;
pub mod product_actor;
pub mod ring_actor;
