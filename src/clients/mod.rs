//! # Domain Clients
//!
//! Typed wrappers around each actor's [`ResourceClient`](crate::framework::ResourceClient).
//! They hide the message passing, turn framework errors back into the actor's own error
//! enum, and host the workflows that span several actors: order submission, invoicing
//! and the joined order listing all live on [`OrderClient`].

pub mod customer_client;
pub mod order_client;
pub mod order_view;
pub mod price_list_client;
pub mod product_client;
pub mod ring_client;

pub use customer_client::CustomerClient;
pub use order_client::{OrderClient, OrderDependencies, SubmissionSettings};
pub use order_view::{OrderQuery, OrderView};
pub use price_list_client::PriceListClient;
pub use product_client::{CatalogSyncReport, ProductClient};
pub use ring_client::RingClient;
