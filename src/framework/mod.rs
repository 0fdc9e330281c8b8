//! Generic resource-actor framework.
//!
//! Every stored entity type (products, price lists, rings, customers, orders) lives
//! inside one [`ResourceActor`] task that owns its store and handles requests one at a
//! time. Callers talk to it through a cloneable [`ResourceClient`].
//!
//! # Main Components
//!
//! - [`ActorEntity`] - Trait that resource types implement to be managed by actors
//! - [`ResourceActor`] - Generic actor that owns the store and the natural-key index
//! - [`ResourceClient`] - Typed request sender (CRUD, actions, listing, upserts)
//! - [`ActorClient`] - Shared `get`/`delete`/`list` plumbing for domain clients
//! - [`FrameworkError`] - Transport and lookup errors
//!
//! # Testing
//!
//! See [`mock`] for utilities to test clients without spawning full actors.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{Filter, ResourceRequest, Response, Upserted};
