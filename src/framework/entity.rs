//! # ActorEntity Trait
//!
//! The contract every stored resource (Product, PriceList, Ring, Customer, Order) fulfils
//! to be managed by the generic [`ResourceActor`](crate::framework::ResourceActor).
//! It names the ID, DTO, action, context and error types, and provides the lifecycle
//! hooks the actor calls (`on_create`, `on_update`, `on_upsert`, `on_delete`,
//! `handle_action`).
//!
//! # Natural Keys
//!
//! Some resources have a business identity besides their generated ID: a customer is
//! identified by email, a product by sku. Such entities override
//! [`ActorEntity::natural_key`] and [`ActorEntity::create_key`]; the actor then keeps a
//! key index, rejects duplicate creates, serves `GetByKey`, and turns `Upsert` into
//! either a create or an [`ActorEntity::on_upsert`] merge. Entities without a natural key
//! keep the defaults and an `Upsert` is a plain create.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by ResourceActor.
///
/// # Async & Context
/// Hooks are async so they can call other actors. The `Context` type is injected into
/// every hook by `ResourceActor::run`, which lets dependencies (other clients, config,
/// sequences) be bound after construction.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this entity.
    /// Must be convertible from u32 for automatic ID generation, and ordered so that
    /// listings come back in creation order.
    type Id: Eq + Ord + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Enum representing resource-specific operations (e.g. `RecordPackedWeight`).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// One error enum per actor; clients recover it from
    /// [`FrameworkError::EntityError`](crate::framework::FrameworkError::EntityError).
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the full Entity from the ID and Payload.
    /// This is called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Natural key of a stored entity.
    fn natural_key(&self) -> Option<String> {
        None
    }

    /// Natural key a create payload would produce.
    fn create_key(_params: &Self::Create) -> Option<String> {
        None
    }

    // --- Lifecycle Hooks (Async) ---

    /// Called immediately after the entity is created and initialized.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when an update request is received.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called when an upsert hits an entity that already owns the payload's natural key.
    async fn on_upsert(
        &mut self,
        _params: Self::Create,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called immediately before the entity is removed from the system.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Handle a custom resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
