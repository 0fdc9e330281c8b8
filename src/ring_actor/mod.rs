//! # Ring Actor
//!
//! Owns the delivery schedule: rings, their stops, cutoffs, visibility windows and
//! capacity limits. Stops are managed through [`RingAction`]s so the ring can keep
//! them ordered and allocate their ids.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for [`Ring`]
//! - [`error`] - [`RingError`]
//! - [`actions`] - [`RingAction`] and [`RingActionResult`]
//! - [`new()`] - Factory function that creates the actor and client

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::framework::{ResourceActor, ResourceClient};
use crate::model::Ring;

/// Creates a new Ring actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Ring>, ResourceClient<Ring>) {
    ResourceActor::new(buffer_size)
}
