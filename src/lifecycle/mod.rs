//! # System Lifecycle
//!
//! Starting, wiring and stopping the actors, plus the ambient services they run with.
//!
//! - [`FarmSystem`] creates every actor, injects dependencies and shuts them down
//! - [`SystemConfig`] operator settings, loadable from JSON
//! - [`Clock`] the time source for cutoffs, duplicate windows and invoice dates
//! - [`setup_tracing`] the process-wide log subscriber
//!
//! ## Dependency Injection via Context
//!
//! Actors are created without dependencies and receive them when started with
//! `run(context)`. Only the Order actor has a context ([`OrderContext`](crate::order_actor::OrderContext));
//! the cross-actor reads of order submission live in
//! [`OrderClient`](crate::clients::OrderClient), which is handed the other clients at
//! construction.
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop all clients** - closes the sender side of every channel
//! 2. **Actors detect closure** - `receiver.recv()` returns `None` once the queue is drained
//! 3. **Await completion** - [`FarmSystem::shutdown`] joins every actor task

pub mod clock;
pub mod config;
pub mod farm_system;
pub mod tracing;

pub use self::clock::*;
pub use self::config::*;
pub use self::farm_system::*;
pub use self::tracing::setup_tracing;
