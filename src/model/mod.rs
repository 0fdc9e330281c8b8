//! Pure data structures implementing the [`ActorEntity`](crate::framework::ActorEntity)
//! trait, plus the settlement and pricing arithmetic that operates on them.

pub mod customer;
pub mod invoice;
pub mod order;
pub mod price_list;
pub mod product;
pub mod ring;
pub mod submission;

pub use customer::*;
pub use invoice::*;
pub use order::*;
pub use price_list::*;
pub use product::*;
pub use ring::*;
pub use submission::*;
