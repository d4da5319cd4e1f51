//! Core entity definitions for Haulier.
//!
//! This crate defines the records persisted by the resource stores (users,
//! trucks, locations and orders) together with the read projections that are
//! safe to hand to API clients.

mod location;
mod order;
mod truck;
mod user;

pub use location::*;
pub use order::*;
pub use truck::*;
pub use user::*;
