//! Resource storage for Haulier
//!
//! This crate provides one storage abstraction per resource (users, trucks,
//! locations and orders). Two backends implement every trait: an in-memory
//! store for tests and local runs, and a PostgreSQL store for deployments.
//!
//! Stores persist single records atomically. They do not enforce references
//! between records; callers check those opportunistically.

mod error;
mod memory;
mod postgres;
mod traits;

pub use error::*;
pub use memory::*;
pub use postgres::*;
pub use traits::*;
