//! `SQLite` storage for the Marquee fleet registry.
//!
//! Provides persistence for player records and the `PlayerStore` seam the
//! identity resolver is written against.

mod db;
mod models;
mod queries;
mod store;


pub use db::{DatabaseError, RegistryDatabase};
pub use models::*;
pub use store::PlayerStore;
