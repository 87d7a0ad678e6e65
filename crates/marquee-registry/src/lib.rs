//! Marquee Fleet Registry Library
//!
//! Player identity resolution for the Marquee signage platform:
//! - SQLite storage for player records
//! - Edition-dependent provisioning of new players
//! - Identity resolution for remote and local check-ins
//! - Assembly of player entities for the rest of the platform

pub mod entity;
pub mod error;
pub mod policy;
pub mod resolver;
pub mod storage;

pub use entity::PlayerEntity;
pub use error::ResolveError;
pub use resolver::{CheckinOrigin, IdentityResolver, ResolverSettings};
