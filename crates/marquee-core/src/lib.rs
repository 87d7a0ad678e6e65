//! Marquee Core Library
//!
//! Shared functionality for Marquee components:
//! - Player descriptor (user-agent) parsing
//! - Platform edition and configuration resolution
//! - `SQLite` helpers shared by storage layers
//! - Common error types

pub mod config;
pub mod db;
pub mod descriptor;
pub mod edition;
pub mod error;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod tracing_init;

pub use config::Config;
pub use descriptor::{DeviceDescriptor, PlayerModel};
pub use edition::Edition;
pub use error::{Error, Result};
