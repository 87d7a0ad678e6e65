//! Registry database connection and initialization.

pub use marquee_core::db::DatabaseError;

marquee_core::define_database!(RegistryDatabase, "Registry database migrations complete");
