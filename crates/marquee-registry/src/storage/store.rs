//! The storage seam used by identity resolution.

use std::future::Future;

use super::db::{DatabaseError, RegistryDatabase};
use super::models::{InsertOutcome, NewPlayer, PlayerRow};

/// Durable keyed storage of player records.
///
/// Implementations must detect uuid conflicts atomically on insert: two
/// concurrent inserts of the same uuid yield exactly one `Created`.
pub trait PlayerStore: Send + Sync {
    fn find_by_id(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<PlayerRow>, DatabaseError>> + Send;

    fn find_by_uuid(
        &self,
        uuid: &str,
    ) -> impl Future<Output = Result<Option<PlayerRow>, DatabaseError>> + Send;

    fn insert(
        &self,
        player: &NewPlayer,
    ) -> impl Future<Output = Result<InsertOutcome, DatabaseError>> + Send;

    /// Record that the player was seen at `at` (unix seconds).
    fn touch_last_seen(
        &self,
        id: i64,
        at: i64,
    ) -> impl Future<Output = Result<(), DatabaseError>> + Send;
}

impl PlayerStore for RegistryDatabase {
    async fn find_by_id(&self, id: i64) -> Result<Option<PlayerRow>, DatabaseError> {
        self.get_player(id).await
    }

    async fn find_by_uuid(&self, uuid: &str) -> Result<Option<PlayerRow>, DatabaseError> {
        self.get_player_by_uuid(uuid).await
    }

    async fn insert(&self, player: &NewPlayer) -> Result<InsertOutcome, DatabaseError> {
        self.insert_player(player).await
    }

    async fn touch_last_seen(&self, id: i64, at: i64) -> Result<(), DatabaseError> {
        self.touch_player(id, at).await?;
        Ok(())
    }
}
