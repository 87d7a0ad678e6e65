//! Database queries for the Marquee registry.

use super::db::{DatabaseError, RegistryDatabase};
use super::models::{EMPTY_LIST, EMPTY_MAP, InsertOutcome, NewPlayer, PlayerRow, PlayerStatus};

impl RegistryDatabase {
    /// Get a player by primary id.
    pub async fn get_player(&self, id: i64) -> Result<Option<PlayerRow>, DatabaseError> {
        let player = sqlx::query_as::<_, PlayerRow>("SELECT * FROM players WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(player)
    }

    /// Get a player by its device-generated uuid.
    pub async fn get_player_by_uuid(&self, uuid: &str) -> Result<Option<PlayerRow>, DatabaseError> {
        let player = sqlx::query_as::<_, PlayerRow>("SELECT * FROM players WHERE uuid = ?")
            .bind(uuid)
            .fetch_optional(self.pool())
            .await?;

        Ok(player)
    }

    /// Insert a player in a single statement.
    ///
    /// A uniqueness violation (uuid, or an explicit id that is taken) is
    /// reported as `InsertOutcome::Conflict`, never as an error.
    pub async fn insert_player(&self, player: &NewPlayer) -> Result<InsertOutcome, DatabaseError> {
        let result = sqlx::query(
            "INSERT INTO players (
                id, uuid, owner_id, player_name, firmware, model, status, licence_id,
                playlist_id, refresh_secs, api_endpoint, is_intranet,
                commands, reports, location_data, location_longitude, location_latitude,
                categories, properties, remote_administration, screen_times,
                created_at, last_access
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, '', '', ?, ?, ?, ?, ?, ?)",
        )
        .bind(player.id)
        .bind(&player.uuid)
        .bind(player.owner_id)
        .bind(&player.player_name)
        .bind(&player.firmware)
        .bind(player.model.as_str())
        .bind(player.status.as_str())
        .bind(player.licence_id)
        .bind(player.playlist_id)
        .bind(player.refresh_secs)
        .bind(&player.api_endpoint)
        .bind(player.is_intranet)
        .bind(EMPTY_LIST)
        .bind(EMPTY_LIST)
        .bind(EMPTY_MAP)
        .bind(EMPTY_LIST)
        .bind(EMPTY_MAP)
        .bind(EMPTY_MAP)
        .bind(EMPTY_LIST)
        .bind(player.created_at)
        .bind(player.created_at)
        .execute(self.pool())
        .await;

        match result {
            Ok(done) => Ok(InsertOutcome::Created(done.last_insert_rowid())),
            Err(e) => match DatabaseError::from(e) {
                DatabaseError::Conflict(_) => Ok(InsertOutcome::Conflict),
                other => Err(other),
            },
        }
    }

    /// Advance `last_access` to `at`. Never moves the timestamp backwards.
    pub async fn touch_player(&self, id: i64, at: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("UPDATE players SET last_access = MAX(last_access, ?) WHERE id = ?")
            .bind(at)
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Approve a pending player and attach a licence.
    ///
    /// Returns `false` when the player does not exist or is already
    /// provisioned.
    pub async fn provision_player(&self, id: i64, licence_id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE players SET status = ?, licence_id = ? WHERE id = ? AND status = ?",
        )
        .bind(PlayerStatus::Provisioned.as_str())
        .bind(licence_id)
        .bind(id)
        .bind(PlayerStatus::Unprovisioned.as_str())
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List players for an owner, most recently seen first.
    pub async fn list_players(
        &self,
        owner_id: i64,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<PlayerRow>, DatabaseError> {
        let players = sqlx::query_as::<_, PlayerRow>(
            "SELECT * FROM players WHERE owner_id = ? ORDER BY last_access DESC, id LIMIT ? OFFSET ?",
        )
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool())
        .await?;

        Ok(players)
    }

    /// Count all players, optionally restricted to one uuid.
    pub async fn count_players(&self, uuid: Option<&str>) -> Result<i64, DatabaseError> {
        let row: (i64,) = if let Some(uuid) = uuid {
            sqlx::query_as("SELECT COUNT(*) FROM players WHERE uuid = ?")
                .bind(uuid)
                .fetch_one(self.pool())
                .await?
        } else {
            sqlx::query_as("SELECT COUNT(*) FROM players")
                .fetch_one(self.pool())
                .await?
        };

        Ok(row.0)
    }
}
