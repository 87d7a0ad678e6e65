//! Data models for registry storage.

use std::fmt;

use marquee_core::PlayerModel;
use serde::{Deserialize, Serialize};

/// Serialized form of an empty list-valued metadata column.
pub const EMPTY_LIST: &str = "[]";
/// Serialized form of an empty map-valued metadata column.
pub const EMPTY_MAP: &str = "{}";

/// Approval state of a player. `Provisioned` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    #[default]
    Unprovisioned,
    Provisioned,
}

impl PlayerStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unprovisioned => "unprovisioned",
            Self::Provisioned => "provisioned",
        }
    }

    /// Read a stored status; anything unexpected counts as not yet approved.
    pub fn from_storage(value: &str) -> Self {
        if value == Self::Provisioned.as_str() {
            Self::Provisioned
        } else {
            Self::Unprovisioned
        }
    }
}

impl fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row of the `players` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PlayerRow {
    pub id: i64,
    pub uuid: String,
    pub owner_id: i64,
    pub player_name: String,
    pub firmware: String,
    pub model: String,
    pub status: String,
    pub licence_id: Option<i64>,
    pub playlist_id: i64,
    pub refresh_secs: i64,
    pub api_endpoint: String,
    pub is_intranet: bool,
    pub commands: String,
    pub reports: String,
    pub location_data: String,
    pub location_longitude: String,
    pub location_latitude: String,
    pub categories: String,
    pub properties: String,
    pub remote_administration: String,
    pub screen_times: String,
    pub created_at: i64,
    pub last_access: i64,
}

impl PlayerRow {
    pub fn status(&self) -> PlayerStatus {
        PlayerStatus::from_storage(&self.status)
    }
}

/// Values for a player insert. Fleet metadata always starts empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlayer {
    /// Explicit id; `None` lets the store assign one.
    pub id: Option<i64>,
    pub uuid: String,
    pub owner_id: i64,
    pub player_name: String,
    pub firmware: String,
    pub model: PlayerModel,
    pub status: PlayerStatus,
    pub licence_id: Option<i64>,
    pub playlist_id: i64,
    pub refresh_secs: i64,
    pub api_endpoint: String,
    pub is_intranet: bool,
    pub created_at: i64,
}

impl NewPlayer {
    /// The row as the store holds it right after inserting under `id`.
    pub fn into_row(self, id: i64) -> PlayerRow {
        PlayerRow {
            id,
            uuid: self.uuid,
            owner_id: self.owner_id,
            player_name: self.player_name,
            firmware: self.firmware,
            model: self.model.as_str().to_string(),
            status: self.status.as_str().to_string(),
            licence_id: self.licence_id,
            playlist_id: self.playlist_id,
            refresh_secs: self.refresh_secs,
            api_endpoint: self.api_endpoint,
            is_intranet: self.is_intranet,
            commands: EMPTY_LIST.to_string(),
            reports: EMPTY_LIST.to_string(),
            location_data: EMPTY_MAP.to_string(),
            location_longitude: String::new(),
            location_latitude: String::new(),
            categories: EMPTY_LIST.to_string(),
            properties: EMPTY_MAP.to_string(),
            remote_administration: EMPTY_MAP.to_string(),
            screen_times: EMPTY_LIST.to_string(),
            created_at: self.created_at,
            last_access: self.created_at,
        }
    }
}

/// Result of an insert: either the new id, or a uniqueness conflict with an
/// existing row (same uuid or same explicit id).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Created(i64),
    Conflict,
}
