//! Player entities handed to the rest of the platform.
//!
//! An entity merges the persisted record (identity, lifecycle, fleet
//! metadata) with what the player reported on the current check-in
//! (display name, firmware, model). Assembly is pure.

use marquee_core::{DeviceDescriptor, PlayerModel};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::resolver::LOCAL_PLAYER_ID;
use crate::storage::{PlayerRow, PlayerStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerEntity {
    pub id: i64,
    pub uuid: String,
    pub owner_id: i64,
    pub status: PlayerStatus,
    pub licence_id: Option<i64>,
    pub name: String,
    pub firmware: String,
    pub model: PlayerModel,
    pub playlist_id: i64,
    pub refresh_secs: i64,
    pub api_endpoint: String,
    pub is_intranet: bool,
    pub created_at: i64,
    pub last_access: i64,
    pub metadata: FleetMetadata,
}

/// Containers owned by other subsystems (commands, reports, scheduling).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FleetMetadata {
    pub commands: Vec<serde_json::Value>,
    pub reports: Vec<serde_json::Value>,
    pub location: Location,
    pub categories: Vec<serde_json::Value>,
    pub properties: serde_json::Map<String, serde_json::Value>,
    pub remote_administration: serde_json::Map<String, serde_json::Value>,
    pub screen_times: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Location {
    pub data: serde_json::Map<String, serde_json::Value>,
    pub longitude: String,
    pub latitude: String,
}

impl PlayerEntity {
    pub const fn is_local(&self) -> bool {
        self.id == LOCAL_PLAYER_ID
    }

    pub fn is_provisioned(&self) -> bool {
        self.status == PlayerStatus::Provisioned
    }

    /// Entity for a stored record outside of a check-in, using the name,
    /// firmware and model captured when it was registered.
    pub fn from_row(row: &PlayerRow) -> Self {
        let descriptor = DeviceDescriptor {
            unique_id: row.uuid.clone(),
            model: PlayerModel::from_storage(&row.model),
            firmware_version: row.firmware.clone(),
            display_name: row.player_name.clone(),
        };
        assemble(row, &descriptor)
    }
}

/// Build the entity for a resolved record and the descriptor it checked in with.
pub fn assemble(row: &PlayerRow, descriptor: &DeviceDescriptor) -> PlayerEntity {
    PlayerEntity {
        id: row.id,
        uuid: row.uuid.clone(),
        owner_id: row.owner_id,
        status: row.status(),
        licence_id: row.licence_id,
        name: descriptor.display_name.clone(),
        firmware: descriptor.firmware_version.clone(),
        model: descriptor.model,
        playlist_id: row.playlist_id,
        refresh_secs: row.refresh_secs,
        api_endpoint: row.api_endpoint.clone(),
        is_intranet: row.is_intranet,
        created_at: row.created_at,
        last_access: row.last_access,
        metadata: FleetMetadata {
            commands: read_json(&row.commands),
            reports: read_json(&row.reports),
            location: Location {
                data: read_json(&row.location_data),
                longitude: row.location_longitude.clone(),
                latitude: row.location_latitude.clone(),
            },
            categories: read_json(&row.categories),
            properties: read_json(&row.properties),
            remote_administration: read_json(&row.remote_administration),
            screen_times: read_json(&row.screen_times),
        },
    }
}

// Columns written by other subsystems may hold anything.
fn read_json<T: DeserializeOwned + Default>(raw: &str) -> T {
    serde_json::from_str(raw).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::NewPlayer;

    fn row() -> PlayerRow {
        NewPlayer {
            id: None,
            uuid: "ABC123".into(),
            owner_id: 7,
            player_name: "Old-Name".into(),
            firmware: "1.0.0".into(),
            model: PlayerModel::ModelX,
            status: PlayerStatus::Unprovisioned,
            licence_id: None,
            playlist_id: 0,
            refresh_secs: 900,
            api_endpoint: String::new(),
            is_intranet: false,
            created_at: 1_700_000_000,
        }
        .into_row(2)
    }

    fn descriptor() -> DeviceDescriptor {
        DeviceDescriptor {
            unique_id: "ABC123".into(),
            model: PlayerModel::ModelX,
            firmware_version: "1.2.3".into(),
            display_name: "Lobby-Screen".into(),
        }
    }

    #[test]
    fn reported_fields_come_from_descriptor() {
        let entity = assemble(&row(), &descriptor());

        assert_eq!(entity.id, 2);
        assert_eq!(entity.owner_id, 7);
        assert_eq!(entity.name, "Lobby-Screen");
        assert_eq!(entity.firmware, "1.2.3");
        assert_eq!(entity.status, PlayerStatus::Unprovisioned);
        assert!(!entity.is_local());
        assert!(!entity.is_provisioned());
        assert_eq!(entity.metadata, FleetMetadata::default());
    }

    #[test]
    fn stored_metadata_is_decoded() {
        let mut row = row();
        row.commands = r#"[{"cmd":"reboot"}]"#.into();
        row.properties = r#"{"floor":"2"}"#.into();
        row.location_latitude = "50.08".into();

        let entity = assemble(&row, &descriptor());
        assert_eq!(entity.metadata.commands.len(), 1);
        assert_eq!(entity.metadata.properties["floor"], "2");
        assert_eq!(entity.metadata.location.latitude, "50.08");
    }

    #[test]
    fn corrupt_metadata_reads_as_empty() {
        let mut row = row();
        row.reports = "not json".into();
        row.remote_administration = "[1,2]".into();

        let entity = assemble(&row, &descriptor());
        assert!(entity.metadata.reports.is_empty());
        assert!(entity.metadata.remote_administration.is_empty());
    }

    #[test]
    fn from_row_uses_registered_fields() {
        let entity = PlayerEntity::from_row(&row());
        assert_eq!(entity.name, "Old-Name");
        assert_eq!(entity.firmware, "1.0.0");
        assert_eq!(entity.model, PlayerModel::ModelX);
    }

    #[test]
    fn serializes_with_lowercase_status() {
        let json = serde_json::to_value(assemble(&row(), &descriptor())).unwrap_or_default();
        assert_eq!(json["status"], "unprovisioned");
        assert_eq!(json["model"], "model_x");
        assert_eq!(json["metadata"]["location"]["longitude"], "");
    }
}
