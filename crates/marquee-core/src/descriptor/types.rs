//! Descriptor types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Hardware/software family of a signage player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerModel {
    #[default]
    Unknown,
    Garlic,
    IadeaXmp1x0,
    IadeaXmp2x00,
    IadeaXmp3x50,
    Qbic,
    Screenlite,
    ModelX,
}

/// Model-token prefixes, checked in order against the lowercased token.
const SIGNATURES: &[(&str, PlayerModel)] = &[
    ("garlic", PlayerModel::Garlic),
    ("xmp-1", PlayerModel::IadeaXmp1x0),
    ("xmp-2", PlayerModel::IadeaXmp2x00),
    ("xmp-3", PlayerModel::IadeaXmp3x50),
    ("xds-", PlayerModel::IadeaXmp3x50),
    ("qbic", PlayerModel::Qbic),
    ("bxp-", PlayerModel::Qbic),
    ("screenlite", PlayerModel::Screenlite),
    ("modelx", PlayerModel::ModelX),
];

impl PlayerModel {
    /// Stable name used in storage and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Garlic => "garlic",
            Self::IadeaXmp1x0 => "iadea_xmp1x0",
            Self::IadeaXmp2x00 => "iadea_xmp2x00",
            Self::IadeaXmp3x50 => "iadea_xmp3x50",
            Self::Qbic => "qbic",
            Self::Screenlite => "screenlite",
            Self::ModelX => "model_x",
        }
    }

    /// Match a reported model token against the known signatures.
    pub fn from_signature(token: &str) -> Self {
        let token = token.trim().to_ascii_lowercase();
        SIGNATURES
            .iter()
            .find(|(prefix, _)| token.starts_with(prefix))
            .map_or(Self::Unknown, |(_, model)| *model)
    }

    /// Inverse of [`PlayerModel::as_str`]; unrecognised names map to `Unknown`.
    pub fn from_storage(name: &str) -> Self {
        [
            Self::Garlic,
            Self::IadeaXmp1x0,
            Self::IadeaXmp2x00,
            Self::IadeaXmp3x50,
            Self::Qbic,
            Self::Screenlite,
            Self::ModelX,
        ]
        .into_iter()
        .find(|m| m.as_str() == name)
        .unwrap_or(Self::Unknown)
    }

    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for PlayerModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured identity a player reported on this check-in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Device-generated stable identifier.
    pub unique_id: String,
    pub model: PlayerModel,
    pub firmware_version: String,
    pub display_name: String,
}

impl DeviceDescriptor {
    /// A descriptor may enter identity resolution only with a known model
    /// and a non-empty identifier.
    pub fn is_resolvable(&self) -> bool {
        self.model.is_known() && !self.unique_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_matching_is_prefix_and_case_insensitive() {
        assert_eq!(PlayerModel::from_signature("Garlic"), PlayerModel::Garlic);
        assert_eq!(PlayerModel::from_signature("XMP-2200"), PlayerModel::IadeaXmp2x00);
        assert_eq!(PlayerModel::from_signature("XDS-1078"), PlayerModel::IadeaXmp3x50);
        assert_eq!(PlayerModel::from_signature("ModelX"), PlayerModel::ModelX);
        assert_eq!(PlayerModel::from_signature("toaster"), PlayerModel::Unknown);
        assert_eq!(PlayerModel::from_signature(""), PlayerModel::Unknown);
    }

    #[test]
    fn storage_names_round_trip() {
        for model in [PlayerModel::Qbic, PlayerModel::ModelX, PlayerModel::IadeaXmp1x0] {
            assert_eq!(PlayerModel::from_storage(model.as_str()), model);
        }
        assert_eq!(PlayerModel::from_storage("betamax"), PlayerModel::Unknown);
    }

    #[test]
    fn serde_name_matches_storage_name() {
        let json = serde_json::to_string(&PlayerModel::IadeaXmp3x50).unwrap_or_default();
        assert_eq!(json, format!("\"{}\"", PlayerModel::IadeaXmp3x50.as_str()));
    }
}
