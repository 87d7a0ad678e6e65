//! Edition-dependent provisioning rules for newly registered players.

use marquee_core::Edition;

use crate::storage::PlayerStatus;

/// Field overrides applied to a player record at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisioningDefaults {
    pub status: PlayerStatus,
    pub licence_id: Option<i64>,
}

/// Self-managed deployments have nobody to approve players, so they come
/// up provisioned with the default licence. Everywhere else a new player
/// waits for approval with no licence.
pub const fn defaults_for(edition: Edition, default_licence_id: i64) -> ProvisioningDefaults {
    if edition.is_self_managed() {
        ProvisioningDefaults {
            status: PlayerStatus::Provisioned,
            licence_id: Some(default_licence_id),
        }
    } else {
        ProvisioningDefaults {
            status: PlayerStatus::Unprovisioned,
            licence_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_players_are_provisioned_with_default_licence() {
        assert_eq!(
            defaults_for(Edition::Edge, 4),
            ProvisioningDefaults {
                status: PlayerStatus::Provisioned,
                licence_id: Some(4),
            }
        );
    }

    #[test]
    fn managed_editions_wait_for_approval() {
        for edition in [Edition::Core, Edition::Enterprise] {
            let defaults = defaults_for(edition, 4);
            assert_eq!(defaults.status, PlayerStatus::Unprovisioned);
            assert_eq!(defaults.licence_id, None);
        }
    }
}
