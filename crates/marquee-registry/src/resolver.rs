//! Player identity resolution.
//!
//! Maps a check-in to exactly one persisted player record, registering the
//! player on first contact. There is no in-process locking: the store's
//! uniqueness constraints decide concurrent first contacts, and the loser
//! of an insert race re-reads the winner's row once.

use std::net::IpAddr;

use marquee_core::config::{Config, LocalPlayerConfig};
use marquee_core::db::unix_timestamp;
use marquee_core::descriptor::{self, DeviceDescriptor};
use marquee_core::Edition;
use tracing::{debug, error, info, instrument, warn};

use crate::entity::{PlayerEntity, assemble};
use crate::error::ResolveError;
use crate::policy::defaults_for;
use crate::storage::{DatabaseError, InsertOutcome, NewPlayer, PlayerRow, PlayerStatus, PlayerStore};

/// Id of the platform's own loopback player.
pub const LOCAL_PLAYER_ID: i64 = 1;
/// Owner recorded for the local player.
pub const LOCAL_OWNER_ID: i64 = 1;

/// Rejected descriptors are echoed back truncated to this many characters.
const REJECTED_ECHO_LEN: usize = 256;

/// Resolution parameters taken from the platform configuration.
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    pub edition: Edition,
    pub default_licence_id: i64,
    pub refresh_secs: i64,
    pub local: LocalPlayerConfig,
}

impl ResolverSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            edition: config.provisioning.edition,
            default_licence_id: config.provisioning.default_licence_id,
            refresh_secs: config.provisioning.refresh_secs,
            local: config.local_player.clone(),
        }
    }
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Where a check-in came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckinOrigin {
    /// The platform's own player on the loopback interface.
    Local,
    Remote { owner_id: i64 },
}

impl CheckinOrigin {
    /// Classify a check-in by the peer address it arrived from.
    pub fn from_peer(peer: IpAddr, owner_id: i64) -> Self {
        let loopback = match peer {
            IpAddr::V4(v4) => v4.is_loopback(),
            IpAddr::V6(v6) => v6
                .to_ipv4_mapped()
                .map_or_else(|| v6.is_loopback(), |v4| v4.is_loopback()),
        };
        if loopback {
            Self::Local
        } else {
            Self::Remote { owner_id }
        }
    }
}

/// Resolves check-ins against a [`PlayerStore`].
///
/// Cheap to clone when the store is; clones share the same store.
#[derive(Debug, Clone)]
pub struct IdentityResolver<S> {
    store: S,
    settings: ResolverSettings,
}

impl<S: PlayerStore> IdentityResolver<S> {
    pub const fn new(store: S, settings: ResolverSettings) -> Self {
        Self { store, settings }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Parse a raw remote check-in and resolve it under the configured edition.
    #[instrument(skip(self, raw))]
    pub async fn resolve(&self, raw: &str, owner_id: i64) -> Result<PlayerEntity, ResolveError> {
        let descriptor = parse_or_reject(raw)?;
        let row = self
            .register_or_fetch(&descriptor, owner_id, self.settings.edition)
            .await?;
        Ok(assemble(&row, &descriptor))
    }

    /// Parse a raw check-in from the local player and resolve it to id 1.
    #[instrument(skip(self, raw))]
    pub async fn resolve_local_checkin(&self, raw: &str) -> Result<PlayerEntity, ResolveError> {
        let descriptor = parse_or_reject(raw)?;
        let row = self.resolve_local(&descriptor).await?;
        Ok(assemble(&row, &descriptor))
    }

    pub async fn checkin(
        &self,
        raw: &str,
        origin: CheckinOrigin,
    ) -> Result<PlayerEntity, ResolveError> {
        match origin {
            CheckinOrigin::Local => self.resolve_local_checkin(raw).await,
            CheckinOrigin::Remote { owner_id } => self.resolve(raw, owner_id).await,
        }
    }

    /// Return the local player's record, creating it on first use.
    ///
    /// The stored uuid must match the reporting device; a mismatch is
    /// returned as [`ResolveError::LocalIdentityMismatch`] and leaves the row
    /// untouched.
    #[instrument(skip(self, descriptor), fields(uuid = %descriptor.unique_id))]
    pub async fn resolve_local(
        &self,
        descriptor: &DeviceDescriptor,
    ) -> Result<PlayerRow, ResolveError> {
        ensure_resolvable(descriptor)?;
        let now = unix_timestamp();

        let row = match self.store.find_by_id(LOCAL_PLAYER_ID).await? {
            Some(row) => row,
            None => self.bootstrap_local(descriptor, now).await?,
        };

        if row.uuid != descriptor.unique_id {
            error!(
                stored = %row.uuid,
                reported = %descriptor.unique_id,
                "Local player identity mismatch"
            );
            record("local_mismatch");
            return Err(ResolveError::LocalIdentityMismatch {
                stored: row.uuid,
                reported: descriptor.unique_id.clone(),
            });
        }

        record("local");
        self.touch(row, now).await
    }

    /// Fetch the player with the descriptor's uuid, registering it under
    /// `owner_id` if it has never been seen.
    ///
    /// Existing records are returned as stored; the reported name, firmware
    /// and model are not written back.
    #[instrument(skip(self, descriptor), fields(uuid = %descriptor.unique_id))]
    pub async fn register_or_fetch(
        &self,
        descriptor: &DeviceDescriptor,
        owner_id: i64,
        edition: Edition,
    ) -> Result<PlayerRow, ResolveError> {
        ensure_resolvable(descriptor)?;
        let now = unix_timestamp();

        if let Some(row) = self.store.find_by_uuid(&descriptor.unique_id).await? {
            if row.owner_id != owner_id {
                debug!(
                    player_id = row.id,
                    stored_owner = row.owner_id,
                    "Check-in owner differs from registered owner"
                );
            }
            record("fetched");
            return self.touch(row, now).await;
        }

        let defaults = defaults_for(edition, self.settings.default_licence_id);
        let player = NewPlayer {
            id: None,
            uuid: descriptor.unique_id.clone(),
            owner_id,
            player_name: descriptor.display_name.clone(),
            firmware: descriptor.firmware_version.clone(),
            model: descriptor.model,
            status: defaults.status,
            licence_id: defaults.licence_id,
            playlist_id: 0,
            refresh_secs: self.settings.refresh_secs,
            api_endpoint: String::new(),
            is_intranet: false,
            created_at: now,
        };

        match self.store.insert(&player).await? {
            InsertOutcome::Created(id) => {
                info!(
                    player_id = id,
                    model = %descriptor.model,
                    status = %defaults.status,
                    "Player registered"
                );
                record("registered");
                Ok(player.into_row(id))
            }
            InsertOutcome::Conflict => {
                debug!("Concurrent registration won elsewhere, re-reading");
                record("race_lost");
                let row = self
                    .store
                    .find_by_uuid(&descriptor.unique_id)
                    .await?
                    .ok_or_else(|| {
                        DatabaseError::NotFound(format!("player {}", descriptor.unique_id))
                    })?;
                self.touch(row, now).await
            }
        }
    }

    async fn bootstrap_local(
        &self,
        descriptor: &DeviceDescriptor,
        now: i64,
    ) -> Result<PlayerRow, ResolveError> {
        let local = NewPlayer {
            id: Some(LOCAL_PLAYER_ID),
            uuid: descriptor.unique_id.clone(),
            owner_id: LOCAL_OWNER_ID,
            player_name: descriptor.display_name.clone(),
            firmware: descriptor.firmware_version.clone(),
            model: descriptor.model,
            status: PlayerStatus::Provisioned,
            licence_id: Some(self.settings.local.licence_id),
            playlist_id: 0,
            refresh_secs: self.settings.refresh_secs,
            api_endpoint: self.settings.local.api_endpoint.clone(),
            is_intranet: self.settings.local.is_intranet,
            created_at: now,
        };

        match self.store.insert(&local).await? {
            InsertOutcome::Created(id) => {
                info!(player_id = id, model = %descriptor.model, "Local player created");
                Ok(local.into_row(id))
            }
            InsertOutcome::Conflict => {
                if let Some(row) = self.store.find_by_id(LOCAL_PLAYER_ID).await? {
                    debug!("Local player created concurrently");
                    return Ok(row);
                }
                error!("Local player uuid already belongs to a remote player");
                Err(ResolveError::LocalSlotTaken {
                    uuid: descriptor.unique_id.clone(),
                })
            }
        }
    }

    async fn touch(&self, mut row: PlayerRow, now: i64) -> Result<PlayerRow, ResolveError> {
        self.store.touch_last_seen(row.id, now).await?;
        row.last_access = row.last_access.max(now);
        Ok(row)
    }
}

fn parse_or_reject(raw: &str) -> Result<DeviceDescriptor, ResolveError> {
    descriptor::parse(raw).ok_or_else(|| {
        let seen = descriptor::parse_lenient(raw);
        warn!(
            model = %seen.model,
            uuid = %seen.unique_id,
            len = raw.len(),
            "Rejected unrecognized player descriptor"
        );
        record("rejected");
        ResolveError::Rejected {
            descriptor: raw.chars().take(REJECTED_ECHO_LEN).collect(),
        }
    })
}

fn ensure_resolvable(descriptor: &DeviceDescriptor) -> Result<(), ResolveError> {
    if descriptor.is_resolvable() {
        return Ok(());
    }
    record("rejected");
    Err(ResolveError::Rejected {
        descriptor: format!("{}/{}", descriptor.model, descriptor.unique_id),
    })
}

#[cfg(feature = "metrics")]
fn record(outcome: &'static str) {
    marquee_core::metrics::record_checkin(outcome);
}

#[cfg(not(feature = "metrics"))]
const fn record(_outcome: &'static str) {}
