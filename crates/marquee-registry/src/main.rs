//! Marquee Fleet Registry
//!
//! Resolves player check-ins against the fleet registry and inspects it.

use std::net::IpAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};

use marquee_core::config::{self, Config};
use marquee_core::tracing_init::{default_filter, init_tracing};
use marquee_core::Edition;

use marquee_registry::storage::RegistryDatabase;
use marquee_registry::{CheckinOrigin, IdentityResolver, PlayerEntity, ResolveError, ResolverSettings};

#[derive(Parser, Debug)]
#[command(name = "marquee-registry")]
#[command(version, about = "Marquee fleet registry - player identity resolution")]
struct Args {
    /// Path to SQLite database file.
    #[arg(long, global = true, env = "MARQUEE_DATABASE_PATH")]
    db_path: Option<PathBuf>,

    /// Platform edition (core, enterprise, edge). Overrides configuration.
    #[arg(long, global = true)]
    edition: Option<Edition>,

    /// Output logs as JSON (for structured log aggregation).
    #[arg(long, global = true)]
    log_json: bool,

    /// OTLP endpoint for traces and metrics (e.g. http://localhost:4317).
    /// Requires the `metrics` feature.
    #[arg(long, global = true, env = "MARQUEE_OTLP_ENDPOINT")]
    otlp_endpoint: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a remote player check-in.
    Checkin {
        /// Raw player descriptor (user-agent string).
        #[arg(long)]
        agent: String,

        /// Owner recorded for newly registered players.
        #[arg(long, default_value_t = 1)]
        owner: i64,

        /// Peer address of the check-in; loopback peers resolve as the local player.
        #[arg(long)]
        peer: Option<IpAddr>,
    },

    /// Resolve a check-in from the platform's own player.
    Local {
        #[arg(long)]
        agent: String,
    },

    /// List registered players for an owner.
    List {
        #[arg(long, default_value_t = 1)]
        owner: i64,

        #[arg(long, default_value_t = 100)]
        limit: u32,

        #[arg(long, default_value_t = 0)]
        offset: u32,
    },

    /// Approve a pending player.
    Provision {
        /// Player id.
        id: i64,

        /// Licence to attach. Defaults to the configured default licence.
        #[arg(long)]
        licence: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let project_dir = std::env::current_dir().ok();
    let mut config = config::load_config(project_dir.as_deref())?;
    if let Some(edition) = args.edition {
        config.provisioning.edition = edition;
    }

    init_tracing(
        &default_filter(env!("CARGO_PKG_NAME"), &config.registry.log_level),
        args.log_json,
    )?;

    #[cfg(feature = "metrics")]
    let metrics_guard = init_metrics(args.otlp_endpoint.as_deref())?;
    #[cfg(not(feature = "metrics"))]
    init_metrics(args.otlp_endpoint.as_deref())?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        edition = %config.provisioning.edition,
        "Starting marquee-registry"
    );

    let db_path = match args.db_path.clone().or_else(|| config.registry.database_path.clone()) {
        Some(path) => path,
        None => default_db_path()?,
    };
    info!(path = %db_path.display(), "Opening registry database");
    let db = RegistryDatabase::open(&db_path).await?;

    let code = run(args.command, db, &config).await?;

    #[cfg(feature = "metrics")]
    if let Some(guard) = metrics_guard {
        guard.shutdown()?;
    }

    Ok(code)
}

async fn run(command: Command, db: RegistryDatabase, config: &Config) -> anyhow::Result<ExitCode> {
    let resolver = IdentityResolver::new(db.clone(), ResolverSettings::from_config(config));

    let outcome = match command {
        Command::Checkin { agent, owner, peer } => {
            let origin = peer.map_or(CheckinOrigin::Remote { owner_id: owner }, |ip| {
                CheckinOrigin::from_peer(ip, owner)
            });
            resolver.checkin(&agent, origin).await
        }
        Command::Local { agent } => resolver.resolve_local_checkin(&agent).await,
        Command::List {
            owner,
            limit,
            offset,
        } => {
            let players: Vec<PlayerEntity> = db
                .list_players(owner, limit, offset)
                .await?
                .iter()
                .map(PlayerEntity::from_row)
                .collect();
            print_json(&players)?;
            return Ok(ExitCode::SUCCESS);
        }
        Command::Provision { id, licence } => {
            let licence = licence.unwrap_or(config.provisioning.default_licence_id);
            if !db.provision_player(id, licence).await? {
                error!(player_id = id, "Player not found or already provisioned");
                return Ok(ExitCode::FAILURE);
            }
            info!(player_id = id, licence_id = licence, "Player provisioned");
            return Ok(ExitCode::SUCCESS);
        }
    };

    match outcome {
        Ok(entity) => {
            print_json(&entity)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(error = %e, "Check-in failed");
            Ok(exit_code(&e))
        }
    }
}

#[cfg(feature = "metrics")]
fn init_metrics(
    endpoint: Option<&str>,
) -> anyhow::Result<Option<marquee_core::metrics::MetricsGuard>> {
    Ok(match endpoint {
        Some(endpoint) => Some(marquee_core::metrics::init_metrics(endpoint)?),
        None => None,
    })
}

#[cfg(not(feature = "metrics"))]
fn init_metrics(endpoint: Option<&str>) -> anyhow::Result<()> {
    if endpoint.is_some() {
        tracing::warn!("--otlp-endpoint ignored: built without the metrics feature");
    }
    Ok(())
}

/// Map a resolution failure onto a process exit status.
///
/// 2: rejected descriptor, 3: registry integrity violation, 75 (`EX_TEMPFAIL`):
/// retry later.
fn exit_code(err: &ResolveError) -> ExitCode {
    if err.is_client_error() {
        ExitCode::from(2)
    } else if err.is_integrity_violation() {
        ExitCode::from(3)
    } else if err.is_retryable() {
        ExitCode::from(75)
    } else {
        ExitCode::FAILURE
    }
}

#[allow(clippy::print_stdout)]
fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn default_db_path() -> anyhow::Result<PathBuf> {
    if let Some(path) = config::database_path() {
        return Ok(path);
    }
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home.join(".marquee").join("registry.db"))
}
