//! Platform edition flag.
//!
//! The edition is the only piece of licensing state the registry consumes:
//! it decides whether freshly registered players need operator approval.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Deployment mode of the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edition {
    /// Multi-tenant community edition.
    #[default]
    Core,
    /// Multi-tenant hosted edition.
    Enterprise,
    /// Self-managed edge appliance. Players are trusted on first contact.
    Edge,
}

impl Edition {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Enterprise => "enterprise",
            Self::Edge => "edge",
        }
    }

    /// Whether this deployment manages its own fleet without an approval step.
    pub const fn is_self_managed(self) -> bool {
        matches!(self, Self::Edge)
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Edition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "core" => Ok(Self::Core),
            "enterprise" => Ok(Self::Enterprise),
            "edge" => Ok(Self::Edge),
            other => Err(Error::UnknownEdition(other.to_string())),
        }
    }
}
