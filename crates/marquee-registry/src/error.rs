//! Errors surfaced by player identity resolution.

use crate::storage::DatabaseError;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The descriptor matched no known player signature or carried no id.
    #[error("Unrecognized player descriptor: {descriptor:?}")]
    Rejected { descriptor: String },

    /// The local player row belongs to a different device.
    #[error("Local player identity mismatch: stored uuid {stored}, reported {reported}")]
    LocalIdentityMismatch { stored: String, reported: String },

    /// The local player's uuid is already registered under another id.
    #[error("Local player uuid {uuid} is registered as a remote player")]
    LocalSlotTaken { uuid: String },

    #[error(transparent)]
    Store(#[from] DatabaseError),
}

impl ResolveError {
    /// The caller sent something we will never accept.
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// The registry's own data is inconsistent. Needs an operator.
    pub const fn is_integrity_violation(&self) -> bool {
        matches!(
            self,
            Self::LocalIdentityMismatch { .. } | Self::LocalSlotTaken { .. }
        )
    }

    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Store(e) => e.is_retryable(),
            _ => false,
        }
    }
}
