//! Error types surfaced by engine operations.

use crate::dungeon::tiers::Tier;
use crate::service::store::StoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("user {0} not found")]
    UserNotFound(String),

    #[error("no combat session for user {0}")]
    SessionNotFound(String),

    #[error("chest {0} not found")]
    ChestNotFound(String),

    #[error("item {0} not found")]
    ItemNotFound(String),

    #[error("captured boss {0} not found")]
    BossNotFound(String),

    #[error("cannot {action} while {phase}")]
    InvalidTransition { action: &'static str, phase: String },

    #[error("chest not ready, {remaining_ms} ms remaining")]
    NotReady { remaining_ms: i64 },

    #[error("chest is already opening")]
    AlreadyInProgress,

    #[error("chest has not started opening")]
    ChestNotStarted,

    #[error("tier {tier} requires {required} perception, have {actual}")]
    TierLocked {
        tier: Tier,
        required: u32,
        actual: u32,
    },

    #[error("party is full")]
    PartyFull,

    #[error("boss is on a mission or already in the party")]
    BossUnavailable,

    #[error("item cannot be used right now")]
    ItemNotUsable,

    #[error("no unspent attribute points")]
    NoUnspentPoints,

    #[error("a combat session is already active")]
    SessionActive,

    #[error("combat session expired after inactivity")]
    SessionExpired,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    /// True for the not-found family of errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EngineError::UserNotFound(_)
                | EngineError::SessionNotFound(_)
                | EngineError::ChestNotFound(_)
                | EngineError::ItemNotFound(_)
                | EngineError::BossNotFound(_)
        )
    }
}

/// Failures loading an [`EngineConfig`](super::config::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}
