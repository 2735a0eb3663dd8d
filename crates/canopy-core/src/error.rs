// crates/canopy-core/src/error.rs

use thiserror::Error;

/// Staking-module error namespace for the Canopy Protocol.
///
/// Each variant carries a stable numeric code (500-511) so RPC layers and
/// indexers can match on codes without parsing display strings. Codes are
/// append-only; existing assignments never change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StakingError {
    /// Caller is not permitted to perform this operation (code 500).
    #[error("caller is not authorized for this operation")]
    NotAuthorized,

    /// No stake record exists with the given id (code 501).
    #[error("stake {0} not found")]
    StakeNotFound(u64),

    /// A credit id must be a positive integer (code 502).
    #[error("invalid credit id: must be positive")]
    InvalidCreditId,

    /// A quantity or amount must be a positive integer (code 503).
    #[error("invalid quantity: must be positive")]
    InvalidQuantity,

    /// The credit is already locked by an active stake (code 504).
    #[error("credit {0} is already staked")]
    AlreadyStaked(u64),

    /// The stake's lock period has not yet elapsed (code 505).
    #[error("lock not expired: current height {current}, locked until {lock_until}")]
    LockNotExpired { current: u64, lock_until: u64 },

    /// No rewards have accrued since the last claim (code 506).
    #[error("no rewards to claim for stake {0}")]
    NoRewards(u64),

    /// The treasury cannot cover the requested payout (code 507).
    #[error("insufficient treasury: requested {requested} but only {available} available")]
    InsufficientTreasury { requested: u64, available: u64 },

    /// New stakes and claims are paused by the administrator (code 508).
    #[error("staking is paused")]
    StakingPaused,

    /// The reward rate must be a positive integer (code 509).
    #[error("invalid reward rate: must be positive")]
    InvalidRate,

    /// The lock period is outside the permitted range (code 510).
    #[error("invalid lock period: {0} blocks is outside the permitted range")]
    InvalidLockPeriod(u64),

    /// The stake has already been unstaked (code 511).
    #[error("stake {0} is already unstaked")]
    AlreadyUnstaked(u64),
}

impl StakingError {
    /// The stable numeric code for this error.
    pub fn code(&self) -> u16 {
        match self {
            StakingError::NotAuthorized => 500,
            StakingError::StakeNotFound(_) => 501,
            StakingError::InvalidCreditId => 502,
            StakingError::InvalidQuantity => 503,
            StakingError::AlreadyStaked(_) => 504,
            StakingError::LockNotExpired { .. } => 505,
            StakingError::NoRewards(_) => 506,
            StakingError::InsufficientTreasury { .. } => 507,
            StakingError::StakingPaused => 508,
            StakingError::InvalidRate => 509,
            StakingError::InvalidLockPeriod(_) => 510,
            StakingError::AlreadyUnstaked(_) => 511,
        }
    }
}
