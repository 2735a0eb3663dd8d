// crates/canopy-core/src/stake.rs
//
// The canonical Stake record: a time-locked commitment of a quantity of an
// environmental credit, accruing rewards until exited.
//
// Lock periods are bounded in blocks (~10 minutes per block):
//   - Minimum: 144 blocks (~1 day)
//   - Maximum: 52,560 blocks (~1 year)

use serde::{Deserialize, Serialize};

use crate::types::{AccountId, BlockHeight, CreditId, StakeId};

/// Minimum lock period: 144 blocks (~1 day at 10 min/block).
pub const MIN_LOCK_BLOCKS: u64 = 144;

/// Maximum lock period: 52,560 blocks (~1 year at 10 min/block).
pub const MAX_LOCK_BLOCKS: u64 = 52_560;

/// Lifecycle states of a Stake.
///
///   Active --(unstake, lock expired)--> Unstaked
///   Active --(early unstake, any time)--> Unstaked
///
/// `Unstaked` is terminal. Claiming rewards is a self-loop on `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StakeStatus {
    /// Accruing rewards, credit locked.
    Active,
    /// Exited. The record is retained for audit but never mutated again.
    Unstaked,
}

/// A single stake record.
///
/// Records are never deleted: an unstaked record stays in the ledger with
/// its terminal status and cumulative reward history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stake {
    /// Ledger-assigned id, monotonically allocated, never reused.
    pub id: StakeId,
    /// The account that created the stake and may claim or exit it.
    pub staker: AccountId,
    /// The credit being locked. Opaque to the ledger (no registry lookup).
    pub credit_id: CreditId,
    /// Quantity of credit units locked. Positive, immutable after creation.
    pub quantity: u64,
    /// Height at which the stake was created.
    pub start_height: BlockHeight,
    /// Height at which the ordinary unstake path unlocks
    /// (start_height + lock period, immutable).
    pub lock_until_height: BlockHeight,
    /// Current lifecycle state.
    pub status: StakeStatus,
    /// Cumulative rewards paid out for this stake. Monotonically
    /// non-decreasing.
    pub rewards_claimed: u64,
    /// Height of the most recent claim or exit; accrual restarts here.
    pub last_claim_height: BlockHeight,
}

impl Stake {
    /// Whether this stake is still accruing.
    pub fn is_active(&self) -> bool {
        self.status == StakeStatus::Active
    }

    /// Whether the lock period has elapsed at the given height.
    pub fn lock_expired(&self, height: BlockHeight) -> bool {
        height >= self.lock_until_height
    }
}
