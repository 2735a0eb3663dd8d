// crates/canopy-staking/src/lib.rs
//
// canopy-staking: credit staking, linear reward accrual, and treasury
// management for the Canopy Protocol.
//
// Holders of tokenized environmental credits lock them for a bounded period
// in exchange for rewards funded by a shared treasury pool. An early-exit
// path forfeits a fraction of accrued rewards back to the pool.
//
// All amounts are plain integer units; time is the host chain's block
// height, supplied by the caller on every operation and never written here.

pub mod ledger;
pub mod rewards;
pub mod treasury;

// Re-export key types for ergonomic access from downstream crates.
pub use ledger::{
    EarlyUnstakeOutcome, StakingLedger, StakingStats, UnstakeOutcome, MAX_STAKES_PER_ACCOUNT,
};
pub use rewards::{
    accrued_rewards, early_exit_penalty, RewardPolicy, BPS_DENOMINATOR, DEFAULT_REWARD_RATE,
    EARLY_UNSTAKE_PENALTY_BPS,
};
pub use treasury::Treasury;
