// crates/canopy-staking/src/rewards.rs
//
// Reward policy and accrual computation for the staking module.
//
// Accrual is deliberately linear and stateless:
//
//   pending = (current_height - last_claim_height) * quantity * rate
//
// No compounding and no per-interval rate snapshots, so the computation is
// deterministic and O(1) regardless of elapsed duration. The rate read at
// computation time applies to the entire unclaimed interval, including time
// that elapsed before the most recent rate change. Changing the rate
// therefore retroactively reprices every stake's unclaimed interval; callers
// who want the old rate must claim before the change lands.
//
// Early exits forfeit a fixed fraction of the accrued reward, expressed in
// basis points, back to the treasury pool.

use serde::{Deserialize, Serialize};

use canopy_core::{BlockHeight, Stake, StakingError};

/// Default reward rate: units paid per staked unit per block.
pub const DEFAULT_REWARD_RATE: u64 = 10;

/// Early-exit penalty in basis points: 1,000 bps = 10% of accrued rewards.
pub const EARLY_UNSTAKE_PENALTY_BPS: u64 = 1_000;

/// Basis-point denominator (10,000 bps = 100%).
pub const BPS_DENOMINATOR: u64 = 10_000;

/// The reward policy: a single mutable rate.
///
/// No rate history is retained. See the module header for the retroactivity
/// consequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardPolicy {
    /// Reward units per staked unit per block.
    rate: u64,
}

impl RewardPolicy {
    /// Create a policy with the default rate.
    pub fn new() -> Self {
        Self {
            rate: DEFAULT_REWARD_RATE,
        }
    }

    /// The current rate.
    pub fn rate(&self) -> u64 {
        self.rate
    }

    /// Set a new rate, effective immediately for every future accrual
    /// computation on every stake.
    ///
    /// # Errors
    /// Returns `StakingError::InvalidRate` if `rate` is zero.
    pub fn set_rate(&mut self, rate: u64) -> Result<(), StakingError> {
        if rate == 0 {
            return Err(StakingError::InvalidRate);
        }
        self.rate = rate;
        Ok(())
    }
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the unclaimed reward owed to a stake at `current_height`.
///
/// Returns 0 for inactive stakes and for heights at or before the last
/// claim. Arithmetic saturates rather than wrapping; at realistic rates and
/// quantities the product stays far below u64::MAX.
pub fn accrued_rewards(stake: &Stake, current_height: BlockHeight, rate: u64) -> u64 {
    if !stake.is_active() {
        return 0;
    }
    let elapsed = current_height.saturating_sub(stake.last_claim_height);
    elapsed.saturating_mul(stake.quantity).saturating_mul(rate)
}

/// Compute the early-exit penalty on an accrued reward amount.
///
/// penalty = pending * EARLY_UNSTAKE_PENALTY_BPS / BPS_DENOMINATOR, with
/// integer division (the staker keeps the rounding remainder). Computed in
/// u128 so the bps product cannot overflow.
pub fn early_exit_penalty(pending: u64) -> u64 {
    ((pending as u128 * EARLY_UNSTAKE_PENALTY_BPS as u128) / BPS_DENOMINATOR as u128) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_core::{StakeStatus, MIN_LOCK_BLOCKS};

    fn make_stake(quantity: u64, last_claim: u64) -> Stake {
        Stake {
            id: 1,
            staker: [1u8; 32],
            credit_id: 9,
            quantity,
            start_height: last_claim,
            lock_until_height: last_claim + MIN_LOCK_BLOCKS,
            status: StakeStatus::Active,
            rewards_claimed: 0,
            last_claim_height: last_claim,
        }
    }

    #[test]
    fn test_default_rate() {
        assert_eq!(RewardPolicy::new().rate(), 10);
    }

    #[test]
    fn test_set_rate() {
        let mut policy = RewardPolicy::new();
        assert!(policy.set_rate(25).is_ok());
        assert_eq!(policy.rate(), 25);
    }

    #[test]
    fn test_set_rate_zero_rejected() {
        let mut policy = RewardPolicy::new();
        assert_eq!(policy.set_rate(0), Err(StakingError::InvalidRate));
        // Rate should be unchanged
        assert_eq!(policy.rate(), DEFAULT_REWARD_RATE);
    }

    #[test]
    fn test_linear_accrual() {
        // rate=10, quantity=100, 50 blocks elapsed => 50 * 100 * 10 = 50,000
        let stake = make_stake(100, 1_000);
        assert_eq!(accrued_rewards(&stake, 1_050, 10), 50_000);
    }

    #[test]
    fn test_accrual_zero_at_claim_height() {
        let stake = make_stake(100, 1_000);
        assert_eq!(accrued_rewards(&stake, 1_000, 10), 0);
    }

    #[test]
    fn test_accrual_zero_for_inactive_stake() {
        let mut stake = make_stake(100, 1_000);
        stake.status = StakeStatus::Unstaked;
        assert_eq!(accrued_rewards(&stake, 2_000, 10), 0);
    }

    #[test]
    fn test_accrual_is_non_decreasing_in_height() {
        let stake = make_stake(7, 100);
        let mut prev = 0;
        for height in 100..200 {
            let pending = accrued_rewards(&stake, height, 10);
            assert!(pending >= prev);
            prev = pending;
        }
    }

    #[test]
    fn test_accrual_reads_current_rate_for_whole_interval() {
        // The same elapsed interval yields different totals under different
        // rates: there is no snapshotting of the rate at stake time.
        let stake = make_stake(100, 0);
        assert_eq!(accrued_rewards(&stake, 10, 10), 10_000);
        assert_eq!(accrued_rewards(&stake, 10, 20), 20_000);
    }

    #[test]
    fn test_penalty_is_ten_percent() {
        assert_eq!(early_exit_penalty(50_000), 5_000);
        assert_eq!(early_exit_penalty(10), 1);
    }

    #[test]
    fn test_penalty_integer_division_floors() {
        // 9 * 1000 / 10000 = 0 under integer division
        assert_eq!(early_exit_penalty(9), 0);
        assert_eq!(early_exit_penalty(0), 0);
    }

    #[test]
    fn test_penalty_no_overflow_near_max() {
        let penalty = early_exit_penalty(u64::MAX);
        assert_eq!(penalty, (u64::MAX as u128 / 10) as u64);
    }
}
