// crates/canopy-staking/src/ledger.rs
//
// The staking ledger: the single owned state object for the staking module.
//
// One instance holds every stake record, the credit-lock and per-staker
// indexes, the treasury, the reward policy, the pause switch, and the
// incrementally maintained aggregate counters. Operations take the caller's
// account and the current block height explicitly; the ledger never reads a
// clock of its own.
//
// Atomicity: every operation validates all of its preconditions before its
// first state write, so an `Err` return implies the ledger is unchanged.
// The execution model is strictly serial (`&mut self`, no interior locking);
// ordering between callers is imposed by the host, and treasury-draining
// sequences are intentionally order-dependent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use canopy_core::{
    AccountId, BlockHeight, CreditId, Stake, StakeId, StakeStatus, StakingError, MAX_LOCK_BLOCKS,
    MIN_LOCK_BLOCKS,
};

use crate::rewards::{accrued_rewards, early_exit_penalty, RewardPolicy};
use crate::treasury::Treasury;

/// Maximum number of stake ids tracked per account in the staker index.
///
/// A hard bound, not an error: once an account's index is full, further
/// stakes still succeed but their ids are no longer appended. The stake
/// records themselves remain reachable by id.
pub const MAX_STAKES_PER_ACCOUNT: usize = 100;

/// Result of an ordinary (post-lock) unstake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnstakeOutcome {
    /// Credit units released back to the staker.
    pub quantity: u64,
    /// Reward units actually paid. Zero if the treasury could not cover
    /// the accrued amount (soft forfeiture).
    pub rewards_paid: u64,
}

/// Result of an early (pre-lock-expiry) unstake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarlyUnstakeOutcome {
    /// Credit units released back to the staker.
    pub quantity: u64,
    /// Net reward units actually paid (accrued minus penalty, or zero on
    /// soft forfeiture).
    pub rewards_paid: u64,
    /// Penalty withheld from the accrued reward and left in the pool.
    pub penalty: u64,
}

/// Aggregate snapshot of the staking module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingStats {
    /// Sum of quantity across all Active stakes.
    pub total_staked_credits: u64,
    /// Count of Active stakes.
    pub total_active_stakes: u64,
    /// Cumulative reward units ever paid out.
    pub total_rewards_distributed: u64,
    /// Current reward rate (units per staked unit per block).
    pub reward_rate: u64,
    /// Current treasury balance.
    pub treasury_balance: u64,
    /// Whether new stakes and claims are paused.
    pub paused: bool,
}

/// The staking ledger.
///
/// See the module header for the ownership and atomicity model.
#[derive(Debug, Clone)]
pub struct StakingLedger {
    /// The administrator account (may set the rate and the pause switch).
    admin: AccountId,
    /// All stake records ever created, keyed by id. Never removed.
    stakes: BTreeMap<StakeId, Stake>,
    /// credit id -> the single stake currently locking it. An entry exists
    /// exactly while that stake is Active.
    credit_locks: BTreeMap<CreditId, StakeId>,
    /// account -> ids of stakes it has created, append-only, capped at
    /// `MAX_STAKES_PER_ACCOUNT`.
    staker_index: BTreeMap<AccountId, Vec<StakeId>>,
    /// The shared reward pool.
    treasury: Treasury,
    /// The reward policy (single mutable rate).
    policy: RewardPolicy,
    /// Gates `stake` and `claim_rewards`; never gates exits.
    paused: bool,
    /// Last assigned stake id; ids start at 1 and are never reused.
    stake_nonce: StakeId,
    /// Sum of quantity across Active stakes, maintained incrementally.
    total_staked_credits: u64,
    /// Count of Active stakes, maintained incrementally.
    total_active_stakes: u64,
    /// Cumulative reward units ever paid out.
    total_rewards_distributed: u64,
}

impl StakingLedger {
    /// Create an empty ledger with the given administrator, the default
    /// reward rate, and a zero-balance treasury.
    pub fn new(admin: AccountId) -> Self {
        Self {
            admin,
            stakes: BTreeMap::new(),
            credit_locks: BTreeMap::new(),
            staker_index: BTreeMap::new(),
            treasury: Treasury::new(),
            policy: RewardPolicy::new(),
            paused: false,
            stake_nonce: 0,
            total_staked_credits: 0,
            total_active_stakes: 0,
            total_rewards_distributed: 0,
        }
    }

    // ---- mutating operations ----

    /// Lock `quantity` units of `credit_id` for `lock_blocks` blocks.
    ///
    /// Returns the id of the new stake record.
    ///
    /// # Errors
    /// - `StakingPaused` while the pause switch is on.
    /// - `InvalidCreditId` / `InvalidQuantity` for zero inputs.
    /// - `InvalidLockPeriod` outside [`MIN_LOCK_BLOCKS`, `MAX_LOCK_BLOCKS`].
    /// - `AlreadyStaked` if the credit is locked by an active stake.
    pub fn stake(
        &mut self,
        caller: AccountId,
        height: BlockHeight,
        credit_id: CreditId,
        quantity: u64,
        lock_blocks: u64,
    ) -> Result<StakeId, StakingError> {
        if self.paused {
            return Err(StakingError::StakingPaused);
        }
        if credit_id == 0 {
            return Err(StakingError::InvalidCreditId);
        }
        if quantity == 0 {
            return Err(StakingError::InvalidQuantity);
        }
        if !(MIN_LOCK_BLOCKS..=MAX_LOCK_BLOCKS).contains(&lock_blocks) {
            return Err(StakingError::InvalidLockPeriod(lock_blocks));
        }
        if self.credit_locks.contains_key(&credit_id) {
            return Err(StakingError::AlreadyStaked(credit_id));
        }

        // All preconditions passed; apply.
        self.stake_nonce += 1;
        let id = self.stake_nonce;
        let stake = Stake {
            id,
            staker: caller,
            credit_id,
            quantity,
            start_height: height,
            lock_until_height: height.saturating_add(lock_blocks),
            status: StakeStatus::Active,
            rewards_claimed: 0,
            last_claim_height: height,
        };
        self.stakes.insert(id, stake);
        self.credit_locks.insert(credit_id, id);

        let ids = self.staker_index.entry(caller).or_default();
        if ids.len() < MAX_STAKES_PER_ACCOUNT {
            ids.push(id);
        } else {
            // Hard bound: the stake exists but is no longer listed in the
            // per-account index.
            warn!(stake_id = id, "staker index full, id not appended");
        }

        self.total_staked_credits = self.total_staked_credits.saturating_add(quantity);
        self.total_active_stakes = self.total_active_stakes.saturating_add(1);
        info!(stake_id = id, credit_id, quantity, lock_blocks, "stake created");
        Ok(id)
    }

    /// Pay out the rewards accrued by a stake since its last claim.
    ///
    /// Returns the amount paid.
    ///
    /// # Errors
    /// - `StakingPaused` while the pause switch is on.
    /// - `StakeNotFound` / `NotAuthorized` / `AlreadyUnstaked` per the
    ///   usual ownership and lifecycle checks.
    /// - `NoRewards` if nothing has accrued since the last claim.
    /// - `InsufficientTreasury` if the pool cannot cover the full amount.
    ///   Unlike the exit paths, a claim never partially pays.
    pub fn claim_rewards(
        &mut self,
        caller: AccountId,
        height: BlockHeight,
        stake_id: StakeId,
    ) -> Result<u64, StakingError> {
        if self.paused {
            return Err(StakingError::StakingPaused);
        }
        let stake = self.active_stake_of(caller, stake_id)?;
        let pending = accrued_rewards(stake, height, self.policy.rate());
        if pending == 0 {
            return Err(StakingError::NoRewards(stake_id));
        }
        if !self.treasury.can_cover(pending) {
            return Err(StakingError::InsufficientTreasury {
                requested: pending,
                available: self.treasury.balance(),
            });
        }

        // All preconditions passed; apply.
        self.treasury.withdraw(pending)?;
        if let Some(stake) = self.stakes.get_mut(&stake_id) {
            stake.rewards_claimed = stake.rewards_claimed.saturating_add(pending);
            stake.last_claim_height = height;
        }
        self.total_rewards_distributed = self.total_rewards_distributed.saturating_add(pending);
        info!(stake_id, amount = pending, "rewards claimed");
        Ok(pending)
    }

    /// Exit a stake whose lock period has elapsed.
    ///
    /// The exit always succeeds once the lifecycle checks pass: if the
    /// treasury cannot cover the accrued reward, the payout is reduced to
    /// zero (soft forfeiture) rather than failing the call, so holders are
    /// never trapped by pool insolvency. Forfeited rewards are not recorded
    /// as owed.
    ///
    /// # Errors
    /// - `StakeNotFound` / `NotAuthorized` / `AlreadyUnstaked`.
    /// - `LockNotExpired` before `lock_until_height`.
    pub fn unstake(
        &mut self,
        caller: AccountId,
        height: BlockHeight,
        stake_id: StakeId,
    ) -> Result<UnstakeOutcome, StakingError> {
        let stake = self.active_stake_of(caller, stake_id)?;
        if !stake.lock_expired(height) {
            return Err(StakingError::LockNotExpired {
                current: height,
                lock_until: stake.lock_until_height,
            });
        }
        let pending = accrued_rewards(stake, height, self.policy.rate());

        // All preconditions passed; apply.
        let paid = self.pay_out_best_effort(pending)?;
        let quantity = self.finalize_exit(stake_id, height, paid);
        info!(stake_id, quantity, rewards_paid = paid, "stake exited");
        Ok(UnstakeOutcome {
            quantity,
            rewards_paid: paid,
        })
    }

    /// Exit a stake before its lock period elapses, forfeiting a penalty.
    ///
    /// Callable at any time, including immediately after creation and while
    /// the system is paused. The penalty share of the accrued reward stays
    /// in the treasury pool; the remainder is paid best-effort with the same
    /// soft-forfeiture rule as `unstake`.
    ///
    /// # Errors
    /// - `StakeNotFound` / `NotAuthorized` / `AlreadyUnstaked`.
    pub fn early_unstake(
        &mut self,
        caller: AccountId,
        height: BlockHeight,
        stake_id: StakeId,
    ) -> Result<EarlyUnstakeOutcome, StakingError> {
        let stake = self.active_stake_of(caller, stake_id)?;
        let pending = accrued_rewards(stake, height, self.policy.rate());
        let penalty = early_exit_penalty(pending);
        let net = pending - penalty;

        // All preconditions passed; apply.
        let paid = self.pay_out_best_effort(net)?;
        let quantity = self.finalize_exit(stake_id, height, paid);
        info!(
            stake_id,
            quantity,
            rewards_paid = paid,
            penalty,
            "stake exited early"
        );
        Ok(EarlyUnstakeOutcome {
            quantity,
            rewards_paid: paid,
            penalty,
        })
    }

    /// Deposit `amount` reward units into the treasury pool.
    ///
    /// Deliberately permissionless: any account may replenish the pool.
    /// Returns the new balance.
    ///
    /// # Errors
    /// Returns `InvalidQuantity` if `amount` is zero.
    pub fn fund_treasury(
        &mut self,
        _caller: AccountId,
        amount: u64,
    ) -> Result<u64, StakingError> {
        if amount == 0 {
            return Err(StakingError::InvalidQuantity);
        }
        self.treasury.deposit(amount);
        debug!(amount, balance = self.treasury.balance(), "treasury funded");
        Ok(self.treasury.balance())
    }

    /// Set the reward rate. Administrator only.
    ///
    /// The new rate takes effect immediately and uniformly for every future
    /// accrual computation on every stake — including the currently
    /// unclaimed interval of stakes that accrued under the old rate.
    ///
    /// # Errors
    /// - `NotAuthorized` if the caller is not the administrator.
    /// - `InvalidRate` if `new_rate` is zero.
    pub fn set_reward_rate(
        &mut self,
        caller: AccountId,
        new_rate: u64,
    ) -> Result<(), StakingError> {
        if caller != self.admin {
            return Err(StakingError::NotAuthorized);
        }
        self.policy.set_rate(new_rate)?;
        info!(new_rate, "reward rate updated");
        Ok(())
    }

    /// Set the pause switch. Administrator only.
    ///
    /// Pausing gates `stake` and `claim_rewards`; it never gates `unstake`
    /// or `early_unstake`, so holders can always exit.
    ///
    /// # Errors
    /// Returns `NotAuthorized` if the caller is not the administrator.
    pub fn set_paused(&mut self, caller: AccountId, paused: bool) -> Result<(), StakingError> {
        if caller != self.admin {
            return Err(StakingError::NotAuthorized);
        }
        self.paused = paused;
        info!(paused, "pause switch updated");
        Ok(())
    }

    // ---- read-only queries ----
    //
    // All queries are pure and return defaults (None/zero/false/empty) for
    // unknown keys rather than erroring.

    /// Look up a stake record by id.
    pub fn get_stake(&self, stake_id: StakeId) -> Option<&Stake> {
        self.stakes.get(&stake_id)
    }

    /// Ids of the stakes an account has created (at most
    /// `MAX_STAKES_PER_ACCOUNT`, in creation order).
    pub fn staker_stakes(&self, account: &AccountId) -> &[StakeId] {
        self.staker_index
            .get(account)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether a credit is currently locked by an active stake.
    pub fn is_credit_staked(&self, credit_id: CreditId) -> bool {
        self.credit_locks.contains_key(&credit_id)
    }

    /// Unclaimed reward owed to a stake at `height`. Zero for unknown or
    /// inactive stakes.
    pub fn pending_rewards(&self, stake_id: StakeId, height: BlockHeight) -> u64 {
        match self.stakes.get(&stake_id) {
            Some(stake) => accrued_rewards(stake, height, self.policy.rate()),
            None => 0,
        }
    }

    /// The current reward rate.
    pub fn reward_rate(&self) -> u64 {
        self.policy.rate()
    }

    /// The current treasury balance.
    pub fn treasury_balance(&self) -> u64 {
        self.treasury.balance()
    }

    /// The last assigned stake id (equivalently, the number of stakes ever
    /// created).
    pub fn stake_nonce(&self) -> StakeId {
        self.stake_nonce
    }

    /// Whether the pause switch is on.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether a stake's lock period has elapsed at `height`. False for
    /// unknown stakes.
    pub fn is_lock_expired(&self, stake_id: StakeId, height: BlockHeight) -> bool {
        self.stakes
            .get(&stake_id)
            .map(|s| s.lock_expired(height))
            .unwrap_or(false)
    }

    /// Aggregate snapshot of the module.
    pub fn stats(&self) -> StakingStats {
        StakingStats {
            total_staked_credits: self.total_staked_credits,
            total_active_stakes: self.total_active_stakes,
            total_rewards_distributed: self.total_rewards_distributed,
            reward_rate: self.policy.rate(),
            treasury_balance: self.treasury.balance(),
            paused: self.paused,
        }
    }

    // ---- internals ----

    /// Look up a stake and check ownership and liveness: the shared
    /// precondition prefix of claim and both exit paths.
    fn active_stake_of(
        &self,
        caller: AccountId,
        stake_id: StakeId,
    ) -> Result<&Stake, StakingError> {
        let stake = self
            .stakes
            .get(&stake_id)
            .ok_or(StakingError::StakeNotFound(stake_id))?;
        if stake.staker != caller {
            return Err(StakingError::NotAuthorized);
        }
        if !stake.is_active() {
            return Err(StakingError::AlreadyUnstaked(stake_id));
        }
        Ok(stake)
    }

    /// Pay `amount` from the treasury if it can cover it, else pay nothing.
    /// Returns the amount actually paid. Used by the exit paths only; a
    /// claim fails hard instead.
    fn pay_out_best_effort(&mut self, amount: u64) -> Result<u64, StakingError> {
        if self.treasury.can_cover(amount) {
            self.treasury.withdraw(amount)?;
            Ok(amount)
        } else {
            Ok(0)
        }
    }

    /// Transition a stake to its terminal state and release its lock and
    /// counter contributions. `paid` is the reward amount actually
    /// transferred. Returns the stake's quantity.
    ///
    /// Callers must have validated the stake via `active_stake_of` first.
    fn finalize_exit(&mut self, stake_id: StakeId, height: BlockHeight, paid: u64) -> u64 {
        let mut quantity = 0;
        let mut credit_id = None;
        if let Some(stake) = self.stakes.get_mut(&stake_id) {
            stake.status = StakeStatus::Unstaked;
            stake.rewards_claimed = stake.rewards_claimed.saturating_add(paid);
            stake.last_claim_height = height;
            quantity = stake.quantity;
            credit_id = Some(stake.credit_id);
        }
        if let Some(credit_id) = credit_id {
            self.credit_locks.remove(&credit_id);
        }
        self.total_staked_credits = self.total_staked_credits.saturating_sub(quantity);
        self.total_active_stakes = self.total_active_stakes.saturating_sub(1);
        self.total_rewards_distributed = self.total_rewards_distributed.saturating_add(paid);
        quantity
    }
}
