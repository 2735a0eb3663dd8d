// crates/canopy-staking/src/treasury.rs
//
// The shared reward pool for the staking module.
//
// The treasury receives:
//   - Deposits from any account (funding is deliberately permissionless so
//     any stakeholder can replenish the pool)
//   - Forfeited early-exit penalties, which are simply never withdrawn
//
// The only withdrawals are reward payouts made by the staking ledger.

use canopy_core::StakingError;

/// The staking reward treasury.
///
/// A single non-negative balance of reward currency. Owns no per-stake
/// state; solvency checks against pending payouts are the ledger's job.
#[derive(Debug, Clone, Default)]
pub struct Treasury {
    /// Current balance in reward units.
    balance: u64,
}

impl Treasury {
    /// Create a new treasury with zero balance.
    pub fn new() -> Self {
        Self { balance: 0 }
    }

    /// Create a treasury with an initial balance.
    pub fn with_balance(balance: u64) -> Self {
        Self { balance }
    }

    /// Deposit reward units into the pool.
    pub fn deposit(&mut self, amount: u64) {
        self.balance = self.balance.saturating_add(amount);
    }

    /// Withdraw reward units from the pool.
    ///
    /// # Errors
    /// Returns `StakingError::InsufficientTreasury` if the pool cannot
    /// cover `amount`. The balance is unchanged on error.
    pub fn withdraw(&mut self, amount: u64) -> Result<(), StakingError> {
        if amount > self.balance {
            return Err(StakingError::InsufficientTreasury {
                requested: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    /// Whether the pool can cover a payout of `amount`.
    pub fn can_cover(&self, amount: u64) -> bool {
        self.balance >= amount
    }

    /// Get the current balance.
    pub fn balance(&self) -> u64 {
        self.balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_treasury_has_zero_balance() {
        let treasury = Treasury::new();
        assert_eq!(treasury.balance(), 0);
    }

    #[test]
    fn test_deposit() {
        let mut treasury = Treasury::new();
        treasury.deposit(10_000);
        assert_eq!(treasury.balance(), 10_000);
    }

    #[test]
    fn test_multiple_deposits() {
        let mut treasury = Treasury::new();
        treasury.deposit(5_000);
        treasury.deposit(3_000);
        assert_eq!(treasury.balance(), 8_000);
    }

    #[test]
    fn test_withdraw_success() {
        let mut treasury = Treasury::with_balance(10_000);
        assert!(treasury.withdraw(4_000).is_ok());
        assert_eq!(treasury.balance(), 6_000);
    }

    #[test]
    fn test_withdraw_exact_balance() {
        let mut treasury = Treasury::with_balance(10_000);
        assert!(treasury.withdraw(10_000).is_ok());
        assert_eq!(treasury.balance(), 0);
    }

    #[test]
    fn test_withdraw_insufficient_balance() {
        let mut treasury = Treasury::with_balance(5_000);
        let result = treasury.withdraw(10_000);
        assert_eq!(
            result,
            Err(StakingError::InsufficientTreasury {
                requested: 10_000,
                available: 5_000,
            })
        );
        // Balance should be unchanged
        assert_eq!(treasury.balance(), 5_000);
    }

    #[test]
    fn test_can_cover() {
        let treasury = Treasury::with_balance(100);
        assert!(treasury.can_cover(0));
        assert!(treasury.can_cover(100));
        assert!(!treasury.can_cover(101));
    }

    #[test]
    fn test_deposit_saturates_instead_of_overflowing() {
        let mut treasury = Treasury::with_balance(u64::MAX - 1);
        treasury.deposit(100);
        assert_eq!(treasury.balance(), u64::MAX);
    }
}
