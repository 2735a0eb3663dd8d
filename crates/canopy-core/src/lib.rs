// crates/canopy-core/src/lib.rs
//
// canopy-core: Core types and error definitions for the Canopy Protocol
// credit ledger.
//
// This is the leaf crate the staking subsystem depends on. It defines the
// canonical Stake record and its state machine, the shared type aliases
// (accounts, heights, identifiers), and the staking error namespace.

pub mod error;
pub mod stake;
pub mod types;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use canopy_core::Stake;`

pub use error::StakingError;
pub use stake::{Stake, StakeStatus, MAX_LOCK_BLOCKS, MIN_LOCK_BLOCKS};
pub use types::{AccountId, BlockHeight, CreditId, StakeId};
