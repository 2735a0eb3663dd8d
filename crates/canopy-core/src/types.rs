// crates/canopy-core/src/types.rs
//
// Shared type aliases for the Canopy Protocol ledger.
//
// Time is the host chain's block height — a monotonically increasing u64
// supplied by the environment on every call. The ledger only ever reads it.
// Accounts are opaque 32-byte identifiers assigned by the host; the ledger
// performs no key management.

/// An account identifier (host-assigned, opaque to the ledger).
pub type AccountId = [u8; 32];

/// A block height on the host chain. One tick ~= 10 minutes.
pub type BlockHeight = u64;

/// Identifier of a stake record. Assigned monotonically, never reused.
pub type StakeId = u64;

/// Identifier of a tokenized environmental credit.
///
/// Externally meaningful but never validated here: the ledger does not call
/// the registry to confirm the id exists, is verified, or is owned by the
/// caller. A deployment composing this module with the registry must add
/// that check at the boundary.
pub type CreditId = u64;
