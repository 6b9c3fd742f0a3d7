// Phantom NFT Ledger
// Single-collection NFT ledger engine over a flat key-value namespace.
//
// Features:
// - Per-token ownership with a per-owner enumeration index
// - Denormalized balances and total supply kept consistent on every mutation
// - Locked (owner-gated) content with a per-token view counter
// - Per-token metadata blobs
// - Mint-fee collection through an external fee token
// - Authorized-address allow-list for administrative operations
//
// Module Structure:
// - error: Error codes and types
// - types: Core data structures (TokenId, ContractConfig, Event)
// - keys: Storage key prefixes and helpers
// - store: Key-value store abstraction, write batching, in-memory backend
// - runtime: Host collaborator interfaces (witness check, fee token, events)
// - operations: Core operation logic (deploy, mint, transfer, burn, query)

mod error;
mod keys;
pub mod operations;
mod runtime;
mod store;
pub mod testing;
mod types;

#[cfg(feature = "sled")]
mod sled_store;

pub use error::*;
pub use keys::*;
pub use runtime::*;
pub use store::*;
pub use types::*;

#[cfg(feature = "sled")]
pub use sled_store::*;

// ========================================
// Protocol Constants
// ========================================

/// Maximum token symbol length (bytes)
pub const MAX_SYMBOL_LENGTH: usize = 8;

/// Maximum number of entries in the authorized-address list
pub const MAX_AUTHORIZED_ADDRESSES: usize = 100;

/// Number of entropy bytes appended to a freshly derived token id
pub const TOKEN_ID_ENTROPY_SIZE: usize = 8;
