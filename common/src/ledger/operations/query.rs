// Phantom NFT Ledger - Query Operations
// Read-only views over the ledger state.

use std::collections::HashMap;

use crate::crypto::Address;
use crate::ledger::{keys, ContractConfig, KeyValueStore, LedgerError, LedgerResult, TokenId};

use super::{read_owner, read_supply};

// ========================================
// Token Surface
// ========================================

/// The token symbol. Constant for the lifetime of the contract.
pub fn symbol(config: &ContractConfig) -> &str {
    &config.symbol
}

/// Non-fungible tokens are indivisible
pub fn decimals() -> u8 {
    0
}

/// Total number of live tokens
pub fn total_supply<S: KeyValueStore + ?Sized>(store: &S) -> LedgerResult<u64> {
    read_supply(store)
}

/// Number of tokens owned by `owner`. 0 when no balance entry exists.
pub fn balance_of<S: KeyValueStore + ?Sized>(store: &S, owner: &Address) -> LedgerResult<u64> {
    super::read_balance(store, owner)
}

/// Current owner of a token.
///
/// Lenient by contract: a token that is not live yields the zero address
/// rather than an error, and callers that need the distinction check
/// `token_exists` first.
pub fn owner_of<S: KeyValueStore + ?Sized>(store: &S, token: &TokenId) -> Address {
    read_owner(store, token).unwrap_or_else(Address::zero)
}

/// Whether a token is live
pub fn token_exists<S: KeyValueStore + ?Sized>(store: &S, token: &TokenId) -> bool {
    store.contains(&keys::token_key(token))
}

// ========================================
// Enumeration
// ========================================

/// All token ids owned by `owner`, lazily, in store iteration order. Every
/// call starts a fresh scan.
pub fn tokens_of<'a, S: KeyValueStore + ?Sized>(
    store: &'a S,
    owner: &Address,
) -> impl Iterator<Item = TokenId> + 'a {
    store
        .scan_prefix(&keys::account_prefix(owner))
        .map(|(_, value)| TokenId::new(value))
}

/// All live token ids, lazily, in store iteration order
pub fn tokens<S: KeyValueStore + ?Sized>(store: &S) -> impl Iterator<Item = TokenId> + '_ {
    store
        .scan_prefix(keys::prefixes::TOKEN)
        .map(|(key, _)| TokenId::new(key[keys::prefixes::TOKEN.len()..].to_vec()))
}

// ========================================
// Metadata
// ========================================

/// The stored metadata blob of a token, decoded back to the string handed
/// to mint
pub fn token_metadata<S: KeyValueStore + ?Sized>(
    store: &S,
    token: &TokenId,
) -> LedgerResult<String> {
    let blob = store
        .get(&keys::meta_key(token))
        .ok_or(LedgerError::TokenNotFound)?;
    Ok(serde_json::from_slice(&blob)?)
}

/// Token metadata parsed as a string-keyed mapping. Fails with an encoding
/// error when the stored blob is not a JSON object of strings.
pub fn token_properties<S: KeyValueStore + ?Sized>(
    store: &S,
    token: &TokenId,
) -> LedgerResult<HashMap<String, String>> {
    let meta = token_metadata(store, token)?;
    Ok(serde_json::from_str(&meta)?)
}
