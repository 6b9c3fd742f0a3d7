// Phantom NFT Ledger - Key Space
// This module defines storage key prefixes and key construction.
//
// Storage Key Structure:
// - Token owner:        tok:<token_id>            -> owner address
// - Owner index:        acct:<owner><token_id>    -> token_id
// - Balance:            bal:<owner>               -> u64 (absent when zero)
// - Locked content:     lock:<token_id>           -> opaque bytes
// - Metadata:           meta:<token_id>           -> serialized blob
// - View counter:       lvc:<token_id>            -> u64
// - Supply:             supply                    -> u64
// - Token counter:      token_count               -> u64
// - Mint fee:           mint_fee                  -> i64
// - Authorized list:    auth_addr                 -> serialized address set
// - Deployed flag:      deployed                  -> bool
//
// Two prefixes are scan domains: `tok:` (all live tokens) and
// `acct:<owner>` (one owner's tokens). No fixed key and no other prefix
// starts with either of them, so prefix scans never pick up foreign
// entries. These byte strings are a compatibility contract: migration
// tooling depends on them never changing.

use crate::crypto::Address;

use super::types::TokenId;

// ========================================
// Storage Key Prefixes
// ========================================

/// Storage key prefixes and fixed keys for ledger data
pub mod prefixes {
    /// Token owner record prefix (scan domain for all live tokens)
    pub const TOKEN: &[u8] = b"tok:";

    /// Per-owner token index prefix (scan domain per owner)
    pub const ACCOUNT: &[u8] = b"acct:";

    /// Owner balance prefix
    pub const BALANCE: &[u8] = b"bal:";

    /// Locked content prefix
    pub const LOCKED: &[u8] = b"lock:";

    /// Token metadata prefix
    pub const META: &[u8] = b"meta:";

    /// Locked content view counter prefix
    pub const LOCKED_VIEW_COUNT: &[u8] = b"lvc:";

    /// Total supply key
    pub const SUPPLY: &[u8] = b"supply";

    /// Monotonic token counter key
    pub const TOKEN_COUNT: &[u8] = b"token_count";

    /// Configured mint fee key
    pub const MINT_FEE: &[u8] = b"mint_fee";

    /// Authorized address list key
    pub const AUTH_ADDRESSES: &[u8] = b"auth_addr";

    /// One-time deployment flag key
    pub const DEPLOYED: &[u8] = b"deployed";
}

// ========================================
// Storage Key Generation Functions
// ========================================

fn concat(prefix: &[u8], suffix: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + suffix.len());
    key.extend_from_slice(prefix);
    key.extend_from_slice(suffix);
    key
}

/// Generate the owner record key for a token
pub fn token_key(token: &TokenId) -> Vec<u8> {
    concat(prefixes::TOKEN, token.as_bytes())
}

/// Generate the scan prefix covering all tokens of one owner
pub fn account_prefix(owner: &Address) -> Vec<u8> {
    concat(prefixes::ACCOUNT, owner.as_bytes())
}

/// Generate the owner index key for a (owner, token) pair
pub fn account_token_key(owner: &Address, token: &TokenId) -> Vec<u8> {
    let mut key = account_prefix(owner);
    key.extend_from_slice(token.as_bytes());
    key
}

/// Generate the balance key for an owner
pub fn balance_key(owner: &Address) -> Vec<u8> {
    concat(prefixes::BALANCE, owner.as_bytes())
}

/// Generate the locked content key for a token
pub fn locked_key(token: &TokenId) -> Vec<u8> {
    concat(prefixes::LOCKED, token.as_bytes())
}

/// Generate the metadata key for a token
pub fn meta_key(token: &TokenId) -> Vec<u8> {
    concat(prefixes::META, token.as_bytes())
}

/// Generate the view counter key for a token
pub fn view_count_key(token: &TokenId) -> Vec<u8> {
    concat(prefixes::LOCKED_VIEW_COUNT, token.as_bytes())
}

/// Total supply key
pub fn supply_key() -> Vec<u8> {
    prefixes::SUPPLY.to_vec()
}

/// Monotonic token counter key
pub fn token_count_key() -> Vec<u8> {
    prefixes::TOKEN_COUNT.to_vec()
}

/// Configured mint fee key
pub fn mint_fee_key() -> Vec<u8> {
    prefixes::MINT_FEE.to_vec()
}

/// Authorized address list key
pub fn auth_addresses_key() -> Vec<u8> {
    prefixes::AUTH_ADDRESSES.to_vec()
}

/// One-time deployment flag key
pub fn deployed_key() -> Vec<u8> {
    prefixes::DEPLOYED.to_vec()
}

// ========================================
// Helper Functions for Storage Values
// ========================================

/// Encode a u64 value for storage
pub fn encode_u64(value: u64) -> [u8; 8] {
    value.to_be_bytes()
}

/// Decode a u64 value from storage bytes
pub fn decode_u64(bytes: &[u8]) -> Option<u64> {
    let arr: [u8; 8] = bytes.try_into().ok()?;
    Some(u64::from_be_bytes(arr))
}

/// Encode an i64 value for storage
pub fn encode_i64(value: i64) -> [u8; 8] {
    value.to_be_bytes()
}

/// Decode an i64 value from storage bytes
pub fn decode_i64(bytes: &[u8]) -> Option<i64> {
    let arr: [u8; 8] = bytes.try_into().ok()?;
    Some(i64::from_be_bytes(arr))
}

/// Encode a boolean for storage (as single byte)
pub fn encode_bool(value: bool) -> [u8; 1] {
    [u8::from(value)]
}

/// Decode a boolean from storage bytes
pub fn decode_bool(bytes: &[u8]) -> Option<bool> {
    match bytes {
        [0] => Some(false),
        [1] => Some(true),
        _ => None,
    }
}
