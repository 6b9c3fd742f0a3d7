// Phantom NFT Ledger - Operations
// Core business logic. Operations are runtime-agnostic: storage and host
// collaborators are injected, which keeps every code path testable without
// a live host environment.
//
// Failure contract (see error.rs): authorization failures on transfer,
// burn, deploy and the authorized-address toggle are soft (Ok(false), no
// state change). Everything in LedgerError aborts the operation before any
// write is applied.

mod burn;
mod deploy;
mod fees;
mod locked;
mod mint;
mod query;
mod transfer;

pub use burn::*;
pub use deploy::*;
pub use fees::*;
pub use locked::*;
pub use mint::*;
pub use query::*;
pub use transfer::*;

use indexmap::IndexSet;

use crate::crypto::Address;
use crate::serializer::Serializer;

use super::error::{LedgerError, LedgerResult};
use super::keys;
use super::runtime::AuthorizationOracle;
use super::store::{KeyValueStore, WriteBatch};
use super::types::{ContractConfig, TokenId};

// ========================================
// Shared Storage Accessors
// ========================================

/// Read the owner record of a token. None when the token is not live.
pub(crate) fn read_owner<S: KeyValueStore + ?Sized>(
    store: &S,
    token: &TokenId,
) -> Option<Address> {
    let value = store.get(&keys::token_key(token))?;
    Address::from_bytes(&value).ok()
}

pub(crate) fn read_balance<S: KeyValueStore + ?Sized>(
    store: &S,
    owner: &Address,
) -> LedgerResult<u64> {
    match store.get(&keys::balance_key(owner)) {
        Some(value) => keys::decode_u64(&value).ok_or(LedgerError::Encoding),
        None => Ok(0),
    }
}

pub(crate) fn read_supply<S: KeyValueStore + ?Sized>(store: &S) -> LedgerResult<u64> {
    match store.get(&keys::supply_key()) {
        Some(value) => keys::decode_u64(&value).ok_or(LedgerError::Encoding),
        None => Ok(0),
    }
}

pub(crate) fn read_token_count<S: KeyValueStore + ?Sized>(store: &S) -> LedgerResult<u64> {
    match store.get(&keys::token_count_key()) {
        Some(value) => keys::decode_u64(&value).ok_or(LedgerError::Encoding),
        None => Ok(0),
    }
}

pub(crate) fn read_deployed<S: KeyValueStore + ?Sized>(store: &S) -> LedgerResult<bool> {
    match store.get(&keys::deployed_key()) {
        Some(value) => keys::decode_bool(&value).ok_or(LedgerError::Encoding),
        None => Ok(false),
    }
}

pub(crate) fn load_authorized<S: KeyValueStore + ?Sized>(
    store: &S,
) -> LedgerResult<IndexSet<Address>> {
    match store.get(&keys::auth_addresses_key()) {
        Some(value) => Ok(IndexSet::from_bytes(&value)?),
        None => Ok(IndexSet::new()),
    }
}

pub(crate) fn stage_authorized(batch: &mut WriteBatch, set: &IndexSet<Address>) {
    batch.put(keys::auth_addresses_key(), set.to_bytes());
}

// ========================================
// Shared Staging Helpers
// ========================================

/// Stage a balance adjustment. The balance entry is deleted, not zeroed,
/// when it reaches zero.
pub(crate) fn stage_balance_change<S: KeyValueStore + ?Sized>(
    store: &S,
    batch: &mut WriteBatch,
    owner: &Address,
    delta: i64,
) -> LedgerResult<()> {
    let current = read_balance(store, owner)?;
    let next = apply_delta(current, delta)?;
    let key = keys::balance_key(owner);
    if next > 0 {
        batch.put(key, keys::encode_u64(next).to_vec());
    } else {
        batch.delete(key);
    }
    Ok(())
}

pub(crate) fn stage_supply_change<S: KeyValueStore + ?Sized>(
    store: &S,
    batch: &mut WriteBatch,
    delta: i64,
) -> LedgerResult<()> {
    let current = read_supply(store)?;
    let next = apply_delta(current, delta)?;
    batch.put(keys::supply_key(), keys::encode_u64(next).to_vec());
    Ok(())
}

fn apply_delta(current: u64, delta: i64) -> LedgerResult<u64> {
    if delta >= 0 {
        current.checked_add(delta as u64)
    } else {
        current.checked_sub(delta.unsigned_abs())
    }
    .ok_or(LedgerError::Overflow)
}

// ========================================
// Authority Check
// ========================================

/// Check whether the contract owner or any address on the allow-list has
/// witnessed the current operation. Gates every administrative operation.
pub fn verify<S, O>(store: &S, config: &ContractConfig, oracle: &O) -> LedgerResult<bool>
where
    S: KeyValueStore + ?Sized,
    O: AuthorizationOracle + ?Sized,
{
    if oracle.is_authorized(&config.owner) {
        return Ok(true);
    }

    let authorized = load_authorized(store)?;
    Ok(authorized
        .iter()
        .any(|address| oracle.is_authorized(address)))
}
