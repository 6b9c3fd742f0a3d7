// Phantom NFT Ledger - Fee and Authority Management
// Mint-fee configuration, fee collection and payout through the external
// fee token, and the authorized-address allow-list.

use indexmap::IndexSet;
use log::{debug, trace};

use crate::crypto::Address;
use crate::ledger::{
    keys, AuthorizationOracle, ContractConfig, Event, FeeToken, KeyValueStore, LedgerError,
    LedgerResult, NotificationSink, ReceiverHook, Runtime, WriteBatch, MAX_AUTHORIZED_ADDRESSES,
};

use super::{load_authorized, stage_authorized, verify};

// ========================================
// Mint Fee
// ========================================

/// Get the configured mint fee. Defaults to 0 when unset, which should not
/// occur after deploy.
pub fn mint_fee<S: KeyValueStore + ?Sized>(store: &S) -> LedgerResult<i64> {
    match store.get(&keys::mint_fee_key()) {
        Some(value) => keys::decode_i64(&value).ok_or(LedgerError::Encoding),
        None => Ok(0),
    }
}

/// Reconfigure the mint fee. Requires the contract owner or an authorized
/// address; returns the stored fee.
pub fn set_mint_fee<S, O, F, N, H>(
    store: &mut S,
    config: &ContractConfig,
    rt: &Runtime<'_, O, F, N, H>,
    fee: i64,
) -> LedgerResult<i64>
where
    S: KeyValueStore + ?Sized,
    O: AuthorizationOracle + ?Sized,
    F: FeeToken + ?Sized,
    N: NotificationSink + ?Sized,
    H: ReceiverHook + ?Sized,
{
    if !verify(store, config, rt.oracle)? {
        return Err(LedgerError::Unauthorized);
    }

    let mut batch = WriteBatch::new();
    batch.put(keys::mint_fee_key(), keys::encode_i64(fee).to_vec());
    store.apply(batch)?;

    debug!("mint fee set to {}", fee);
    rt.sink.emit(Event::MintFeeUpdated { value: fee });
    mint_fee(store)
}

/// Pull the configured fee from `payer` into the contract account. Mint
/// must not proceed when this fails. Returns the amount charged.
///
/// A negative configured fee is a configuration error, rejected before any
/// transfer is attempted. The fee-token call is made even for a zero fee,
/// matching the unconditional collection step of the public mint path.
pub fn collect_mint_fee<S, O, F, N, H>(
    store: &S,
    rt: &Runtime<'_, O, F, N, H>,
    payer: &Address,
) -> LedgerResult<u64>
where
    S: KeyValueStore + ?Sized,
    O: AuthorizationOracle + ?Sized,
    F: FeeToken + ?Sized,
    N: NotificationSink + ?Sized,
    H: ReceiverHook + ?Sized,
{
    let fee = mint_fee(store)?;
    if fee < 0 {
        return Err(LedgerError::InvalidMintFee);
    }

    let amount = fee as u64;
    if !rt.fee_token.transfer(payer, &rt.executing, amount) {
        return Err(LedgerError::FeePaymentFailed);
    }
    trace!("collected mint fee {} from {}", amount, payer);
    Ok(amount)
}

/// Current fee-token balance held by the contract account
pub fn fee_balance<O, F, N, H>(rt: &Runtime<'_, O, F, N, H>) -> u64
where
    O: AuthorizationOracle + ?Sized,
    F: FeeToken + ?Sized,
    N: NotificationSink + ?Sized,
    H: ReceiverHook + ?Sized,
{
    rt.fee_token.balance_of(&rt.executing)
}

/// Pay the whole accumulated fee-token balance out to `to`. Requires the
/// contract owner or an authorized address.
pub fn withdraw_fees<S, O, F, N, H>(
    store: &S,
    config: &ContractConfig,
    rt: &Runtime<'_, O, F, N, H>,
    to: &Address,
) -> LedgerResult<bool>
where
    S: KeyValueStore + ?Sized,
    O: AuthorizationOracle + ?Sized,
    F: FeeToken + ?Sized,
    N: NotificationSink + ?Sized,
    H: ReceiverHook + ?Sized,
{
    if !verify(store, config, rt.oracle)? {
        return Err(LedgerError::Unauthorized);
    }

    let balance = rt.fee_token.balance_of(&rt.executing);
    let transferred = rt.fee_token.transfer(&rt.executing, to, balance);
    if transferred {
        debug!("withdrew {} in fees to {}", balance, to);
        rt.sink.emit(Event::MintFeesWithdrawn {
            to: *to,
            value: balance,
        });
    }
    Ok(transferred)
}

// ========================================
// Authorized Addresses
// ========================================

/// The current administrative allow-list. Always contains at least the
/// deploying owner after deploy.
pub fn authorized_addresses<S: KeyValueStore + ?Sized>(
    store: &S,
) -> LedgerResult<IndexSet<Address>> {
    load_authorized(store)
}

/// Add or remove an address on the allow-list. Soft-fails when the caller
/// is not authorized. Adding is idempotent; removing an address that is not
/// on the list is an error, not a silent no-op.
pub fn set_authorized_address<S, O, F, N, H>(
    store: &mut S,
    config: &ContractConfig,
    rt: &Runtime<'_, O, F, N, H>,
    address: &Address,
    enable: bool,
) -> LedgerResult<bool>
where
    S: KeyValueStore + ?Sized,
    O: AuthorizationOracle + ?Sized,
    F: FeeToken + ?Sized,
    N: NotificationSink + ?Sized,
    H: ReceiverHook + ?Sized,
{
    if !verify(store, config, rt.oracle)? {
        return Ok(false);
    }

    let mut authorized = load_authorized(store)?;
    if enable {
        if !authorized.contains(address) {
            if authorized.len() >= MAX_AUTHORIZED_ADDRESSES {
                return Err(LedgerError::AuthorizedListFull);
            }
            authorized.insert(*address);
        }
    } else if !authorized.shift_remove(address) {
        return Err(LedgerError::AuthorizedAddressNotFound);
    }

    let mut batch = WriteBatch::new();
    stage_authorized(&mut batch, &authorized);
    store.apply(batch)?;

    debug!("authorized address {} -> {}", address, enable);
    rt.sink.emit(Event::Auth {
        address: *address,
        added: enable,
    });
    Ok(true)
}
