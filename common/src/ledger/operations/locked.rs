// Phantom NFT Ledger - Locked Content Vault
// Owner-gated access to the opaque payload attached to each token at mint
// time. Denied access is a hard failure, not a boolean: an unauthorized
// read attempt is a security violation worth surfacing loudly.

use log::trace;

use crate::ledger::{
    keys, AuthorizationOracle, KeyValueStore, LedgerError, LedgerResult, TokenId,
};

use super::read_owner;

/// Read the locked content of a token. Only the current owner may read;
/// every successful read bumps the per-token view counter by one.
///
/// A token that is not live has no owner the oracle could witness, so the
/// call fails with AccessDenied before touching the counter.
pub fn get_locked_content<S, O>(
    store: &mut S,
    oracle: &O,
    token: &TokenId,
) -> LedgerResult<Vec<u8>>
where
    S: KeyValueStore + ?Sized,
    O: AuthorizationOracle + ?Sized,
{
    let owner = read_owner(store, token);
    let authorized = owner
        .as_ref()
        .is_some_and(|owner| oracle.is_authorized(owner));
    if !authorized {
        return Err(LedgerError::AccessDenied);
    }

    let count = locked_view_count(store, token)?
        .checked_add(1)
        .ok_or(LedgerError::Overflow)?;
    store.put(
        keys::view_count_key(token),
        keys::encode_u64(count).to_vec(),
    )?;
    trace!("locked content of {} viewed {} times", token, count);

    Ok(store.get(&keys::locked_key(token)).unwrap_or_default())
}

/// How often the locked content of a token has been read. Unrestricted;
/// monotonically non-decreasing per token.
pub fn locked_view_count<S: KeyValueStore + ?Sized>(
    store: &S,
    token: &TokenId,
) -> LedgerResult<u64> {
    match store.get(&keys::view_count_key(token)) {
        Some(value) => keys::decode_u64(&value).ok_or(LedgerError::Encoding),
        None => Ok(0),
    }
}
