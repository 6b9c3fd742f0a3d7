// Phantom NFT Ledger - Mint Operations
// Fee collection, token id derivation and the atomic creation of all six
// views of a new token (owner record, owner index, metadata, locked
// content, balance, supply).

use log::debug;

use crate::crypto::{hash, Address};
use crate::ledger::{
    keys, AuthorizationOracle, ContractConfig, Event, FeeToken, KeyValueStore, LedgerError,
    LedgerResult, NotificationSink, ReceiverHook, Runtime, TokenId, WriteBatch,
    TOKEN_ID_ENTROPY_SIZE,
};

use super::transfer::post_transfer;
use super::{collect_mint_fee, read_token_count, stage_balance_change, stage_supply_change};

// ========================================
// Token Id Derivation
// ========================================

/// Derive the identifier for the `count`-th token: symbol bytes, the
/// counter itself, then a short digest of (tx hash, counter, aux data).
/// The embedded counter guarantees uniqueness; the digest ties the id to
/// the minting transaction.
fn derive_token_id(
    config: &ContractConfig,
    tx_hash: &crate::crypto::Hash,
    count: u64,
    aux: Option<&[u8]>,
) -> TokenId {
    let mut seed = Vec::with_capacity(tx_hash.as_bytes().len() + 8 + aux.map_or(0, |a| a.len()));
    seed.extend_from_slice(tx_hash.as_bytes());
    seed.extend_from_slice(&keys::encode_u64(count));
    if let Some(aux) = aux {
        seed.extend_from_slice(aux);
    }
    let digest = hash(&seed);

    let symbol = config.symbol.as_bytes();
    let mut id = Vec::with_capacity(symbol.len() + 8 + TOKEN_ID_ENTROPY_SIZE);
    id.extend_from_slice(symbol);
    id.extend_from_slice(&keys::encode_u64(count));
    id.extend_from_slice(&digest.as_bytes()[..TOKEN_ID_ENTROPY_SIZE]);
    TokenId::new(id)
}

// ========================================
// Mint Operation
// ========================================

/// Mint a new token for `account`.
///
/// Fee collection is a precondition: when the fee-token pull fails nothing
/// is created and no counter moves. On success the token owner record, the
/// owner index entry, the metadata blob, the locked content, the balance
/// and the supply are committed as one batch, then a mint event and the
/// transfer notification fire.
pub fn mint<S, O, F, N, H>(
    store: &mut S,
    config: &ContractConfig,
    rt: &Runtime<'_, O, F, N, H>,
    account: &Address,
    meta: &str,
    locked_content: &[u8],
    aux: Option<&[u8]>,
) -> LedgerResult<TokenId>
where
    S: KeyValueStore + ?Sized,
    O: AuthorizationOracle + ?Sized,
    F: FeeToken + ?Sized,
    N: NotificationSink + ?Sized,
    H: ReceiverHook + ?Sized,
{
    let fees = collect_mint_fee(store, rt, account)?;

    let count = read_token_count(store)?
        .checked_add(1)
        .ok_or(LedgerError::Overflow)?;
    let token = derive_token_id(config, &rt.tx_hash, count, aux);

    let mut batch = WriteBatch::new();
    batch.put(keys::token_count_key(), keys::encode_u64(count).to_vec());
    batch.put(
        keys::account_token_key(account, &token),
        token.as_bytes().to_vec(),
    );
    batch.put(keys::locked_key(&token), locked_content.to_vec());
    batch.put(keys::meta_key(&token), serde_json::to_vec(meta)?);
    batch.put(keys::token_key(&token), account.as_bytes().to_vec());
    stage_balance_change(store, &mut batch, account, 1)?;
    stage_supply_change(store, &mut batch, 1)?;
    store.apply(batch)?;

    debug!("minted token {} for {}", token, account);
    rt.sink.emit(Event::Mint {
        creator: *account,
        token: token.clone(),
        token_uri: meta.to_string(),
        fees,
    });
    post_transfer(rt, None, Some(account), &token, None);

    Ok(token)
}

/// Mint one token per metadata/locked-content pair, in order. Each mint is
/// atomic on its own; a failure stops the loop with the tokens minted so
/// far already committed.
pub fn multi_mint<S, O, F, N, H>(
    store: &mut S,
    config: &ContractConfig,
    rt: &Runtime<'_, O, F, N, H>,
    account: &Address,
    metas: &[&str],
    locked_contents: &[&[u8]],
    aux: Option<&[u8]>,
) -> LedgerResult<Vec<TokenId>>
where
    S: KeyValueStore + ?Sized,
    O: AuthorizationOracle + ?Sized,
    F: FeeToken + ?Sized,
    N: NotificationSink + ?Sized,
    H: ReceiverHook + ?Sized,
{
    if metas.len() != locked_contents.len() {
        return Err(LedgerError::LengthMismatch);
    }

    let mut tokens = Vec::with_capacity(metas.len());
    for (meta, locked) in metas.iter().zip(locked_contents) {
        tokens.push(mint(store, config, rt, account, meta, locked, aux)?);
    }
    Ok(tokens)
}
