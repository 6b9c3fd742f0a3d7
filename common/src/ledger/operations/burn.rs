// Phantom NFT Ledger - Burn Operations
// Terminal destruction of a token: every view except the locked-content
// view counter is removed in one batch.

use log::debug;

use crate::ledger::{
    keys, AuthorizationOracle, FeeToken, KeyValueStore, LedgerResult, NotificationSink,
    ReceiverHook, Runtime, TokenId, WriteBatch,
};

use super::transfer::post_transfer;
use super::{read_owner, stage_balance_change, stage_supply_change};

/// View counters are left behind when their token burns, so historical
/// read counts stay queryable. Flip this on to reclaim the entries instead.
const PURGE_VIEW_COUNT_ON_BURN: bool = false;

// ========================================
// Burn Operation
// ========================================

/// Burn a token. Soft-fails unless the current owner has witnessed the
/// call; burn is terminal, a burned id can never be re-burned or
/// transferred.
pub fn burn<S, O, F, N, H>(
    store: &mut S,
    rt: &Runtime<'_, O, F, N, H>,
    token: &TokenId,
) -> LedgerResult<bool>
where
    S: KeyValueStore + ?Sized,
    O: AuthorizationOracle + ?Sized,
    F: FeeToken + ?Sized,
    N: NotificationSink + ?Sized,
    H: ReceiverHook + ?Sized,
{
    let Some(owner) = read_owner(store, token) else {
        return Ok(false);
    };

    if !rt.oracle.is_authorized(&owner) {
        return Ok(false);
    }

    let mut batch = WriteBatch::new();
    batch.delete(keys::account_token_key(&owner, token));
    batch.delete(keys::meta_key(token));
    batch.delete(keys::locked_key(token));
    batch.delete(keys::token_key(token));
    stage_balance_change(store, &mut batch, &owner, -1)?;
    stage_supply_change(store, &mut batch, -1)?;
    if PURGE_VIEW_COUNT_ON_BURN {
        batch.delete(keys::view_count_key(token));
    }
    store.apply(batch)?;

    debug!("burned token {} of {}", token, owner);
    post_transfer(rt, Some(&owner), None, token, None);
    Ok(true)
}

/// Burn a list of tokens, reporting the per-token outcome in order
pub fn multi_burn<S, O, F, N, H>(
    store: &mut S,
    rt: &Runtime<'_, O, F, N, H>,
    tokens: &[TokenId],
) -> LedgerResult<Vec<bool>>
where
    S: KeyValueStore + ?Sized,
    O: AuthorizationOracle + ?Sized,
    F: FeeToken + ?Sized,
    N: NotificationSink + ?Sized,
    H: ReceiverHook + ?Sized,
{
    let mut burned = Vec::with_capacity(tokens.len());
    for token in tokens {
        burned.push(burn(store, rt, token)?);
    }
    Ok(burned)
}

#[cfg(test)]
mod tests {
    use super::super::{
        balance_of, get_locked_content, locked_view_count, mint, token_exists, token_metadata,
        tokens_of, total_supply,
    };
    use super::*;
    use crate::crypto::Address;
    use crate::ledger::testing::{addr, MockHost};
    use crate::ledger::{ContractConfig, Event, LedgerError, MemoryStore};

    fn setup_with_token() -> (MemoryStore, ContractConfig, MockHost, Address, TokenId) {
        let mut store = MemoryStore::new();
        let config = ContractConfig::new(addr(1), "PHNTM", 0);
        let host = MockHost::new();
        let owner = addr(5);
        let token = mint(&mut store, &config, &host.runtime(), &owner, "m", b"s", None).unwrap();
        host.sink.take();
        (store, config, host, owner, token)
    }

    #[test]
    fn test_burn_removes_every_view() {
        let (mut store, _, host, owner, token) = setup_with_token();
        host.oracle.allow(owner);

        assert!(burn(&mut store, &host.runtime(), &token).unwrap());

        assert!(!token_exists(&store, &token));
        assert_eq!(balance_of(&store, &owner).unwrap(), 0);
        assert_eq!(total_supply(&store).unwrap(), 0);
        assert_eq!(tokens_of(&store, &owner).count(), 0);
        assert_eq!(
            token_metadata(&store, &token),
            Err(LedgerError::TokenNotFound)
        );

        assert_eq!(
            host.sink.take(),
            vec![Event::Transfer {
                from: Some(owner),
                to: None,
                amount: 1,
                token,
            }]
        );
    }

    #[test]
    fn test_unwitnessed_burn_soft_fails() {
        let (mut store, _, host, owner, token) = setup_with_token();

        assert!(!burn(&mut store, &host.runtime(), &token).unwrap());
        assert!(token_exists(&store, &token));
        assert_eq!(balance_of(&store, &owner).unwrap(), 1);
    }

    #[test]
    fn test_reburn_fails() {
        let (mut store, _, host, owner, token) = setup_with_token();
        host.oracle.allow(owner);

        assert!(burn(&mut store, &host.runtime(), &token).unwrap());
        assert!(!burn(&mut store, &host.runtime(), &token).unwrap());
        assert_eq!(total_supply(&store).unwrap(), 0);
    }

    #[test]
    fn test_view_counter_survives_burn() {
        // Divergence kept on purpose: the counter entry outlives the token
        // (see PURGE_VIEW_COUNT_ON_BURN).
        let (mut store, _, host, owner, token) = setup_with_token();
        host.oracle.allow(owner);

        get_locked_content(&mut store, &host.oracle, &token).unwrap();
        assert_eq!(locked_view_count(&store, &token).unwrap(), 1);

        assert!(burn(&mut store, &host.runtime(), &token).unwrap());
        assert_eq!(locked_view_count(&store, &token).unwrap(), 1);
    }

    #[test]
    fn test_multi_burn_reports_per_token_results() {
        let (mut store, config, host, owner, token_a) = setup_with_token();
        host.oracle.allow(owner);
        let token_b =
            mint(&mut store, &config, &host.runtime(), &owner, "b", b"", None).unwrap();
        let bogus = TokenId::new(b"PHNTM-bogus".to_vec());

        let results = multi_burn(
            &mut store,
            &host.runtime(),
            &[token_a, bogus, token_b],
        )
        .unwrap();
        assert_eq!(results, vec![true, false, true]);
        assert_eq!(total_supply(&store).unwrap(), 0);
    }
}
