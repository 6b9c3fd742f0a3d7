// Phantom NFT Ledger - Transfer Operations
// Owner-witnessed transfer plus the post-transfer notification shared with
// mint and burn.

use log::{debug, trace};

use crate::crypto::Address;
use crate::ledger::{
    keys, AuthorizationOracle, Event, FeeToken, KeyValueStore, LedgerResult, NotificationSink,
    ReceiverHook, Runtime, TokenId, WriteBatch,
};

use super::{read_owner, stage_balance_change};

// ========================================
// Post-Transfer Notification
// ========================================

/// Emit the transfer event and, when the recipient is a contract, invoke
/// its received-token hook. Runs after the state change has been committed;
/// hook failures are the receiver's responsibility.
pub(crate) fn post_transfer<O, F, N, H>(
    rt: &Runtime<'_, O, F, N, H>,
    from: Option<&Address>,
    to: Option<&Address>,
    token: &TokenId,
    data: Option<&[u8]>,
) where
    O: ?Sized,
    F: ?Sized,
    N: NotificationSink + ?Sized,
    H: ReceiverHook + ?Sized,
{
    rt.sink.emit(Event::Transfer {
        from: from.copied(),
        to: to.copied(),
        amount: 1,
        token: token.clone(),
    });

    if let Some(to) = to {
        if rt.receiver.is_contract(to) {
            rt.receiver.on_token_received(to, from, 1, token, data);
        }
    }
}

// ========================================
// Transfer Operation
// ========================================

/// Transfer a token to `to`.
///
/// Soft-fails (Ok(false), no state change) unless the current owner has
/// witnessed the call. A self-transfer is a successful no-op on storage and
/// still fires the transfer notification. Balance entries move with the
/// owner index and the owner record in one batch.
pub fn transfer<S, O, F, N, H>(
    store: &mut S,
    rt: &Runtime<'_, O, F, N, H>,
    to: &Address,
    token: &TokenId,
    data: Option<&[u8]>,
) -> LedgerResult<bool>
where
    S: KeyValueStore + ?Sized,
    O: AuthorizationOracle + ?Sized,
    F: FeeToken + ?Sized,
    N: NotificationSink + ?Sized,
    H: ReceiverHook + ?Sized,
{
    trace!("transfer {} to {}", token, to);

    let Some(owner) = read_owner(store, token) else {
        return Ok(false);
    };

    if !rt.oracle.is_authorized(&owner) {
        return Ok(false);
    }

    if owner != *to {
        let mut batch = WriteBatch::new();
        stage_balance_change(store, &mut batch, &owner, -1)?;
        batch.delete(keys::account_token_key(&owner, token));
        stage_balance_change(store, &mut batch, to, 1)?;
        batch.put(
            keys::account_token_key(to, token),
            token.as_bytes().to_vec(),
        );
        batch.put(keys::token_key(token), to.as_bytes().to_vec());
        store.apply(batch)?;
        debug!("token {} moved from {} to {}", token, owner, to);
    }

    post_transfer(rt, Some(&owner), Some(to), token, data);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::super::{balance_of, mint, owner_of, tokens_of, total_supply};
    use super::*;
    use crate::ledger::testing::{addr, MockHost};
    use crate::ledger::{ContractConfig, MemoryStore};

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
    fn test_transfer_moves_ownership_and_balances() {
        let (mut store, _, host, owner, token) = setup_with_token();
        host.oracle.allow(owner);
        let to = addr(6);

        assert!(transfer(&mut store, &host.runtime(), &to, &token, None).unwrap());

        assert_eq!(owner_of(&store, &token), to);
        assert_eq!(balance_of(&store, &owner).unwrap(), 0);
        assert_eq!(balance_of(&store, &to).unwrap(), 1);
        assert_eq!(total_supply(&store).unwrap(), 1);

        let former: Vec<TokenId> = tokens_of(&store, &owner).collect();
        assert!(former.is_empty());
        let current: Vec<TokenId> = tokens_of(&store, &to).collect();
        assert_eq!(current, vec![token.clone()]);

        assert_eq!(
            host.sink.take(),
            vec![Event::Transfer {
                from: Some(owner),
                to: Some(to),
                amount: 1,
                token,
            }]
        );
    }

    #[test]
    fn test_unwitnessed_transfer_soft_fails() {
        let (mut store, _, host, owner, token) = setup_with_token();
        let to = addr(6);

        assert!(!transfer(&mut store, &host.runtime(), &to, &token, None).unwrap());

        assert_eq!(owner_of(&store, &token), owner);
        assert_eq!(balance_of(&store, &owner).unwrap(), 1);
        assert_eq!(balance_of(&store, &to).unwrap(), 0);
        assert!(host.sink.take().is_empty());
    }

    #[test]
    fn test_recipient_witness_is_not_enough() {
        let (mut store, _, host, _, token) = setup_with_token();
        let to = addr(6);
        host.oracle.allow(to);

        assert!(!transfer(&mut store, &host.runtime(), &to, &token, None).unwrap());
    }

    #[test]
    fn test_self_transfer_succeeds_without_mutation() {
        let (mut store, _, host, owner, token) = setup_with_token();
        host.oracle.allow(owner);
        let snapshot = store.clone();

        assert!(transfer(&mut store, &host.runtime(), &owner, &token, None).unwrap());

        assert_eq!(store.len(), snapshot.len());
        assert_eq!(balance_of(&store, &owner).unwrap(), 1);
        // The transfer event still fires
        assert_eq!(
            host.sink.take(),
            vec![Event::Transfer {
                from: Some(owner),
                to: Some(owner),
                amount: 1,
                token,
            }]
        );
    }

    #[test]
    fn test_transfer_of_unknown_token_soft_fails() {
        let (mut store, _, host, owner, _) = setup_with_token();
        host.oracle.allow(owner);
        let bogus = TokenId::new(b"PHNTM-bogus".to_vec());

        assert!(!transfer(&mut store, &host.runtime(), &addr(6), &bogus, None).unwrap());
        assert!(host.sink.take().is_empty());
    }

    #[test]
    fn test_transfer_notifies_contract_recipient() {
        let (mut store, _, host, owner, token) = setup_with_token();
        host.oracle.allow(owner);
        let to = addr(6);
        host.receiver.register_contract(to);

        assert!(transfer(&mut store, &host.runtime(), &to, &token, Some(b"memo")).unwrap());

        let calls = host.receiver.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].from, Some(owner));
        assert_eq!(calls[0].to, to);
        assert_eq!(calls[0].data.as_deref(), Some(b"memo".as_slice()));
    }
}
