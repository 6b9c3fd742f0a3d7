// End-to-end exercise of the ledger through its public surface, driving
// storage and every host collaborator with the in-memory test doubles.

use phantom_common::crypto::Address;
use phantom_common::ledger::operations::{
    balance_of, burn, deploy, get_locked_content, locked_view_count, mint, owner_of,
    token_exists, token_metadata, tokens, tokens_of, total_supply, transfer,
};
use phantom_common::ledger::testing::{addr, MockHost};
use phantom_common::ledger::{
    ContractConfig, FeeToken, KeyValueStore, LedgerError, MemoryStore,
};

/// Balances must equal the count of owned tokens and supply must equal the
/// count of live tokens, for every mutation sequence.
fn assert_ledger_consistent<S: KeyValueStore>(store: &S, owners: &[Address]) {
    for owner in owners {
        assert_eq!(
            balance_of(store, owner).unwrap(),
            tokens_of(store, owner).count() as u64,
            "balance of {} out of sync with its token index",
            owner
        );
    }
    assert_eq!(
        total_supply(store).unwrap(),
        tokens(store).count() as u64,
        "supply out of sync with live tokens"
    );
}

#[test]
fn full_token_lifecycle() {
    let mut store = MemoryStore::new();
    let owner = addr(1);
    let bob = addr(2);
    let config = ContractConfig::new(owner, "PHNTM", 0);
    let host = MockHost::new();
    host.oracle.allow(owner);

    // Deploy with owner O
    assert!(deploy(&mut store, &config, &host.runtime()).unwrap());

    // mint(O, "meta1", b"secret1", null) -> T1
    let t1 = mint(
        &mut store,
        &config,
        &host.runtime(),
        &owner,
        "{\"name\":\"meta1\"}",
        b"secret1",
        None,
    )
    .unwrap();
    assert_eq!(total_supply(&store).unwrap(), 1);
    assert_eq!(balance_of(&store, &owner).unwrap(), 1);
    assert_eq!(owner_of(&store, &t1), owner);
    assert_ledger_consistent(&store, &[owner, bob]);

    // transfer(T1, to=B) by O
    assert!(transfer(&mut store, &host.runtime(), &bob, &t1, None).unwrap());
    assert_eq!(balance_of(&store, &owner).unwrap(), 0);
    assert_eq!(balance_of(&store, &bob).unwrap(), 1);
    assert_eq!(owner_of(&store, &t1), bob);
    assert_ledger_consistent(&store, &[owner, bob]);

    // getLockedContent by O -> hard failure (no longer owner)
    assert_eq!(
        get_locked_content(&mut store, &host.oracle, &t1),
        Err(LedgerError::AccessDenied)
    );
    assert_eq!(locked_view_count(&store, &t1).unwrap(), 0);

    // getLockedContent by B -> b"secret1", view count 1
    host.oracle.revoke(&owner);
    host.oracle.allow(bob);
    assert_eq!(
        get_locked_content(&mut store, &host.oracle, &t1).unwrap(),
        b"secret1"
    );
    assert_eq!(locked_view_count(&store, &t1).unwrap(), 1);

    // burn(T1) by B
    assert!(burn(&mut store, &host.runtime(), &t1).unwrap());
    assert_eq!(total_supply(&store).unwrap(), 0);
    assert_eq!(balance_of(&store, &bob).unwrap(), 0);
    assert!(!token_exists(&store, &t1));
    assert_eq!(owner_of(&store, &t1), Address::zero());
    assert_eq!(token_metadata(&store, &t1), Err(LedgerError::TokenNotFound));
    assert_ledger_consistent(&store, &[owner, bob]);
}

#[test]
fn deploy_is_idempotent() -> anyhow::Result<()> {
    let mut store = MemoryStore::new();
    let config = ContractConfig::new(addr(1), "PHNTM", 500);
    let host = MockHost::new();
    host.oracle.allow(config.owner);

    assert!(deploy(&mut store, &config, &host.runtime())?);
    let snapshot = store.clone();

    // Second deploy reports failure and leaves state untouched
    assert!(!deploy(&mut store, &config, &host.runtime())?);
    assert_eq!(store.len(), snapshot.len());
    Ok(())
}

#[test]
fn fee_gated_mint_lifecycle() {
    let mut store = MemoryStore::new();
    let owner = addr(1);
    let minter = addr(3);
    let config = ContractConfig::new(owner, "PHNTM", 20);
    let host = MockHost::new();
    host.oracle.allow(owner);
    deploy(&mut store, &config, &host.runtime()).unwrap();

    // Broke minter: nothing is created
    let result = mint(&mut store, &config, &host.runtime(), &minter, "m", b"x", None);
    assert_eq!(result, Err(LedgerError::FeePaymentFailed));
    assert_eq!(total_supply(&store).unwrap(), 0);

    // Funded minter pays the deploy-time fee
    host.fee_token.fund(minter, 100);
    let token = mint(&mut store, &config, &host.runtime(), &minter, "m", b"x", None).unwrap();
    assert!(token_exists(&store, &token));
    assert_eq!(host.fee_token.balance_of(&minter), 80);
    assert_eq!(host.fee_token.balance_of(&host.executing), 20);
    assert_ledger_consistent(&store, &[owner, minter]);
}

#[test]
fn balances_across_many_owners() {
    let mut store = MemoryStore::new();
    let config = ContractConfig::new(addr(1), "PHNTM", 0);
    let host = MockHost::new();
    let owners: Vec<Address> = (10..15).map(addr).collect();

    for (i, owner) in owners.iter().enumerate() {
        for j in 0..=i {
            mint(
                &mut store,
                &config,
                &host.runtime(),
                owner,
                &format!("{{\"n\":\"{}\"}}", j),
                b"",
                None,
            )
            .unwrap();
        }
    }

    for (i, owner) in owners.iter().enumerate() {
        assert_eq!(balance_of(&store, owner).unwrap(), (i + 1) as u64);
    }
    assert_eq!(total_supply(&store).unwrap(), 15);
    assert_ledger_consistent(&store, &owners);
}
