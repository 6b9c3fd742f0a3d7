// Phantom NFT Ledger - Deployment and Lifecycle
// One-time initialization plus the thin authorization shims in front of the
// host's contract lifecycle service.

use indexmap::IndexSet;
use log::debug;

use crate::ledger::{
    keys, AuthorizationOracle, ContractConfig, ContractLifecycle, Event, FeeToken, KeyValueStore,
    LedgerError, LedgerResult, NotificationSink, ReceiverHook, Runtime, WriteBatch,
};

use super::{read_deployed, stage_authorized, verify};

// ========================================
// Deploy
// ========================================

/// One-time contract initialization. Returns true only on the first
/// successful deploy; a second call leaves state untouched and reports
/// failure. Seeds the token counter, the mint fee and the allow-list
/// (containing exactly the owner).
pub fn deploy<S, O, F, N, H>(
    store: &mut S,
    config: &ContractConfig,
    rt: &Runtime<'_, O, F, N, H>,
) -> LedgerResult<bool>
where
    S: KeyValueStore + ?Sized,
    O: AuthorizationOracle + ?Sized,
    F: FeeToken + ?Sized,
    N: NotificationSink + ?Sized,
    H: ReceiverHook + ?Sized,
{
    config.validate()?;

    if !rt.oracle.is_authorized(&config.owner) {
        return Ok(false);
    }

    if read_deployed(store)? {
        return Ok(false);
    }

    let deploy_fee = i64::try_from(config.deploy_fee).map_err(|_| LedgerError::Overflow)?;

    let mut authorized = IndexSet::new();
    authorized.insert(config.owner);

    let mut batch = WriteBatch::new();
    batch.put(keys::deployed_key(), keys::encode_bool(true).to_vec());
    batch.put(keys::token_count_key(), keys::encode_u64(0).to_vec());
    batch.put(keys::mint_fee_key(), keys::encode_i64(deploy_fee).to_vec());
    stage_authorized(&mut batch, &authorized);
    store.apply(batch)?;

    debug!("deployed ledger {} for owner {}", config.symbol, config.owner);
    rt.sink.emit(Event::Deploy {
        owner: config.owner,
        symbol: config.symbol.clone(),
    });
    Ok(true)
}

// ========================================
// Lifecycle Shims
// ========================================

/// Upgrade the contract. The ledger only checks authority; the host applies
/// the new code and manifest.
pub fn update<S, O, L>(
    store: &S,
    config: &ContractConfig,
    oracle: &O,
    lifecycle: &L,
    code: &[u8],
    manifest: &[u8],
) -> LedgerResult<()>
where
    S: KeyValueStore + ?Sized,
    O: AuthorizationOracle + ?Sized,
    L: ContractLifecycle + ?Sized,
{
    if !verify(store, config, oracle)? {
        return Err(LedgerError::Unauthorized);
    }
    lifecycle.update(code, manifest);
    Ok(())
}

/// Destroy the contract. Authority check only; the host tears down.
pub fn destroy<S, O, L>(
    store: &S,
    config: &ContractConfig,
    oracle: &O,
    lifecycle: &L,
) -> LedgerResult<()>
where
    S: KeyValueStore + ?Sized,
    O: AuthorizationOracle + ?Sized,
    L: ContractLifecycle + ?Sized,
{
    if !verify(store, config, oracle)? {
        return Err(LedgerError::Unauthorized);
    }
    lifecycle.destroy();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::{authorized_addresses, mint_fee};
    use super::*;
    use crate::ledger::testing::{addr, MockHost, RecordingLifecycle};
    use crate::ledger::MemoryStore;

    fn setup() -> (MemoryStore, ContractConfig, MockHost) {
        let store = MemoryStore::new();
        let config = ContractConfig::new(addr(1), "PHNTM", 100);
        let host = MockHost::new();
        (store, config, host)
    }

    #[test]
    fn test_deploy_seeds_configuration() {
        let (mut store, config, host) = setup();
        host.oracle.allow(config.owner);

        assert!(deploy(&mut store, &config, &host.runtime()).unwrap());
        assert_eq!(mint_fee(&store).unwrap(), 100);

        let authorized = authorized_addresses(&store).unwrap();
        assert_eq!(authorized.len(), 1);
        assert!(authorized.contains(&config.owner));

        assert_eq!(
            host.sink.take(),
            vec![Event::Deploy {
                owner: config.owner,
                symbol: "PHNTM".to_string(),
            }]
        );
    }

    #[test]
    fn test_deploy_requires_owner_witness() {
        let (mut store, config, host) = setup();
        assert!(!deploy(&mut store, &config, &host.runtime()).unwrap());
        assert!(store.is_empty());
        assert!(host.sink.take().is_empty());
    }

    #[test]
    fn test_deploy_is_guarded_against_redeployment() {
        let (mut store, config, host) = setup();
        host.oracle.allow(config.owner);

        assert!(deploy(&mut store, &config, &host.runtime()).unwrap());
        let snapshot = store.clone();

        assert!(!deploy(&mut store, &config, &host.runtime()).unwrap());
        assert_eq!(store.len(), snapshot.len());
        assert_eq!(mint_fee(&store).unwrap(), 100);
    }

    #[test]
    fn test_deploy_validates_config() {
        let (mut store, _, host) = setup();
        let config = ContractConfig::new(addr(1), "bad symbol", 0);
        host.oracle.allow(config.owner);

        let result = deploy(&mut store, &config, &host.runtime());
        assert_eq!(result, Err(LedgerError::InvalidSymbol));
    }

    #[test]
    fn test_update_and_destroy_are_gated() {
        let (store, config, host) = setup();
        let lifecycle = RecordingLifecycle::new();

        let result = update(&store, &config, &host.oracle, &lifecycle, b"code", b"manifest");
        assert_eq!(result, Err(LedgerError::Unauthorized));
        assert!(lifecycle.updates().is_empty());

        host.oracle.allow(config.owner);
        update(&store, &config, &host.oracle, &lifecycle, b"code", b"manifest").unwrap();
        assert_eq!(
            lifecycle.updates(),
            vec![(b"code".to_vec(), b"manifest".to_vec())]
        );

        destroy(&store, &config, &host.oracle, &lifecycle).unwrap();
        assert!(lifecycle.destroyed());
    }
}
