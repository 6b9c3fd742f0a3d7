// Phantom NFT Ledger - Test Support
// Reusable in-memory doubles for the host collaborators. Kept in the
// library (not behind cfg(test)) so integration tests and downstream
// embedders can drive the ledger without a host environment.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use crate::crypto::{hash, Address, Hash, ADDRESS_SIZE};

use super::runtime::{
    AuthorizationOracle, ContractLifecycle, FeeToken, NotificationSink, ReceiverHook, Runtime,
};
use super::types::{Event, TokenId};

/// Deterministic test address
pub fn addr(tag: u8) -> Address {
    Address::new([tag; ADDRESS_SIZE])
}

/// Deterministic test transaction hash
pub fn tx_hash(tag: u8) -> Hash {
    hash(&[tag])
}

// ========================================
// Authorization Oracle
// ========================================

/// Oracle that witnesses a fixed set of addresses
#[derive(Default)]
pub struct MockOracle {
    witnessed: RefCell<HashSet<Address>>,
}

impl MockOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn witnessing(addresses: impl IntoIterator<Item = Address>) -> Self {
        Self {
            witnessed: RefCell::new(addresses.into_iter().collect()),
        }
    }

    pub fn allow(&self, address: Address) {
        self.witnessed.borrow_mut().insert(address);
    }

    pub fn revoke(&self, address: &Address) {
        self.witnessed.borrow_mut().remove(address);
    }
}

impl AuthorizationOracle for MockOracle {
    fn is_authorized(&self, principal: &Address) -> bool {
        self.witnessed.borrow().contains(principal)
    }
}

// ========================================
// Fee Token
// ========================================

/// In-memory fungible token with per-account balances and a failure switch
#[derive(Default)]
pub struct MockFeeToken {
    balances: RefCell<HashMap<Address, u64>>,
    fail_transfers: Cell<bool>,
}

impl MockFeeToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fund(&self, account: Address, amount: u64) {
        *self.balances.borrow_mut().entry(account).or_insert(0) += amount;
    }

    pub fn set_fail_transfers(&self, fail: bool) {
        self.fail_transfers.set(fail);
    }
}

impl FeeToken for MockFeeToken {
    fn transfer(&self, from: &Address, to: &Address, amount: u64) -> bool {
        if self.fail_transfers.get() {
            return false;
        }
        let mut balances = self.balances.borrow_mut();
        let available = balances.get(from).copied().unwrap_or(0);
        if available < amount {
            return false;
        }
        balances.insert(*from, available - amount);
        *balances.entry(*to).or_insert(0) += amount;
        true
    }

    fn balance_of(&self, account: &Address) -> u64 {
        self.balances.borrow().get(account).copied().unwrap_or(0)
    }
}

// ========================================
// Notification Sink
// ========================================

/// Sink recording every emitted event
#[derive(Default)]
pub struct RecordingSink {
    events: RefCell<Vec<Event>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn take(&self) -> Vec<Event> {
        self.events.borrow_mut().drain(..).collect()
    }
}

impl NotificationSink for RecordingSink {
    fn emit(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

// ========================================
// Receiver Hook
// ========================================

/// A received-token callback observed by a mock contract account
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceivedCall {
    pub to: Address,
    pub from: Option<Address>,
    pub amount: u64,
    pub token: TokenId,
    pub data: Option<Vec<u8>>,
}

/// Hook treating a fixed set of addresses as contracts and recording calls
#[derive(Default)]
pub struct RecordingReceiver {
    contracts: RefCell<HashSet<Address>>,
    calls: RefCell<Vec<ReceivedCall>>,
}

impl RecordingReceiver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_contract(&self, address: Address) {
        self.contracts.borrow_mut().insert(address);
    }

    pub fn calls(&self) -> Vec<ReceivedCall> {
        self.calls.borrow().clone()
    }
}

impl ReceiverHook for RecordingReceiver {
    fn is_contract(&self, address: &Address) -> bool {
        self.contracts.borrow().contains(address)
    }

    fn on_token_received(
        &self,
        to: &Address,
        from: Option<&Address>,
        amount: u64,
        token: &TokenId,
        data: Option<&[u8]>,
    ) {
        self.calls.borrow_mut().push(ReceivedCall {
            to: *to,
            from: from.copied(),
            amount,
            token: token.clone(),
            data: data.map(|d| d.to_vec()),
        });
    }
}

// ========================================
// Contract Lifecycle
// ========================================

/// Lifecycle collaborator recording update/destroy requests
#[derive(Default)]
pub struct RecordingLifecycle {
    updates: RefCell<Vec<(Vec<u8>, Vec<u8>)>>,
    destroyed: Cell<bool>,
}

impl RecordingLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.updates.borrow().clone()
    }

    pub fn destroyed(&self) -> bool {
        self.destroyed.get()
    }
}

impl ContractLifecycle for RecordingLifecycle {
    fn update(&self, code: &[u8], manifest: &[u8]) {
        self.updates
            .borrow_mut()
            .push((code.to_vec(), manifest.to_vec()));
    }

    fn destroy(&self) {
        self.destroyed.set(true);
    }
}

// ========================================
// Host Fixture
// ========================================

/// All collaborators in one place, with a `runtime()` accessor matching the
/// shape the operations expect.
pub struct MockHost {
    pub oracle: MockOracle,
    pub fee_token: MockFeeToken,
    pub sink: RecordingSink,
    pub receiver: RecordingReceiver,
    pub executing: Address,
    pub tx_counter: Cell<u8>,
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            oracle: MockOracle::new(),
            fee_token: MockFeeToken::new(),
            sink: RecordingSink::new(),
            receiver: RecordingReceiver::new(),
            executing: addr(0xEE),
            tx_counter: Cell::new(0),
        }
    }

    /// Build a runtime for the next call, with a fresh transaction hash
    pub fn runtime(&self) -> Runtime<'_, MockOracle, MockFeeToken, RecordingSink, RecordingReceiver> {
        let nonce = self.tx_counter.get();
        self.tx_counter.set(nonce.wrapping_add(1));
        Runtime::new(
            &self.oracle,
            &self.fee_token,
            &self.sink,
            &self.receiver,
            self.executing,
            tx_hash(nonce),
        )
    }
}
