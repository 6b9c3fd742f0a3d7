// Phantom NFT Ledger - Host Collaborators
// Interfaces to the services the host environment provides. The ledger only
// ever consumes these; it never implements them.

use crate::crypto::{Address, Hash};

use super::types::{Event, TokenId};

// ========================================
// Collaborator Interfaces
// ========================================

/// Host witness check: has `principal` cryptographically authorized the
/// current operation? The ledger treats the answer as an opaque boolean.
pub trait AuthorizationOracle {
    fn is_authorized(&self, principal: &Address) -> bool;
}

/// External fungible token used to collect and pay out mint fees
pub trait FeeToken {
    /// Move `amount` from one account to another. Returns whether the
    /// transfer went through.
    fn transfer(&self, from: &Address, to: &Address, amount: u64) -> bool;

    fn balance_of(&self, account: &Address) -> u64;
}

/// Fire-and-forget event emission. The ledger never observes a result.
pub trait NotificationSink {
    fn emit(&self, event: Event);
}

/// Recipient-side notification. The hook is only invoked when the recipient
/// is itself a contract; failures inside the hook are the receiver's
/// problem, the ledger does not retry.
pub trait ReceiverHook {
    fn is_contract(&self, address: &Address) -> bool;

    fn on_token_received(
        &self,
        to: &Address,
        from: Option<&Address>,
        amount: u64,
        token: &TokenId,
        data: Option<&[u8]>,
    );
}

/// Contract lifecycle effects (code upgrade, destruction). The ledger gates
/// these behind authorization and delegates the actual work.
pub trait ContractLifecycle {
    fn update(&self, code: &[u8], manifest: &[u8]);

    fn destroy(&self);
}

// ========================================
// Runtime Bundle
// ========================================

/// Per-invocation bundle of collaborator handles plus transaction context.
/// `executing` is the ledger contract's own fee-token account; `tx_hash`
/// supplies per-transaction entropy for token id derivation.
pub struct Runtime<'a, O: ?Sized, F: ?Sized, N: ?Sized, H: ?Sized> {
    pub oracle: &'a O,
    pub fee_token: &'a F,
    pub sink: &'a N,
    pub receiver: &'a H,
    pub executing: Address,
    pub tx_hash: Hash,
}

impl<'a, O, F, N, H> Runtime<'a, O, F, N, H>
where
    O: AuthorizationOracle + ?Sized,
    F: FeeToken + ?Sized,
    N: NotificationSink + ?Sized,
    H: ReceiverHook + ?Sized,
{
    pub fn new(
        oracle: &'a O,
        fee_token: &'a F,
        sink: &'a N,
        receiver: &'a H,
        executing: Address,
        tx_hash: Hash,
    ) -> Self {
        Self {
            oracle,
            fee_token,
            sink,
            receiver,
            executing,
            tx_hash,
        }
    }
}
