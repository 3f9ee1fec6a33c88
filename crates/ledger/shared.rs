use std::sync::Arc;

use parking_lot::Mutex;

use crate::engine::LedgerEngine;
use crate::logic::Ledger;
use crate::model::{Address, Amount, Operation, Result, Transfer};

/// Cloneable handle that runs every call on one [`LedgerEngine`] under a
/// single lock, giving all threads the same total order of operations.
#[derive(Debug, Clone)]
pub struct SharedLedger {
    inner: Arc<Mutex<LedgerEngine>>,
}

impl SharedLedger {
    pub fn new(engine: LedgerEngine) -> Self {
        Self { inner: Arc::new(Mutex::new(engine)) }
    }

    pub fn submit(&self, op: Operation<Address>) -> Result<()> {
        let (kind, caller) = (op.kind(), op.caller());
        let mut engine = self.inner.lock();
        let outcome = engine.apply(op);
        tracing::trace!(target: "rayls_ledger", kind, ?caller, ok = outcome.is_ok(), "operation sequenced");
        outcome
    }

    /// Runs `f` with exclusive access, for callers that need several reads
    /// (or a read and a write) to observe one consistent state.
    pub fn with<R>(&self, f: impl FnOnce(&mut LedgerEngine) -> R) -> R {
        let mut engine = self.inner.lock();
        f(&mut *engine)
    }

    pub fn balance_of(&self, acc: &Address) -> Amount {
        self.inner.lock().balance_of(acc)
    }

    pub fn allowance(&self, owner_acc: &Address, spender_acc: &Address) -> Amount {
        self.inner.lock().allowance(owner_acc, spender_acc)
    }

    pub fn total_supply(&self) -> Amount {
        self.inner.lock().total_supply()
    }

    pub fn owner(&self) -> Address {
        self.inner.lock().owner()
    }

    pub fn drain_events(&self) -> Vec<Transfer<Address>> {
        self.inner.lock().take_events()
    }
}

impl From<LedgerEngine> for SharedLedger {
    fn from(engine: LedgerEngine) -> Self {
        Self::new(engine)
    }
}
