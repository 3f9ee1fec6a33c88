use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::logic::LedgerStore;
use crate::model::{Address, Amount, Error, Result, TokenMetadata, Transfer};

/// Invariant breaches found by [`LedgerEngine::audit`]. A correct engine never
/// produces one; they exist to check hosts that hand-edit state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuditError {
    #[error("sum of balances {balances} differs from total supply {supply}")]
    SupplyMismatch { balances: Amount, supply: Amount },
    #[error("null identity holds {0}")]
    NullHolder(Amount),
}

/// Self-contained ledger over ordered in-memory maps.
///
/// Zero balances and allowances are not stored, so an account that spent
/// everything is indistinguishable from one never seen.
#[derive(Debug, Clone)]
pub struct LedgerEngine {
    metadata: TokenMetadata,
    owner_acc: Address,
    total_supply: Amount,
    balances: BTreeMap<Address, Amount>,
    allowances: BTreeMap<(Address, Address), Amount>,
    events: Vec<Transfer<Address>>,
}

impl LedgerEngine {
    pub fn new(owner_acc: Address) -> Result<Self> {
        Self::with_metadata(owner_acc, TokenMetadata::default())
    }

    pub fn with_metadata(owner_acc: Address, metadata: TokenMetadata) -> Result<Self> {
        if owner_acc.is_zero() {
            return Err(Error::InvalidOwner)
        }
        tracing::debug!(target: "rayls_ledger", ?owner_acc, symbol = %metadata.symbol, "ledger created");
        Ok(Self {
            metadata,
            owner_acc,
            total_supply: Amount::zero(),
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
            events: Vec::new(),
        })
    }

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    /// Events emitted since creation or the last [`Self::take_events`].
    pub fn events(&self) -> &[Transfer<Address>] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<Transfer<Address>> {
        core::mem::take(&mut self.events)
    }

    /// Accounts with a non-zero balance, in address order.
    pub fn holders(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.balances.iter()
    }

    /// Recomputes the supply from scratch and checks it against the tracked
    /// total; also checks that the null identity holds nothing.
    pub fn audit(&self) -> core::result::Result<(), AuditError> {
        if let Some(held) = self.balances.get(&Address::zero()) {
            return Err(AuditError::NullHolder(*held))
        }
        let mut sum = Amount::zero();
        for amount_val in self.balances.values() {
            sum = sum.checked_add(*amount_val).ok_or(AuditError::SupplyMismatch {
                balances: Amount::MAX,
                supply: self.total_supply,
            })?;
        }
        if sum != self.total_supply {
            return Err(AuditError::SupplyMismatch { balances: sum, supply: self.total_supply })
        }
        Ok(())
    }
}

impl LedgerStore for LedgerEngine {
    type Account = Address;

    fn null_account() -> Address {
        Address::zero()
    }

    fn read_owner(&self) -> Address {
        self.owner_acc
    }

    fn write_owner(&mut self, owner_acc: Address) {
        self.owner_acc = owner_acc;
    }

    fn read_supply(&self) -> Amount {
        self.total_supply
    }

    fn write_supply(&mut self, amount_val: Amount) {
        self.total_supply = amount_val;
    }

    fn read_balance(&self, acc: &Address) -> Amount {
        self.balances.get(acc).copied().unwrap_or_default()
    }

    fn write_balance(&mut self, acc: &Address, amount_val: Amount) {
        if amount_val.is_zero() {
            self.balances.remove(acc);
        } else {
            self.balances.insert(*acc, amount_val);
        }
    }

    fn read_allowance(&self, owner_acc: &Address, spender_acc: &Address) -> Amount {
        self.allowances
            .get(&(*owner_acc, *spender_acc))
            .copied()
            .unwrap_or_default()
    }

    fn write_allowance(&mut self, owner_acc: &Address, spender_acc: &Address, amount_val: Amount) {
        let key = (*owner_acc, *spender_acc);
        if amount_val.is_zero() {
            self.allowances.remove(&key);
        } else {
            self.allowances.insert(key, amount_val);
        }
    }

    fn emit(&mut self, event: Transfer<Address>) {
        self.events.push(event);
    }
}
