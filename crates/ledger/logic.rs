use core::fmt;

use crate::model::{Amount, Error, Operation, Result, Transfer};

const LOG_TARGET: &str = "rayls_ledger";

/// Raw state access the ledger rules run against.
///
/// Implementors only persist values; they never validate. Absent balances and
/// allowances must read as zero, and writing zero may drop the entry.
pub trait LedgerStore {
    type Account: Copy + Eq + fmt::Debug;

    /// The sentinel "no account" identity (mint source, burn destination).
    fn null_account() -> Self::Account;

    fn is_null(account: &Self::Account) -> bool {
        *account == Self::null_account()
    }

    fn read_owner(&self) -> Self::Account;
    fn write_owner(&mut self, owner_acc: Self::Account);

    fn read_supply(&self) -> Amount;
    fn write_supply(&mut self, amount_val: Amount);

    fn read_balance(&self, acc: &Self::Account) -> Amount;
    fn write_balance(&mut self, acc: &Self::Account, amount_val: Amount);

    fn read_allowance(&self, owner_acc: &Self::Account, spender_acc: &Self::Account) -> Amount;
    fn write_allowance(
        &mut self,
        owner_acc: &Self::Account,
        spender_acc: &Self::Account,
        amount_val: Amount,
    );

    fn emit(&mut self, event: Transfer<Self::Account>);
}

/// Token rules over any [`LedgerStore`].
///
/// Each mutating call checks all of its preconditions before the first write,
/// so an `Err` means the store was not touched. Exactly one [`Transfer`] is
/// emitted per successful mint, burn, burn_from, transfer or transfer_from.
pub trait Ledger: LedgerStore {
    // -------- read API --------

    fn balance_of(&self, acc: &Self::Account) -> Amount {
        self.read_balance(acc)
    }

    fn allowance(&self, owner_acc: &Self::Account, spender_acc: &Self::Account) -> Amount {
        self.read_allowance(owner_acc, spender_acc)
    }

    fn total_supply(&self) -> Amount {
        self.read_supply()
    }

    fn owner(&self) -> Self::Account {
        self.read_owner()
    }

    // -------- write API --------

    /// Privileged mint: caller must be the owner.
    fn mint(
        &mut self,
        caller: Self::Account,
        to_acc: Self::Account,
        amount_val: Amount,
    ) -> Result<()> {
        only_owner(self, "mint", caller)?;
        if Self::is_null(&to_acc) {
            return Err(deny("mint", Error::InvalidRecipient))
        }
        let new_supply = self
            .read_supply()
            .checked_add(amount_val)
            .ok_or_else(|| deny("mint", Error::Overflow))?;
        let new_to = self
            .read_balance(&to_acc)
            .checked_add(amount_val)
            .ok_or_else(|| deny("mint", Error::Overflow))?;

        self.write_supply(new_supply);
        self.write_balance(&to_acc, new_to);
        self.emit(Transfer { from: Self::null_account(), to: to_acc, amount: amount_val });
        tracing::debug!(target: LOG_TARGET, ?to_acc, %amount_val, "minted");
        Ok(())
    }

    /// Any holder may destroy their own tokens.
    fn burn(&mut self, caller: Self::Account, amount_val: Amount) -> Result<()> {
        let burn = check_burn(self, "burn", caller, amount_val)?;
        commit_burn(self, burn);
        Ok(())
    }

    /// Destroys tokens of `from_acc`, spending the caller's allowance.
    fn burn_from(
        &mut self,
        caller: Self::Account,
        from_acc: Self::Account,
        amount_val: Amount,
    ) -> Result<()> {
        let new_allow = check_spend(self, "burn_from", from_acc, caller, amount_val)?;
        let burn = check_burn(self, "burn_from", from_acc, amount_val)?;

        self.write_allowance(&from_acc, &caller, new_allow);
        commit_burn(self, burn);
        Ok(())
    }

    fn transfer(
        &mut self,
        caller: Self::Account,
        to_acc: Self::Account,
        amount_val: Amount,
    ) -> Result<()> {
        let mv = check_move(self, "transfer", caller, to_acc, amount_val)?;
        commit_move(self, mv);
        Ok(())
    }

    /// Sets (does not add to) what `spender_acc` may move out of the caller's balance.
    fn approve(
        &mut self,
        caller: Self::Account,
        spender_acc: Self::Account,
        amount_val: Amount,
    ) -> Result<()> {
        check_approval::<Self>("approve", caller, spender_acc)?;
        self.write_allowance(&caller, &spender_acc, amount_val);
        tracing::debug!(target: LOG_TARGET, owner_acc = ?caller, ?spender_acc, %amount_val, "approved");
        Ok(())
    }

    fn increase_allowance(
        &mut self,
        caller: Self::Account,
        spender_acc: Self::Account,
        added_val: Amount,
    ) -> Result<()> {
        check_approval::<Self>("increase_allowance", caller, spender_acc)?;
        let new_allow = self
            .read_allowance(&caller, &spender_acc)
            .checked_add(added_val)
            .ok_or_else(|| deny("increase_allowance", Error::Overflow))?;
        self.write_allowance(&caller, &spender_acc, new_allow);
        tracing::debug!(target: LOG_TARGET, owner_acc = ?caller, ?spender_acc, %new_allow, "allowance increased");
        Ok(())
    }

    fn decrease_allowance(
        &mut self,
        caller: Self::Account,
        spender_acc: Self::Account,
        subtracted_val: Amount,
    ) -> Result<()> {
        check_approval::<Self>("decrease_allowance", caller, spender_acc)?;
        let new_allow = self
            .read_allowance(&caller, &spender_acc)
            .checked_sub(subtracted_val)
            .ok_or_else(|| deny("decrease_allowance", Error::InsufficientAllowance))?;
        self.write_allowance(&caller, &spender_acc, new_allow);
        tracing::debug!(target: LOG_TARGET, owner_acc = ?caller, ?spender_acc, %new_allow, "allowance decreased");
        Ok(())
    }

    /// Delegated transfer. The allowance is reduced by exactly `amount_val`
    /// and never restored, including for an allowance of `Amount::MAX`.
    fn transfer_from(
        &mut self,
        caller: Self::Account,
        from_acc: Self::Account,
        to_acc: Self::Account,
        amount_val: Amount,
    ) -> Result<()> {
        let new_allow = check_spend(self, "transfer_from", from_acc, caller, amount_val)?;
        let mv = check_move(self, "transfer_from", from_acc, to_acc, amount_val)?;

        self.write_allowance(&from_acc, &caller, new_allow);
        commit_move(self, mv);
        Ok(())
    }

    /// Single-step handoff, gated like mint.
    fn transfer_ownership(
        &mut self,
        caller: Self::Account,
        new_owner: Self::Account,
    ) -> Result<()> {
        only_owner(self, "transfer_ownership", caller)?;
        if Self::is_null(&new_owner) {
            return Err(deny("transfer_ownership", Error::InvalidOwner))
        }
        self.write_owner(new_owner);
        tracing::info!(target: LOG_TARGET, previous_owner = ?caller, ?new_owner, "ownership transferred");
        Ok(())
    }

    fn apply(&mut self, op: Operation<Self::Account>) -> Result<()> {
        match op {
            Operation::Mint { caller, to_acc, amount_val } => self.mint(caller, to_acc, amount_val),
            Operation::Burn { caller, amount_val } => self.burn(caller, amount_val),
            Operation::BurnFrom { caller, from_acc, amount_val } => {
                self.burn_from(caller, from_acc, amount_val)
            }
            Operation::Transfer { caller, to_acc, amount_val } => {
                self.transfer(caller, to_acc, amount_val)
            }
            Operation::Approve { caller, spender_acc, amount_val } => {
                self.approve(caller, spender_acc, amount_val)
            }
            Operation::IncreaseAllowance { caller, spender_acc, added_val } => {
                self.increase_allowance(caller, spender_acc, added_val)
            }
            Operation::DecreaseAllowance { caller, spender_acc, subtracted_val } => {
                self.decrease_allowance(caller, spender_acc, subtracted_val)
            }
            Operation::TransferFrom { caller, from_acc, to_acc, amount_val } => {
                self.transfer_from(caller, from_acc, to_acc, amount_val)
            }
            Operation::TransferOwnership { caller, new_owner } => {
                self.transfer_ownership(caller, new_owner)
            }
        }
    }
}

impl<S: LedgerStore + ?Sized> Ledger for S {}

// ---- internals ----

fn deny(op: &'static str, err: Error) -> Error {
    tracing::debug!(target: LOG_TARGET, op, reason = %err, "call rejected");
    err
}

fn only_owner<S: LedgerStore + ?Sized>(store: &S, op: &'static str, caller: S::Account) -> Result<()> {
    if caller != store.read_owner() {
        return Err(deny(op, Error::Unauthorized))
    }
    Ok(())
}

fn check_approval<S: LedgerStore + ?Sized>(
    op: &'static str,
    owner_acc: S::Account,
    spender_acc: S::Account,
) -> Result<()> {
    if S::is_null(&owner_acc) {
        return Err(deny(op, Error::InvalidSender))
    }
    if S::is_null(&spender_acc) {
        return Err(deny(op, Error::InvalidSpender))
    }
    Ok(())
}

/// Returns the allowance left after spending `amount_val`.
fn check_spend<S: LedgerStore + ?Sized>(
    store: &S,
    op: &'static str,
    owner_acc: S::Account,
    spender_acc: S::Account,
    amount_val: Amount,
) -> Result<Amount> {
    store
        .read_allowance(&owner_acc, &spender_acc)
        .checked_sub(amount_val)
        .ok_or_else(|| deny(op, Error::InsufficientAllowance))
}

/// A validated balance move, ready to be written.
struct Move<A> {
    from_acc: A,
    to_acc: A,
    amount_val: Amount,
    new_from: Amount,
    new_to: Amount,
}

fn check_move<S: LedgerStore + ?Sized>(
    store: &S,
    op: &'static str,
    from_acc: S::Account,
    to_acc: S::Account,
    amount_val: Amount,
) -> Result<Move<S::Account>> {
    if S::is_null(&from_acc) {
        return Err(deny(op, Error::InvalidSender))
    }
    if S::is_null(&to_acc) {
        return Err(deny(op, Error::InvalidRecipient))
    }
    let from_bal = store.read_balance(&from_acc);
    let new_from = from_bal
        .checked_sub(amount_val)
        .ok_or_else(|| deny(op, Error::InsufficientBalance))?;

    // self-transfer: net zero, balance stays as is
    let (new_from, new_to) = if from_acc == to_acc {
        (from_bal, from_bal)
    } else {
        let new_to = store
            .read_balance(&to_acc)
            .checked_add(amount_val)
            .ok_or_else(|| deny(op, Error::Overflow))?;
        (new_from, new_to)
    };
    Ok(Move { from_acc, to_acc, amount_val, new_from, new_to })
}

fn commit_move<S: LedgerStore + ?Sized>(store: &mut S, mv: Move<S::Account>) {
    let Move { from_acc, to_acc, amount_val, new_from, new_to } = mv;
    store.write_balance(&from_acc, new_from);
    store.write_balance(&to_acc, new_to);
    store.emit(Transfer { from: from_acc, to: to_acc, amount: amount_val });
    tracing::debug!(target: LOG_TARGET, ?from_acc, ?to_acc, %amount_val, "transferred");
}

struct Burn<A> {
    from_acc: A,
    amount_val: Amount,
    new_from: Amount,
    new_supply: Amount,
}

fn check_burn<S: LedgerStore + ?Sized>(
    store: &S,
    op: &'static str,
    from_acc: S::Account,
    amount_val: Amount,
) -> Result<Burn<S::Account>> {
    if S::is_null(&from_acc) {
        return Err(deny(op, Error::InvalidSender))
    }
    let new_from = store
        .read_balance(&from_acc)
        .checked_sub(amount_val)
        .ok_or_else(|| deny(op, Error::InsufficientBalance))?;
    // supply covers every balance, so this only fails on a corrupted store
    let new_supply = store
        .read_supply()
        .checked_sub(amount_val)
        .ok_or_else(|| deny(op, Error::Overflow))?;
    Ok(Burn { from_acc, amount_val, new_from, new_supply })
}

fn commit_burn<S: LedgerStore + ?Sized>(store: &mut S, burn: Burn<S::Account>) {
    let Burn { from_acc, amount_val, new_from, new_supply } = burn;
    store.write_balance(&from_acc, new_from);
    store.write_supply(new_supply);
    store.emit(Transfer { from: from_acc, to: S::null_account(), amount: amount_val });
    tracing::debug!(target: LOG_TARGET, ?from_acc, %amount_val, "burned");
}
