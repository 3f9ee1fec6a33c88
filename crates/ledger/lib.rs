//! Ledger rules for the Rayls fungible token: balances, allowances, total
//! supply and a single owner who alone may mint.
//!
//! The rules live in [`Ledger`], which runs on top of any [`LedgerStore`].
//! [`LedgerEngine`] is the in-memory store; the on-chain contract supplies its
//! own store over contract storage. Builds `no_std` without the `std` feature.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod engine;
mod logic;
mod model;
#[cfg(feature = "std")]
mod shared;

pub use engine::{AuditError, LedgerEngine};
pub use logic::{Ledger, LedgerStore};
pub use model::{
    Address, Amount, Error, Operation, Result, TokenMetadata, Transfer, DEFAULT_DECIMALS,
    DEFAULT_NAME, DEFAULT_SYMBOL,
};
#[cfg(feature = "std")]
pub use shared::SharedLedger;
