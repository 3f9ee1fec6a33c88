use alloc::string::String;

pub use primitive_types::{H160 as Address, U256 as Amount};

pub type Result<T> = core::result::Result<T, Error>;

/// Decimals used when no metadata is supplied (ERC20 convention).
pub const DEFAULT_DECIMALS: u8 = 18;

pub const DEFAULT_NAME: &str = "Rayls Token";

pub const DEFAULT_SYMBOL: &str = "RLS";

/// Reasons a call is rejected. Every variant is detected before the ledger
/// writes anything, so a rejected call never leaves a trace in state.
#[derive(scale::Encode, scale::Decode, Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub enum Error {
    #[error("Ownable: caller is not the owner")]
    Unauthorized,
    #[error("insufficient balance")]
    InsufficientBalance,
    #[error("insufficient allowance")]
    InsufficientAllowance,
    #[error("recipient is the null identity")]
    InvalidRecipient,
    #[error("sender is the null identity")]
    InvalidSender,
    #[error("spender is the null identity")]
    InvalidSpender,
    #[error("new owner is the null identity")]
    InvalidOwner,
    #[error("arithmetic overflow")]
    Overflow,
}

/// The single observable event. Mint uses the null identity as `from`,
/// burn uses it as `to`.
#[derive(scale::Encode, scale::Decode, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub struct Transfer<A> {
    pub from: A,
    pub to: A,
    pub amount: Amount,
}

/// Display-only token configuration.
#[derive(scale::Encode, scale::Decode, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenMetadata {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self { name: name.into(), symbol: symbol.into(), decimals }
    }
}

impl Default for TokenMetadata {
    fn default() -> Self {
        Self::new(DEFAULT_NAME, DEFAULT_SYMBOL, DEFAULT_DECIMALS)
    }
}

/// One mutating call, caller included. Lets a host queue, log or replay
/// calls and feed them to [`crate::Ledger::apply`].
#[derive(scale::Encode, scale::Decode, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub enum Operation<A> {
    Mint { caller: A, to_acc: A, amount_val: Amount },
    Burn { caller: A, amount_val: Amount },
    BurnFrom { caller: A, from_acc: A, amount_val: Amount },
    Transfer { caller: A, to_acc: A, amount_val: Amount },
    Approve { caller: A, spender_acc: A, amount_val: Amount },
    IncreaseAllowance { caller: A, spender_acc: A, added_val: Amount },
    DecreaseAllowance { caller: A, spender_acc: A, subtracted_val: Amount },
    TransferFrom { caller: A, from_acc: A, to_acc: A, amount_val: Amount },
    TransferOwnership { caller: A, new_owner: A },
}

impl<A: Copy> Operation<A> {
    pub fn caller(&self) -> A {
        match *self {
            Operation::Mint { caller, .. }
            | Operation::Burn { caller, .. }
            | Operation::BurnFrom { caller, .. }
            | Operation::Transfer { caller, .. }
            | Operation::Approve { caller, .. }
            | Operation::IncreaseAllowance { caller, .. }
            | Operation::DecreaseAllowance { caller, .. }
            | Operation::TransferFrom { caller, .. }
            | Operation::TransferOwnership { caller, .. } => caller,
        }
    }

    /// Short name used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::Mint { .. } => "mint",
            Operation::Burn { .. } => "burn",
            Operation::BurnFrom { .. } => "burn_from",
            Operation::Transfer { .. } => "transfer",
            Operation::Approve { .. } => "approve",
            Operation::IncreaseAllowance { .. } => "increase_allowance",
            Operation::DecreaseAllowance { .. } => "decrease_allowance",
            Operation::TransferFrom { .. } => "transfer_from",
            Operation::TransferOwnership { .. } => "transfer_ownership",
        }
    }
}
