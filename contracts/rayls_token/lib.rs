#![cfg_attr(not(feature = "std"), no_std, no_main)]

#[ink::contract]
mod rayls_token {
    use ink::codegen::Env;
    use ink::prelude::string::String;
    use ink::storage::Mapping;
    use rayls_ledger::{Amount, Ledger, LedgerStore, TokenMetadata};

    pub use rayls_ledger::Error;

    pub type Result<T> = core::result::Result<T, Error>;

    /// Storage form of an [`Amount`]: its four 64-bit limbs, least significant first.
    type Words = [u64; 4];

    #[ink(event)]
    pub struct Transfer {
        #[ink(topic)]
        from: AccountId,
        #[ink(topic)]
        to: AccountId,
        value: Amount,
    }

    #[ink(storage)]
    pub struct RaylsToken {
        // governance / control
        owner_acc: AccountId,

        // metadata
        name: String,
        symbol: String,
        decimals: u8,

        // token state
        total_supply: Words,
        balances: Mapping<AccountId, Words>,
        allowances: Mapping<(AccountId, AccountId), Words>,
    }

    impl RaylsToken {
        // -------- constructors --------

        /// Deploys with default metadata; the deployer becomes owner.
        #[ink(constructor)]
        pub fn new() -> Self {
            Self::from_metadata(TokenMetadata::default())
        }

        #[ink(constructor)]
        pub fn with_metadata(name: String, symbol: String, decimals: u8) -> Self {
            Self::from_metadata(TokenMetadata::new(name, symbol, decimals))
        }

        fn from_metadata(metadata: TokenMetadata) -> Self {
            let TokenMetadata { name, symbol, decimals } = metadata;
            Self {
                owner_acc: Self::env().caller(),
                name,
                symbol,
                decimals,
                total_supply: Amount::zero().0,
                balances: Mapping::default(),
                allowances: Mapping::default(),
            }
        }

        // -------- read API --------

        #[ink(message)]
        pub fn name(&self) -> String {
            self.name.clone()
        }

        #[ink(message)]
        pub fn symbol(&self) -> String {
            self.symbol.clone()
        }

        #[ink(message)]
        pub fn decimals(&self) -> u8 {
            self.decimals
        }

        #[ink(message)]
        pub fn total_supply(&self) -> Amount {
            Ledger::total_supply(self)
        }

        #[ink(message)]
        pub fn balance_of(&self, owner_acc: AccountId) -> Amount {
            Ledger::balance_of(self, &owner_acc)
        }

        #[ink(message)]
        pub fn allowance(&self, owner_acc: AccountId, spender_acc: AccountId) -> Amount {
            Ledger::allowance(self, &owner_acc, &spender_acc)
        }

        #[ink(message)]
        pub fn owner(&self) -> AccountId {
            Ledger::owner(self)
        }

        // -------- write API --------

        /// Privileged mint: caller must be the owner.
        #[ink(message)]
        pub fn mint(&mut self, to_acc: AccountId, amount_val: Amount) -> Result<()> {
            let caller_acc = self.env().caller();
            Ledger::mint(self, caller_acc, to_acc, amount_val)
        }

        #[ink(message)]
        pub fn burn(&mut self, amount_val: Amount) -> Result<()> {
            let caller_acc = self.env().caller();
            Ledger::burn(self, caller_acc, amount_val)
        }

        #[ink(message)]
        pub fn burn_from(&mut self, from_acc: AccountId, amount_val: Amount) -> Result<()> {
            let caller_acc = self.env().caller();
            Ledger::burn_from(self, caller_acc, from_acc, amount_val)
        }

        #[ink(message)]
        pub fn transfer(&mut self, to_acc: AccountId, amount_val: Amount) -> Result<()> {
            let caller_acc = self.env().caller();
            Ledger::transfer(self, caller_acc, to_acc, amount_val)
        }

        #[ink(message)]
        pub fn approve(&mut self, spender_acc: AccountId, amount_val: Amount) -> Result<()> {
            let caller_acc = self.env().caller();
            Ledger::approve(self, caller_acc, spender_acc, amount_val)
        }

        #[ink(message)]
        pub fn increase_allowance(&mut self, spender_acc: AccountId, added_val: Amount) -> Result<()> {
            let caller_acc = self.env().caller();
            Ledger::increase_allowance(self, caller_acc, spender_acc, added_val)
        }

        #[ink(message)]
        pub fn decrease_allowance(&mut self, spender_acc: AccountId, subtracted_val: Amount) -> Result<()> {
            let caller_acc = self.env().caller();
            Ledger::decrease_allowance(self, caller_acc, spender_acc, subtracted_val)
        }

        #[ink(message)]
        pub fn transfer_from(
            &mut self,
            from_acc: AccountId,
            to_acc: AccountId,
            amount_val: Amount,
        ) -> Result<()> {
            let caller_acc = self.env().caller();
            Ledger::transfer_from(self, caller_acc, from_acc, to_acc, amount_val)
        }

        #[ink(message)]
        pub fn transfer_ownership(&mut self, new_owner: AccountId) -> Result<()> {
            let caller_acc = self.env().caller();
            Ledger::transfer_ownership(self, caller_acc, new_owner)
        }
    }

    impl Default for RaylsToken {
        fn default() -> Self {
            Self::new()
        }
    }

    // ---- storage binding for the ledger rules ----

    impl LedgerStore for RaylsToken {
        type Account = AccountId;

        fn null_account() -> AccountId {
            AccountId::from([0u8; 32])
        }

        fn read_owner(&self) -> AccountId {
            self.owner_acc
        }

        fn write_owner(&mut self, owner_acc: AccountId) {
            self.owner_acc = owner_acc;
        }

        fn read_supply(&self) -> Amount {
            Amount(self.total_supply)
        }

        fn write_supply(&mut self, amount_val: Amount) {
            self.total_supply = amount_val.0;
        }

        fn read_balance(&self, acc: &AccountId) -> Amount {
            self.balances.get(acc).map(Amount).unwrap_or_default()
        }

        fn write_balance(&mut self, acc: &AccountId, amount_val: Amount) {
            if amount_val.is_zero() {
                self.balances.remove(acc);
            } else {
                self.balances.insert(acc, &amount_val.0);
            }
        }

        fn read_allowance(&self, owner_acc: &AccountId, spender_acc: &AccountId) -> Amount {
            self.allowances
                .get(&(*owner_acc, *spender_acc))
                .map(Amount)
                .unwrap_or_default()
        }

        fn write_allowance(&mut self, owner_acc: &AccountId, spender_acc: &AccountId, amount_val: Amount) {
            let key = (*owner_acc, *spender_acc);
            if amount_val.is_zero() {
                self.allowances.remove(&key);
            } else {
                self.allowances.insert(&key, &amount_val.0);
            }
        }

        fn emit(&mut self, event: rayls_ledger::Transfer<AccountId>) {
            self.env().emit_event(Transfer { from: event.from, to: event.to, value: event.amount });
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use ink::env::test::{default_accounts, recorded_events, set_caller, DefaultAccounts};
        use ink::env::DefaultEnvironment;
        use ink::prelude::vec::Vec;

        fn accounts() -> DefaultAccounts<DefaultEnvironment> {
            default_accounts::<DefaultEnvironment>()
        }

        fn null() -> AccountId {
            AccountId::from([0u8; 32])
        }

        fn tokens(n: u64) -> Amount {
            Amount::from(n) * Amount::exp10(18)
        }

        fn transfers() -> Vec<(AccountId, AccountId, Amount)> {
            recorded_events()
                .map(|event| {
                    let decoded = <Transfer as scale::Decode>::decode(&mut &event.data[..])
                        .expect("event data decodes as Transfer");
                    (decoded.from, decoded.to, decoded.value)
                })
                .collect()
        }

        #[ink::test]
        fn deployer_is_owner() {
            let accs = accounts();
            set_caller::<DefaultEnvironment>(accs.alice);
            let token = RaylsToken::new();

            assert_eq!(token.owner(), accs.alice);
            assert_eq!(token.total_supply(), Amount::zero());
            assert_eq!(token.decimals(), 18);
            assert_eq!(token.name(), "Rayls Token");
        }

        #[ink::test]
        fn custom_metadata_constructor() {
            let token = RaylsToken::with_metadata(String::from("Test"), String::from("TST"), 6);
            assert_eq!(token.symbol(), "TST");
            assert_eq!(token.decimals(), 6);
        }

        #[ink::test]
        fn owner_mints_to_user() {
            let accs = accounts();
            set_caller::<DefaultEnvironment>(accs.alice);
            let mut token = RaylsToken::new();

            assert_eq!(token.mint(accs.bob, tokens(1000)), Ok(()));
            assert_eq!(token.balance_of(accs.bob), tokens(1000));
            assert_eq!(token.total_supply(), tokens(1000));
            assert_eq!(transfers(), [(null(), accs.bob, tokens(1000))]);
        }

        #[ink::test]
        fn non_owner_cannot_mint() {
            let accs = accounts();
            set_caller::<DefaultEnvironment>(accs.alice);
            let mut token = RaylsToken::new();

            set_caller::<DefaultEnvironment>(accs.charlie);
            assert_eq!(token.mint(accs.charlie, tokens(1000)), Err(Error::Unauthorized));
            assert_eq!(token.balance_of(accs.charlie), Amount::zero());
            assert_eq!(token.total_supply(), Amount::zero());
            assert!(transfers().is_empty());
        }

        #[ink::test]
        fn allowance_flow() {
            let accs = accounts();
            set_caller::<DefaultEnvironment>(accs.alice);
            let mut token = RaylsToken::new();
            token.mint(accs.bob, tokens(1000)).unwrap();

            set_caller::<DefaultEnvironment>(accs.bob);
            token.approve(accs.charlie, tokens(100)).unwrap();
            assert_eq!(token.allowance(accs.bob, accs.charlie), tokens(100));

            set_caller::<DefaultEnvironment>(accs.charlie);
            token.transfer_from(accs.bob, accs.charlie, tokens(100)).unwrap();
            assert_eq!(token.balance_of(accs.bob), tokens(900));
            assert_eq!(token.balance_of(accs.charlie), tokens(100));
            assert_eq!(token.allowance(accs.bob, accs.charlie), Amount::zero());
            assert_eq!(
                transfers(),
                [(null(), accs.bob, tokens(1000)), (accs.bob, accs.charlie, tokens(100))]
            );

            assert_eq!(
                token.transfer_from(accs.bob, accs.charlie, Amount::one()),
                Err(Error::InsufficientAllowance)
            );
        }

        #[ink::test]
        fn burn_reduces_total_supply() {
            let accs = accounts();
            set_caller::<DefaultEnvironment>(accs.alice);
            let mut token = RaylsToken::new();
            token.mint(accs.bob, tokens(100)).unwrap();

            set_caller::<DefaultEnvironment>(accs.bob);
            token.burn(tokens(50)).unwrap();
            assert_eq!(token.total_supply(), tokens(50));
            assert_eq!(token.balance_of(accs.bob), tokens(50));
            assert_eq!(transfers().last(), Some(&(accs.bob, null(), tokens(50))));

            assert_eq!(token.burn(tokens(51)), Err(Error::InsufficientBalance));
            assert_eq!(token.total_supply(), tokens(50));
        }

        #[ink::test]
        fn burn_from_spends_allowance() {
            let accs = accounts();
            set_caller::<DefaultEnvironment>(accs.alice);
            let mut token = RaylsToken::new();
            token.mint(accs.bob, tokens(10)).unwrap();

            set_caller::<DefaultEnvironment>(accs.bob);
            token.approve(accs.django, tokens(4)).unwrap();

            set_caller::<DefaultEnvironment>(accs.django);
            token.burn_from(accs.bob, tokens(4)).unwrap();
            assert_eq!(token.balance_of(accs.bob), tokens(6));
            assert_eq!(token.total_supply(), tokens(6));
            assert_eq!(token.allowance(accs.bob, accs.django), Amount::zero());
        }

        #[ink::test]
        fn transfer_guards() {
            let accs = accounts();
            set_caller::<DefaultEnvironment>(accs.alice);
            let mut token = RaylsToken::new();
            token.mint(accs.alice, tokens(5)).unwrap();

            assert_eq!(token.transfer(null(), tokens(1)), Err(Error::InvalidRecipient));
            assert_eq!(token.transfer(accs.bob, tokens(6)), Err(Error::InsufficientBalance));
            assert_eq!(token.approve(null(), tokens(1)), Err(Error::InvalidSpender));

            token.transfer(accs.bob, tokens(5)).unwrap();
            assert_eq!(token.balance_of(accs.alice), Amount::zero());
            assert_eq!(token.balance_of(accs.bob), tokens(5));
        }

        #[ink::test]
        fn allowance_adjustments() {
            let accs = accounts();
            set_caller::<DefaultEnvironment>(accs.bob);
            let mut token = RaylsToken::new();

            token.increase_allowance(accs.eve, tokens(3)).unwrap();
            token.decrease_allowance(accs.eve, tokens(1)).unwrap();
            assert_eq!(token.allowance(accs.bob, accs.eve), tokens(2));
            assert_eq!(
                token.decrease_allowance(accs.eve, tokens(3)),
                Err(Error::InsufficientAllowance)
            );
        }

        #[ink::test]
        fn ownership_transfer() {
            let accs = accounts();
            set_caller::<DefaultEnvironment>(accs.alice);
            let mut token = RaylsToken::new();

            assert_eq!(token.transfer_ownership(null()), Err(Error::InvalidOwner));
            token.transfer_ownership(accs.frank).unwrap();
            assert_eq!(token.owner(), accs.frank);
            assert_eq!(token.mint(accs.alice, tokens(1)), Err(Error::Unauthorized));

            set_caller::<DefaultEnvironment>(accs.frank);
            token.mint(accs.alice, tokens(1)).unwrap();
            assert_eq!(token.balance_of(accs.alice), tokens(1));
        }
    }

}
