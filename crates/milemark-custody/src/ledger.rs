//! In-process fungible-asset ledger.
//!
//! Tracks per-(principal, asset) balances for the native asset and every
//! token contract. All mutations are atomic: either the full transfer
//! succeeds or balances are unchanged.

use std::collections::HashMap;

use milemark_types::{Asset, PrincipalId, TransferCapability, TransferError};

/// The source of truth for all balance state.
///
/// Minting is collaborator-only: tests and deployment fixtures fund
/// principals through [`TokenLedger::mint`]; the marketplace itself only
/// ever calls [`TransferCapability::transfer`].
#[derive(Debug, Default)]
pub struct TokenLedger {
    /// Per-(principal, asset) balances.
    balances: HashMap<(PrincipalId, Asset), u128>,
}

impl TokenLedger {
    /// Create a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    /// Mint `amount` of `asset` to `to` (increases total supply).
    pub fn mint(&mut self, asset: &Asset, amount: u128, to: PrincipalId) {
        *self.balances.entry((to, asset.clone())).or_default() += amount;
    }

    /// Balance of a (principal, asset) pair.
    #[must_use]
    pub fn balance(&self, principal: PrincipalId, asset: &Asset) -> u128 {
        self.balances
            .get(&(principal, asset.clone()))
            .copied()
            .unwrap_or_default()
    }

    /// Total supply of an asset (sum over all principals).
    #[must_use]
    pub fn total_supply(&self, asset: &Asset) -> u128 {
        self.balances
            .iter()
            .filter(|((_, a), _)| a == asset)
            .map(|(_, amount)| amount)
            .sum()
    }
}

impl TransferCapability for TokenLedger {
    fn transfer(
        &mut self,
        asset: &Asset,
        amount: u128,
        from: PrincipalId,
        to: PrincipalId,
    ) -> Result<(), TransferError> {
        if amount == 0 {
            return Ok(());
        }

        let available = self.balance(from, asset);
        if available < amount {
            return Err(TransferError::InsufficientBalance {
                needed: amount,
                available,
            });
        }

        *self.balances.entry((from, asset.clone())).or_default() -= amount;
        *self.balances.entry((to, asset.clone())).or_default() += amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use milemark_types::AssetId;

    fn token_a() -> Asset {
        Asset::Token(AssetId::from("token-a"))
    }

    #[test]
    fn mint_increases_balance_and_supply() {
        let mut ledger = TokenLedger::new();
        let alice = PrincipalId::new();
        ledger.mint(&token_a(), 1_000, alice);
        assert_eq!(ledger.balance(alice, &token_a()), 1_000);
        assert_eq!(ledger.total_supply(&token_a()), 1_000);
    }

    #[test]
    fn transfer_moves_balance() {
        let mut ledger = TokenLedger::new();
        let alice = PrincipalId::new();
        let bob = PrincipalId::new();
        ledger.mint(&token_a(), 1_000, alice);

        ledger.transfer(&token_a(), 400, alice, bob).unwrap();
        assert_eq!(ledger.balance(alice, &token_a()), 600);
        assert_eq!(ledger.balance(bob, &token_a()), 400);
        assert_eq!(ledger.total_supply(&token_a()), 1_000, "supply conserved");
    }

    #[test]
    fn transfer_insufficient_fails_unchanged() {
        let mut ledger = TokenLedger::new();
        let alice = PrincipalId::new();
        let bob = PrincipalId::new();
        ledger.mint(&token_a(), 100, alice);

        let err = ledger.transfer(&token_a(), 200, alice, bob).unwrap_err();
        assert_eq!(
            err,
            TransferError::InsufficientBalance {
                needed: 200,
                available: 100
            }
        );
        assert_eq!(ledger.balance(alice, &token_a()), 100);
        assert_eq!(ledger.balance(bob, &token_a()), 0);
    }

    #[test]
    fn zero_transfer_is_noop() {
        let mut ledger = TokenLedger::new();
        let alice = PrincipalId::new();
        let bob = PrincipalId::new();
        ledger.transfer(&token_a(), 0, alice, bob).unwrap();
        assert_eq!(ledger.balance(bob, &token_a()), 0);
    }

    #[test]
    fn native_and_token_balances_independent() {
        let mut ledger = TokenLedger::new();
        let alice = PrincipalId::new();
        ledger.mint(&Asset::Native, 500, alice);
        ledger.mint(&token_a(), 700, alice);
        assert_eq!(ledger.balance(alice, &Asset::Native), 500);
        assert_eq!(ledger.balance(alice, &token_a()), 700);
    }

    #[test]
    fn nonexistent_balance_is_zero() {
        let ledger = TokenLedger::new();
        assert_eq!(ledger.balance(PrincipalId::new(), &Asset::Native), 0);
    }
}
