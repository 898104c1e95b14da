//! Whitelist configuration for tradeable assets.

use serde::{Deserialize, Serialize};

/// Per-token settlement configuration, registered alongside the whitelist
/// flag by the contract owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Divisor applied to `amount * price` when computing a payment,
    /// absorbing the token's decimal scaling. Always nonzero.
    pub divide_factor: u64,
    /// Optional upper bound on the listable amount for this token.
    pub cap: Option<u64>,
}

impl TokenConfig {
    #[must_use]
    pub fn new(divide_factor: u64, cap: Option<u64>) -> Self {
        Self { divide_factor, cap }
    }

    /// Payment value of `amount` units at `price`, in the payment asset.
    ///
    /// Computed in `u128` so `amount * price` cannot overflow; integer
    /// (floor) division by the divide factor.
    #[must_use]
    pub fn payment_value(&self, amount: u64, price: u64) -> u128 {
        u128::from(amount) * u128::from(price) / u128::from(self.divide_factor)
    }
}

/// A whitelist registry entry: the flag plus the token's configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhitelistEntry {
    pub whitelisted: bool,
    pub config: TokenConfig,
}
