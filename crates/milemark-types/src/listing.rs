//! The listing record: one offer per asset contract, the authoritative
//! account of its fulfilment progress.

use serde::{Deserialize, Serialize};

use crate::{Asset, AssetId, PrincipalId};

/// The offer tuple submitted to `list-asset-ft`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingTerms {
    /// Total quantity offered for sale. Must be nonzero.
    pub amount: u64,
    /// Unit price in the payment asset. Must be nonzero.
    pub price: u64,
    /// Block height after which unfulfilled reservations may be refunded
    /// and no new reservations are accepted.
    pub expiry: u64,
    /// `None` settles in the native asset, `Some` in a whitelisted token.
    pub payment_asset_contract: Option<AssetId>,
}

/// An active listing and its milestone accounting counters.
///
/// The payment method and divide factor are resolved once at listing time
/// and carried here, so later registry changes cannot skew settlement math
/// mid-flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// The principal that created the listing; sole authority to update
    /// or cancel it.
    pub maker: PrincipalId,
    /// The traded fungible-asset contract.
    pub asset_contract: AssetId,
    /// Total quantity offered for sale.
    pub amount: u64,
    /// Unit price in the payment asset.
    pub price: u64,
    /// Expiry block height.
    pub expiry: u64,
    /// How buyers pay: native asset or a fungible token.
    pub payment_asset: Asset,
    /// Payment divisor captured from the whitelist entry at listing time.
    pub divide_factor: u64,
    /// Cumulative quantity reserved by all buyers. Monotonic
    /// non-decreasing; never exceeds `amount`.
    pub reserved_total: u64,
    /// Payment collected past a milestone boundary and pending seller
    /// claim. Zeroed on every seller claim.
    pub collected_funds: u128,
    /// Milestones whose proceeds were already released to the seller
    /// (0..=4).
    pub milestones_claimed: u8,
}

impl Listing {
    /// Open a fresh listing from validated terms.
    #[must_use]
    pub fn open(
        maker: PrincipalId,
        asset_contract: AssetId,
        terms: &ListingTerms,
        divide_factor: u64,
    ) -> Self {
        Self {
            maker,
            asset_contract,
            amount: terms.amount,
            price: terms.price,
            expiry: terms.expiry,
            payment_asset: Asset::from_payment_contract(terms.payment_asset_contract.clone()),
            divide_factor,
            reserved_total: 0,
            collected_funds: 0,
            milestones_claimed: 0,
        }
    }

    /// Quantity not yet reserved by any buyer.
    #[must_use]
    pub fn unreserved(&self) -> u64 {
        self.amount - self.reserved_total
    }

    /// Payment value of `quantity` units at this listing's price, floor
    /// divided by the divide factor captured at listing time.
    #[must_use]
    pub fn payment_value(&self, quantity: u64) -> u128 {
        u128::from(quantity) * u128::from(self.price) / u128::from(self.divide_factor)
    }

    /// Whether the listing is past its expiry at the given height.
    #[must_use]
    pub fn is_expired(&self, height: u64) -> bool {
        height >= self.expiry
    }

    /// Whether every unit of the listed amount has been reserved.
    #[must_use]
    pub fn is_fully_reserved(&self) -> bool {
        self.reserved_total == self.amount
    }
}
