//! The marketplace orchestrator: the public operation surface.
//!
//! Method names follow the stable public contract surface
//! (`list-asset-ft`, `reserve-listing-ft-stx`, ...).
//! Every operation validates first, performs its single transfer through
//! the capability, and only then writes state, so a failure at any step
//! leaves the marketplace untouched.

use milemark_milestone::{boundary, claimable_delta_for, milestones_reached};
use milemark_types::constants::FULL_COMPLETION;
use milemark_types::{
    Asset, AssetId, Listing, ListingTerms, MarketError, PauseFlag, PrincipalId, Result,
    TransferCapability, WhitelistLookup,
};
use tracing::{debug, info};

use crate::conservation;
use crate::listing_store::ListingStore;
use crate::reservation_ledger::ReservationLedger;

/// The settlement orchestrator.
///
/// Owns the listing store and reservation ledger; escrowed balances live
/// under the `custody` principal in the external ledger and are only ever
/// moved by these operations.
#[derive(Debug)]
pub struct Marketplace {
    custody: PrincipalId,
    listings: ListingStore,
    reservations: ReservationLedger,
}

impl Marketplace {
    /// Create a marketplace with a fresh custody principal.
    #[must_use]
    pub fn new() -> Self {
        Self {
            custody: PrincipalId::new(),
            listings: ListingStore::new(),
            reservations: ReservationLedger::new(),
        }
    }

    /// The custody principal holding all escrowed assets and payments.
    #[must_use]
    pub fn custody(&self) -> PrincipalId {
        self.custody
    }

    // =====================================================================
    // Listing lifecycle
    // =====================================================================

    /// `list-asset-ft`: open a listing, escrowing `terms.amount` of the
    /// traded asset from the maker into custody.
    pub fn list_asset_ft(
        &mut self,
        ledger: &mut impl TransferCapability,
        registry: &impl WhitelistLookup,
        stop: &impl PauseFlag,
        maker: PrincipalId,
        asset_contract: &AssetId,
        terms: &ListingTerms,
        at_height: u64,
    ) -> Result<()> {
        if stop.is_paused() {
            return Err(MarketError::Paused);
        }
        if terms.price == 0 {
            return Err(MarketError::PriceZero);
        }
        if terms.amount == 0 {
            return Err(MarketError::AmountMismatch {
                reason: "listed amount must be nonzero".into(),
            });
        }
        if terms.expiry <= at_height {
            return Err(MarketError::ExpiryInPast {
                expiry: terms.expiry,
                height: at_height,
            });
        }
        if !registry.is_whitelisted(asset_contract) {
            return Err(MarketError::AssetNotWhitelisted(asset_contract.clone()));
        }
        if let Some(payment) = &terms.payment_asset_contract {
            if !registry.is_whitelisted(payment) {
                return Err(MarketError::PaymentAssetNotWhitelisted(payment.clone()));
            }
        }
        let Some(config) = registry.config(asset_contract) else {
            return Err(MarketError::AssetNotWhitelisted(asset_contract.clone()));
        };
        if let Some(cap) = config.cap {
            if terms.amount > cap {
                return Err(MarketError::AmountMismatch {
                    reason: format!("amount {} exceeds token cap {cap}", terms.amount),
                });
            }
        }
        if self.listings.contains(asset_contract) {
            return Err(MarketError::AlreadyListed(asset_contract.clone()));
        }

        ledger.transfer(
            &Asset::Token(asset_contract.clone()),
            u128::from(terms.amount),
            maker,
            self.custody,
        )?;

        let listing = Listing::open(maker, asset_contract.clone(), terms, config.divide_factor);
        info!(
            asset = %asset_contract,
            %maker,
            amount = terms.amount,
            price = terms.price,
            expiry = terms.expiry,
            payment = %listing.payment_asset,
            "asset listed"
        );
        self.listings.insert(listing)
    }

    /// `update-listing-ft`: adjust price and/or expiry. Keyed on the
    /// caller, so a non-maker surfaces `UnknownListing`.
    pub fn update_listing_ft(
        &mut self,
        maker: PrincipalId,
        asset_contract: &AssetId,
        new_price: Option<u64>,
        new_expiry: Option<u64>,
        at_height: u64,
    ) -> Result<()> {
        let listing = self.listings.lookup_mut_for_maker(asset_contract, maker)?;

        // Validate both fields before applying either.
        if new_price == Some(0) {
            return Err(MarketError::PriceZero);
        }
        if let Some(expiry) = new_expiry {
            if expiry <= at_height {
                return Err(MarketError::ExpiryInPast {
                    expiry,
                    height: at_height,
                });
            }
        }

        if let Some(price) = new_price {
            listing.price = price;
        }
        if let Some(expiry) = new_expiry {
            listing.expiry = expiry;
        }
        info!(asset = %asset_contract, ?new_price, ?new_expiry, "listing updated");
        Ok(())
    }

    /// `cancel-listing-ft`: delete the listing, return the unreserved
    /// asset to the maker, and pay out any milestone proceeds the maker
    /// has not yet collected. Refunded stakes already flowed back into
    /// the unreserved pool at refund time.
    ///
    /// Cancellation is rejected while any reservation is still open:
    /// buyers settle against the reservation ledger, and pulling the
    /// listing out from under them would strand their claims.
    pub fn cancel_listing_ft(
        &mut self,
        ledger: &mut impl TransferCapability,
        maker: PrincipalId,
        asset_contract: &AssetId,
    ) -> Result<()> {
        let listing = self.listings.lookup_for_maker(asset_contract, maker)?;
        let unreserved = listing.unreserved();
        let proceeds = listing.collected_funds;
        let payment_asset = listing.payment_asset.clone();

        let outstanding = self.reservations.unsettled_count(asset_contract);
        if outstanding > 0 {
            return Err(MarketError::OutstandingReservations { count: outstanding });
        }

        ledger.transfer(
            &Asset::Token(asset_contract.clone()),
            u128::from(unreserved),
            self.custody,
            maker,
        )?;
        if proceeds > 0 {
            ledger.transfer(&payment_asset, proceeds, self.custody, maker)?;
        }

        self.listings.remove(asset_contract);
        self.reservations.archive_listing(asset_contract);
        info!(asset = %asset_contract, %maker, unreserved, proceeds, "listing cancelled");
        Ok(())
    }

    /// `get-listing-map`: read-only lookup.
    #[must_use]
    pub fn get_listing_map(&self, asset_contract: &AssetId) -> Option<&Listing> {
        self.listings.get(asset_contract)
    }

    // =====================================================================
    // Reservations
    // =====================================================================

    /// `reserve-listing-ft-stx`: reserve against a natively-settled
    /// listing, paying in the native asset.
    pub fn reserve_listing_ft_stx(
        &mut self,
        ledger: &mut impl TransferCapability,
        stop: &impl PauseFlag,
        buyer: PrincipalId,
        asset_contract: &AssetId,
        amount: u64,
        at_height: u64,
    ) -> Result<()> {
        self.reserve_inner(
            ledger,
            stop,
            buyer,
            asset_contract,
            &Asset::Native,
            amount,
            at_height,
        )
    }

    /// `fulfil-ft-listing-ft`: reserve against a token-settled listing,
    /// paying in the listing's payment token.
    pub fn fulfil_ft_listing_ft(
        &mut self,
        ledger: &mut impl TransferCapability,
        stop: &impl PauseFlag,
        buyer: PrincipalId,
        asset_contract: &AssetId,
        payment_asset_contract: &AssetId,
        amount: u64,
        at_height: u64,
    ) -> Result<()> {
        self.reserve_inner(
            ledger,
            stop,
            buyer,
            asset_contract,
            &Asset::Token(payment_asset_contract.clone()),
            amount,
            at_height,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn reserve_inner(
        &mut self,
        ledger: &mut impl TransferCapability,
        stop: &impl PauseFlag,
        buyer: PrincipalId,
        asset_contract: &AssetId,
        payment_asset: &Asset,
        amount: u64,
        at_height: u64,
    ) -> Result<()> {
        if stop.is_paused() {
            return Err(MarketError::Paused);
        }

        let listing = self.listings.lookup(asset_contract)?;
        if listing.payment_asset != *payment_asset {
            return Err(MarketError::PaymentAssetMismatch {
                expected: listing.payment_asset.to_string(),
            });
        }
        if listing.is_expired(at_height) {
            return Err(MarketError::ListingExpired {
                expiry: listing.expiry,
                height: at_height,
            });
        }
        if amount == 0 {
            return Err(MarketError::AmountMismatch {
                reason: "reserved amount must be nonzero".into(),
            });
        }
        let new_total = listing
            .reserved_total
            .checked_add(amount)
            .filter(|&t| t <= listing.amount)
            .ok_or_else(|| MarketError::AmountMismatch {
                reason: format!(
                    "reserving {amount} exceeds remaining capacity {}",
                    listing.unreserved()
                ),
            })?;

        if let Some(existing) = self.reservations.get(asset_contract, buyer) {
            if existing.is_settled() {
                return Err(MarketError::AlreadyClaimed {
                    state: existing.state.to_string(),
                });
            }
        }

        // Payment value is scaled by the divide factor captured at
        // listing time; floor division, dust stays with the buyer.
        let cost = listing.payment_value(amount);
        ledger.transfer(payment_asset, cost, buyer, self.custody)?;

        self.reservations
            .reserve(asset_contract, buyer, amount, cost)?;
        let listing = self.listings.lookup_mut(asset_contract)?;
        listing.reserved_total = new_total;
        listing.collected_funds = claimable_delta_for(listing);

        debug!(
            asset = %asset_contract,
            %buyer,
            amount,
            cost,
            reserved_total = listing.reserved_total,
            milestones = milestones_reached(listing.amount, listing.reserved_total),
            "reservation recorded"
        );
        debug_assert!(
            conservation::verify_listing(
                listing,
                self.reservations.reserved_sum(asset_contract)
            )
            .is_ok()
        );
        Ok(())
    }

    // =====================================================================
    // Buyer settlement
    // =====================================================================

    /// `claim-after-success`: release the buyer's purchased asset share.
    /// Only available once the entire listing is sold out.
    pub fn claim_after_success(
        &mut self,
        ledger: &mut impl TransferCapability,
        caller: PrincipalId,
        asset_contract: &AssetId,
        maker: PrincipalId,
    ) -> Result<()> {
        let listing = self.listings.lookup(asset_contract)?;
        if listing.maker != maker {
            return Err(MarketError::UnknownListing(asset_contract.clone()));
        }

        let reservation = self
            .reservations
            .get(asset_contract, caller)
            .ok_or_else(|| MarketError::UnknownListing(asset_contract.clone()))?;
        if reservation.is_settled() {
            return Err(MarketError::AlreadyClaimed {
                state: reservation.state.to_string(),
            });
        }

        let reached = milestones_reached(listing.amount, listing.reserved_total);
        if reached < FULL_COMPLETION {
            return Err(MarketError::MilestoneNotComplete {
                reached,
                needed: FULL_COMPLETION,
            });
        }

        let share = reservation.amount_reserved;
        ledger.transfer(
            &Asset::Token(asset_contract.clone()),
            u128::from(share),
            self.custody,
            caller,
        )?;
        self.reservations
            .lookup_mut(asset_contract, caller)?
            .mark_claimed()?;

        info!(asset = %asset_contract, buyer = %caller, share, "buyer claimed asset share");
        Ok(())
    }

    /// `claim-but-no-success-ft`: refund the buyer's payment after the
    /// listing expired short of full completion.
    ///
    /// A refund releases the stake: `reserved_total` drops by the
    /// reservation's amount and `collected_funds` is recomputed, so a
    /// milestone backed only by refunded stakes is no longer claimable by
    /// the seller. The portion of the stake inside a boundary the seller
    /// already claimed funded completed milestones; its payment is
    /// forfeited, never refunded twice.
    pub fn claim_but_no_success_ft(
        &mut self,
        ledger: &mut impl TransferCapability,
        caller: PrincipalId,
        asset_contract: &AssetId,
        maker: PrincipalId,
        payment_asset_contract: Option<&AssetId>,
        at_height: u64,
    ) -> Result<()> {
        let listing = self.listings.lookup(asset_contract)?;
        if listing.maker != maker {
            return Err(MarketError::UnknownListing(asset_contract.clone()));
        }
        let expected = Asset::from_payment_contract(payment_asset_contract.cloned());
        if listing.payment_asset != expected {
            return Err(MarketError::PaymentAssetMismatch {
                expected: listing.payment_asset.to_string(),
            });
        }

        let reservation = self
            .reservations
            .get(asset_contract, caller)
            .ok_or_else(|| MarketError::UnknownListing(asset_contract.clone()))?;
        if reservation.is_settled() {
            return Err(MarketError::AlreadyClaimed {
                state: reservation.state.to_string(),
            });
        }

        if milestones_reached(listing.amount, listing.reserved_total) == FULL_COMPLETION {
            return Err(MarketError::ListingFulfilled);
        }
        if !listing.is_expired(at_height) {
            return Err(MarketError::ListingNotExpired {
                expiry: listing.expiry,
                height: at_height,
            });
        }

        let stake = reservation.amount_reserved;
        let new_reserved = listing.reserved_total - stake;

        // Units of this stake below the seller-claimed boundary funded
        // milestones whose proceeds are already paid out.
        let claimed_band = boundary(listing.amount, listing.milestones_claimed);
        let forfeited =
            listing.reserved_total.min(claimed_band) - new_reserved.min(claimed_band);
        let refund = reservation
            .paid
            .saturating_sub(listing.payment_value(forfeited));

        let payment_asset = listing.payment_asset.clone();
        ledger.transfer(&payment_asset, refund, self.custody, caller)?;
        self.reservations
            .lookup_mut(asset_contract, caller)?
            .mark_refunded()?;
        let listing = self.listings.lookup_mut(asset_contract)?;
        listing.reserved_total = new_reserved;
        listing.collected_funds = claimable_delta_for(listing);

        info!(asset = %asset_contract, buyer = %caller, stake, refund, "buyer refunded");
        Ok(())
    }

    // =====================================================================
    // Seller settlement
    // =====================================================================

    /// `asset-owner-claim-after-milestone-comp`: release milestone
    /// proceeds of a natively-settled listing to the maker.
    pub fn asset_owner_claim_after_milestone_comp(
        &mut self,
        ledger: &mut impl TransferCapability,
        caller: PrincipalId,
        asset_contract: &AssetId,
        maker_hint: PrincipalId,
    ) -> Result<()> {
        self.owner_claim_inner(ledger, caller, asset_contract, maker_hint, &Asset::Native)
    }

    /// `asset-owner-claim-after-milestone-comp-ft`: token-settled variant.
    pub fn asset_owner_claim_after_milestone_comp_ft(
        &mut self,
        ledger: &mut impl TransferCapability,
        caller: PrincipalId,
        asset_contract: &AssetId,
        maker_hint: PrincipalId,
        payment_asset_contract: &AssetId,
    ) -> Result<()> {
        self.owner_claim_inner(
            ledger,
            caller,
            asset_contract,
            maker_hint,
            &Asset::Token(payment_asset_contract.clone()),
        )
    }

    fn owner_claim_inner(
        &mut self,
        ledger: &mut impl TransferCapability,
        caller: PrincipalId,
        asset_contract: &AssetId,
        maker_hint: PrincipalId,
        payment_asset: &Asset,
    ) -> Result<()> {
        let listing = self.listings.lookup(asset_contract)?;
        if listing.maker != maker_hint {
            return Err(MarketError::UnknownListing(asset_contract.clone()));
        }
        if caller != listing.maker {
            return Err(MarketError::NotMaker);
        }
        if listing.payment_asset != *payment_asset {
            return Err(MarketError::PaymentAssetMismatch {
                expected: listing.payment_asset.to_string(),
            });
        }

        // The milestone check short-circuits ahead of the zero-claim
        // check: a claim before any boundary is 2012, never 2015.
        let reached = milestones_reached(listing.amount, listing.reserved_total);
        if reached == 0 {
            return Err(MarketError::MilestoneNotComplete { reached, needed: 1 });
        }
        if listing.collected_funds == 0 {
            return Err(MarketError::ClaimAmountZero);
        }

        let proceeds = listing.collected_funds;
        ledger.transfer(payment_asset, proceeds, self.custody, caller)?;

        let listing = self.listings.lookup_mut(asset_contract)?;
        listing.collected_funds = 0;
        listing.milestones_claimed = reached;

        info!(
            asset = %asset_contract,
            maker = %caller,
            proceeds,
            milestones_claimed = reached,
            "seller claimed milestone proceeds"
        );
        Ok(())
    }

    // =====================================================================
    // Invariants
    // =====================================================================

    /// Verify the reservation-sum invariant for a live listing. A missing
    /// listing trivially passes (its reservations are archived history).
    pub fn verify_conservation(&self, asset_contract: &AssetId) -> Result<()> {
        match self.listings.get(asset_contract) {
            Some(listing) => conservation::verify_listing(
                listing,
                self.reservations.reserved_sum(asset_contract),
            ),
            None => Ok(()),
        }
    }
}

impl Default for Marketplace {
    fn default() -> Self {
        Self::new()
    }
}
