//! The reservation ledger: per-(listing, buyer) stakes and their
//! settlement state.
//!
//! Settled reservations are never discarded — they move to an archive
//! when their listing is cancelled, keeping the at-most-once claim audit
//! trail while freeing the key for a later relisting of the same asset.

use std::collections::HashMap;

use milemark_types::{AssetId, MarketError, PrincipalId, Reservation, Result, SettlementState};

/// All reservations, live and archived.
#[derive(Debug, Default)]
pub struct ReservationLedger {
    /// Reservations against currently or previously active listings,
    /// keyed by (asset contract, buyer).
    live: HashMap<(AssetId, PrincipalId), Reservation>,
    /// Settled reservations of cancelled listings, audit-retained.
    archive: Vec<(AssetId, Reservation)>,
}

impl ReservationLedger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            live: HashMap::new(),
            archive: Vec::new(),
        }
    }

    /// Record a reservation of `amount` units for `paid` payment,
    /// accumulating onto the buyer's existing stake.
    ///
    /// # Errors
    /// Returns [`MarketError::AlreadyClaimed`] if the buyer's reservation
    /// was already settled.
    pub fn reserve(
        &mut self,
        asset: &AssetId,
        buyer: PrincipalId,
        amount: u64,
        paid: u128,
    ) -> Result<()> {
        self.live
            .entry((asset.clone(), buyer))
            .or_insert_with(|| Reservation::new(buyer))
            .accumulate(amount, paid)
    }

    /// The buyer's live reservation, if any.
    #[must_use]
    pub fn get(&self, asset: &AssetId, buyer: PrincipalId) -> Option<&Reservation> {
        self.live.get(&(asset.clone(), buyer))
    }

    /// Mutable lookup; a buyer without a reservation surfaces
    /// [`MarketError::UnknownListing`] — the same lookup-miss conflation
    /// the listing store uses.
    pub fn lookup_mut(&mut self, asset: &AssetId, buyer: PrincipalId) -> Result<&mut Reservation> {
        self.live
            .get_mut(&(asset.clone(), buyer))
            .ok_or_else(|| MarketError::UnknownListing(asset.clone()))
    }

    /// Sum of reserved amounts still counted against the listing: open
    /// stakes and claimed ones. Refunded stakes were released back to the
    /// unreserved pool and no longer back `reserved_total`. `u128` so the
    /// sum cannot overflow even when the invariant it checks is broken.
    #[must_use]
    pub fn reserved_sum(&self, asset: &AssetId) -> u128 {
        self.live
            .iter()
            .filter(|((a, _), r)| a == asset && r.state != SettlementState::Refunded)
            .map(|(_, r)| u128::from(r.amount_reserved))
            .sum()
    }

    /// Number of live reservations for the listing that are not yet
    /// claimed or refunded.
    #[must_use]
    pub fn unsettled_count(&self, asset: &AssetId) -> usize {
        self.live
            .iter()
            .filter(|((a, _), r)| a == asset && !r.is_settled())
            .count()
    }

    /// Move all of a cancelled listing's reservations to the archive.
    pub fn archive_listing(&mut self, asset: &AssetId) {
        let keys: Vec<_> = self
            .live
            .keys()
            .filter(|(a, _)| a == asset)
            .cloned()
            .collect();
        for key in keys {
            if let Some(reservation) = self.live.remove(&key) {
                self.archive.push((key.0, reservation));
            }
        }
    }

    /// Archived reservations for an asset contract.
    #[must_use]
    pub fn archived(&self, asset: &AssetId) -> impl Iterator<Item = &Reservation> {
        self.archive
            .iter()
            .filter(move |(a, _)| a == asset)
            .map(|(_, r)| r)
    }

    /// Total number of live reservations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_a() -> AssetId {
        AssetId::from("token-a")
    }

    #[test]
    fn reserve_creates_then_accumulates() {
        let buyer = PrincipalId::new();
        let mut ledger = ReservationLedger::new();

        ledger.reserve(&token_a(), buyer, 100, 25).unwrap();
        ledger.reserve(&token_a(), buyer, 50, 12).unwrap();

        let r = ledger.get(&token_a(), buyer).unwrap();
        assert_eq!(r.amount_reserved, 150);
        assert_eq!(r.paid, 37);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn sum_spans_buyers_within_one_listing() {
        let mut ledger = ReservationLedger::new();
        ledger.reserve(&token_a(), PrincipalId::new(), 100, 0).unwrap();
        ledger.reserve(&token_a(), PrincipalId::new(), 200, 0).unwrap();
        ledger
            .reserve(&AssetId::from("token-b"), PrincipalId::new(), 999, 0)
            .unwrap();

        assert_eq!(ledger.reserved_sum(&token_a()), 300);
        assert_eq!(ledger.unsettled_count(&token_a()), 2);
    }

    #[test]
    fn settled_reservations_do_not_count_as_unsettled() {
        let buyer = PrincipalId::new();
        let mut ledger = ReservationLedger::new();
        ledger.reserve(&token_a(), buyer, 100, 25).unwrap();
        ledger.lookup_mut(&token_a(), buyer).unwrap().mark_claimed().unwrap();

        assert_eq!(ledger.unsettled_count(&token_a()), 0);
        // A claimed stake still counts toward conservation.
        assert_eq!(ledger.reserved_sum(&token_a()), 100);
    }

    #[test]
    fn refunded_stake_leaves_the_reserved_sum() {
        let b1 = PrincipalId::new();
        let b2 = PrincipalId::new();
        let mut ledger = ReservationLedger::new();
        ledger.reserve(&token_a(), b1, 100, 25).unwrap();
        ledger.reserve(&token_a(), b2, 300, 75).unwrap();
        ledger.lookup_mut(&token_a(), b1).unwrap().mark_refunded().unwrap();

        assert_eq!(ledger.reserved_sum(&token_a()), 300);
        assert_eq!(ledger.unsettled_count(&token_a()), 1);
    }

    #[test]
    fn reserve_on_settled_reservation_fails() {
        let buyer = PrincipalId::new();
        let mut ledger = ReservationLedger::new();
        ledger.reserve(&token_a(), buyer, 100, 25).unwrap();
        ledger
            .lookup_mut(&token_a(), buyer)
            .unwrap()
            .mark_refunded()
            .unwrap();

        let err = ledger.reserve(&token_a(), buyer, 1, 1).unwrap_err();
        assert_eq!(err.code(), 2014);
    }

    #[test]
    fn missing_reservation_surfaces_unknown_listing() {
        let mut ledger = ReservationLedger::new();
        let err = ledger.lookup_mut(&token_a(), PrincipalId::new()).unwrap_err();
        assert_eq!(err.code(), 2000);
    }

    #[test]
    fn archive_frees_key_and_retains_audit_record() {
        let buyer = PrincipalId::new();
        let mut ledger = ReservationLedger::new();
        ledger.reserve(&token_a(), buyer, 100, 25).unwrap();
        ledger.lookup_mut(&token_a(), buyer).unwrap().mark_claimed().unwrap();

        ledger.archive_listing(&token_a());
        assert!(ledger.get(&token_a(), buyer).is_none());
        assert_eq!(ledger.archived(&token_a()).count(), 1);

        // The same buyer can reserve against a relisting of the asset.
        ledger.reserve(&token_a(), buyer, 10, 2).unwrap();
        assert_eq!(ledger.get(&token_a(), buyer).unwrap().amount_reserved, 10);
    }
}
