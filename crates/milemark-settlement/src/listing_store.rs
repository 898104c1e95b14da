//! The listing store: one active listing per asset contract.
//!
//! The listing map is keyed by the traded asset's contract principal,
//! which already encodes its deployer, so one active listing per asset
//! contract is the same uniqueness as one per (maker, asset) pair.
//! Authorization for update/cancel is enforced by keying the lookup on
//! the caller: a non-maker looking up "their" listing simply misses and
//! surfaces `UnknownListing`, never a distinct authorization error.

use std::collections::HashMap;

use milemark_types::{AssetId, Listing, MarketError, PrincipalId, Result};

/// Authoritative record of active offers.
#[derive(Debug, Default)]
pub struct ListingStore {
    listings: HashMap<AssetId, Listing>,
}

impl ListingStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            listings: HashMap::new(),
        }
    }

    /// Whether an active listing exists for the asset contract.
    #[must_use]
    pub fn contains(&self, asset: &AssetId) -> bool {
        self.listings.contains_key(asset)
    }

    /// Insert a fresh listing.
    ///
    /// # Errors
    /// Returns [`MarketError::AlreadyListed`] if an active listing exists.
    pub fn insert(&mut self, listing: Listing) -> Result<()> {
        if self.listings.contains_key(&listing.asset_contract) {
            return Err(MarketError::AlreadyListed(listing.asset_contract));
        }
        self.listings.insert(listing.asset_contract.clone(), listing);
        Ok(())
    }

    /// Read-only lookup by asset contract.
    #[must_use]
    pub fn get(&self, asset: &AssetId) -> Option<&Listing> {
        self.listings.get(asset)
    }

    /// Lookup that fails with [`MarketError::UnknownListing`] on a miss.
    pub fn lookup(&self, asset: &AssetId) -> Result<&Listing> {
        self.listings
            .get(asset)
            .ok_or_else(|| MarketError::UnknownListing(asset.clone()))
    }

    /// Mutable lookup that fails with [`MarketError::UnknownListing`].
    pub fn lookup_mut(&mut self, asset: &AssetId) -> Result<&mut Listing> {
        self.listings
            .get_mut(asset)
            .ok_or_else(|| MarketError::UnknownListing(asset.clone()))
    }

    /// Lookup keyed on the caller: a miss and a foreign maker are the
    /// same `UnknownListing` outcome.
    pub fn lookup_for_maker(&self, asset: &AssetId, caller: PrincipalId) -> Result<&Listing> {
        match self.listings.get(asset) {
            Some(listing) if listing.maker == caller => Ok(listing),
            _ => Err(MarketError::UnknownListing(asset.clone())),
        }
    }

    /// Mutable variant of [`ListingStore::lookup_for_maker`].
    pub fn lookup_mut_for_maker(
        &mut self,
        asset: &AssetId,
        caller: PrincipalId,
    ) -> Result<&mut Listing> {
        match self.listings.get_mut(asset) {
            Some(listing) if listing.maker == caller => Ok(listing),
            _ => Err(MarketError::UnknownListing(asset.clone())),
        }
    }

    /// Delete a listing, returning the record if it existed.
    pub fn remove(&mut self, asset: &AssetId) -> Option<Listing> {
        self.listings.remove(asset)
    }

    /// Number of active listings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use milemark_types::ListingTerms;

    fn listing(maker: PrincipalId, asset: &str) -> Listing {
        Listing::open(
            maker,
            AssetId::from(asset),
            &ListingTerms {
                amount: 1_000,
                price: 4,
                expiry: 10_000,
                payment_asset_contract: None,
            },
            4,
        )
    }

    #[test]
    fn insert_and_lookup() {
        let maker = PrincipalId::new();
        let mut store = ListingStore::new();
        store.insert(listing(maker, "token-a")).unwrap();

        assert!(store.contains(&AssetId::from("token-a")));
        assert_eq!(store.lookup(&AssetId::from("token-a")).unwrap().maker, maker);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn double_insert_is_already_listed() {
        let maker = PrincipalId::new();
        let mut store = ListingStore::new();
        store.insert(listing(maker, "token-a")).unwrap();

        let err = store.insert(listing(maker, "token-a")).unwrap_err();
        assert_eq!(err.code(), 1005);
    }

    #[test]
    fn lookup_miss_is_unknown_listing() {
        let store = ListingStore::new();
        let err = store.lookup(&AssetId::from("token-a")).unwrap_err();
        assert_eq!(err.code(), 2000);
    }

    #[test]
    fn foreign_maker_lookup_surfaces_unknown_listing() {
        let maker = PrincipalId::new();
        let other = PrincipalId::new();
        let mut store = ListingStore::new();
        store.insert(listing(maker, "token-a")).unwrap();

        let err = store
            .lookup_for_maker(&AssetId::from("token-a"), other)
            .unwrap_err();
        assert_eq!(err.code(), 2000, "not a distinct authorization error");

        assert!(
            store
                .lookup_for_maker(&AssetId::from("token-a"), maker)
                .is_ok()
        );
    }

    #[test]
    fn remove_frees_the_key() {
        let maker = PrincipalId::new();
        let mut store = ListingStore::new();
        store.insert(listing(maker, "token-a")).unwrap();

        let removed = store.remove(&AssetId::from("token-a")).unwrap();
        assert_eq!(removed.maker, maker);
        assert!(store.is_empty());

        // Relisting after removal works.
        store.insert(listing(maker, "token-a")).unwrap();
    }
}
