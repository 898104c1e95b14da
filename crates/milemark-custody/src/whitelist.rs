//! Whitelist registry for tradeable asset contracts.
//!
//! Process-wide configuration behind an explicit administrative interface:
//! only the contract owner may mutate entries; the settlement plane sees
//! the read-only [`WhitelistLookup`] surface.

use std::collections::HashMap;

use milemark_types::{
    AssetId, MarketError, PrincipalId, Result, TokenConfig, WhitelistEntry, WhitelistLookup,
};
use tracing::info;

/// Mapping from asset contract to whitelist flag and token configuration.
#[derive(Debug)]
pub struct WhitelistRegistry {
    owner: PrincipalId,
    entries: HashMap<AssetId, WhitelistEntry>,
}

impl WhitelistRegistry {
    /// Create an empty registry administered by `owner`.
    #[must_use]
    pub fn new(owner: PrincipalId) -> Self {
        Self {
            owner,
            entries: HashMap::new(),
        }
    }

    /// The registry's administrative owner.
    #[must_use]
    pub fn owner(&self) -> PrincipalId {
        self.owner
    }

    /// Set or replace a whitelist entry. Owner-only.
    ///
    /// # Errors
    /// - [`MarketError::NotContractOwner`] if `caller` is not the owner
    /// - [`MarketError::DivideFactorZero`] if `divide_factor` is zero
    pub fn set_whitelisted(
        &mut self,
        caller: PrincipalId,
        asset: AssetId,
        whitelisted: bool,
        divide_factor: u64,
        cap: Option<u64>,
    ) -> Result<()> {
        if caller != self.owner {
            return Err(MarketError::NotContractOwner(caller));
        }
        if divide_factor == 0 {
            return Err(MarketError::DivideFactorZero);
        }

        info!(%asset, whitelisted, divide_factor, ?cap, "whitelist entry updated");
        self.entries.insert(
            asset,
            WhitelistEntry {
                whitelisted,
                config: TokenConfig::new(divide_factor, cap),
            },
        );
        Ok(())
    }
}

impl WhitelistLookup for WhitelistRegistry {
    fn is_whitelisted(&self, asset: &AssetId) -> bool {
        self.entries
            .get(asset)
            .is_some_and(|entry| entry.whitelisted)
    }

    fn config(&self, asset: &AssetId) -> Option<TokenConfig> {
        self.entries.get(asset).map(|entry| entry.config)
    }
}
