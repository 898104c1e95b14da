//! Collaborator contracts consumed by the settlement plane.
//!
//! The marketplace never owns token balances, whitelist state, or the
//! pause flag directly; it reaches them through these traits. The
//! in-process implementations live in `milemark-custody`, but any
//! collaborator satisfying the same contract can be substituted.

use crate::{Asset, AssetId, PrincipalId, TokenConfig, TransferError};

/// The fungible-asset transfer primitive.
///
/// One call moves `amount` of `asset` between two principals, atomically:
/// either the full transfer happens or the collaborator returns an error
/// and balances are unchanged. Minting is collaborator-only and never
/// invoked by the marketplace.
pub trait TransferCapability {
    fn transfer(
        &mut self,
        asset: &Asset,
        amount: u128,
        from: PrincipalId,
        to: PrincipalId,
    ) -> std::result::Result<(), TransferError>;
}

/// Read-only view of the whitelist registry.
///
/// Consulted, never mutated, by the marketplace.
pub trait WhitelistLookup {
    fn is_whitelisted(&self, asset: &AssetId) -> bool;

    /// The token's registered configuration, if any was ever set.
    fn config(&self, asset: &AssetId) -> Option<TokenConfig>;
}

/// Read-only view of the emergency-stop flag.
pub trait PauseFlag {
    fn is_paused(&self) -> bool;
}
