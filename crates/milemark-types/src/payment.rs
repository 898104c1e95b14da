//! Asset tagging for the two settlement legs.
//!
//! A listing settles in either the native chain asset or a whitelisted
//! fungible token. The choice is resolved once at listing time and carried
//! in the listing record; every settlement path branches on this tag
//! rather than probing capabilities dynamically. The same tag doubles as
//! the ledger key for the transfer capability — the traded leg is always
//! `Token(asset_contract)`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::AssetId;

/// An asset the transfer capability can move: the native settlement asset
/// or a fungible token identified by its contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Asset {
    /// The native chain asset (STX-equivalent).
    Native,
    /// A fungible token contract.
    Token(AssetId),
}

impl Asset {
    /// Build the payment asset from the optional contract id of a listing
    /// tuple: `None` means native settlement.
    #[must_use]
    pub fn from_payment_contract(contract: Option<AssetId>) -> Self {
        match contract {
            None => Self::Native,
            Some(id) => Self::Token(id),
        }
    }

    #[must_use]
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }

    /// The token contract id, if this is a token asset.
    #[must_use]
    pub fn token(&self) -> Option<&AssetId> {
        match self {
            Self::Native => None,
            Self::Token(id) => Some(id),
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Token(id) => write!(f, "ft:{id}"),
        }
    }
}
