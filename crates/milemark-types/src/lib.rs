//! # milemark-types
//!
//! Shared types, errors, and collaborator contracts for the **Milemark**
//! milestone-gated escrow marketplace.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`PrincipalId`], [`AssetId`]
//! - **Assets**: [`Asset`] (native settlement asset vs. fungible token)
//! - **Listing model**: [`Listing`], [`ListingTerms`]
//! - **Reservation model**: [`Reservation`], [`SettlementState`]
//! - **Whitelist config**: [`TokenConfig`]
//! - **Collaborator traits**: [`TransferCapability`], [`WhitelistLookup`], [`PauseFlag`]
//! - **Errors**: [`MarketError`] with `MM_ERR_` prefix codes, [`TransferError`]
//! - **Constants**: milestone count and system defaults

pub mod capability;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod listing;
pub mod payment;
pub mod reservation;

// Re-export all primary types at crate root for ergonomic imports:
//   use milemark_types::{Listing, Reservation, MarketError, ...};

pub use capability::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use listing::*;
pub use payment::*;
pub use reservation::*;

// Constants are accessed via `milemark_types::constants::FOO`
// (not re-exported to avoid name collisions).
