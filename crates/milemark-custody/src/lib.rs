//! # milemark-custody
//!
//! The marketplace's external collaborators, implemented in-process:
//!
//! - [`TokenLedger`]: the fungible-asset transfer primitive. Tracks
//!   per-(principal, asset) balances and implements
//!   [`milemark_types::TransferCapability`].
//! - [`WhitelistRegistry`]: which asset contracts are tradeable, their
//!   divide factor and per-token cap. Owner-gated mutator, read-only
//!   lookup for the settlement plane.
//! - [`EmergencyStop`]: the system-wide pause flag, owner-gated.
//!
//! The settlement plane consumes these only through the trait surface in
//! `milemark-types`; nothing here knows about listings or milestones.

pub mod emergency;
pub mod ledger;
pub mod whitelist;

pub use emergency::EmergencyStop;
pub use ledger::TokenLedger;
pub use whitelist::WhitelistRegistry;
