//! # milemark-settlement
//!
//! **Settlement plane**: listing store, reservation ledger, and the
//! marketplace orchestrator.
//!
//! ## Architecture
//!
//! Every public operation is one atomic transaction over shared state:
//!
//! 1. Validate preconditions (pause flag, whitelist, authorization, expiry)
//! 2. Execute the single asset transfer through the transfer capability
//! 3. Mutate the listing store / reservation ledger
//! 4. Recompute milestone accounting from the pure engine
//!
//! Validation precedes the transfer and the transfer precedes every state
//! write, so a failed operation leaves state identical to before the call.
//! Concurrency is external: a surrounding transaction processor serializes
//! operations totally; milestone completion is a monotonic function of
//! `reserved_total`, so submission order cannot double-count a boundary.

pub mod conservation;
pub mod listing_store;
pub mod marketplace;
pub mod reservation_ledger;

pub use conservation::verify_listing;
pub use listing_store::ListingStore;
pub use marketplace::Marketplace;
pub use reservation_ledger::ReservationLedger;
