//! # milemark-milestone
//!
//! **Pure milestone engine for Milemark.**
//!
//! The milestone engine is the compute plane — it maps a listing's
//! counters to a completed-milestone count and a claimable-funds delta.
//! It has:
//!
//! - **Zero side effects**: no ledger access, no listing mutation
//! - **Deterministic output**: depends only on `(amount, reserved_total,
//!   milestones_claimed)`, never on the reservation sequence
//! - **Exact integer accounting**: an explicit threshold table whose top
//!   entry is exactly `amount`, so full completion is reachable despite
//!   quarter-fraction truncation

pub mod claimable;
pub mod milestones;

pub use claimable::{claimable_delta, claimable_delta_for};
pub use milestones::{boundary, milestones_reached, thresholds};
