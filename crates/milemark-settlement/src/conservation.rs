//! Reservation-sum conservation checker.
//!
//! Invariants checked for every live listing:
//! ```text
//! Σ amount_reserved over open and claimed reservations == reserved_total
//! reserved_total <= amount
//! milestones_claimed <= 4
//! ```
//! Refunded stakes are excluded from the sum; a refund releases its units
//! back to the unreserved pool.
//!
//! Settlement only ever moves a reservation between states; if one of
//! these ever breaks, state was corrupted somewhere upstream.

use milemark_types::constants::MILESTONE_COUNT;
use milemark_types::{Listing, MarketError, Result};

/// Verify a listing's counters against the reservation ledger's sum.
///
/// # Errors
/// Returns [`MarketError::ConservationViolation`] naming the broken
/// invariant.
pub fn verify_listing(listing: &Listing, reserved_sum: u128) -> Result<()> {
    if reserved_sum != u128::from(listing.reserved_total) {
        return Err(MarketError::ConservationViolation {
            reason: format!(
                "asset {}: reservation sum {reserved_sum} != reserved_total {}",
                listing.asset_contract, listing.reserved_total
            ),
        });
    }
    if listing.reserved_total > listing.amount {
        return Err(MarketError::ConservationViolation {
            reason: format!(
                "asset {}: reserved_total {} exceeds amount {}",
                listing.asset_contract, listing.reserved_total, listing.amount
            ),
        });
    }
    if listing.milestones_claimed > MILESTONE_COUNT {
        return Err(MarketError::ConservationViolation {
            reason: format!(
                "asset {}: milestones_claimed {} exceeds {MILESTONE_COUNT}",
                listing.asset_contract, listing.milestones_claimed
            ),
        });
    }
    Ok(())
}
