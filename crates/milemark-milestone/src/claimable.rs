//! Claimable-funds delta between milestone boundaries.
//!
//! The seller claims proceeds only for the reserved quantity that has
//! crossed a milestone boundary and was not claimed before. The delta is
//! a pure function of the listing counters, so two reservations that
//! together cross a boundary yield exactly one inclusion regardless of
//! interleaving order.

use milemark_types::Listing;

use crate::milestones::{boundary, milestones_reached};

/// Payment-asset value newly claimable by the seller:
/// `(boundary(reached) - boundary(claimed)) * price / divide_factor`.
///
/// Zero when no boundary was crossed since the last seller claim.
#[must_use]
pub fn claimable_delta(
    amount: u64,
    price: u64,
    divide_factor: u64,
    reserved_total: u64,
    milestones_claimed: u8,
) -> u128 {
    let reached = milestones_reached(amount, reserved_total);
    if reached <= milestones_claimed {
        return 0;
    }
    let banked = boundary(amount, reached) - boundary(amount, milestones_claimed);
    u128::from(banked) * u128::from(price) / u128::from(divide_factor)
}

/// [`claimable_delta`] over a listing's own counters.
#[must_use]
pub fn claimable_delta_for(listing: &Listing) -> u128 {
    claimable_delta(
        listing.amount,
        listing.price,
        listing.divide_factor,
        listing.reserved_total,
        listing.milestones_claimed,
    )
}
