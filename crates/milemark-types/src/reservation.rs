//! Per-buyer reservation records.
//!
//! One record per (listing, buyer). A record accumulates across repeated
//! reservations by the same buyer and is settled exactly once: claimed on
//! the success path or refunded on the failure path. Settled records are
//! retained for at-most-once claim auditing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{MarketError, PrincipalId, Result};

/// Terminal settlement outcome of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettlementState {
    /// Not yet settled; the buyer may still reserve more.
    Open,
    /// The buyer claimed their asset share after full completion.
    Claimed,
    /// The buyer was refunded after expiry without full completion.
    Refunded,
}

impl fmt::Display for SettlementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Claimed => write!(f, "claimed"),
            Self::Refunded => write!(f, "refunded"),
        }
    }
}

/// A buyer's cumulative stake in one listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub buyer: PrincipalId,
    /// Cumulative quantity reserved against the listing.
    pub amount_reserved: u64,
    /// Cumulative payment actually transferred into custody. This is the
    /// exact refund amount on the failure path, immune to the truncation
    /// of recomputing `amount * price / divide_factor` over the total.
    pub paid: u128,
    pub state: SettlementState,
}

impl Reservation {
    /// A fresh, empty reservation for `buyer`.
    #[must_use]
    pub fn new(buyer: PrincipalId) -> Self {
        Self {
            buyer,
            amount_reserved: 0,
            paid: 0,
            state: SettlementState::Open,
        }
    }

    /// Whether a terminal settlement state was reached.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.state != SettlementState::Open
    }

    /// Record a further reservation by this buyer.
    ///
    /// # Errors
    /// Returns [`MarketError::AlreadyClaimed`] if the reservation was
    /// already settled.
    pub fn accumulate(&mut self, amount: u64, paid: u128) -> Result<()> {
        self.guard_open()?;
        self.amount_reserved += amount;
        self.paid += paid;
        Ok(())
    }

    /// Transition to `Claimed`. Terminal; at most once.
    pub fn mark_claimed(&mut self) -> Result<()> {
        self.guard_open()?;
        self.state = SettlementState::Claimed;
        Ok(())
    }

    /// Transition to `Refunded`. Terminal; at most once.
    pub fn mark_refunded(&mut self) -> Result<()> {
        self.guard_open()?;
        self.state = SettlementState::Refunded;
        Ok(())
    }

    fn guard_open(&self) -> Result<()> {
        if self.is_settled() {
            return Err(MarketError::AlreadyClaimed {
                state: self.state.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_across_reservations() {
        let mut r = Reservation::new(PrincipalId::new());
        r.accumulate(100, 25).unwrap();
        r.accumulate(50, 12).unwrap();
        assert_eq!(r.amount_reserved, 150);
        assert_eq!(r.paid, 37);
        assert!(!r.is_settled());
    }

    #[test]
    fn claim_is_terminal() {
        let mut r = Reservation::new(PrincipalId::new());
        r.accumulate(100, 25).unwrap();
        r.mark_claimed().unwrap();
        assert!(r.is_settled());

        let err = r.mark_claimed().unwrap_err();
        assert!(matches!(err, MarketError::AlreadyClaimed { .. }));
        let err = r.mark_refunded().unwrap_err();
        assert!(matches!(err, MarketError::AlreadyClaimed { .. }));
    }

    #[test]
    fn refund_is_terminal() {
        let mut r = Reservation::new(PrincipalId::new());
        r.accumulate(100, 25).unwrap();
        r.mark_refunded().unwrap();
        assert_eq!(r.state, SettlementState::Refunded);

        let err = r.accumulate(1, 1).unwrap_err();
        assert!(matches!(err, MarketError::AlreadyClaimed { .. }));
    }

    #[test]
    fn settled_reservation_rejects_accumulate() {
        let mut r = Reservation::new(PrincipalId::new());
        r.accumulate(10, 2).unwrap();
        r.mark_claimed().unwrap();
        assert!(r.accumulate(10, 2).is_err());
        assert_eq!(r.amount_reserved, 10, "amount unchanged on failure");
    }

    #[test]
    fn serde_roundtrip() {
        let mut r = Reservation::new(PrincipalId::new());
        r.accumulate(100, 25).unwrap();
        let json = serde_json::to_string(&r).unwrap();
        let back: Reservation = serde_json::from_str(&json).unwrap();
        assert_eq!(r, back);
    }
}
