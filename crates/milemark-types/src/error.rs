//! Error types for the Milemark marketplace.
//!
//! All errors use the `MM_ERR_` prefix convention for easy grepping in
//! logs. The numeric part is the stable error code of the public contract
//! surface, grouped by family:
//! - 1xxx: listing validation
//! - 2xxx: listing / reservation state preconditions
//! - 3xxx: system-wide pause
//! - 4xxx: collaborator transfer failures (propagated verbatim)
//! - 9xxx: internal invariant violations

use thiserror::Error;

use crate::{AssetId, PrincipalId};

/// A transfer rejected by the asset transfer capability.
///
/// These originate in the collaborator, not the marketplace; the
/// orchestrator aborts the whole operation and surfaces them unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// The sender does not hold enough of the asset.
    #[error("transfer error 1: insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    /// The collaborator refused the transfer for its own reasons.
    #[error("transfer error 2: rejected: {reason}")]
    Rejected { reason: String },
}

/// Central error enum for all marketplace operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketError {
    // =================================================================
    // Listing validation (1xxx)
    // =================================================================
    /// The requested expiry height is not in the future.
    #[error("MM_ERR_1000: listing expiry {expiry} is not past height {height}")]
    ExpiryInPast { expiry: u64, height: u64 },

    /// A listing must carry a nonzero unit price.
    #[error("MM_ERR_1001: listing price must be nonzero")]
    PriceZero,

    /// The caller is not the maker of the listing (seller-claim path).
    #[error("MM_ERR_1003: caller is not the listing maker")]
    NotMaker,

    /// A quantity is zero, exceeds capacity, or breaks the per-token cap.
    #[error("MM_ERR_1004: amount mismatch: {reason}")]
    AmountMismatch { reason: String },

    /// An active listing already exists for this asset contract.
    #[error("MM_ERR_1005: asset {0} is already listed")]
    AlreadyListed(AssetId),

    /// The registry rejects a zero divide factor (it is a divisor).
    #[error("MM_ERR_1006: divide factor must be nonzero")]
    DivideFactorZero,

    // =================================================================
    // State preconditions (2xxx)
    // =================================================================
    /// No listing exists for the given key. Also raised when a non-maker
    /// looks up a listing keyed on themselves: authorization by lookup
    /// miss.
    #[error("MM_ERR_2000: unknown listing for asset {0}")]
    UnknownListing(AssetId),

    /// The caller is not the contract owner (admin path).
    #[error("MM_ERR_2001: caller {0} is not the contract owner")]
    NotContractOwner(PrincipalId),

    /// The listing expired; no new reservations are accepted.
    #[error("MM_ERR_2002: listing expired at height {expiry}, now {height}")]
    ListingExpired { expiry: u64, height: u64 },

    /// The entry point's payment asset does not match the listing's.
    #[error("MM_ERR_2004: payment asset mismatch: listing settles in {expected}")]
    PaymentAssetMismatch { expected: String },

    /// The traded asset contract is not whitelisted.
    #[error("MM_ERR_2007: asset {0} is not whitelisted")]
    AssetNotWhitelisted(AssetId),

    /// The payment asset contract is not whitelisted.
    #[error("MM_ERR_2008: payment asset {0} is not whitelisted")]
    PaymentAssetNotWhitelisted(AssetId),

    /// Refund requested on a listing that reached full fulfilment.
    #[error("MM_ERR_2011: listing fully reserved; claim the asset instead")]
    ListingFulfilled,

    /// The required milestone count has not been reached.
    #[error("MM_ERR_2012: milestone not complete: reached {reached}, need {needed}")]
    MilestoneNotComplete { reached: u8, needed: u8 },

    /// Refund requested before the listing expired.
    #[error("MM_ERR_2013: listing has not expired: expiry {expiry}, now {height}")]
    ListingNotExpired { expiry: u64, height: u64 },

    /// The reservation was already claimed or refunded (terminal states).
    #[error("MM_ERR_2014: reservation already settled as {state}")]
    AlreadyClaimed { state: String },

    /// A seller claim with nothing newly accrued.
    #[error("MM_ERR_2015: no collected funds to claim")]
    ClaimAmountZero,

    /// Cancellation while unsettled reservations remain outstanding.
    #[error("MM_ERR_2016: {count} unsettled reservations outstanding")]
    OutstandingReservations { count: usize },

    // =================================================================
    // Pause (3xxx)
    // =================================================================
    /// The system-wide emergency stop is engaged.
    #[error("MM_ERR_3000: marketplace is paused")]
    Paused,

    // =================================================================
    // Collaborator transfers (4xxx)
    // =================================================================
    /// A transfer failed in the asset transfer capability.
    #[error("MM_ERR_4000: {0}")]
    Transfer(#[from] TransferError),

    // =================================================================
    // Internal (9xxx)
    // =================================================================
    /// Reservation-sum conservation invariant violated — critical alert.
    #[error("MM_ERR_9000: conservation violation: {reason}")]
    ConservationViolation { reason: String },
}

impl MarketError {
    /// The stable numeric error code of the public contract surface.
    #[must_use]
    pub fn code(&self) -> u16 {
        match self {
            Self::ExpiryInPast { .. } => 1000,
            Self::PriceZero => 1001,
            Self::NotMaker => 1003,
            Self::AmountMismatch { .. } => 1004,
            Self::AlreadyListed(_) => 1005,
            Self::DivideFactorZero => 1006,
            Self::UnknownListing(_) => 2000,
            Self::NotContractOwner(_) => 2001,
            Self::ListingExpired { .. } => 2002,
            Self::PaymentAssetMismatch { .. } => 2004,
            Self::AssetNotWhitelisted(_) => 2007,
            Self::PaymentAssetNotWhitelisted(_) => 2008,
            Self::ListingFulfilled => 2011,
            Self::MilestoneNotComplete { .. } => 2012,
            Self::ListingNotExpired { .. } => 2013,
            Self::AlreadyClaimed { .. } => 2014,
            Self::ClaimAmountZero => 2015,
            Self::OutstandingReservations { .. } => 2016,
            Self::Paused => 3000,
            Self::Transfer(inner) => match inner {
                TransferError::InsufficientBalance { .. } => 4001,
                TransferError::Rejected { .. } => 4002,
            },
            Self::ConservationViolation { .. } => 9000,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, MarketError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = MarketError::PriceZero;
        let msg = format!("{err}");
        assert!(msg.starts_with("MM_ERR_1001"), "Got: {msg}");
    }

    #[test]
    fn codes_match_public_contract() {
        assert_eq!(MarketError::PriceZero.code(), 1001);
        assert_eq!(MarketError::NotMaker.code(), 1003);
        assert_eq!(
            MarketError::AmountMismatch {
                reason: "zero".into()
            }
            .code(),
            1004
        );
        assert_eq!(
            MarketError::UnknownListing(AssetId::from("t")).code(),
            2000
        );
        assert_eq!(
            MarketError::NotContractOwner(PrincipalId::new()).code(),
            2001
        );
        assert_eq!(
            MarketError::MilestoneNotComplete {
                reached: 0,
                needed: 4
            }
            .code(),
            2012
        );
        assert_eq!(MarketError::ClaimAmountZero.code(), 2015);
        assert_eq!(MarketError::Paused.code(), 3000);
    }

    #[test]
    fn transfer_error_propagates_verbatim() {
        let inner = TransferError::InsufficientBalance {
            needed: 100,
            available: 50,
        };
        let err: MarketError = inner.clone().into();
        assert_eq!(err.code(), 4001);
        let msg = format!("{err}");
        assert!(msg.contains("need 100"), "Got: {msg}");
        assert!(msg.contains("have 50"), "Got: {msg}");
        assert_eq!(err, MarketError::Transfer(inner));
    }

    #[test]
    fn all_errors_have_mm_err_prefix() {
        let errors = vec![
            MarketError::ExpiryInPast {
                expiry: 1,
                height: 2,
            },
            MarketError::AlreadyListed(AssetId::from("t")),
            MarketError::ListingExpired {
                expiry: 1,
                height: 2,
            },
            MarketError::ListingFulfilled,
            MarketError::AlreadyClaimed {
                state: "claimed".into(),
            },
            MarketError::OutstandingReservations { count: 2 },
            MarketError::ConservationViolation {
                reason: "test".into(),
            },
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("MM_ERR_"),
                "Error missing MM_ERR_ prefix: {msg}"
            );
            assert!(
                msg.contains(&err.code().to_string()),
                "Display missing code {}: {msg}",
                err.code()
            );
        }
    }
}
