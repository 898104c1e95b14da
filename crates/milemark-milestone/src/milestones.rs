//! Milestone threshold table and completion count.
//!
//! A listing is split into four equal quarters. Because `amount / 4` may
//! truncate, the boundaries are an explicit ordered table rather than a
//! multiplication in a loop, and the fourth boundary is defined as exactly
//! `amount` — full-amount completion stays reachable for any `amount`.

use milemark_types::constants::MILESTONE_COUNT;

/// The four milestone boundaries for a listed `amount`:
/// `[amount/4, amount/2, 3*amount/4, amount]`, floor division.
///
/// The third entry is computed in `u128` so `3 * amount` cannot overflow.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // 3a/4 <= a fits u64
pub fn thresholds(amount: u64) -> [u64; 4] {
    let a = u128::from(amount);
    [amount / 4, amount / 2, (a * 3 / 4) as u64, amount]
}

/// Completed milestone count for a listing: how many boundaries
/// `reserved_total` has met or passed. Monotonic non-decreasing in
/// `reserved_total`.
///
/// A zero `reserved_total` never completes a milestone, even for tiny
/// amounts whose first boundary truncates to zero.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // count <= 4
pub fn milestones_reached(amount: u64, reserved_total: u64) -> u8 {
    if reserved_total == 0 {
        return 0;
    }
    thresholds(amount)
        .iter()
        .filter(|&&t| t <= reserved_total)
        .count() as u8
}

/// Reserved quantity banked at milestone `k`: `0` for `k == 0`, the
/// `k`-th boundary otherwise.
#[must_use]
pub fn boundary(amount: u64, k: u8) -> u64 {
    debug_assert!(k <= MILESTONE_COUNT, "milestone index out of range");
    if k == 0 {
        0
    } else {
        thresholds(amount)[usize::from(k) - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_divisible_amount() {
        assert_eq!(
            thresholds(1_000_000_000),
            [250_000_000, 500_000_000, 750_000_000, 1_000_000_000]
        );
    }

    #[test]
    fn thresholds_truncating_amount() {
        // 10 / 4 = 2, 10 / 2 = 5, 30 / 4 = 7, top is exactly 10.
        assert_eq!(thresholds(10), [2, 5, 7, 10]);
        assert_eq!(thresholds(7), [1, 3, 5, 7]);
    }

    #[test]
    fn top_boundary_is_exact_amount() {
        for amount in [1u64, 2, 3, 7, 999_999_999, u64::MAX] {
            assert_eq!(thresholds(amount)[3], amount);
        }
    }

    #[test]
    fn thresholds_ordered() {
        for amount in [1u64, 4, 7, 10, 1_000_000_000, u64::MAX] {
            let t = thresholds(amount);
            assert!(t[0] <= t[1] && t[1] <= t[2] && t[2] <= t[3], "{t:?}");
        }
    }

    #[test]
    fn reached_at_each_boundary() {
        let amount = 1_000_000_000;
        assert_eq!(milestones_reached(amount, 0), 0);
        assert_eq!(milestones_reached(amount, 249_999_999), 0);
        assert_eq!(milestones_reached(amount, 250_000_000), 1);
        assert_eq!(milestones_reached(amount, 250_000_001), 1);
        assert_eq!(milestones_reached(amount, 499_999_999), 1);
        assert_eq!(milestones_reached(amount, 500_000_000), 2);
        assert_eq!(milestones_reached(amount, 749_999_999), 2);
        assert_eq!(milestones_reached(amount, 750_000_000), 3);
        assert_eq!(milestones_reached(amount, 999_999_999), 3);
        assert_eq!(milestones_reached(amount, 1_000_000_000), 4);
    }

    #[test]
    fn reached_monotonic_in_reserved_total() {
        let amount = 1_000_003; // not divisible by 4
        let mut prev = 0;
        for reserved in (0..=amount).step_by(10_007) {
            let reached = milestones_reached(amount, reserved);
            assert!(reached >= prev, "dropped at reserved={reserved}");
            prev = reached;
        }
        assert_eq!(milestones_reached(amount, amount), 4);
    }

    #[test]
    fn zero_reserved_never_completes() {
        // amount < 4 truncates the first boundary to zero; a zero
        // reservation still must not count as a completed milestone.
        assert_eq!(milestones_reached(3, 0), 0);
        assert_eq!(milestones_reached(0, 0), 0);
    }

    #[test]
    fn tiny_amount_full_completion_reachable() {
        assert_eq!(thresholds(3), [0, 1, 2, 3]);
        assert_eq!(milestones_reached(3, 3), 4);
        // A single unit already passes the truncated-to-zero boundary
        // and the first whole-unit boundary.
        assert_eq!(milestones_reached(3, 1), 2);
    }

    #[test]
    fn boundary_values() {
        let amount = 1_000_000_000;
        assert_eq!(boundary(amount, 0), 0);
        assert_eq!(boundary(amount, 1), 250_000_000);
        assert_eq!(boundary(amount, 2), 500_000_000);
        assert_eq!(boundary(amount, 3), 750_000_000);
        assert_eq!(boundary(amount, 4), 1_000_000_000);
    }

    #[test]
    fn no_overflow_near_u64_max() {
        let amount = u64::MAX;
        let t = thresholds(amount);
        assert_eq!(t[3], u64::MAX);
        assert_eq!(milestones_reached(amount, u64::MAX), 4);
    }
}
