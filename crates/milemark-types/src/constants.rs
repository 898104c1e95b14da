//! System-wide constants for the Milemark marketplace.

/// Number of equal milestone fractions a listing is split into.
pub const MILESTONE_COUNT: u8 = 4;

/// Milestones required before buyers may claim their asset share
/// (full completion of the listing).
pub const FULL_COMPLETION: u8 = MILESTONE_COUNT;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Milemark";
