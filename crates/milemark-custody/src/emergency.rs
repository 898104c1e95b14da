//! System-wide emergency stop.
//!
//! While engaged, the settlement plane rejects listing and reservation
//! operations. Only the contract owner may flip the flag.

use milemark_types::{MarketError, PauseFlag, PrincipalId, Result};
use tracing::warn;

/// Owner-gated pause flag.
#[derive(Debug)]
pub struct EmergencyStop {
    owner: PrincipalId,
    stopped: bool,
}

impl EmergencyStop {
    /// Create the flag in the running (not stopped) state.
    #[must_use]
    pub fn new(owner: PrincipalId) -> Self {
        Self {
            owner,
            stopped: false,
        }
    }

    /// Engage or release the emergency stop. Owner-only.
    ///
    /// # Errors
    /// Returns [`MarketError::NotContractOwner`] for any other caller.
    pub fn set_emergency_stop(&mut self, caller: PrincipalId, stopped: bool) -> Result<()> {
        if caller != self.owner {
            return Err(MarketError::NotContractOwner(caller));
        }
        if stopped && !self.stopped {
            warn!("emergency stop engaged");
        }
        self.stopped = stopped;
        Ok(())
    }

    /// Current state of the flag.
    #[must_use]
    pub fn get_emergency_stop(&self) -> bool {
        self.stopped
    }
}

impl PauseFlag for EmergencyStop {
    fn is_paused(&self) -> bool {
        self.stopped
    }
}
