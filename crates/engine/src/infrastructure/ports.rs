//! Port traits for infrastructure boundaries.
//!
//! Randomness is the only thing the engine needs from the process; it is
//! injected so tests and replays can pin every roll.

use uuid::Uuid;

// =============================================================================
// Testability Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait RandomPort: Send + Sync {
    /// Uniform integer in `[min, max]` inclusive.
    fn gen_range(&self, min: i32, max: i32) -> i32;
    fn gen_uuid(&self) -> Uuid;
}
