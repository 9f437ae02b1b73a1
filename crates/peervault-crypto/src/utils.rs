//! Common utility functions for peervault cryptographic operations.

use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current Unix timestamp in seconds.
///
/// Single source of truth for timestamp generation across the peervault
/// system.
///
/// # Panics
///
/// Panics if the system time is set before the Unix epoch.
pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("System time is before Unix epoch")
        .as_secs()
}
