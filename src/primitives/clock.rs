//! Wall-clock anchoring for artifact expiry.
//!
//! Every issuance converts a relative lifetime into an absolute instant
//! here, and every verification compares against [`now`]. The process
//! clock is non-decreasing over real time; it tracks the wall clock so
//! independently running servers agree on expiry.
//!
//! [`now`]: fn.now.html

use chrono::{Duration, Utc};

use super::Time;

/// The current instant.
pub fn now() -> Time {
    Utc::now()
}

/// The absolute instant `ttl` from now.
pub fn now_plus(ttl: Duration) -> Time {
    Utc::now() + ttl
}
