// Wall-clock time helpers.
//
// These use SystemTime::now() and are for sync-loop backoff, logging and
// metrics only. Chain state itself is timestamped from block headers, which
// come from the node and are never derived from local wall-clock time.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// Millis timestamps used to determine it using its type
pub type TimestampMillis = u64;

// Seconds timestamps used to determine it using its type
pub type TimestampSeconds = u64;

#[inline]
pub fn get_current_time() -> Duration {
    let start = SystemTime::now();

    start
        .duration_since(UNIX_EPOCH)
        .expect("Incorrect time returned from get_current_time")
}

// Return timestamp in seconds
// SAFETY: Non-consensus operation - uses system time
// Only use for logging, metrics, or admission control (not deterministic consensus)
pub fn get_current_time_in_seconds() -> TimestampSeconds {
    get_current_time().as_secs()
}

// Return timestamp in milliseconds
// SAFETY: Non-consensus operation - uses system time
// Only use for logging, metrics, or admission control (not deterministic consensus)
// We cast it to u64 as we have plenty of time before it overflows (year 584,942,417 AD)
pub fn get_current_time_in_millis() -> TimestampMillis {
    get_current_time().as_millis() as TimestampMillis
}
