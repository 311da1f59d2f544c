//! Constants used by the sender

/// Default target send rate in messages per second
pub const DEFAULT_RATE: u32 = 60;

/// Default session duration in seconds
pub const DEFAULT_DURATION_SECS: u32 = 60;

/// Default payload size in bytes
pub const DEFAULT_PAYLOAD_SIZE: usize = 1024;

/// Highest rate the ticker can honor with millisecond timestamps
pub const MAX_RATE: u32 = 1000;

/// Progress bar tick interval in milliseconds
pub const PROGRESS_TICK_INTERVAL_MS: u64 = 100;

/// Live cadence update interval in milliseconds
pub const LIVE_STATS_UPDATE_INTERVAL_MS: u128 = 500;
