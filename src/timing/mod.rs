//! Timestamp capture for both peers

pub mod clock;
pub mod sequence;

pub use clock::{Clock, MonotonicClock};
pub use sequence::TimestampSequence;

/// Milliseconds since an arbitrary monotonic epoch.
pub type Timestamp = i64;

/// Signed gap in milliseconds between two adjacent timestamps.
pub type Delta = i64;
