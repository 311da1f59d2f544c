//! wslat - WebSocket message cadence diagnostic tool
//!
//! A sender streams fixed-size messages over one persistent WebSocket
//! connection at a target rate. Both the sender (send cadence) and the
//! receiver (arrival cadence) record a millisecond timestamp per message and
//! summarize the gaps between consecutive timestamps as a delta histogram.

pub mod analysis;
pub mod logging;
pub mod protocol;
pub mod receiver;
pub mod sender;
pub mod timing;
