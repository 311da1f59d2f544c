//! Delta histogram aggregation and reporting, shared by sender and receiver

pub mod histogram;
pub mod reporter;
pub mod statistics;

pub use histogram::{aggregate, deltas, DeltaBucket, DeltaHistogram};
pub use reporter::Reporter;
pub use statistics::Statistics;
