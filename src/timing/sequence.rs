use crate::timing::Timestamp;

/// Ordered timestamps recorded during one session by one peer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimestampSequence {
    timestamps: Vec<Timestamp>,
}

impl TimestampSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            timestamps: Vec::with_capacity(capacity),
        }
    }

    /// Append a timestamp in capture order
    pub fn record(&mut self, timestamp: Timestamp) {
        self.timestamps.push(timestamp);
    }

    pub fn as_slice(&self) -> &[Timestamp] {
        &self.timestamps
    }

    pub fn last(&self) -> Option<Timestamp> {
        self.timestamps.last().copied()
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

impl From<Vec<Timestamp>> for TimestampSequence {
    fn from(timestamps: Vec<Timestamp>) -> Self {
        Self { timestamps }
    }
}
