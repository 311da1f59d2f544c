use thiserror::Error;

/// Protocol-level errors for building wire messages
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Invalid payload size: {size} bytes exceeds the maximum of {max} bytes")]
    PayloadTooLarge { size: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
