//! Wire protocol: control tokens and payload messages carried over WebSocket

pub mod error;
pub mod message;

pub use error::{ProtocolError, Result as ProtocolResult};
pub use message::{ControlMessage, InboundMessage, Payload, MAX_PAYLOAD_SIZE};
