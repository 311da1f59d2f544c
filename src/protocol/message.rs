use crate::protocol::error::{ProtocolError, Result};
use rand::distributions::Uniform;
use rand::Rng;
use tracing::trace;
use tungstenite::Message;

/// Largest payload a sender may be configured with, matching the default
/// WebSocket frame limit.
pub const MAX_PAYLOAD_SIZE: usize = 16 << 20;

const RESET_TOKEN: &str = "RESET";
const DUMP_TOKEN: &str = "DUMP";

/// Session control tokens, sent as text messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMessage {
    /// Start a session: the receiver clears its timestamp sequence
    Reset,
    /// End a session: the receiver summarizes and clears its sequence
    Dump,
}

impl ControlMessage {
    pub fn token(self) -> &'static str {
        match self {
            ControlMessage::Reset => RESET_TOKEN,
            ControlMessage::Dump => DUMP_TOKEN,
        }
    }

    /// Exact, case-sensitive match against the control tokens
    pub fn from_token(text: &str) -> Option<Self> {
        match text {
            RESET_TOKEN => Some(ControlMessage::Reset),
            DUMP_TOKEN => Some(ControlMessage::Dump),
            _ => None,
        }
    }

    pub fn encode(self) -> Message {
        Message::text(self.token().to_string())
    }
}

/// Opaque payload of random lowercase letters.
///
/// Lowercase content can never be mistaken for an uppercase control token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    content: String,
}

impl Payload {
    pub fn random<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Self> {
        if size > MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge {
                size,
                max: MAX_PAYLOAD_SIZE,
            });
        }

        let letters = Uniform::new_inclusive(b'a', b'z');
        let content = rng
            .sample_iter(letters)
            .take(size)
            .map(char::from)
            .collect::<String>();
        Ok(Self { content })
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn encode(&self) -> Message {
        Message::text(self.content.clone())
    }
}

/// A received message as seen by the session logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundMessage {
    Control(ControlMessage),
    /// Any other data message; only its size is kept
    Payload { size: usize },
}

impl InboundMessage {
    /// Classify a transport message.
    ///
    /// Returns `None` for ping, pong, close and raw frames, which belong to
    /// the transport and are not session events. Binary messages are always
    /// payloads, even if their bytes spell a control token.
    pub fn decode(message: &Message) -> Option<Self> {
        let inbound = match message {
            Message::Text(text) => match ControlMessage::from_token(text.as_str()) {
                Some(control) => InboundMessage::Control(control),
                None => InboundMessage::Payload { size: text.len() },
            },
            Message::Binary(data) => InboundMessage::Payload { size: data.len() },
            Message::Ping(_) | Message::Pong(_) | Message::Close(_) | Message::Frame(_) => {
                return None
            }
        };
        trace!(message = ?inbound, "Message decoded");
        Some(inbound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_control_tokens() {
        assert_eq!(ControlMessage::from_token("RESET"), Some(ControlMessage::Reset));
        assert_eq!(ControlMessage::from_token("DUMP"), Some(ControlMessage::Dump));
        assert_eq!(ControlMessage::from_token("reset"), None);
        assert_eq!(ControlMessage::from_token("DUMP "), None);
    }

    #[test]
    fn test_decode_control_text() {
        let decoded = InboundMessage::decode(&ControlMessage::Reset.encode());
        assert_eq!(decoded, Some(InboundMessage::Control(ControlMessage::Reset)));

        let decoded = InboundMessage::decode(&ControlMessage::Dump.encode());
        assert_eq!(decoded, Some(InboundMessage::Control(ControlMessage::Dump)));
    }

    #[test]
    fn test_decode_payloads() {
        let decoded = InboundMessage::decode(&Message::text("hello".to_string()));
        assert_eq!(decoded, Some(InboundMessage::Payload { size: 5 }));

        let decoded = InboundMessage::decode(&Message::binary(b"RESET".to_vec()));
        assert_eq!(decoded, Some(InboundMessage::Payload { size: 5 }));
    }

    #[test]
    fn test_decode_ignores_transport_frames() {
        assert_eq!(InboundMessage::decode(&Message::Ping(Vec::new().into())), None);
        assert_eq!(InboundMessage::decode(&Message::Pong(Vec::new().into())), None);
        assert_eq!(InboundMessage::decode(&Message::Close(None)), None);
    }

    #[test]
    fn test_random_payload() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(7);
        let payload = Payload::random(1024, &mut rng)?;

        assert_eq!(payload.len(), 1024);
        assert!(payload
            .encode()
            .to_text()
            .map(|text| text.bytes().all(|b| b.is_ascii_lowercase()))
            .unwrap_or(false));
        Ok(())
    }

    #[test]
    fn test_payload_too_large() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(Payload::random(MAX_PAYLOAD_SIZE + 1, &mut rng).is_err());
    }
}
