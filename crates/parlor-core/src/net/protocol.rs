use serde::Serialize;
use serde::de::DeserializeOwned;

use super::messages::{ClientMessage, ServerMessage};

/// Fixed simulation tick rate of the real-time loop in Hz.
pub const TICK_RATE_HZ: u32 = 60;

/// Maximum inbound frame size in bytes; larger frames are dropped.
pub const MAX_MESSAGE_SIZE: usize = 64 * 1024;

#[derive(Debug)]
pub enum ProtocolError {
    EmptyMessage,
    PayloadTooLarge(usize),
    SerializeError(String),
    DeserializeError(String),
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "empty message"),
            Self::PayloadTooLarge(size) => {
                write!(f, "payload too large: {size} bytes (max {MAX_MESSAGE_SIZE})")
            },
            Self::SerializeError(e) => write!(f, "serialize error: {e}"),
            Self::DeserializeError(e) => write!(f, "deserialize error: {e}"),
        }
    }
}

impl std::error::Error for ProtocolError {}

/// Encode a server message as a JSON text frame.
pub fn encode_server_message<S: Serialize>(
    msg: &ServerMessage<S>,
) -> Result<String, ProtocolError> {
    serde_json::to_string(msg).map_err(|e| ProtocolError::SerializeError(e.to_string()))
}

/// Encode a client message as a JSON text frame.
pub fn encode_client_message(msg: &ClientMessage) -> Result<String, ProtocolError> {
    serde_json::to_string(msg).map_err(|e| ProtocolError::SerializeError(e.to_string()))
}

/// Decode a JSON text frame into a client message.
pub fn decode_client_message(text: &str) -> Result<ClientMessage, ProtocolError> {
    check_frame(text)?;
    serde_json::from_str(text).map_err(|e| ProtocolError::DeserializeError(e.to_string()))
}

/// Decode a JSON text frame into a server message.
pub fn decode_server_message<S: DeserializeOwned>(
    text: &str,
) -> Result<ServerMessage<S>, ProtocolError> {
    check_frame(text)?;
    serde_json::from_str(text).map_err(|e| ProtocolError::DeserializeError(e.to_string()))
}

fn check_frame(text: &str) -> Result<(), ProtocolError> {
    if text.is_empty() {
        return Err(ProtocolError::EmptyMessage);
    }
    if text.len() > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::PayloadTooLarge(text.len()));
    }
    Ok(())
}
