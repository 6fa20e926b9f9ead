use base64::Engine;
use serde::{Deserialize, Serialize};

/// Inbound segment arrival. Raw compressed bytes travel base64-encoded
/// inside the JSON payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentMessage {
    pub session_id: String,
    pub ordinal: u32,
    pub data: String,
}

impl SegmentMessage {
    pub fn from_bytes(session_id: String, ordinal: u32, bytes: &[u8]) -> Self {
        Self {
            session_id,
            ordinal,
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    pub fn decode_data(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(&self.data)
    }
}

/// Inbound pause / resume / stop lifecycle message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionControlMessage {
    pub session_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_payload_survives_encoding() {
        let msg = SegmentMessage::from_bytes("demo".to_string(), 3, b"\x00\x01binary\xff");

        assert_eq!(msg.decode_data().unwrap(), b"\x00\x01binary\xff");
    }

    #[test]
    fn invalid_base64_is_rejected() {
        let msg = SegmentMessage {
            session_id: "demo".to_string(),
            ordinal: 0,
            data: "not base64 %%".to_string(),
        };

        assert!(msg.decode_data().is_err());
    }
}
