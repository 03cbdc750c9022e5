use crate::types::constants::heartbeat_frames;
use crate::types::message::ChatMessage;

/// Classification of one raw inbound text frame.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedFrame {
    /// Liveness traffic: a plain sentinel or a structured heartbeat payload
    Heartbeat,
    /// A well-formed chat message
    Event(ChatMessage),
    /// Anything else; dropped by the caller
    Unrecognized,
}

/// Classifies a raw inbound frame.
///
/// Malformed input must never be able to terminate the connection, so this
/// function is total: any parse failure or payload missing required fields
/// comes back as [`DecodedFrame::Unrecognized`].
pub fn decode_frame(raw: &str) -> DecodedFrame {
    // Plain sentinels bypass structural parsing entirely
    if raw == heartbeat_frames::PING || raw == heartbeat_frames::PONG {
        return DecodedFrame::Heartbeat;
    }

    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(_) => return DecodedFrame::Unrecognized,
    };

    // The server may send the heartbeat as a structured payload instead of
    // the plain sentinel; both forms are accepted interchangeably.
    if value.get("type").and_then(|t| t.as_str()) == Some(heartbeat_frames::TYPE_MARKER) {
        return DecodedFrame::Heartbeat;
    }

    match serde_json::from_value::<ChatMessage>(value) {
        Ok(message) => DecodedFrame::Event(message),
        Err(_) => DecodedFrame::Unrecognized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_sentinels_are_heartbeats() {
        assert_eq!(decode_frame("ping"), DecodedFrame::Heartbeat);
        assert_eq!(decode_frame("pong"), DecodedFrame::Heartbeat);
    }

    #[test]
    fn test_structured_heartbeat() {
        assert_eq!(decode_frame(r#"{"type":"heartbeat"}"#), DecodedFrame::Heartbeat);
    }

    #[test]
    fn test_chat_message_frame() {
        let raw = r#"{"id":"7","author":"ferris","author_id":"1","content":"hi","timestamp":"2024-05-01T12:00:00Z"}"#;
        match decode_frame(raw) {
            DecodedFrame::Event(msg) => {
                assert_eq!(msg.id, "7");
                assert_eq!(msg.content, "hi");
            }
            other => panic!("expected Event, got {:?}", other),
        }
    }

    #[test]
    fn test_non_json_is_unrecognized() {
        assert_eq!(decode_frame("not json at all"), DecodedFrame::Unrecognized);
        assert_eq!(decode_frame(""), DecodedFrame::Unrecognized);
        assert_eq!(decode_frame("PING"), DecodedFrame::Unrecognized);
    }

    #[test]
    fn test_missing_required_fields_is_unrecognized() {
        assert_eq!(
            decode_frame(r#"{"id":"7","author":"ferris"}"#),
            DecodedFrame::Unrecognized
        );
        assert_eq!(decode_frame(r#"{"content":"hi"}"#), DecodedFrame::Unrecognized);
        assert_eq!(decode_frame("[1,2,3]"), DecodedFrame::Unrecognized);
        assert_eq!(decode_frame("42"), DecodedFrame::Unrecognized);
    }

    #[test]
    fn test_unknown_type_marker_is_not_heartbeat() {
        assert_eq!(decode_frame(r#"{"type":"stats"}"#), DecodedFrame::Unrecognized);
    }
}
