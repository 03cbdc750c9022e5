use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single chat message received over the feed.
///
/// Identity is `id`: two messages with the same `id` are the same message
/// regardless of any other field. Only `id`, `author` and `content` are
/// required on the wire; the remaining fields are filled with defaults when
/// the server omits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub author: String,
    #[serde(default)]
    pub author_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_message_round_trip() {
        let json = r#"{
            "id": "42",
            "author": "ferris",
            "author_id": "1001",
            "avatar": "https://cdn.example.com/ferris.png",
            "content": "hello",
            "timestamp": "2024-05-01T12:00:00Z"
        }"#;

        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.id, "42");
        assert_eq!(msg.author, "ferris");
        assert_eq!(msg.author_id, "1001");
        assert_eq!(msg.avatar.as_deref(), Some("https://cdn.example.com/ferris.png"));
        assert_eq!(msg.content, "hello");
        assert!(msg.timestamp.is_some());

        let serialized = serde_json::to_string(&msg).unwrap();
        let deserialized: ChatMessage = serde_json::from_str(&serialized).unwrap();
        assert_eq!(msg, deserialized);
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{"id": "1", "author": "a", "content": "c"}"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.author_id, "");
        assert_eq!(msg.avatar, None);
        assert_eq!(msg.timestamp, None);
    }

    #[test]
    fn test_missing_required_field_is_an_error() {
        let json = r#"{"id": "1", "author": "a"}"#;
        assert!(serde_json::from_str::<ChatMessage>(json).is_err());
    }

    #[test]
    fn test_absent_avatar_not_serialized() {
        let msg = ChatMessage {
            id: "1".to_string(),
            author: "a".to_string(),
            author_id: String::new(),
            avatar: None,
            content: "c".to_string(),
            timestamp: None,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains(r#""avatar":"#));
    }
}
