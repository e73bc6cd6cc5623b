use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A single post as returned by the feed backend.
///
/// Unknown wire fields are ignored. Posts are owned by the pipeline for one
/// processing pass and never persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    #[serde(rename = "post_id")]
    pub id: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn has_image(&self) -> bool {
        self.image_url.is_some()
    }

    /// Message body, if the post has printable text.
    pub fn body(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_wire_shape() {
        let raw = r#"{
            "post_id": "abc123",
            "message": "hello",
            "created_at": "2024-05-01T12:30:45Z",
            "color": "9EC41C",
            "vote_count": 3
        }"#;
        let post: Post = serde_json::from_str(raw).unwrap();
        assert_eq!(post.id, "abc123");
        assert_eq!(post.body(), Some("hello"));
        assert!(!post.has_image());
    }

    #[test]
    fn empty_message_has_no_body() {
        let raw = r#"{"post_id": "x", "message": "", "created_at": "2024-05-01T12:30:45Z"}"#;
        let post: Post = serde_json::from_str(raw).unwrap();
        assert_eq!(post.body(), None);
    }

    #[test]
    fn missing_message_has_no_body() {
        let raw = r#"{"post_id": "x", "created_at": "2024-05-01T12:30:45Z"}"#;
        let post: Post = serde_json::from_str(raw).unwrap();
        assert_eq!(post.body(), None);
    }

    #[test]
    fn image_url_marks_image_post() {
        let raw = r#"{
            "post_id": "x",
            "message": "caption",
            "image_url": "https://img.example/x.jpg",
            "created_at": "2024-05-01T12:30:45Z"
        }"#;
        let post: Post = serde_json::from_str(raw).unwrap();
        assert!(post.has_image());
    }
}
