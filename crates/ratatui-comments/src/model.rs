//! The comment data a host hands to the thread widgets.
//!
//! Field names on the wire follow the JSON shape comment backends commonly use for this widget:
//!
//! ```json
//! { "id": 1, "author": "Sarah Johnson", "avatar": "https://...", "content": "Hi",
//!   "timestamp": "2024-05-01T12:00:00Z", "likes": 5, "isBlocked": false, "replies": [] }
//! ```
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

use crate::error::CommentError;

/// Identifier of a comment: an integer (often a millisecond timestamp) or a string.
///
/// An integer id never equals a string id, even when both print the same.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommentId {
    Int(i64),
    Str(String),
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommentId::Int(n) => write!(f, "{n}"),
            CommentId::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for CommentId {
    fn from(n: i64) -> Self {
        CommentId::Int(n)
    }
}

impl From<i32> for CommentId {
    fn from(n: i32) -> Self {
        CommentId::Int(n.into())
    }
}

impl From<u32> for CommentId {
    fn from(n: u32) -> Self {
        CommentId::Int(n.into())
    }
}

impl From<&str> for CommentId {
    fn from(s: &str) -> Self {
        CommentId::Str(s.to_string())
    }
}

impl From<String> for CommentId {
    fn from(s: String) -> Self {
        CommentId::Str(s)
    }
}

/// One comment and its replies.
///
/// `id` must be unique across the whole forest the node lives in; the functions in
/// [`crate::tree`] update every node carrying a matching id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentNode {
    pub id: CommentId,
    pub author: String,
    /// Avatar image reference. Without one a placeholder is drawn from the author's initials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub content: String,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub likes: u64,
    /// Blocked comments hide their author, content and likes. Their replies stay visible.
    #[serde(rename = "isBlocked", default, skip_serializing_if = "is_false")]
    pub blocked: bool,
    #[serde(default)]
    pub replies: Vec<CommentNode>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl CommentNode {
    /// A fresh comment: no likes, no replies, not blocked.
    pub fn new(
        id: impl Into<CommentId>,
        author: impl Into<String>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            author: author.into(),
            avatar: None,
            content: content.into(),
            created_at,
            likes: 0,
            blocked: false,
            replies: Vec::new(),
        }
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    pub fn with_likes(mut self, likes: u64) -> Self {
        self.likes = likes;
        self
    }

    pub fn blocked(mut self) -> Self {
        self.blocked = true;
        self
    }

    pub fn with_replies(mut self, replies: Vec<CommentNode>) -> Self {
        self.replies = replies;
        self
    }
}

/// Parses a forest from JSON (an array of comments).
pub fn load_forest_json(json: &str) -> Result<Vec<CommentNode>, CommentError> {
    Ok(serde_json::from_str(json)?)
}

pub fn forest_to_json(forest: &[CommentNode]) -> Result<String, CommentError> {
    Ok(serde_json::to_string_pretty(forest)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn int_and_string_ids_are_distinct() {
        assert_ne!(CommentId::from(1), CommentId::from("1"));
        assert_eq!(CommentId::from(7).to_string(), "7");
        assert_eq!(CommentId::from("abc").to_string(), "abc");
    }

    #[test]
    fn parses_wire_format_with_optional_fields() {
        let json = r#"[
            {
                "id": 1,
                "author": "Sarah Johnson",
                "avatar": "https://placehold.co/40x40/3b82f6/fff?text=SJ",
                "content": "Great component!",
                "timestamp": "2024-05-01T12:00:00.000Z",
                "likes": 5,
                "replies": [
                    {
                        "id": "c-2",
                        "author": "Mike Chen",
                        "content": "Agreed",
                        "timestamp": "2024-05-01T12:30:00+02:00",
                        "likes": 2,
                        "isBlocked": true
                    }
                ]
            }
        ]"#;
        let forest = load_forest_json(json).unwrap();
        assert_eq!(forest.len(), 1);
        let root = &forest[0];
        assert_eq!(root.id, CommentId::Int(1));
        assert!(!root.blocked);
        assert_eq!(root.likes, 5);
        let reply = &root.replies[0];
        assert_eq!(reply.id, CommentId::Str("c-2".to_string()));
        assert!(reply.blocked);
        assert!(reply.avatar.is_none());
        assert!(reply.replies.is_empty());
        assert_eq!(
            reply.created_at,
            Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap()
        );
    }

    #[test]
    fn rejects_negative_likes() {
        let json = r#"[{"id":1,"author":"a","content":"b","timestamp":"2024-05-01T12:00:00Z","likes":-1}]"#;
        assert!(matches!(load_forest_json(json), Err(CommentError::Json(_))));
    }

    #[test]
    fn serializes_back_to_wire_names() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let node = CommentNode::new(3, "Alex", "Themes?", ts).blocked();
        let json = forest_to_json(&[node]).unwrap();
        assert!(json.contains("\"isBlocked\": true"));
        assert!(json.contains("\"timestamp\": \"2024-05-01T12:00:00Z\""));
        assert!(!json.contains("avatar"));
    }
}
