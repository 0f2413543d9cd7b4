use crate::model::CommentId;

#[derive(Debug, thiserror::Error)]
pub enum CommentError {
    #[error("no comment with id {0}")]
    NotFound(CommentId),
    #[error("comment id {0} appears more than once in the thread")]
    DuplicateId(CommentId),
    #[error("invalid color {0:?}: expected 6 hex digits, optionally prefixed with '#'")]
    InvalidColor(String),
    #[error("invalid comment data: {0}")]
    Json(#[from] serde_json::Error),
}
