//! `ratatui-comments` renders a nested comment thread in a terminal and lets the user post,
//! reply, like and moderate comments.
//!
//! The widget never owns the comments. The host keeps a forest of [`model::CommentNode`]s, hands
//! it to [`section::CommentSection`] on every frame, and applies the actions it gets back with the
//! pure functions in [`tree`]:
//!
//! ```
//! use ratatui_comments::model::{CommentId, CommentNode};
//! use ratatui_comments::section::CommentSectionAction;
//! use ratatui_comments::tree;
//!
//! let mut forest = vec![CommentNode::new(1, "Sarah Johnson", "Nice widget!", chrono::Utc::now())];
//! let action = CommentSectionAction::Like(CommentId::from(1));
//! if let CommentSectionAction::Like(id) = action {
//!     forest = tree::increment_like(&forest, &id);
//! }
//! assert_eq!(forest[0].likes, 1);
//! ```
//!
//! Primitives (input events, key bindings, text fields, scrolling) are re-exported from
//! `ratatui-comments-core`.
pub use ratatui_comments_core::help;
pub use ratatui_comments_core::input;
pub use ratatui_comments_core::keymap;
pub use ratatui_comments_core::render;
pub use ratatui_comments_core::scroll;
pub use ratatui_comments_core::text_field;
pub use ratatui_comments_core::theme;
pub use ratatui_comments_core::wrapping;

#[cfg(feature = "crossterm")]
pub use ratatui_comments_core::crossterm_input;

pub mod avatar;
pub mod bindings;
pub mod composer;
pub mod error;
pub mod format;
pub mod model;
pub mod node;
pub mod section;
pub mod tree;

pub use error::CommentError;
pub use model::CommentId;
pub use model::CommentNode;
pub use section::CommentSection;
pub use section::CommentSectionAction;
pub use section::CommentSectionOptions;
