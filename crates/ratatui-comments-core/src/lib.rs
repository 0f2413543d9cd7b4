//! `ratatui-comments-core` holds the small, reusable pieces the comment thread widgets are built
//! from.
//!
//! Nothing in here knows about comments. The crate provides:
//!
//! - [`input`]: a backend-agnostic event model, with [`crossterm_input`] behind the `crossterm`
//!   feature.
//! - [`keymap`] and [`help`]: key bindings and a one-line help renderer for them.
//! - [`text_field`]: an editable text buffer with cursor movement and submit rules.
//! - [`scroll`]: vertical scroll state for content taller than its area.
//! - [`render`] and [`wrapping`]: width-aware clipping and word wrapping.
//! - [`theme`]: the shared style palette.
//!
//! ## Design goals
//!
//! - Event-loop agnostic: the app reads events, converts them to [`input::InputEvent`] and hands
//!   them to widgets.
//! - No async runtime and no interior threads; every call runs to completion on the caller's
//!   thread.
pub mod theme;

#[cfg(feature = "crossterm")]
pub mod crossterm_input;

pub mod help;
pub mod input;
pub mod keymap;
pub mod render;
pub mod scroll;
pub mod text_field;
pub mod wrapping;
