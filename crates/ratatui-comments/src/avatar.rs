use ratatui::text::Span;
use unicode_width::UnicodeWidthStr;

use crate::format;
use crate::format::AvatarColor;
use crate::model::CommentNode;
use ratatui_comments_core::theme::Theme;

/// Width in cells of the avatar badge drawn in front of each comment.
pub const BADGE_WIDTH: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Avatar {
    /// The comment carries its own image reference.
    Image { src: String, initials: String },
    /// No image: initials on a generated background.
    Placeholder { initials: String, color: AvatarColor },
}

impl Avatar {
    /// Picks the avatar for `node`. `color` is only used for placeholders.
    pub fn for_node(node: &CommentNode, color: AvatarColor) -> Self {
        let initials = format::initials(&node.author);
        match &node.avatar {
            Some(src) => Avatar::Image {
                src: src.clone(),
                initials,
            },
            None => Avatar::Placeholder { initials, color },
        }
    }

    pub fn initials(&self) -> &str {
        match self {
            Avatar::Image { initials, .. } | Avatar::Placeholder { initials, .. } => initials,
        }
    }

    /// An image URL for hosts that can show pictures: the node's own reference, or a generated
    /// placeholder.
    pub fn url(&self) -> String {
        match self {
            Avatar::Image { src, .. } => src.clone(),
            Avatar::Placeholder { initials, color } => placeholder_url(*color, initials),
        }
    }

    /// The initials centered in a [`BADGE_WIDTH`]-cell badge.
    pub fn badge(&self, theme: &Theme) -> Span<'static> {
        let label = center(self.initials(), BADGE_WIDTH);
        let style = match self {
            Avatar::Image { .. } => theme.avatar_image,
            Avatar::Placeholder { color, .. } => theme.avatar_fg.bg((*color).into()),
        };
        Span::styled(label, style)
    }
}

pub fn placeholder_url(color: AvatarColor, initials: &str) -> String {
    format!(
        "https://placehold.co/40x40/{}/fff?text={initials}",
        color.to_hex()
    )
}

fn center(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    if w >= width {
        return ratatui_comments_core::render::truncate_to_cols(s, width).to_string();
    }
    let left = (width - w) / 2;
    let right = width - w - left;
    format!("{}{s}{}", " ".repeat(left), " ".repeat(right))
}

/// Badge for blocked comments. It carries no initials.
pub fn blocked_badge(theme: &Theme) -> Span<'static> {
    Span::styled(" ".repeat(BADGE_WIDTH), theme.avatar_image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn placeholder_when_no_image() {
        let node = CommentNode::new(1, "Sarah Johnson", "hi", Utc::now());
        let avatar = Avatar::for_node(&node, AvatarColor::new(0x10, 0xb9, 0x81));
        assert_eq!(
            avatar.url(),
            "https://placehold.co/40x40/10b981/fff?text=SJ"
        );
        assert_eq!(avatar.badge(&Theme::default()).content, " SJ ");
    }

    #[test]
    fn image_reference_wins() {
        let node = CommentNode::new(1, "Mike Chen", "hi", Utc::now()).with_avatar("me.png");
        let avatar = Avatar::for_node(&node, AvatarColor::new(0, 0, 0));
        assert_eq!(avatar.url(), "me.png");
        assert_eq!(avatar.initials(), "MC");
    }

    #[test]
    fn empty_name_gives_blank_badge() {
        let node = CommentNode::new(1, "   ", "hi", Utc::now());
        let avatar = Avatar::for_node(&node, AvatarColor::new(0, 0, 0));
        assert_eq!(avatar.badge(&Theme::default()).content, "    ");
    }
}
