use std::collections::HashMap;

use chrono::DateTime;
use chrono::Local;
use chrono::Utc;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui_comments_core::theme::Theme;
use ratatui_comments_core::wrapping;

use crate::avatar;
use crate::avatar::Avatar;
use crate::avatar::BADGE_WIDTH;
use crate::composer::Composer;
use crate::format;
use crate::format::AvatarColor;
use crate::model::CommentId;
use crate::model::CommentNode;

/// Text shown in place of a blocked comment.
pub const BLOCKED_PLACEHOLDER: &str = "This comment is unavailable or deleted.";

/// Columns each reply level is shifted right by.
pub const INDENT_PER_LEVEL: usize = 2;

const CONTENT_INDENT: usize = BADGE_WIDTH + 1;

/// Per-comment view state. Lives as long as the section that owns it and is never saved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeUiState {
    pub reply_open: bool,
    /// Set by the first like of this session; further likes are ignored.
    pub liked: bool,
    pub avatar_color: AvatarColor,
}

impl NodeUiState {
    pub fn new(avatar_color: AvatarColor) -> Self {
        Self {
            reply_open: false,
            liked: false,
            avatar_color,
        }
    }

    /// Latches the like. Returns `false` if it was already latched.
    pub fn like(&mut self) -> bool {
        if self.liked {
            return false;
        }
        self.liked = true;
        true
    }
}

impl Default for NodeUiState {
    fn default() -> Self {
        Self::new(format::random_avatar_color())
    }
}

/// What the viewer may do, shared by every node of a thread.
#[derive(Clone, Copy, Debug)]
pub struct Permissions {
    pub max_depth: usize,
    pub admin: bool,
    pub can_post: bool,
    pub likes_enabled: bool,
    pub deletes_enabled: bool,
}

impl Permissions {
    pub fn can_like(&self, node: &CommentNode) -> bool {
        self.likes_enabled && !node.blocked
    }

    pub fn can_reply(&self, node: &CommentNode, depth: usize) -> bool {
        !node.blocked && self.can_post && depth < self.max_depth
    }

    pub fn can_block(&self, node: &CommentNode) -> bool {
        !node.blocked && self.admin && self.deletes_enabled
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    Header,
    Content,
    Actions,
    /// One line of the reply box; `line` counts from the box's first row.
    Composer { line: usize },
    Blocked,
}

/// One display row of a thread, before clipping to the viewport.
#[derive(Clone, Debug)]
pub struct Row {
    pub indent: usize,
    pub spans: Vec<Span<'static>>,
    pub owner: CommentId,
    pub kind: RowKind,
}

/// Where one comment landed in a [`ThreadLayout`]. Row ranges cover the comment itself, not its
/// replies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeEntry {
    pub id: CommentId,
    pub depth: usize,
    pub first_row: usize,
    pub last_row: usize,
    /// First row and indent of the open reply box.
    pub composer: Option<(usize, usize)>,
}

#[derive(Clone, Debug, Default)]
pub struct ThreadLayout {
    pub rows: Vec<Row>,
    /// Visible comments in display order.
    pub nodes: Vec<NodeEntry>,
}

impl ThreadLayout {
    pub fn position(&self, id: &CommentId) -> Option<usize> {
        self.nodes.iter().position(|n| &n.id == id)
    }
}

pub struct LayoutContext<'a> {
    pub theme: &'a Theme,
    pub width: usize,
    pub permissions: Permissions,
    pub now: DateTime<Utc>,
    /// Show week-old dates on the local calendar instead of UTC.
    pub local_dates: bool,
    pub composers: &'a HashMap<CommentId, Composer>,
    /// Reply box holding keyboard focus.
    pub focused_reply: Option<&'a CommentId>,
}

/// Lays out `forest` as rows, creating view state for comments seen for the first time.
pub fn layout_forest(
    forest: &[CommentNode],
    ctx: &LayoutContext<'_>,
    states: &mut HashMap<CommentId, NodeUiState>,
) -> ThreadLayout {
    let mut out = ThreadLayout::default();
    for node in forest {
        layout_node(node, 0, ctx, states, &mut out);
    }
    out
}

fn layout_node(
    node: &CommentNode,
    depth: usize,
    ctx: &LayoutContext<'_>,
    states: &mut HashMap<CommentId, NodeUiState>,
    out: &mut ThreadLayout,
) {
    let indent = (depth * INDENT_PER_LEVEL).min(ctx.width / 2);
    let text_width = ctx.width.saturating_sub(indent + CONTENT_INDENT).max(1);
    let state = *states.entry(node.id.clone()).or_default();
    let first_row = out.rows.len();
    let mut composer = None;

    let push = |out: &mut ThreadLayout, indent: usize, kind: RowKind, spans: Vec<Span<'static>>| {
        out.rows.push(Row {
            indent,
            spans,
            owner: node.id.clone(),
            kind,
        });
    };

    if node.blocked {
        for (i, line) in wrapping::wrap_words(BLOCKED_PLACEHOLDER, text_width)
            .into_iter()
            .enumerate()
        {
            let lead = if i == 0 {
                avatar::blocked_badge(ctx.theme)
            } else {
                Span::raw(" ".repeat(BADGE_WIDTH))
            };
            push(
                out,
                indent,
                RowKind::Blocked,
                vec![lead, Span::raw(" "), Span::styled(line, ctx.theme.blocked)],
            );
        }
    } else {
        let badge = Avatar::for_node(node, state.avatar_color).badge(ctx.theme);
        let age = if ctx.local_dates {
            format::format_relative_time_in(node.created_at, ctx.now, &Local)
        } else {
            format::format_relative_time_at(node.created_at, ctx.now)
        };
        push(
            out,
            indent,
            RowKind::Header,
            vec![
                badge,
                Span::raw(" "),
                Span::styled(node.author.clone(), ctx.theme.author),
                Span::styled(" · ", ctx.theme.text_muted),
                Span::styled(age, ctx.theme.text_muted),
            ],
        );
        for line in wrapping::wrap_words(&node.content, text_width) {
            push(
                out,
                indent + CONTENT_INDENT,
                RowKind::Content,
                vec![Span::styled(line, ctx.theme.text_primary)],
            );
        }

        let actions = action_spans(node, depth, &state, ctx);
        if !actions.is_empty() {
            push(out, indent + CONTENT_INDENT, RowKind::Actions, actions);
        }

        let reply_box = ctx
            .composers
            .get(&node.id)
            .filter(|_| state.reply_open && ctx.permissions.can_reply(node, depth));
        if let Some(reply_box) = reply_box {
            let focused = ctx.focused_reply == Some(&node.id);
            composer = Some((out.rows.len(), indent + CONTENT_INDENT));
            for (line, spans) in reply_box
                .lines(text_width, ctx.theme, focused)
                .into_iter()
                .enumerate()
            {
                push(
                    out,
                    indent + CONTENT_INDENT,
                    RowKind::Composer { line },
                    spans.spans,
                );
            }
        }
    }

    out.nodes.push(NodeEntry {
        id: node.id.clone(),
        depth,
        first_row,
        last_row: out.rows.len().saturating_sub(1),
        composer,
    });

    for reply in &node.replies {
        layout_node(reply, depth + 1, ctx, states, out);
    }
}

fn action_spans(
    node: &CommentNode,
    depth: usize,
    state: &NodeUiState,
    ctx: &LayoutContext<'_>,
) -> Vec<Span<'static>> {
    let perms = &ctx.permissions;
    let mut items: Vec<Span<'static>> = Vec::new();
    if perms.can_like(node) {
        let (glyph, style) = if state.liked {
            ('♥', ctx.theme.accent)
        } else {
            ('♡', ctx.theme.text_muted)
        };
        items.push(Span::styled(format!("{glyph} {}", node.likes), style));
    }
    if perms.can_reply(node, depth) {
        let style = if state.reply_open {
            ctx.theme.accent
        } else {
            ctx.theme.text_muted
        };
        items.push(Span::styled("Reply", style));
    }
    if perms.can_block(node) {
        items.push(Span::styled("Block", ctx.theme.danger));
    }

    let mut out = Vec::with_capacity(items.len() * 2);
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push(Span::styled("  ", Style::default()));
        }
        out.push(item);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::ComposerOptions;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).single().unwrap()
    }

    fn perms() -> Permissions {
        Permissions {
            max_depth: 5,
            admin: false,
            can_post: true,
            likes_enabled: true,
            deletes_enabled: true,
        }
    }

    fn text(row: &Row) -> String {
        row.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn layout(
        forest: &[CommentNode],
        permissions: Permissions,
        states: &mut HashMap<CommentId, NodeUiState>,
        composers: &HashMap<CommentId, Composer>,
    ) -> ThreadLayout {
        let theme = Theme::default();
        let ctx = LayoutContext {
            theme: &theme,
            width: 60,
            permissions,
            now: now(),
            local_dates: false,
            composers,
            focused_reply: None,
        };
        layout_forest(forest, &ctx, states)
    }

    #[test]
    fn blocked_node_hides_author_and_content_but_not_replies() {
        let forest = vec![
            CommentNode::new(1, "X", "Y", now())
                .blocked()
                .with_replies(vec![CommentNode::new(2, "Zed", "child", now())]),
        ];
        let mut states = HashMap::new();
        let l = layout(&forest, perms(), &mut states, &HashMap::new());

        let own: Vec<String> = l.rows.iter().filter(|r| r.owner == 1.into()).map(text).collect();
        assert_eq!(own, vec![format!("     {BLOCKED_PLACEHOLDER}")]);
        assert!(own.iter().all(|t| !t.contains('X') && !t.contains('Y')));

        let child = &l.nodes[1];
        assert_eq!(child.depth, 1);
        assert_eq!(l.rows[child.first_row].indent, INDENT_PER_LEVEL);
        assert!(text(&l.rows[child.first_row]).contains("Zed"));
        assert_eq!(text(&l.rows[child.first_row + 1]), "child");
    }

    #[test]
    fn header_date_uses_local_calendar_when_asked() {
        let posted = now() - chrono::Duration::days(30);
        let forest = vec![CommentNode::new(1, "Sarah Johnson", "Hello", posted)];
        let theme = Theme::default();
        let composers = HashMap::new();
        let mut states = HashMap::new();
        let ctx = LayoutContext {
            theme: &theme,
            width: 60,
            permissions: perms(),
            now: now(),
            local_dates: true,
            composers: &composers,
            focused_reply: None,
        };
        let l = layout_forest(&forest, &ctx, &mut states);
        let local = posted.with_timezone(&Local).format("%b %-d").to_string();
        assert_eq!(text(&l.rows[0]), format!(" SJ  Sarah Johnson · {local}"));

        let l = layout(&forest, perms(), &mut states, &composers);
        assert_eq!(text(&l.rows[0]), " SJ  Sarah Johnson · Feb 9");
    }

    #[test]
    fn header_content_and_actions() {
        let forest = vec![CommentNode::new(1, "Sarah Johnson", "Hello", now()).with_likes(3)];
        let mut states = HashMap::new();
        let l = layout(&forest, perms(), &mut states, &HashMap::new());
        assert_eq!(text(&l.rows[0]), " SJ  Sarah Johnson · Just now");
        assert_eq!(l.rows[1].kind, RowKind::Content);
        assert_eq!(text(&l.rows[2]), "♡ 3  Reply");
        assert_eq!(l.nodes[0].last_row, 2);
    }

    #[test]
    fn liked_node_shows_filled_heart() {
        let forest = vec![CommentNode::new(1, "A", "b", now()).with_likes(4)];
        let mut states = HashMap::new();
        states.insert(
            CommentId::from(1),
            NodeUiState {
                liked: true,
                ..NodeUiState::new(crate::format::FALLBACK_AVATAR_COLOR)
            },
        );
        let l = layout(&forest, perms(), &mut states, &HashMap::new());
        assert!(text(&l.rows[2]).starts_with("♥ 4"));
    }

    #[test]
    fn reply_hidden_at_max_depth_and_for_guests() {
        let forest = vec![
            CommentNode::new(1, "A", "a", now())
                .with_replies(vec![CommentNode::new(2, "B", "b", now())]),
        ];
        let mut states = HashMap::new();
        let shallow = Permissions {
            max_depth: 1,
            ..perms()
        };
        let l = layout(&forest, shallow, &mut states, &HashMap::new());
        assert_eq!(text(&l.rows[2]), "♡ 0  Reply");
        let child_actions = l.nodes[1].last_row;
        assert_eq!(text(&l.rows[child_actions]), "♡ 0");

        let guest = Permissions {
            can_post: false,
            likes_enabled: false,
            ..perms()
        };
        let l = layout(&forest, guest, &mut states, &HashMap::new());
        assert!(l.rows.iter().all(|r| r.kind != RowKind::Actions));
    }

    #[test]
    fn block_only_for_admin_with_deletes() {
        let node = CommentNode::new(1, "A", "a", now());
        let admin = Permissions {
            admin: true,
            ..perms()
        };
        assert!(admin.can_block(&node));
        assert!(
            !Permissions {
                deletes_enabled: false,
                ..admin
            }
            .can_block(&node)
        );
        assert!(!perms().can_block(&node));
        assert!(!admin.can_block(&node.clone().blocked()));
    }

    #[test]
    fn open_reply_box_is_laid_out_under_actions() {
        let forest = vec![CommentNode::new(1, "A", "a", now())];
        let mut states = HashMap::new();
        states.insert(
            CommentId::from(1),
            NodeUiState {
                reply_open: true,
                ..NodeUiState::new(crate::format::FALLBACK_AVATAR_COLOR)
            },
        );
        let mut composers = HashMap::new();
        composers.insert(CommentId::from(1), Composer::new(ComposerOptions::reply()));
        let l = layout(&forest, perms(), &mut states, &composers);
        assert_eq!(l.nodes[0].composer, Some((3, CONTENT_INDENT)));
        assert_eq!(text(&l.rows[3]), "▏ Write a reply...");
        assert_eq!(l.rows[3].kind, RowKind::Composer { line: 0 });
    }

    #[test]
    fn like_latches_once() {
        let mut s = NodeUiState::default();
        assert!(s.like());
        assert!(!s.like());
        assert!(s.liked);
    }
}
