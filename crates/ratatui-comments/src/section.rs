use std::collections::HashMap;
use std::collections::HashSet;

use chrono::DateTime;
use chrono::Utc;
use ratatui::buffer::Buffer;
use ratatui::layout::Position;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui_comments_core::input::InputEvent;
use ratatui_comments_core::input::KeyEvent;
use ratatui_comments_core::render;
use ratatui_comments_core::scroll::ScrollAction;
use ratatui_comments_core::scroll::ScrollState;
use ratatui_comments_core::theme::DEFAULT_ACCENT;
use ratatui_comments_core::theme::Theme;

use crate::bindings::ThreadAction;
use crate::bindings::ThreadBindings;
use crate::composer::Composer;
use crate::composer::ComposerAction;
use crate::composer::ComposerOptions;
use crate::composer::Submission;
use crate::model::CommentId;
use crate::model::CommentNode;
use crate::node;
use crate::node::LayoutContext;
use crate::node::NodeUiState;
use crate::node::Permissions;
use crate::node::ThreadLayout;
use crate::tree;

/// Prompt shown while a delete waits for confirmation.
pub const CONFIRM_DELETE_PROMPT: &str = "Are you sure you want to delete this comment? (y/n)";

const GUTTER_COLS: u16 = 2;
const DEFAULT_WIDTH: usize = 80;

/// The signed-in viewer, when the host knows who it is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub name: String,
    pub avatar: Option<String>,
}

impl CurrentUser {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CommentSectionOptions {
    /// Comments at this depth or deeper offer no reply. Roots are depth 0.
    pub max_depth: usize,
    pub admin: bool,
    pub accent: Color,
    /// `None` leaves posting open to everyone. `Some(false)` hides every composer and reply
    /// action.
    pub logged_in: Option<bool>,
    /// The host applies [`CommentSectionAction::Like`]. Without it no like control is shown.
    pub likes_enabled: bool,
    /// The host applies [`CommentSectionAction::Delete`]. Without it no block control is shown.
    pub deletes_enabled: bool,
    pub current_user: Option<CurrentUser>,
    pub style: Style,
    pub show_scrollbar: bool,
    pub scrollbar_style: Style,
    pub bindings: ThreadBindings,
}

impl Default for CommentSectionOptions {
    fn default() -> Self {
        Self {
            max_depth: 5,
            admin: false,
            accent: DEFAULT_ACCENT,
            logged_in: None,
            likes_enabled: true,
            deletes_enabled: true,
            current_user: None,
            style: Style::default(),
            show_scrollbar: true,
            scrollbar_style: Style::default(),
            bindings: ThreadBindings::default(),
        }
    }
}

impl CommentSectionOptions {
    pub fn can_post(&self) -> bool {
        self.logged_in.unwrap_or(true)
    }

    pub fn permissions(&self) -> Permissions {
        Permissions {
            max_depth: self.max_depth,
            admin: self.admin,
            can_post: self.can_post(),
            likes_enabled: self.likes_enabled,
            deletes_enabled: self.deletes_enabled,
        }
    }

    fn composer_options(&self, base: ComposerOptions) -> ComposerOptions {
        base.with_accent(self.accent)
            .with_fixed_author(self.current_user.as_ref().map(|u| u.name.clone()))
    }
}

/// What the host should do after an event. The section never changes the forest itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommentSectionAction {
    None,
    Redraw,
    /// Post a new comment, under `parent` or at the root.
    AddComment {
        submission: Submission,
        parent: Option<CommentId>,
    },
    Like(CommentId),
    Delete(CommentId),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Thread,
    /// The composer at the top of the section.
    Composer,
    /// The reply box under the given comment.
    Reply(CommentId),
    ConfirmDelete(CommentId),
}

struct Geometry {
    title: Rect,
    body: Rect,
    content: Rect,
    scrollbar: Option<Rect>,
    prompt: Option<Rect>,
}

/// A nested comment thread with a composer on top.
///
/// The host owns the forest and passes it to [`CommentSection::render`] and
/// [`CommentSection::handle_event`] each time; the section keeps only view state (cursor, focus,
/// scroll, open reply boxes, likes of this session) keyed by comment id.
pub struct CommentSection {
    options: CommentSectionOptions,
    scroll: ScrollState,
    cursor: Option<CommentId>,
    cursor_index: usize,
    focus: Focus,
    states: HashMap<CommentId, NodeUiState>,
    composer: Composer,
    replies: HashMap<CommentId, Composer>,
    layout: ThreadLayout,
    theme: Theme,
    width: usize,
    follow: bool,
    now: Option<DateTime<Utc>>,
}

impl Default for CommentSection {
    fn default() -> Self {
        Self::with_options(CommentSectionOptions::default())
    }
}

impl CommentSection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CommentSectionOptions) -> Self {
        let composer = Composer::new(options.composer_options(ComposerOptions::top_level()));
        Self {
            options,
            scroll: ScrollState::default(),
            cursor: None,
            cursor_index: 0,
            focus: Focus::Thread,
            states: HashMap::new(),
            composer,
            replies: HashMap::new(),
            layout: ThreadLayout::default(),
            theme: Theme::default(),
            width: DEFAULT_WIDTH,
            follow: false,
            now: None,
        }
    }

    pub fn options(&self) -> &CommentSectionOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: CommentSectionOptions) {
        self.options = options;
        self.composer
            .set_options(self.options.composer_options(ComposerOptions::top_level()));
        for reply in self.replies.values_mut() {
            reply.set_options(self.options.composer_options(ComposerOptions::reply()));
        }
        if !self.options.can_post() && matches!(self.focus, Focus::Composer | Focus::Reply(_)) {
            self.set_focus(Focus::Thread);
        }
        if !(self.options.admin && self.options.deletes_enabled)
            && matches!(self.focus, Focus::ConfirmDelete(_))
        {
            self.set_focus(Focus::Thread);
        }
    }

    /// Pins the clock used for relative times. `None` reads the system clock on every render.
    pub fn set_now(&mut self, now: Option<DateTime<Utc>>) {
        self.now = now;
    }

    pub fn focus(&self) -> &Focus {
        &self.focus
    }

    /// Whether a text box has the keyboard, so plain keys should not be treated as shortcuts.
    pub fn is_editing(&self) -> bool {
        matches!(self.focus, Focus::Composer | Focus::Reply(_))
    }

    pub fn cursor(&self) -> Option<&CommentId> {
        self.cursor.as_ref()
    }

    pub fn node_state(&self, id: &CommentId) -> Option<&NodeUiState> {
        self.states.get(id)
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut Composer {
        &mut self.composer
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    /// Moves keyboard focus to the top composer.
    pub fn focus_composer(&mut self) -> bool {
        if !self.options.can_post() {
            return false;
        }
        self.set_focus(Focus::Composer);
        self.follow = true;
        true
    }

    pub fn handle_event(
        &mut self,
        event: InputEvent,
        forest: &[CommentNode],
    ) -> CommentSectionAction {
        self.relayout(forest);
        let action = match self.focus.clone() {
            Focus::ConfirmDelete(id) => match event {
                InputEvent::Key(key) => self.handle_confirm(key, id),
                InputEvent::Paste(_) => CommentSectionAction::None,
            },
            Focus::Composer => self.handle_composer(event),
            Focus::Reply(id) => self.handle_reply(event, id),
            Focus::Thread => match event {
                InputEvent::Key(key) => self.handle_thread_key(key, forest),
                InputEvent::Paste(_) => CommentSectionAction::None,
            },
        };
        if !matches!(
            action,
            CommentSectionAction::None | CommentSectionAction::Redraw
        ) {
            log::debug!("comment section: {action:?}");
        }
        action
    }

    fn handle_confirm(&mut self, key: KeyEvent, id: CommentId) -> CommentSectionAction {
        let confirm = self.options.bindings.is_confirm(&key);
        let decline = self.options.bindings.is_decline(&key);
        if confirm {
            self.set_focus(Focus::Thread);
            CommentSectionAction::Delete(id)
        } else if decline {
            self.set_focus(Focus::Thread);
            CommentSectionAction::Redraw
        } else {
            CommentSectionAction::None
        }
    }

    fn handle_composer(&mut self, event: InputEvent) -> CommentSectionAction {
        if let InputEvent::Key(key) = &event {
            if self.options.bindings.is_leave(key) {
                self.set_focus(Focus::Thread);
                return CommentSectionAction::Redraw;
            }
        }
        match self.composer.input(event) {
            ComposerAction::None => CommentSectionAction::None,
            ComposerAction::Changed | ComposerAction::Cancelled => {
                self.follow = true;
                CommentSectionAction::Redraw
            }
            ComposerAction::Submitted(submission) => {
                self.follow = true;
                CommentSectionAction::AddComment {
                    submission,
                    parent: None,
                }
            }
        }
    }

    fn handle_reply(&mut self, event: InputEvent, id: CommentId) -> CommentSectionAction {
        let Some(reply) = self.replies.get_mut(&id) else {
            self.set_focus(Focus::Thread);
            return CommentSectionAction::Redraw;
        };
        match reply.input(event) {
            ComposerAction::None => CommentSectionAction::None,
            ComposerAction::Changed => {
                self.follow = true;
                CommentSectionAction::Redraw
            }
            ComposerAction::Cancelled => {
                self.close_reply(&id);
                CommentSectionAction::Redraw
            }
            ComposerAction::Submitted(submission) => {
                self.close_reply(&id);
                CommentSectionAction::AddComment {
                    submission,
                    parent: Some(id),
                }
            }
        }
    }

    fn handle_thread_key(&mut self, key: KeyEvent, forest: &[CommentNode]) -> CommentSectionAction {
        let Some(action) = self.options.bindings.action_for(&key) else {
            return CommentSectionAction::None;
        };
        match action {
            ThreadAction::Prev => self.move_cursor(-1),
            ThreadAction::Next => self.move_cursor(1),
            ThreadAction::Scroll(scroll) => self.scroll_by_action(scroll),
            ThreadAction::Compose => {
                if self.focus_composer() {
                    CommentSectionAction::Redraw
                } else {
                    CommentSectionAction::None
                }
            }
            ThreadAction::Like => self.like_cursor(forest),
            ThreadAction::ToggleReply => self.toggle_reply_cursor(forest),
            ThreadAction::OpenReply => {
                let Some(id) = self.cursor.clone() else {
                    return CommentSectionAction::None;
                };
                if self.replies.contains_key(&id) && self.state(&id).reply_open {
                    self.set_focus(Focus::Reply(id));
                    self.follow = true;
                    CommentSectionAction::Redraw
                } else {
                    CommentSectionAction::None
                }
            }
            ThreadAction::Block => {
                let Some((node, _)) = self.cursor_node(forest) else {
                    return CommentSectionAction::None;
                };
                if !self.options.permissions().can_block(node) {
                    return CommentSectionAction::None;
                }
                let id = node.id.clone();
                self.set_focus(Focus::ConfirmDelete(id));
                CommentSectionAction::Redraw
            }
        }
    }

    fn like_cursor(&mut self, forest: &[CommentNode]) -> CommentSectionAction {
        let Some((node, _)) = self.cursor_node(forest) else {
            return CommentSectionAction::None;
        };
        if !self.options.permissions().can_like(node) {
            return CommentSectionAction::None;
        }
        let id = node.id.clone();
        if self.state(&id).like() {
            CommentSectionAction::Like(id)
        } else {
            log::trace!("comment {id}: already liked");
            CommentSectionAction::None
        }
    }

    fn toggle_reply_cursor(&mut self, forest: &[CommentNode]) -> CommentSectionAction {
        let Some((node, depth)) = self.cursor_node(forest) else {
            return CommentSectionAction::None;
        };
        if !self.options.permissions().can_reply(node, depth) {
            return CommentSectionAction::None;
        }
        let id = node.id.clone();
        if self.state(&id).reply_open {
            self.close_reply(&id);
        } else {
            self.state(&id).reply_open = true;
            let options = self.options.composer_options(ComposerOptions::reply());
            self.replies
                .entry(id.clone())
                .or_insert_with(|| Composer::new(options));
            self.set_focus(Focus::Reply(id));
            self.follow = true;
        }
        CommentSectionAction::Redraw
    }

    fn close_reply(&mut self, id: &CommentId) {
        self.state(id).reply_open = false;
        self.replies.remove(id);
        if self.focus == Focus::Reply(id.clone()) {
            self.set_focus(Focus::Thread);
        }
    }

    fn move_cursor(&mut self, delta: isize) -> CommentSectionAction {
        let count = self.layout.nodes.len();
        if count == 0 {
            return CommentSectionAction::None;
        }
        let next = self.cursor_index.saturating_add_signed(delta).min(count - 1);
        self.set_cursor_index(next);
        self.follow = true;
        CommentSectionAction::Redraw
    }

    fn scroll_by_action(&mut self, action: ScrollAction) -> CommentSectionAction {
        let count = self.layout.nodes.len();
        match action {
            ScrollAction::Top | ScrollAction::Bottom => {
                self.options.bindings.scroll.apply(&mut self.scroll, action);
                if count > 0 {
                    let index = if action == ScrollAction::Top { 0 } else { count - 1 };
                    self.set_cursor_index(index);
                    self.follow = true;
                }
            }
            ScrollAction::PageUp | ScrollAction::PageDown => {
                self.options.bindings.scroll.apply(&mut self.scroll, action);
                let offset = self.thread_offset();
                let first_visible = self
                    .layout
                    .nodes
                    .iter()
                    .position(|n| (offset + n.first_row) as u32 >= self.scroll.offset);
                if let Some(index) = first_visible {
                    self.set_cursor_index(index);
                }
            }
        }
        CommentSectionAction::Redraw
    }

    fn set_cursor_index(&mut self, index: usize) {
        self.cursor_index = index;
        self.cursor = self.layout.nodes.get(index).map(|n| n.id.clone());
    }

    fn set_focus(&mut self, focus: Focus) {
        if self.focus != focus {
            log::trace!("comment section focus: {:?} -> {focus:?}", self.focus);
            self.focus = focus;
        }
    }

    fn state(&mut self, id: &CommentId) -> &mut NodeUiState {
        self.states.entry(id.clone()).or_default()
    }

    fn cursor_node<'f>(&self, forest: &'f [CommentNode]) -> Option<(&'f CommentNode, usize)> {
        let entry = self.layout.nodes.get(self.cursor_index)?;
        if self.cursor.as_ref() != Some(&entry.id) {
            return None;
        }
        tree::find(forest, &entry.id).map(|n| (n, entry.depth))
    }

    // Rows above the first comment: the top composer and a blank separator.
    fn thread_offset(&self) -> usize {
        if self.options.can_post() {
            self.composer.height() + 1
        } else {
            0
        }
    }

    fn relayout(&mut self, forest: &[CommentNode]) {
        self.prune(forest);
        let ctx = LayoutContext {
            theme: &self.theme,
            width: self.width,
            permissions: self.options.permissions(),
            now: self.now.unwrap_or_else(Utc::now),
            local_dates: self.now.is_none(),
            composers: &self.replies,
            focused_reply: match &self.focus {
                Focus::Reply(id) => Some(id),
                _ => None,
            },
        };
        self.layout = node::layout_forest(forest, &ctx, &mut self.states);

        let count = self.layout.nodes.len();
        let found = self
            .cursor
            .as_ref()
            .and_then(|id| self.layout.position(id));
        match found {
            Some(index) => self.cursor_index = index,
            None if count == 0 => {
                self.cursor = None;
                self.cursor_index = 0;
            }
            None => {
                let index = self.cursor_index.min(count - 1);
                self.set_cursor_index(index);
            }
        }
    }

    // Drops view state of comments that are gone and leaves any focus they held.
    fn prune(&mut self, forest: &[CommentNode]) {
        let mut live = HashSet::new();
        collect_ids(forest, &mut live);
        self.states.retain(|id, _| live.contains(id));
        self.replies.retain(|id, _| live.contains(id));

        let permissions = self.options.permissions();
        let closed: Vec<CommentId> = self
            .states
            .iter()
            .filter(|(_, state)| state.reply_open)
            .map(|(id, _)| id)
            .filter(|id| !reply_allowed(forest, id, &permissions))
            .cloned()
            .collect();
        for id in &closed {
            log::debug!("closing reply box on {id}: replies no longer allowed");
            self.close_reply(id);
        }

        let stale = match &self.focus {
            Focus::Reply(id) => !self.replies.contains_key(id),
            Focus::ConfirmDelete(id) => {
                !tree::find(forest, id).is_some_and(|node| permissions.can_block(node))
            }
            Focus::Composer => !self.options.can_post(),
            Focus::Thread => false,
        };
        if stale {
            self.set_focus(Focus::Thread);
        }
    }

    fn geometry(&self, area: Rect) -> Option<Geometry> {
        if area.width <= GUTTER_COLS || area.height < 2 {
            return None;
        }
        let title = Rect::new(area.x, area.y, area.width, 1);
        let mut body_h = area.height - 1;
        let prompt = if matches!(self.focus, Focus::ConfirmDelete(_)) && body_h > 1 {
            body_h -= 1;
            Some(Rect::new(area.x, area.y + 1 + body_h, area.width, 1))
        } else {
            None
        };
        let body = Rect::new(area.x, area.y + 1, area.width, body_h);
        let (content_w, scrollbar) =
            if self.options.show_scrollbar && body.width > GUTTER_COLS + 1 {
                (
                    body.width - GUTTER_COLS - 1,
                    Some(Rect::new(body.right() - 1, body.y, 1, body.height)),
                )
            } else {
                (body.width - GUTTER_COLS, None)
            };
        let content = Rect::new(body.x + GUTTER_COLS, body.y, content_w, body.height);
        Some(Geometry {
            title,
            body,
            content,
            scrollbar,
            prompt,
        })
    }

    // Focused caret as (row within the scrolled body, column within the content area).
    fn caret(&self) -> Option<(usize, usize)> {
        match &self.focus {
            Focus::Composer => Some(self.composer.cursor_offset(self.width)),
            Focus::Reply(id) => {
                let reply = self.replies.get(id)?;
                let entry = self.layout.nodes.iter().find(|n| &n.id == id)?;
                let (row, indent) = entry.composer?;
                let width = self.width.saturating_sub(indent).max(1);
                let (r, c) = reply.cursor_offset(width);
                Some((self.thread_offset() + row + r, indent + c))
            }
            Focus::Thread | Focus::ConfirmDelete(_) => None,
        }
    }

    /// Terminal cursor position for the focused text box, if it is on screen.
    pub fn cursor_position(&self, area: Rect) -> Option<Position> {
        let geo = self.geometry(area)?;
        let (row, col) = self.caret()?;
        if !self.scroll.is_visible(row as u32) {
            return None;
        }
        let y = geo.content.y + (row as u32 - self.scroll.offset) as u16;
        let x = geo.content.x + (col as u16).min(geo.content.width.saturating_sub(1));
        Some(Position::new(x, y))
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme, forest: &[CommentNode]) {
        let Some(geo) = self.geometry(area) else {
            return;
        };
        self.theme = theme.clone().with_accent(self.options.accent);
        self.width = geo.content.width as usize;
        self.relayout(forest);

        let base_style = if self.options.style == Style::default() {
            self.theme.text_primary
        } else {
            self.options.style
        };
        buf.set_style(area, base_style);

        let title = format!("Comments ({})", tree::total_count(forest));
        render::render_spans_clipped(
            geo.title.x,
            geo.title.y,
            geo.title.width,
            buf,
            &[Span::styled(title, base_style.add_modifier(Modifier::BOLD))],
            base_style,
        );

        let offset = self.thread_offset();
        let top: Vec<Vec<Span<'static>>> = if self.options.can_post() {
            let focused = self.focus == Focus::Composer;
            let mut rows: Vec<Vec<Span<'static>>> = self
                .composer
                .lines(self.width, &self.theme, focused)
                .into_iter()
                .map(|line| line.spans)
                .collect();
            rows.push(Vec::new());
            rows
        } else {
            Vec::new()
        };

        self.scroll.set_viewport(geo.body.height);
        self.scroll
            .set_content((offset + self.layout.rows.len()) as u32);
        if self.follow {
            self.follow = false;
            self.scroll_to_focus();
        }

        let cursor_rows = self
            .cursor
            .as_ref()
            .and_then(|id| self.layout.nodes.iter().find(|n| &n.id == id))
            .filter(|_| matches!(self.focus, Focus::Thread | Focus::ConfirmDelete(_)))
            .map(|n| (n.first_row, n.last_row));

        for dy in 0..geo.body.height {
            let row = self.scroll.offset as usize + dy as usize;
            let y = geo.body.y + dy;
            if row < offset {
                if let Some(spans) = top.get(row) {
                    render::render_spans_clipped(
                        geo.content.x,
                        y,
                        geo.content.width,
                        buf,
                        spans,
                        base_style,
                    );
                }
                continue;
            }
            let Some(line) = self.layout.rows.get(row - offset) else {
                break;
            };
            let in_cursor = cursor_rows
                .map(|(first, last)| (first..=last).contains(&(row - offset)))
                .unwrap_or(false);
            if in_cursor {
                buf.set_stringn(geo.body.x, y, "▌", 1, self.theme.accent);
            }
            let indent = (line.indent as u16).min(geo.content.width);
            render::render_spans_clipped(
                geo.content.x + indent,
                y,
                geo.content.width - indent,
                buf,
                &line.spans,
                base_style,
            );
        }

        if let Some(sb) = geo.scrollbar {
            render::render_scrollbar(sb, buf, &self.scroll, self.options.scrollbar_style);
        }

        if let Some(prompt) = geo.prompt {
            render::render_spans_clipped(
                prompt.x,
                prompt.y,
                prompt.width,
                buf,
                &[Span::styled(CONFIRM_DELETE_PROMPT, self.theme.danger)],
                base_style,
            );
        }
    }

    fn scroll_to_focus(&mut self) {
        if let Some((row, _)) = self.caret() {
            self.scroll.ensure_visible(row as u32, row as u32 + 1);
            return;
        }
        let offset = self.thread_offset();
        if let Some(entry) = self.layout.nodes.get(self.cursor_index) {
            self.scroll.ensure_visible(
                (offset + entry.first_row) as u32,
                (offset + entry.last_row + 1) as u32,
            );
        }
    }
}

fn reply_allowed(forest: &[CommentNode], id: &CommentId, permissions: &Permissions) -> bool {
    match (tree::find(forest, id), tree::depth_of(forest, id)) {
        (Some(node), Some(depth)) => permissions.can_reply(node, depth),
        _ => false,
    }
}

fn collect_ids(forest: &[CommentNode], out: &mut HashSet<CommentId>) {
    for node in forest {
        out.insert(node.id.clone());
        collect_ids(&node.replies, out);
    }
}
