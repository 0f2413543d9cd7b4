use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::keymap;

/// Vertical scroll position over content measured in rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollState {
    pub offset: u32,
    pub viewport_h: u16,
    pub content_h: u32,
}

impl ScrollState {
    pub fn set_viewport(&mut self, h: u16) {
        self.viewport_h = h;
        self.clamp();
    }

    pub fn set_content(&mut self, h: u32) {
        self.content_h = h;
        self.clamp();
    }

    pub fn clamp(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let next = self.offset as i64 + delta as i64;
        self.offset = next.clamp(0, self.max_offset() as i64) as u32;
    }

    pub fn page_down(&mut self) {
        self.scroll_by(self.viewport_h.saturating_sub(1) as i32);
    }

    pub fn page_up(&mut self) {
        self.scroll_by(-(self.viewport_h.saturating_sub(1) as i32));
    }

    pub fn to_top(&mut self) {
        self.offset = 0;
    }

    pub fn to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Scrolls the minimum amount needed to show rows `start..end`. When the range is taller than
    /// the viewport its first row wins.
    pub fn ensure_visible(&mut self, start: u32, end: u32) {
        let view = self.viewport_h as u32;
        if view == 0 {
            return;
        }
        let end = end.max(start + 1);
        if start < self.offset {
            self.offset = start;
        } else if end > self.offset + view {
            self.offset = end.saturating_sub(view).min(start);
        }
        self.clamp();
    }

    pub fn is_visible(&self, row: u32) -> bool {
        row >= self.offset && row < self.offset.saturating_add(self.viewport_h as u32)
    }

    /// Scrollbar thumb `(top, height)` for a track of `track_h` rows, or `None` when everything
    /// fits.
    pub fn thumb(&self, track_h: u16) -> Option<(u16, u16)> {
        if track_h == 0 || self.content_h == 0 || self.content_h <= self.viewport_h as u32 {
            return None;
        }
        let track = track_h as f64;
        let thumb_h = ((self.viewport_h as f64 / self.content_h as f64) * track)
            .round()
            .clamp(1.0, track) as u16;
        let max_offset = self.max_offset().max(1) as f64;
        let thumb_top = ((self.offset as f64 / max_offset) * (track - thumb_h as f64))
            .round()
            .clamp(0.0, (track - thumb_h as f64).max(0.0)) as u16;
        Some((thumb_top, thumb_h))
    }

    fn max_offset(&self) -> u32 {
        self.content_h.saturating_sub(self.viewport_h as u32)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollAction {
    PageUp,
    PageDown,
    Top,
    Bottom,
}

#[derive(Clone, Debug)]
pub struct ScrollBindings {
    pub page_up: Vec<KeyEvent>,
    pub page_down: Vec<KeyEvent>,
    pub top: Vec<KeyEvent>,
    pub bottom: Vec<KeyEvent>,
}

impl Default for ScrollBindings {
    fn default() -> Self {
        Self {
            page_up: vec![keymap::key_code(KeyCode::PageUp), keymap::key_ctrl('u')],
            page_down: vec![keymap::key_code(KeyCode::PageDown), keymap::key_ctrl('d')],
            top: vec![keymap::key_code(KeyCode::Home), keymap::key_char('g')],
            bottom: vec![keymap::key_code(KeyCode::End), keymap::key_char('G')],
        }
    }
}

impl ScrollBindings {
    pub fn action_for(&self, key: &KeyEvent) -> Option<ScrollAction> {
        if keymap::any_matches(&self.page_up, key) {
            return Some(ScrollAction::PageUp);
        }
        if keymap::any_matches(&self.page_down, key) {
            return Some(ScrollAction::PageDown);
        }
        if keymap::any_matches(&self.top, key) {
            return Some(ScrollAction::Top);
        }
        if keymap::any_matches(&self.bottom, key) {
            return Some(ScrollAction::Bottom);
        }
        None
    }

    pub fn apply(&self, state: &mut ScrollState, action: ScrollAction) {
        match action {
            ScrollAction::PageUp => state.page_up(),
            ScrollAction::PageDown => state.page_down(),
            ScrollAction::Top => state.to_top(),
            ScrollAction::Bottom => state.to_bottom(),
        }
    }
}
