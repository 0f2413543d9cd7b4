use ratatui_comments_core::input::KeyCode;
use ratatui_comments_core::input::KeyEvent;
use ratatui_comments_core::keymap;
use ratatui_comments_core::keymap::Binding;
use ratatui_comments_core::scroll::ScrollAction;
use ratatui_comments_core::scroll::ScrollBindings;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThreadAction {
    Prev,
    Next,
    Scroll(ScrollAction),
    Like,
    ToggleReply,
    OpenReply,
    Block,
    Compose,
}

/// Keys for navigating and acting on a comment thread while no composer has focus.
#[derive(Clone, Debug)]
pub struct ThreadBindings {
    pub prev: Vec<KeyEvent>,
    pub next: Vec<KeyEvent>,
    pub scroll: ScrollBindings,
    pub like: Vec<KeyEvent>,
    pub toggle_reply: Vec<KeyEvent>,
    /// Moves focus into the reply box of the selected comment when it is open.
    pub open_reply: Vec<KeyEvent>,
    pub block: Vec<KeyEvent>,
    pub compose: Vec<KeyEvent>,
    pub confirm: Vec<KeyEvent>,
    pub decline: Vec<KeyEvent>,
    pub leave: Vec<KeyEvent>,
}

impl Default for ThreadBindings {
    fn default() -> Self {
        Self {
            prev: vec![keymap::key_code(KeyCode::Up), keymap::key_char('k')],
            next: vec![keymap::key_code(KeyCode::Down), keymap::key_char('j')],
            scroll: ScrollBindings::default(),
            like: vec![keymap::key_char('l')],
            toggle_reply: vec![keymap::key_char('r')],
            open_reply: vec![keymap::key_code(KeyCode::Enter)],
            block: vec![keymap::key_char('x')],
            compose: vec![keymap::key_char('c')],
            confirm: vec![keymap::key_char('y'), keymap::key_char('Y')],
            decline: vec![
                keymap::key_char('n'),
                keymap::key_char('N'),
                keymap::key_code(KeyCode::Esc),
            ],
            leave: vec![keymap::key_code(KeyCode::Esc)],
        }
    }
}

impl ThreadBindings {
    pub fn action_for(&self, key: &KeyEvent) -> Option<ThreadAction> {
        let table = [
            (&self.prev, ThreadAction::Prev),
            (&self.next, ThreadAction::Next),
            (&self.like, ThreadAction::Like),
            (&self.toggle_reply, ThreadAction::ToggleReply),
            (&self.open_reply, ThreadAction::OpenReply),
            (&self.block, ThreadAction::Block),
            (&self.compose, ThreadAction::Compose),
        ];
        table
            .into_iter()
            .find(|(keys, _)| keymap::any_matches(keys, key))
            .map(|(_, action)| action)
            .or_else(|| self.scroll.action_for(key).map(ThreadAction::Scroll))
    }

    pub fn is_confirm(&self, key: &KeyEvent) -> bool {
        keymap::any_matches(&self.confirm, key)
    }

    pub fn is_decline(&self, key: &KeyEvent) -> bool {
        keymap::any_matches(&self.decline, key)
    }

    pub fn is_leave(&self, key: &KeyEvent) -> bool {
        keymap::any_matches(&self.leave, key)
    }

    /// Help entries for the thread keys, in display order. Moderation keys are listed only when
    /// `admin` is set.
    pub fn help(&self, admin: bool) -> Vec<Binding> {
        let mut out = vec![
            Binding::new("j/k", "move", self.next.iter().chain(&self.prev).copied().collect()),
            Binding::new("l", "like", self.like.clone()),
            Binding::new("r", "reply", self.toggle_reply.clone()),
            Binding::new("c", "comment", self.compose.clone()),
        ];
        if admin {
            out.push(Binding::new("x", "block", self.block.clone()));
        }
        out
    }
}
