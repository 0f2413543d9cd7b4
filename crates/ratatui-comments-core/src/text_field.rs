use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use unicode_width::UnicodeWidthChar;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmitRule {
    Never,
    #[default]
    EnterSubmitsShiftNewline,
    ShiftEnterSubmitsEnterNewline,
}

#[derive(Clone, Debug, Default)]
pub struct TextFieldOptions {
    /// Newlines are never inserted; pasted line breaks become spaces.
    pub single_line: bool,
    pub submit_rule: SubmitRule,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    pub row: usize,
    pub col: usize, // char index within line
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextFieldAction {
    None,
    Changed,
    /// Enter was pressed under a submitting rule. The buffer is left as-is; the owner decides
    /// whether the content is acceptable and clears it.
    SubmitRequested,
}

/// An editable text buffer with a cursor. Rendering is left to the owner, which reads
/// [`TextField::lines`] and [`TextField::cursor_display`].
#[derive(Clone, Debug)]
pub struct TextField {
    lines: Vec<String>,
    cursor: Cursor,
    preferred_x: Option<usize>, // display columns
    options: TextFieldOptions,
}

impl Default for TextField {
    fn default() -> Self {
        Self::new()
    }
}

impl TextField {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor: Cursor::default(),
            preferred_x: None,
            options: TextFieldOptions::default(),
        }
    }

    pub fn single_line() -> Self {
        Self::with_options(TextFieldOptions {
            single_line: true,
            submit_rule: SubmitRule::EnterSubmitsShiftNewline,
        })
    }

    pub fn with_options(options: TextFieldOptions) -> Self {
        Self {
            options,
            ..Self::new()
        }
    }

    /// Replaces the content and puts the cursor at its end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = normalize_newlines(&text.into());
        let text = if self.options.single_line {
            text.replace('\n', " ")
        } else {
            text
        };
        self.lines = text.split('\n').map(str::to_string).collect();
        let row = self.lines.len() - 1;
        self.cursor = Cursor {
            row,
            col: self.lines[row].chars().count(),
        };
        self.preferred_x = None;
    }

    pub fn clear(&mut self) {
        self.lines = vec![String::new()];
        self.cursor = Cursor::default();
        self.preferred_x = None;
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Cursor position as `(row, display column)`.
    pub fn cursor_display(&self) -> (usize, usize) {
        (self.cursor.row, self.cursor_display_x())
    }

    pub fn input(&mut self, event: InputEvent) -> TextFieldAction {
        match event {
            InputEvent::Paste(s) => {
                if s.is_empty() {
                    return TextFieldAction::None;
                }
                let s = normalize_newlines(&s);
                if self.options.single_line {
                    self.insert_str(&s.replace('\n', " "));
                } else {
                    self.insert_str(&s);
                }
                self.preferred_x = None;
                TextFieldAction::Changed
            }
            InputEvent::Key(key) => self.handle_key(key),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> TextFieldAction {
        match key.code {
            KeyCode::Char(c) => {
                if key.modifiers.ctrl || key.modifiers.alt {
                    return self.handle_ctrl(c, key);
                }
                self.insert_char(c);
                self.preferred_x = None;
                TextFieldAction::Changed
            }
            KeyCode::Enter => {
                if self.enter_submits(key) {
                    return TextFieldAction::SubmitRequested;
                }
                if self.options.single_line {
                    return TextFieldAction::None;
                }
                self.insert_newline();
                self.preferred_x = None;
                TextFieldAction::Changed
            }
            KeyCode::Backspace => self.changed_if(|f| f.backspace()),
            KeyCode::Delete => self.changed_if(|f| f.delete()),
            KeyCode::Left => {
                self.move_left();
                TextFieldAction::None
            }
            KeyCode::Right => {
                self.move_right();
                TextFieldAction::None
            }
            KeyCode::Up => {
                self.move_vertical(-1);
                TextFieldAction::None
            }
            KeyCode::Down => {
                self.move_vertical(1);
                TextFieldAction::None
            }
            KeyCode::Home => {
                self.cursor.col = 0;
                self.preferred_x = Some(0);
                TextFieldAction::None
            }
            KeyCode::End => {
                self.cursor.col = self.current_line_char_len();
                self.preferred_x = Some(self.cursor_display_x());
                TextFieldAction::None
            }
            KeyCode::Tab
            | KeyCode::BackTab
            | KeyCode::Esc
            | KeyCode::PageUp
            | KeyCode::PageDown => TextFieldAction::None,
        }
    }

    fn handle_ctrl(&mut self, c: char, key: KeyEvent) -> TextFieldAction {
        if !key.modifiers.ctrl || key.modifiers.alt {
            return TextFieldAction::None;
        }
        match c {
            'a' => {
                self.cursor.col = 0;
                self.preferred_x = Some(0);
                TextFieldAction::None
            }
            'e' => {
                self.cursor.col = self.current_line_char_len();
                self.preferred_x = Some(self.cursor_display_x());
                TextFieldAction::None
            }
            'u' => self.changed_if(|f| f.kill_to_line_start()),
            _ => TextFieldAction::None,
        }
    }

    fn changed_if(&mut self, f: impl FnOnce(&mut Self) -> bool) -> TextFieldAction {
        if f(self) {
            self.preferred_x = None;
            TextFieldAction::Changed
        } else {
            TextFieldAction::None
        }
    }

    fn enter_submits(&self, key: KeyEvent) -> bool {
        match self.options.submit_rule {
            SubmitRule::Never => false,
            SubmitRule::EnterSubmitsShiftNewline => !key.modifiers.shift,
            SubmitRule::ShiftEnterSubmitsEnterNewline => key.modifiers.shift,
        }
    }

    fn cursor_display_x(&self) -> usize {
        self.current_line()
            .chars()
            .take(self.cursor.col)
            .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
            .sum()
    }

    fn current_line(&self) -> &str {
        self.lines
            .get(self.cursor.row)
            .map(String::as_str)
            .unwrap_or("")
    }

    fn current_line_char_len(&self) -> usize {
        self.current_line().chars().count()
    }

    fn move_left(&mut self) {
        if self.cursor.col > 0 {
            self.cursor.col -= 1;
        } else if self.cursor.row > 0 {
            self.cursor.row -= 1;
            self.cursor.col = self.current_line_char_len();
        }
        self.preferred_x = Some(self.cursor_display_x());
    }

    fn move_right(&mut self) {
        if self.cursor.col < self.current_line_char_len() {
            self.cursor.col += 1;
        } else if self.cursor.row + 1 < self.lines.len() {
            self.cursor.row += 1;
            self.cursor.col = 0;
        }
        self.preferred_x = Some(self.cursor_display_x());
    }

    fn move_vertical(&mut self, delta: isize) {
        let Some(row) = self.cursor.row.checked_add_signed(delta) else {
            return;
        };
        if row >= self.lines.len() {
            return;
        }
        let target_x = self.preferred_x.unwrap_or_else(|| self.cursor_display_x());
        self.cursor.row = row;
        self.cursor.col = col_from_display_x(self.current_line(), target_x);
        self.preferred_x = Some(target_x);
    }

    fn insert_char(&mut self, ch: char) {
        let line = &mut self.lines[self.cursor.row];
        let byte_idx = byte_index_from_char_index(line, self.cursor.col);
        line.insert(byte_idx, ch);
        self.cursor.col += 1;
    }

    fn insert_newline(&mut self) {
        let row = self.cursor.row;
        let byte_idx = byte_index_from_char_index(&self.lines[row], self.cursor.col);
        let tail = self.lines[row].split_off(byte_idx);
        self.lines.insert(row + 1, tail);
        self.cursor = Cursor { row: row + 1, col: 0 };
    }

    fn insert_str(&mut self, s: &str) {
        for ch in s.chars() {
            if ch == '\n' {
                self.insert_newline();
            } else {
                self.insert_char(ch);
            }
        }
    }

    fn backspace(&mut self) -> bool {
        if self.cursor.col > 0 {
            let line = &mut self.lines[self.cursor.row];
            let start = byte_index_from_char_index(line, self.cursor.col - 1);
            let end = byte_index_from_char_index(line, self.cursor.col);
            line.replace_range(start..end, "");
            self.cursor.col -= 1;
            return true;
        }
        if self.cursor.row > 0 {
            let cur = self.lines.remove(self.cursor.row);
            self.cursor.row -= 1;
            let prev = &mut self.lines[self.cursor.row];
            self.cursor.col = prev.chars().count();
            prev.push_str(&cur);
            return true;
        }
        false
    }

    fn delete(&mut self) -> bool {
        let row = self.cursor.row;
        if self.cursor.col < self.current_line_char_len() {
            let line = &mut self.lines[row];
            let start = byte_index_from_char_index(line, self.cursor.col);
            let end = byte_index_from_char_index(line, self.cursor.col + 1);
            line.replace_range(start..end, "");
            return true;
        }
        if row + 1 < self.lines.len() {
            let next = self.lines.remove(row + 1);
            self.lines[row].push_str(&next);
            return true;
        }
        false
    }

    fn kill_to_line_start(&mut self) -> bool {
        if self.cursor.col == 0 {
            return false;
        }
        let line = &mut self.lines[self.cursor.row];
        let end = byte_index_from_char_index(line, self.cursor.col);
        line.replace_range(..end, "");
        self.cursor.col = 0;
        true
    }
}

fn col_from_display_x(line: &str, target_x: usize) -> usize {
    let mut cols = 0usize;
    let mut col = 0usize;
    for ch in line.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if cols + w > target_x {
            break;
        }
        cols += w;
        col += 1;
    }
    col
}

fn byte_index_from_char_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn normalize_newlines(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "\n")
}
