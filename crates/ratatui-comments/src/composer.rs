use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui_comments_core::input::InputEvent;
use ratatui_comments_core::input::KeyCode;
use ratatui_comments_core::render;
use ratatui_comments_core::text_field::TextField;
use ratatui_comments_core::text_field::TextFieldAction;
use ratatui_comments_core::theme::Theme;

/// Author recorded when the poster leaves the name field blank.
pub const ANONYMOUS: &str = "Anonymous";

const PREFIX: &str = "▏ ";
const PREFIX_COLS: usize = 2;

#[derive(Clone, Debug)]
pub struct ComposerOptions {
    pub placeholder: String,
    pub button_text: String,
    pub author_placeholder: String,
    pub show_author: bool,
    /// The owner handles [`ComposerAction::Cancelled`]; adds a cancel button and enables `Esc`.
    pub cancellable: bool,
    /// Focus color. Falls back to the theme accent.
    pub accent: Option<Color>,
    /// Known poster. Replaces the author field when set.
    pub fixed_author: Option<String>,
}

impl Default for ComposerOptions {
    fn default() -> Self {
        Self {
            placeholder: "Write a comment...".to_string(),
            button_text: "Post".to_string(),
            author_placeholder: "Your name".to_string(),
            show_author: true,
            cancellable: false,
            accent: None,
            fixed_author: None,
        }
    }
}

impl ComposerOptions {
    /// Options of the composer at the top of a thread.
    pub fn top_level() -> Self {
        Self {
            button_text: "Post Comment".to_string(),
            ..Self::default()
        }
    }

    /// Options of the inline reply box under a comment.
    pub fn reply() -> Self {
        Self {
            placeholder: "Write a reply...".to_string(),
            button_text: "Reply".to_string(),
            cancellable: true,
            ..Self::default()
        }
    }

    pub fn with_accent(mut self, accent: Color) -> Self {
        self.accent = Some(accent);
        self
    }

    pub fn with_fixed_author(mut self, author: Option<String>) -> Self {
        self.fixed_author = author;
        self
    }
}

/// A validated post: both fields trimmed, author never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub message: String,
    pub author: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ComposerAction {
    None,
    /// Content or focus changed; redraw.
    Changed,
    Submitted(Submission),
    Cancelled,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ComposerField {
    #[default]
    Message,
    Author,
}

/// Message box with an optional author line, as used for new comments and replies.
#[derive(Clone, Debug)]
pub struct Composer {
    options: ComposerOptions,
    message: TextField,
    author: TextField,
    field: ComposerField,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new(ComposerOptions::default())
    }
}

impl Composer {
    pub fn new(options: ComposerOptions) -> Self {
        Self {
            options,
            message: TextField::new(),
            author: TextField::single_line(),
            field: ComposerField::Message,
        }
    }

    pub fn options(&self) -> &ComposerOptions {
        &self.options
    }

    /// Replaces the options, keeping whatever was typed.
    pub fn set_options(&mut self, options: ComposerOptions) {
        self.options = options;
        if !self.author_visible() {
            self.field = ComposerField::Message;
        }
    }

    pub fn field(&self) -> ComposerField {
        self.field
    }

    pub fn message(&self) -> String {
        self.message.text()
    }

    pub fn set_message(&mut self, text: impl Into<String>) {
        self.message.set_text(text);
    }

    pub fn author(&self) -> String {
        self.author.text()
    }

    pub fn set_author(&mut self, text: impl Into<String>) {
        self.author.set_text(text);
    }

    /// Whether the author line is drawn and focusable.
    pub fn author_visible(&self) -> bool {
        self.options.show_author && self.options.fixed_author.is_none()
    }

    pub fn input(&mut self, event: InputEvent) -> ComposerAction {
        if let InputEvent::Key(key) = &event {
            match key.code {
                KeyCode::Tab | KeyCode::BackTab => return self.cycle_field(),
                KeyCode::Esc => {
                    return if self.options.cancellable {
                        ComposerAction::Cancelled
                    } else {
                        ComposerAction::None
                    };
                }
                _ => {}
            }
        }

        let field = match self.field {
            ComposerField::Message => &mut self.message,
            ComposerField::Author => &mut self.author,
        };
        match field.input(event) {
            TextFieldAction::None => ComposerAction::None,
            TextFieldAction::Changed => ComposerAction::Changed,
            TextFieldAction::SubmitRequested => self.submit(),
        }
    }

    /// Validates and emits the current content, the way pressing the button would.
    ///
    /// A message that is empty after trimming is rejected and nothing is cleared. On success the
    /// message is cleared and the author is kept for the next post.
    pub fn submit(&mut self) -> ComposerAction {
        let message = self.message.text().trim().to_string();
        if message.is_empty() {
            log::debug!("composer: empty message rejected");
            return ComposerAction::None;
        }
        let author = match &self.options.fixed_author {
            Some(name) => name.trim().to_string(),
            None if self.options.show_author => self.author.text().trim().to_string(),
            None => String::new(),
        };
        let author = if author.is_empty() {
            ANONYMOUS.to_string()
        } else {
            author
        };
        self.message.clear();
        self.field = ComposerField::Message;
        ComposerAction::Submitted(Submission { message, author })
    }

    fn cycle_field(&mut self) -> ComposerAction {
        if !self.author_visible() {
            return ComposerAction::None;
        }
        self.field = match self.field {
            ComposerField::Message => ComposerField::Author,
            ComposerField::Author => ComposerField::Message,
        };
        log::trace!("composer: focus {:?}", self.field);
        ComposerAction::Changed
    }

    /// Rows drawn by [`Composer::lines`].
    pub fn height(&self) -> usize {
        self.message.lines().len() + usize::from(self.author_visible()) + 1
    }

    /// The composer as display rows, `width` columns wide.
    pub fn lines(&self, width: usize, theme: &Theme, focused: bool) -> Vec<Line<'static>> {
        let avail = width.saturating_sub(PREFIX_COLS).max(1);
        let accent = self
            .options
            .accent
            .map(|c| Style::default().fg(c))
            .unwrap_or(theme.accent);
        let bar = |active: bool| {
            if active {
                Span::styled(PREFIX, accent)
            } else {
                Span::styled(PREFIX, theme.text_muted)
            }
        };

        let mut out = Vec::with_capacity(self.height());
        let message_focused = focused && self.field == ComposerField::Message;
        if self.message.is_empty() {
            out.push(Line::from(vec![
                bar(message_focused),
                Span::styled(
                    render::truncate_to_cols(&self.options.placeholder, avail).to_string(),
                    theme.placeholder,
                ),
            ]));
        } else {
            let start = self.hscroll(ComposerField::Message, avail);
            for line in self.message.lines() {
                out.push(Line::from(vec![
                    bar(message_focused),
                    Span::styled(render::slice_by_cols(line, start, avail), theme.input),
                ]));
            }
        }

        if self.author_visible() {
            let author_focused = focused && self.field == ComposerField::Author;
            let body = if self.author.is_empty() {
                Span::styled(
                    render::truncate_to_cols(&self.options.author_placeholder, avail).to_string(),
                    theme.placeholder,
                )
            } else {
                let start = self.hscroll(ComposerField::Author, avail);
                Span::styled(
                    render::slice_by_cols(&self.author.text(), start, avail),
                    theme.input,
                )
            };
            out.push(Line::from(vec![bar(author_focused), body]));
        }

        let mut buttons = vec![
            Span::raw("  "),
            Span::styled(
                format!("[ {} ]", self.options.button_text),
                accent.add_modifier(Modifier::BOLD),
            ),
        ];
        if self.options.cancellable {
            buttons.push(Span::raw(" "));
            buttons.push(Span::styled("[ Cancel ]", theme.text_muted));
        }
        out.push(Line::from(buttons));
        out
    }

    /// Focused cursor as `(row, col)` relative to the first row of [`Composer::lines`].
    pub fn cursor_offset(&self, width: usize) -> (usize, usize) {
        let avail = width.saturating_sub(PREFIX_COLS).max(1);
        let start = self.hscroll(self.field, avail);
        match self.field {
            ComposerField::Message => {
                let (row, col) = self.message.cursor_display();
                (row, PREFIX_COLS + col - start)
            }
            ComposerField::Author => {
                let (_, col) = self.author.cursor_display();
                (self.message.lines().len(), PREFIX_COLS + col - start)
            }
        }
    }

    // First visible column so the cursor of `field` stays inside `avail` columns.
    fn hscroll(&self, field: ComposerField, avail: usize) -> usize {
        if field != self.field {
            return 0;
        }
        let (_, col) = match field {
            ComposerField::Message => self.message.cursor_display(),
            ComposerField::Author => self.author.cursor_display(),
        };
        col.saturating_sub(avail.saturating_sub(1))
    }
}
