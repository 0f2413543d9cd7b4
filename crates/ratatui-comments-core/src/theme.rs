use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;

/// Default accent, the blue used for focus and highlights when the host does not pick one.
pub const DEFAULT_ACCENT: Color = Color::Rgb(0x3b, 0x82, 0xf6);

#[derive(Clone, Debug)]
pub struct Theme {
    pub text_primary: Style,
    pub text_muted: Style,
    pub accent: Style,
    pub danger: Style,
    pub author: Style,
    pub placeholder: Style,
    pub blocked: Style,
    pub avatar_fg: Style,
    pub avatar_image: Style,
    pub input: Style,
}

impl Default for Theme {
    fn default() -> Self {
        use ratatui::style::Stylize;

        Self {
            text_primary: Style::default(),
            text_muted: Style::default().dark_gray(),
            accent: Style::default().fg(DEFAULT_ACCENT),
            danger: Style::default().red(),
            author: Style::default().add_modifier(Modifier::BOLD),
            placeholder: Style::default().dark_gray().italic(),
            blocked: Style::default().dark_gray().italic(),
            avatar_fg: Style::default().white().bold(),
            avatar_image: Style::default().black().on_gray(),
            input: Style::default(),
        }
    }
}

impl Theme {
    /// Same palette with a different accent color.
    pub fn with_accent(mut self, accent: Color) -> Self {
        self.accent = self.accent.fg(accent);
        self
    }
}
