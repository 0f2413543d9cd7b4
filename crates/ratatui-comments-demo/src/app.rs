use std::io;
use std::io::stdout;
use std::time::Duration;

use chrono::Utc;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::Event;
use crossterm::event::KeyboardEnhancementFlags;
use crossterm::event::PopKeyboardEnhancementFlags;
use crossterm::event::PushKeyboardEnhancementFlags;
use crossterm::execute;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Constraint;
use ratatui::layout::Layout;
use ratatui::style::Color;
use ratatui_comments::CommentSection;
use ratatui_comments::CommentSectionAction;
use ratatui_comments::CommentSectionOptions;
use ratatui_comments::crossterm_input::input_event_from_crossterm;
use ratatui_comments::help::HelpLine;
use ratatui_comments::help::HelpLineOptions;
use ratatui_comments::input::InputEvent;
use ratatui_comments::keymap;
use ratatui_comments::keymap::Binding;
use ratatui_comments::model::CommentNode;
use ratatui_comments::section::CurrentUser;
use ratatui_comments::theme::DEFAULT_ACCENT;
use ratatui_comments::theme::Theme;

use crate::config::Settings;
use crate::error::DemoError;
use crate::store::Store;

const TICK: Duration = Duration::from_millis(500);

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        // Keyboard enhancement lets Shift+Enter reach the composer; terminals without it ignore
        // the request.
        execute!(
            stdout(),
            EnterAlternateScreen,
            EnableBracketedPaste,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
        log::debug!("terminal modes enabled");
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableBracketedPaste,
            LeaveAlternateScreen
        );
        let _ = disable_raw_mode();
    }
}

pub fn section_options(settings: &Settings) -> CommentSectionOptions {
    CommentSectionOptions {
        max_depth: settings.max_depth,
        admin: settings.admin,
        accent: settings.accent.map(Color::from).unwrap_or(DEFAULT_ACCENT),
        logged_in: settings.logged_in,
        current_user: settings.author.clone().map(CurrentUser::new),
        ..CommentSectionOptions::default()
    }
}

pub fn run(settings: Settings, forest: Vec<CommentNode>) -> Result<(), DemoError> {
    let guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    let res = event_loop(&mut terminal, &settings, Store::new(forest));
    drop(guard);
    terminal.show_cursor()?;
    res
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    settings: &Settings,
    mut store: Store,
) -> Result<(), DemoError> {
    let theme = Theme::default();
    let mut section = CommentSection::with_options(section_options(settings));
    let mut help = HelpLine::with_options(
        Vec::new(),
        HelpLineOptions {
            style: theme.text_muted,
            key_style: theme.accent,
            ..HelpLineOptions::default()
        },
    );

    loop {
        help.set_bindings(help_bindings(&section));
        terminal.draw(|f| {
            let [main, footer] =
                Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(f.area());
            let buf = f.buffer_mut();
            section.render(main, buf, &theme, store.forest());
            help.render_ref(footer, buf);
            if let Some(pos) = section.cursor_position(main) {
                f.set_cursor_position(pos);
            }
        })?;

        // Redraw on every tick too, so relative times keep moving.
        if !crossterm::event::poll(TICK)? {
            continue;
        }
        let event = crossterm::event::read()?;
        if matches!(event, Event::Resize(..)) {
            continue;
        }
        let Some(input) = input_event_from_crossterm(event) else {
            continue;
        };
        if !section.is_editing() && is_quit(&input) {
            log::info!("quit requested");
            return Ok(());
        }
        let action = section.handle_event(input, store.forest());
        if action != CommentSectionAction::None {
            store.apply(&action, Utc::now());
        }
    }
}

fn is_quit(input: &InputEvent) -> bool {
    match input {
        InputEvent::Key(key) => keymap::any_matches(
            &[keymap::key_char('q'), keymap::key_ctrl('c')],
            key,
        ),
        InputEvent::Paste(_) => false,
    }
}

fn help_bindings(section: &CommentSection) -> Vec<Binding> {
    if section.is_editing() {
        return vec![
            Binding::new("enter", "post", Vec::new()),
            Binding::new("shift+enter", "newline", Vec::new()),
            Binding::new("tab", "name", Vec::new()),
            Binding::new("esc", "back", Vec::new()),
        ];
    }
    let options = section.options();
    let mut out = options.bindings.help(options.admin);
    out.push(Binding::new("q", "quit", vec![keymap::key_char('q')]));
    out
}
