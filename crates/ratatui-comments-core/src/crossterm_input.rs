//! Conversion from `crossterm` events into [`InputEvent`].
//!
//! Only key presses and bracketed pastes are forwarded. Key releases/repeats, focus, resize and
//! mouse events map to `None`; the comment widgets are keyboard driven.
use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::KeyModifiers;

pub fn input_event_from_crossterm(ev: crossterm::event::Event) -> Option<InputEvent> {
    match ev {
        crossterm::event::Event::Key(key) => key_event_from_crossterm(key).map(InputEvent::Key),
        crossterm::event::Event::Paste(s) => Some(InputEvent::Paste(s)),
        _ => None,
    }
}

pub fn key_event_from_crossterm(key: crossterm::event::KeyEvent) -> Option<KeyEvent> {
    use crossterm::event::KeyCode as C;

    if key.kind != crossterm::event::KeyEventKind::Press {
        return None;
    }

    let mut modifiers = modifiers_from_crossterm(key.modifiers);
    let code = match key.code {
        C::Char(c) => {
            // Terminals report `G` as `Char('G')` + SHIFT; bindings match on the char alone.
            if c.is_uppercase() {
                modifiers.shift = false;
            }
            KeyCode::Char(c)
        }
        C::Enter => KeyCode::Enter,
        C::Backspace => KeyCode::Backspace,
        C::Delete => KeyCode::Delete,
        C::Tab => KeyCode::Tab,
        C::BackTab => {
            modifiers.shift = false;
            KeyCode::BackTab
        }
        C::Esc => KeyCode::Esc,
        C::Left => KeyCode::Left,
        C::Right => KeyCode::Right,
        C::Up => KeyCode::Up,
        C::Down => KeyCode::Down,
        C::Home => KeyCode::Home,
        C::End => KeyCode::End,
        C::PageUp => KeyCode::PageUp,
        C::PageDown => KeyCode::PageDown,
        _ => return None,
    };

    Some(KeyEvent { code, modifiers })
}

fn modifiers_from_crossterm(m: crossterm::event::KeyModifiers) -> KeyModifiers {
    KeyModifiers {
        shift: m.contains(crossterm::event::KeyModifiers::SHIFT),
        ctrl: m.contains(crossterm::event::KeyModifiers::CONTROL),
        alt: m.contains(crossterm::event::KeyModifiers::ALT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn ct_key(code: crossterm::event::KeyCode, m: crossterm::event::KeyModifiers) -> crossterm::event::KeyEvent {
        crossterm::event::KeyEvent::new(code, m)
    }

    #[test]
    fn uppercase_char_drops_shift() {
        let key = ct_key(
            crossterm::event::KeyCode::Char('G'),
            crossterm::event::KeyModifiers::SHIFT,
        );
        assert_eq!(key_event_from_crossterm(key), Some(KeyEvent::char('G')));
    }

    #[test]
    fn shift_enter_keeps_shift() {
        let key = ct_key(
            crossterm::event::KeyCode::Enter,
            crossterm::event::KeyModifiers::SHIFT,
        );
        assert_eq!(
            key_event_from_crossterm(key),
            Some(KeyEvent::new(KeyCode::Enter).with_modifiers(KeyModifiers::SHIFT))
        );
    }

    #[test]
    fn releases_are_ignored() {
        let mut key = ct_key(
            crossterm::event::KeyCode::Char('a'),
            crossterm::event::KeyModifiers::NONE,
        );
        key.kind = KeyEventKind::Release;
        assert_eq!(key_event_from_crossterm(key), None);
    }
}
