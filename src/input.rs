use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// The identity of one key the harness understands. Printable keys carry the
/// character the terminal produced, so shifted symbols arrive already shifted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Esc,
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    /// map a terminal event to a key, dropping anything we have no use for
    /// (mouse, resize, focus, key releases, ctrl chords)
    pub fn from_event(event: Event) -> Option<Key> {
        match event {
            Event::Key(evt) => Key::from_key_event(evt),
            _ => None,
        }
    }

    fn from_key_event(evt: KeyEvent) -> Option<Key> {
        if evt.kind == KeyEventKind::Release {
            return None;
        }
        if evt.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return None;
        }
        match evt.code {
            KeyCode::Char(c) => Some(Key::Char(c)),
            KeyCode::Enter => Some(Key::Enter),
            KeyCode::Tab => Some(Key::Tab),
            KeyCode::Backspace => Some(Key::Backspace),
            KeyCode::Esc => Some(Key::Esc),
            KeyCode::Up => Some(Key::Up),
            KeyCode::Down => Some(Key::Down),
            KeyCode::Left => Some(Key::Left),
            KeyCode::Right => Some(Key::Right),
            _ => None,
        }
    }
}
