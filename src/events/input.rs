//! Input Module - Terminal key events to document key events
//!
//! Bridges crossterm's event system with the keyboard module.
//!
//! - `convert_key_event` - Convert crossterm KeyEvent to our KeyboardEvent
//! - `poll_key` - Poll for the next key press with a timeout

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent as CrosstermKeyEvent, KeyEventKind, KeyModifiers};

use super::keyboard::{KeyState, KeyboardEvent, Modifier};

// =============================================================================
// KEY EVENT CONVERSION
// =============================================================================

/// Convert crossterm KeyEvent to our KeyboardEvent
pub fn convert_key_event(event: CrosstermKeyEvent) -> KeyboardEvent {
    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => String::new(),
    };

    let state = match event.kind {
        KeyEventKind::Press => KeyState::Press,
        KeyEventKind::Repeat => KeyState::Repeat,
        KeyEventKind::Release => KeyState::Release,
    };

    KeyboardEvent {
        key,
        modifiers: convert_modifiers(event.modifiers),
        state,
    }
}

fn convert_modifiers(mods: KeyModifiers) -> Modifier {
    let mut modifiers = Modifier::NONE;
    if mods.contains(KeyModifiers::SHIFT) {
        modifiers |= Modifier::SHIFT;
    }
    if mods.contains(KeyModifiers::ALT) {
        modifiers |= Modifier::ALT;
    }
    if mods.contains(KeyModifiers::CONTROL) {
        modifiers |= Modifier::CTRL;
    }
    if mods.contains(KeyModifiers::SUPER) {
        modifiers |= Modifier::SUPER;
    }
    modifiers
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for a key event with timeout.
/// Returns None if no key event arrived within the timeout.
pub fn poll_key(timeout: Duration) -> io::Result<Option<KeyboardEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    match event::read()? {
        Event::Key(key) => Ok(Some(convert_key_event(key))),
        _ => Ok(None),
    }
}
