//! Key bindings
//!
//! Letters are matched case-insensitively because the rotation modifier is
//! Shift, which uppercases them.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::types::InputCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Input(InputCode),
    Hold,
    Pause,
}

/// Map a key to a game command. Movement follows the current view, so the
/// lateral keys are named for screen directions.
pub fn map_key(code: KeyCode) -> Option<KeyCommand> {
    match code {
        KeyCode::Right => Some(KeyCommand::Input(InputCode::MoveRight)),
        KeyCode::Up => Some(KeyCommand::Input(InputCode::MoveBack)),
        KeyCode::Left => Some(KeyCommand::Input(InputCode::MoveLeft)),
        KeyCode::Down => Some(KeyCommand::Input(InputCode::MoveFront)),
        KeyCode::Char(' ') => Some(KeyCommand::Input(InputCode::Lower)),
        KeyCode::Esc => Some(KeyCommand::Pause),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'd' => Some(KeyCommand::Input(InputCode::MoveRight)),
            'w' => Some(KeyCommand::Input(InputCode::MoveBack)),
            'a' => Some(KeyCommand::Input(InputCode::MoveLeft)),
            's' => Some(KeyCommand::Input(InputCode::MoveFront)),
            'k' => Some(KeyCommand::Input(InputCode::ViewCw)),
            'l' => Some(KeyCommand::Input(InputCode::ViewCcw)),
            'e' | ';' => Some(KeyCommand::Hold),
            _ => None,
        },
        _ => None,
    }
}

/// Quit outright on Ctrl+C or 'q'.
pub fn should_quit(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => true,
        KeyCode::Char(c) => c.to_ascii_lowercase() == 'q',
        _ => false,
    }
}
