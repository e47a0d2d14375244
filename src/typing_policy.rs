use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a raw key press means for the typing line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// append this char to the input
    Append(char),
    /// task is finished and Enter was pressed
    NextTask,
    /// caret movement or deletion; never reaches the input
    Blocked,
    /// not a typing key
    Ignored,
}

/// Classify a key press on the typing line. Input is append-only: nothing
/// that deletes or moves the caret backwards gets through.
pub fn classify_key(key: &KeyEvent, complete: bool) -> KeyAction {
    if key.kind == KeyEventKind::Release {
        return KeyAction::Ignored;
    }

    match key.code {
        KeyCode::Enter if complete => KeyAction::NextTask,
        KeyCode::Enter => KeyAction::Ignored,
        KeyCode::Backspace
        | KeyCode::Delete
        | KeyCode::Left
        | KeyCode::Up
        | KeyCode::Home
        | KeyCode::Right
        | KeyCode::Down
        | KeyCode::End => KeyAction::Blocked,
        KeyCode::Char(c) => {
            if key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
            {
                KeyAction::Ignored
            } else {
                KeyAction::Append(c)
            }
        }
        _ => KeyAction::Ignored,
    }
}
