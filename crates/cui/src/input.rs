use crossterm::event::{KeyCode, KeyEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    Quit,
    ToggleHelp,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    ToggleSelect,
    ClearSelection,
    Choose(usize),
    Restart,
}

pub fn map_key(key: KeyEvent) -> InputAction {
    match key.code {
        KeyCode::Esc => InputAction::ClearSelection,
        KeyCode::Up => InputAction::MoveUp,
        KeyCode::Down => InputAction::MoveDown,
        KeyCode::Left => InputAction::MoveLeft,
        KeyCode::Right => InputAction::MoveRight,
        KeyCode::Enter | KeyCode::Char(' ') => InputAction::ToggleSelect,
        KeyCode::Char('q') => InputAction::Quit,
        KeyCode::Char('?') => InputAction::ToggleHelp,
        KeyCode::Char('k') => InputAction::MoveUp,
        KeyCode::Char('j') => InputAction::MoveDown,
        KeyCode::Char('h') => InputAction::MoveLeft,
        KeyCode::Char('l') => InputAction::MoveRight,
        KeyCode::Char('1') => InputAction::Choose(0),
        KeyCode::Char('2') => InputAction::Choose(1),
        KeyCode::Char('3') => InputAction::Choose(2),
        KeyCode::Char('r') => InputAction::Restart,
        _ => InputAction::None,
    }
}
