use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Represents the result of handling a key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Quit the application
    Quit,
    /// Move the current image into approved/
    Approve,
    /// Move the current image into disapproved/
    Disapprove,
    /// Move to next image
    Next,
    /// Move to previous image
    Previous,
    /// Undo last action
    Undo,
    ZoomIn,
    ZoomOut,
    ResetZoom,
    /// Open the rename prompt
    Rename,
    /// Open the folder prompt
    SelectFolder,
    /// Open the current image in the system viewer
    OpenExternal,
    /// Toggle help overlay
    Help,
    /// No action
    None,
}

/// What a key does while a line prompt is open
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAction {
    Insert(char),
    Backspace,
    Submit,
    Cancel,
    None,
}

/// Maps keyboard events to actions
pub fn handle_key_event(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        // Quit: q, Esc or Ctrl+C
        (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Quit,

        // Approve: Right arrow or a
        (KeyCode::Right, KeyModifiers::NONE) => KeyAction::Approve,
        (KeyCode::Char('a'), KeyModifiers::NONE) => KeyAction::Approve,

        // Disapprove: Left arrow or d
        (KeyCode::Left, KeyModifiers::NONE) => KeyAction::Disapprove,
        (KeyCode::Char('d'), KeyModifiers::NONE) => KeyAction::Disapprove,

        // Navigation
        (KeyCode::Down, KeyModifiers::NONE) => KeyAction::Next,
        (KeyCode::Up, KeyModifiers::NONE) => KeyAction::Previous,
        (KeyCode::Char('j'), KeyModifiers::NONE) => KeyAction::Next,
        (KeyCode::Char('k'), KeyModifiers::NONE) => KeyAction::Previous,

        // Undo: z, u or Ctrl+Z
        (KeyCode::Char('z'), KeyModifiers::NONE) => KeyAction::Undo,
        (KeyCode::Char('u'), KeyModifiers::NONE) => KeyAction::Undo,
        (KeyCode::Char('z'), KeyModifiers::CONTROL) => KeyAction::Undo,

        // Zoom; some terminals report '+' with Shift held
        (KeyCode::Char('+'), _) => KeyAction::ZoomIn,
        (KeyCode::Char('='), KeyModifiers::NONE) => KeyAction::ZoomIn,
        (KeyCode::Char('-'), KeyModifiers::NONE) => KeyAction::ZoomOut,
        (KeyCode::Char(' '), KeyModifiers::NONE) => KeyAction::ResetZoom,

        (KeyCode::Char('r'), KeyModifiers::NONE) => KeyAction::Rename,
        (KeyCode::Char('f'), KeyModifiers::NONE) => KeyAction::SelectFolder,
        (KeyCode::Char('o'), KeyModifiers::NONE) => KeyAction::OpenExternal,

        (KeyCode::Char('?'), _) => KeyAction::Help,

        _ => KeyAction::None,
    }
}

/// Maps keyboard events to line editing while a prompt is open
pub fn handle_prompt_input(key: KeyEvent) -> PromptAction {
    match (key.code, key.modifiers) {
        (KeyCode::Enter, _) => PromptAction::Submit,
        (KeyCode::Esc, _) => PromptAction::Cancel,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => PromptAction::Cancel,
        (KeyCode::Backspace, _) => PromptAction::Backspace,
        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => PromptAction::Insert(c),
        _ => PromptAction::None,
    }
}
