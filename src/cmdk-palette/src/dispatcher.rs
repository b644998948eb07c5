//! Local key handling while the palette is open.
//!
//! Key events are first mapped to a [`PaletteAction`]; the palette then
//! applies the action to its state. Every mapped key is consumed, so the host
//! must not forward it to its own handlers.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Whether an event was handled by the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Handled; the host should not process it further
    Consumed,
    /// Not handled; the host may act on it
    Ignored,
}

impl EventOutcome {
    /// Returns true for [`EventOutcome::Consumed`].
    pub fn is_consumed(self) -> bool {
        self == Self::Consumed
    }
}

/// Everything a key can do inside the open palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteAction {
    /// Close the panel
    Close,
    /// Move selection up
    SelectPrev,
    /// Move selection down
    SelectNext,
    /// Move selection up one page
    PageUp,
    /// Move selection down one page
    PageDown,
    /// Run the selected command
    Execute,
    /// Type a character into the query
    InsertChar(char),
    /// Delete before the cursor
    Backspace,
    /// Delete at the cursor
    Delete,
    /// Clear the whole query
    ClearQuery,
    /// Cursor one character left
    CursorLeft,
    /// Cursor one character right
    CursorRight,
    /// Cursor to start of query
    CursorHome,
    /// Cursor to end of query
    CursorEnd,
}

/// Maps a key event to a palette action.
///
/// Returns `None` for keys the palette does not handle, including all
/// key release events.
pub fn map_key(key: &KeyEvent) -> Option<PaletteAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let action = match key.code {
        KeyCode::Esc => PaletteAction::Close,
        KeyCode::Up => PaletteAction::SelectPrev,
        KeyCode::Down => PaletteAction::SelectNext,
        KeyCode::PageUp => PaletteAction::PageUp,
        KeyCode::PageDown => PaletteAction::PageDown,
        KeyCode::Enter => PaletteAction::Execute,
        KeyCode::Backspace => PaletteAction::Backspace,
        KeyCode::Delete => PaletteAction::Delete,
        KeyCode::Left => PaletteAction::CursorLeft,
        KeyCode::Right => PaletteAction::CursorRight,
        KeyCode::Home => PaletteAction::CursorHome,
        KeyCode::End => PaletteAction::CursorEnd,
        KeyCode::Char('u') if ctrl => PaletteAction::ClearQuery,
        KeyCode::Char(c)
            if !ctrl
                && !key
                    .modifiers
                    .intersects(KeyModifiers::ALT | KeyModifiers::SUPER) =>
        {
            PaletteAction::InsertChar(c)
        }
        _ => return None,
    };
    Some(action)
}
