//! Key chord text.
//!
//! Chords are `+`-separated tokens with the key last, e.g. `Ctrl+Shift+P`.
//! Tokens are case-insensitive and may be padded with spaces.

use std::iter;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Named keys. The first name listed for a code is its display label.
const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("Space", KeyCode::Char(' ')),
    ("Enter", KeyCode::Enter),
    ("Return", KeyCode::Enter),
    ("Esc", KeyCode::Esc),
    ("Escape", KeyCode::Esc),
    ("Tab", KeyCode::Tab),
    ("Backspace", KeyCode::Backspace),
    ("Delete", KeyCode::Delete),
    ("Del", KeyCode::Delete),
    ("Up", KeyCode::Up),
    ("Down", KeyCode::Down),
    ("Left", KeyCode::Left),
    ("Right", KeyCode::Right),
    ("PageUp", KeyCode::PageUp),
    ("PgUp", KeyCode::PageUp),
    ("PageDown", KeyCode::PageDown),
    ("PgDn", KeyCode::PageDown),
    ("Home", KeyCode::Home),
    ("End", KeyCode::End),
];

const MODIFIER_NAMES: &[(&str, KeyModifiers)] = &[
    ("ctrl", KeyModifiers::CONTROL),
    ("control", KeyModifiers::CONTROL),
    ("alt", KeyModifiers::ALT),
    ("option", KeyModifiers::ALT),
    ("shift", KeyModifiers::SHIFT),
    ("super", KeyModifiers::SUPER),
    ("meta", KeyModifiers::SUPER),
    ("cmd", KeyModifiers::SUPER),
];

/// Display order of modifiers.
const MODIFIER_LABELS: [(KeyModifiers, &str); 4] = [
    (KeyModifiers::CONTROL, "Ctrl"),
    (KeyModifiers::ALT, "Alt"),
    (KeyModifiers::SHIFT, "Shift"),
    (KeyModifiers::SUPER, "Super"),
];

/// Parses a chord such as `"Ctrl+K"`, `"Esc"` or `"Alt+F4"`.
///
/// Letters are lowercased. Returns `None` for unknown keys or modifiers.
pub fn parse_key_string(s: &str) -> Option<KeyEvent> {
    let mut tokens = s.split('+').map(str::trim);
    let key = tokens.next_back()?;
    let modifiers = tokens.try_fold(KeyModifiers::NONE, |acc, token| {
        modifier_named(token).map(|m| acc | m)
    })?;
    Some(KeyEvent::new(key_code_named(key)?, modifiers))
}

fn modifier_named(token: &str) -> Option<KeyModifiers> {
    MODIFIER_NAMES
        .iter()
        .find(|(name, _)| token.eq_ignore_ascii_case(name))
        .map(|&(_, modifier)| modifier)
}

fn key_code_named(token: &str) -> Option<KeyCode> {
    if let Some(&(_, code)) = NAMED_KEYS
        .iter()
        .find(|(name, _)| token.eq_ignore_ascii_case(name))
    {
        return Some(code);
    }

    if let Some(n) = token
        .strip_prefix(['F', 'f'])
        .and_then(|n| n.parse::<u8>().ok())
        .filter(|n| (1..=12).contains(n))
    {
        return Some(KeyCode::F(n));
    }

    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeyCode::Char(c.to_ascii_lowercase())),
        _ => None,
    }
}

/// Formats a key event as a chord, e.g. `Ctrl+Shift+P`.
pub fn format_key(key: &KeyEvent) -> String {
    MODIFIER_LABELS
        .iter()
        .filter(|(modifier, _)| key.modifiers.contains(*modifier))
        .map(|(_, label)| (*label).to_string())
        .chain(iter::once(key_code_label(key.code)))
        .collect::<Vec<_>>()
        .join("+")
}

pub(crate) fn key_code_label(code: KeyCode) -> String {
    if let Some((name, _)) = NAMED_KEYS.iter().find(|(_, c)| *c == code) {
        return (*name).to_string();
    }
    match code {
        KeyCode::Char(c) => c.to_uppercase().collect(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}"),
    }
}
