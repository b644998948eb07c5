//! Global hotkey routing.
//!
//! The host owns a [`HotkeyRouter`] and feeds it every key event before doing
//! anything else with it. Components register interest through
//! [`HotkeyRouter::subscribe`] and receive matching events on a channel. The
//! returned [`HotkeySubscription`] is the only handle to the registration:
//! dropping it removes the listener, so mounting and unmounting a component
//! any number of times never leaves stale listeners behind.
//!
//! ```text
//!   key event ──► HotkeyRouter::route ──► matching listener? ──► mpsc ──► subscriber
//!                         │
//!                         └── no match ──► EventOutcome::Ignored (host handles it)
//! ```

use std::fmt;
use std::sync::{Arc, Weak};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::dispatcher::EventOutcome;
use crate::error::{PaletteError, Result};
use crate::keys::{format_key, parse_key_string};

// ============================================================
// HOTKEY
// ============================================================

/// A key chord matched against incoming key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotkey {
    code: KeyCode,
    modifiers: KeyModifiers,
    /// Accept either Ctrl or Super as the main modifier
    primary: bool,
}

impl Hotkey {
    /// Creates a hotkey requiring exactly `modifiers`.
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self {
            code: normalize(code),
            modifiers,
            primary: false,
        }
    }

    /// Creates a hotkey that fires with either Ctrl or Super (Cmd on macOS).
    pub fn primary(code: KeyCode) -> Self {
        Self {
            code: normalize(code),
            modifiers: KeyModifiers::NONE,
            primary: true,
        }
    }

    /// Parses a hotkey string.
    ///
    /// `"Mod+K"` (or `"Primary+K"`) matches Ctrl+K and Super+K alike; any other
    /// form, such as `"Ctrl+Shift+P"`, must match exactly.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let lower = trimmed.to_lowercase();
        let (primary, rest) = match lower.split_once('+') {
            Some(("mod" | "primary", _)) => {
                let (_, rest) = trimmed.split_once('+').unwrap_or(("", trimmed));
                (true, rest)
            }
            _ => (false, trimmed),
        };

        let event =
            parse_key_string(rest).ok_or_else(|| PaletteError::InvalidHotkey(s.to_string()))?;

        if !primary
            && !event.modifiers.intersects(
                KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER,
            )
            && !matches!(event.code, KeyCode::F(_))
        {
            // A bare printable key would swallow ordinary typing.
            return Err(PaletteError::InvalidHotkey(s.to_string()));
        }

        Ok(Self {
            code: normalize(event.code),
            modifiers: event.modifiers,
            primary,
        })
    }

    /// Returns true if `key` is a press or repeat of this chord.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release || normalize(key.code) != self.code {
            return false;
        }

        if self.primary {
            let main = key.modifiers & (KeyModifiers::CONTROL | KeyModifiers::SUPER);
            let rest = key
                .modifiers
                .difference(KeyModifiers::CONTROL | KeyModifiers::SUPER);
            !main.is_empty() && rest == self.modifiers
        } else {
            key.modifiers == self.modifiers
        }
    }

    /// Human-readable label, e.g. `Ctrl+K` or `Ctrl/Cmd+K`.
    pub fn label(&self) -> String {
        let chord = format_key(&KeyEvent::new(self.code, self.modifiers));
        if self.primary {
            format!("Ctrl/Cmd+{chord}")
        } else {
            chord
        }
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Terminals report Shift+K as 'K'; compare letters case-insensitively.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

// ============================================================
// ROUTER
// ============================================================

struct Listener {
    id: u64,
    hotkey: Hotkey,
    tx: mpsc::UnboundedSender<KeyEvent>,
}

#[derive(Default)]
struct RouterTable {
    next_id: u64,
    listeners: Vec<Listener>,
}

/// Fan-out table for global hotkeys.
///
/// Cloning the router yields another handle to the same table.
#[derive(Clone, Default)]
pub struct HotkeyRouter {
    table: Arc<Mutex<RouterTable>>,
}

impl HotkeyRouter {
    /// Creates an empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for `hotkey`.
    pub fn subscribe(&self, hotkey: Hotkey) -> HotkeySubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut table = self.table.lock();
        let id = table.next_id;
        table.next_id += 1;
        table.listeners.push(Listener { id, hotkey, tx });
        tracing::debug!(id, %hotkey, "hotkey listener attached");

        HotkeySubscription {
            id,
            table: Arc::downgrade(&self.table),
            rx,
        }
    }

    /// Delivers `key` to every listener whose hotkey matches.
    ///
    /// Returns [`EventOutcome::Consumed`] if at least one listener received it.
    pub fn route(&self, key: &KeyEvent) -> EventOutcome {
        let mut table = self.table.lock();
        let mut delivered = false;
        table.listeners.retain(|listener| {
            if !listener.hotkey.matches(key) {
                return !listener.tx.is_closed();
            }
            match listener.tx.send(*key) {
                Ok(()) => {
                    delivered = true;
                    true
                }
                Err(_) => false,
            }
        });

        if delivered {
            EventOutcome::Consumed
        } else {
            EventOutcome::Ignored
        }
    }

    /// Number of attached listeners.
    pub fn listener_count(&self) -> usize {
        self.table.lock().listeners.len()
    }
}

impl fmt::Debug for HotkeyRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HotkeyRouter")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

// ============================================================
// SUBSCRIPTION
// ============================================================

/// Owned registration on a [`HotkeyRouter`]; detaches on drop.
pub struct HotkeySubscription {
    id: u64,
    table: Weak<Mutex<RouterTable>>,
    rx: mpsc::UnboundedReceiver<KeyEvent>,
}

impl HotkeySubscription {
    /// Returns the next pending hotkey event without waiting.
    pub fn try_next(&mut self) -> Option<KeyEvent> {
        self.rx.try_recv().ok()
    }

    /// Waits for the next hotkey event.
    ///
    /// Resolves to `None` once the router has been dropped.
    pub async fn next(&mut self) -> Option<KeyEvent> {
        self.rx.recv().await
    }
}

impl fmt::Debug for HotkeySubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HotkeySubscription")
            .field("id", &self.id)
            .finish()
    }
}

impl Drop for HotkeySubscription {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            table.lock().listeners.retain(|l| l.id != self.id);
            tracing::debug!(id = self.id, "hotkey listener detached");
        }
    }
}
