//! Palette configuration.
//!
//! Example TOML:
//! ```toml
//! hotkey = "Mod+K"
//! keyboard_nav_grace_ms = 100
//! width = 70
//! height = 20
//! placeholder = "Type a command or search..."
//! default_category = "Other"
//! filter_on_query = true
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PaletteError, Result};
use crate::groups::DEFAULT_CATEGORY;
use crate::hotkey::Hotkey;

/// Behaviour and layout settings for a palette instance.
///
/// The query narrows the list by default. With `filter_on_query = false` the
/// query is still collected and reset, but every command stays listed, which
/// is how the classic palette behaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// Toggle hotkey; `Mod` means Ctrl or Super.
    #[serde(default = "default_hotkey")]
    pub hotkey: String,
    /// How long pointer hover is ignored after a keyboard move (milliseconds).
    #[serde(default = "default_keyboard_nav_grace_ms")]
    pub keyboard_nav_grace_ms: u64,
    /// Maximum panel width in cells.
    #[serde(default = "default_width")]
    pub width: u16,
    /// Maximum panel height in cells.
    #[serde(default = "default_height")]
    pub height: u16,
    /// Text shown in the empty search field.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    /// Category for commands that declare none.
    #[serde(default = "default_category")]
    pub default_category: String,
    /// Whether the query narrows the visible list.
    #[serde(default = "default_filter_on_query")]
    pub filter_on_query: bool,
}

fn default_hotkey() -> String {
    "Mod+K".to_string()
}

fn default_keyboard_nav_grace_ms() -> u64 {
    100
}

fn default_width() -> u16 {
    70
}

fn default_height() -> u16 {
    20
}

fn default_placeholder() -> String {
    "Type a command or search...".to_string()
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_filter_on_query() -> bool {
    true
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            hotkey: default_hotkey(),
            keyboard_nav_grace_ms: default_keyboard_nav_grace_ms(),
            width: default_width(),
            height: default_height(),
            placeholder: default_placeholder(),
            default_category: default_category(),
            filter_on_query: default_filter_on_query(),
        }
    }
}

impl PaletteConfig {
    /// Parses a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| PaletteError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parses the configured hotkey.
    pub fn parsed_hotkey(&self) -> Result<Hotkey> {
        Hotkey::parse(&self.hotkey)
    }

    /// Keyboard navigation grace period.
    pub fn keyboard_nav_grace(&self) -> Duration {
        Duration::from_millis(self.keyboard_nav_grace_ms)
    }

    /// Sets the hotkey.
    pub fn with_hotkey(mut self, hotkey: impl Into<String>) -> Self {
        self.hotkey = hotkey.into();
        self
    }

    /// Sets the keyboard navigation grace period.
    pub fn with_keyboard_nav_grace(mut self, grace: Duration) -> Self {
        self.keyboard_nav_grace_ms = grace.as_millis() as u64;
        self
    }
}
