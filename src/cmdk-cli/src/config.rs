//! Launcher configuration.
//!
//! Example TOML:
//! ```toml
//! [palette]
//! hotkey = "Mod+K"
//!
//! [[commands]]
//! id = "git-status"
//! title = "Git Status"
//! description = "Show working tree status"
//! category = "Git"
//! run = "git status --short"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cmdk_palette::PaletteConfig;
use serde::{Deserialize, Serialize};

/// One shell command entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEntry {
    /// Unique identifier
    pub id: String,
    /// Title shown in the palette
    pub title: String,
    /// Secondary text
    #[serde(default)]
    pub description: Option<String>,
    /// Leading glyph
    #[serde(default)]
    pub icon: Option<String>,
    /// Group label
    #[serde(default)]
    pub category: Option<String>,
    /// Shell-style command line
    pub run: String,
}

/// Top-level config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LauncherConfig {
    /// Palette behaviour
    #[serde(default)]
    pub palette: PaletteConfig,
    /// User commands, in display order
    #[serde(default)]
    pub commands: Vec<CommandEntry>,
}

impl LauncherConfig {
    /// Default location: `<config dir>/cmdk/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cmdk").join("config.toml"))
    }

    /// Parses a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid launcher config")
    }

    /// Loads `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("In {}", path.display()))
    }

    /// Loads an explicit path, or the default path if it exists.
    ///
    /// A missing default file yields the built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => {
                tracing::debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = LauncherConfig::from_toml_str("").unwrap();
        assert_eq!(config, LauncherConfig::default());
        assert_eq!(config.palette.hotkey, "Mod+K");
    }

    #[test]
    fn test_parse_commands() {
        let config = LauncherConfig::from_toml_str(
            r#"
            [palette]
            hotkey = "Ctrl+P"
            width = 50

            [[commands]]
            id = "ls"
            title = "List Files"
            category = "Files"
            run = "ls -la"

            [[commands]]
            id = "date"
            title = "Date"
            run = "date"
            "#,
        )
        .unwrap();

        assert_eq!(config.palette.hotkey, "Ctrl+P");
        assert_eq!(config.palette.width, 50);
        assert_eq!(config.palette.height, PaletteConfig::default().height);
        assert_eq!(config.commands.len(), 2);
        assert_eq!(config.commands[0].category.as_deref(), Some("Files"));
        assert_eq!(config.commands[1].category, None);
        assert_eq!(config.commands[1].run, "date");
    }

    #[test]
    fn test_missing_run_is_rejected() {
        let result = LauncherConfig::from_toml_str(
            r#"
            [[commands]]
            id = "x"
            title = "X"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[[commands]]\nid = \"hi\"\ntitle = \"Hi\"\nrun = \"echo hi\""
        )
        .unwrap();

        let config = LauncherConfig::resolve(Some(file.path())).unwrap();
        assert_eq!(config.commands[0].id, "hi");
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let result = LauncherConfig::load(&dir.path().join("nope.toml"));
        assert!(result.is_err());
    }
}
