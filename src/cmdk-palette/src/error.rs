//! Error types for the command palette.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while configuring or driving the palette.
#[derive(Debug, Error)]
pub enum PaletteError {
    /// The hotkey string could not be parsed.
    #[error("Invalid hotkey: {0:?}")]
    InvalidHotkey(String),

    /// Reading a configuration file failed.
    #[error("Failed to read config {path}: {source}")]
    ConfigIo {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration text is not valid TOML for the expected schema.
    #[error("Invalid palette config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// An asynchronous command was invoked outside of a tokio runtime.
    #[error("Command {0:?} is asynchronous but no tokio runtime is running")]
    NoRuntime(String),
}

/// Result alias used throughout the palette crate.
pub type Result<T> = std::result::Result<T, PaletteError>;
