//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Log verbosity level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    /// Only errors
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages and above (default)
    #[default]
    Info,
    /// Debug messages and above
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Convert to tracing filter string.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Terminal command launcher.
#[derive(Debug, Parser)]
#[command(name = "cmdk")]
#[command(author, version)]
#[command(about = "Keyboard-driven command launcher", long_about = None)]
pub struct Cli {
    /// Config file (defaults to <config dir>/cmdk/config.toml)
    #[arg(long, short = 'c', env = "CMDK_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long, env = "CMDK_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log verbosity, overridden by CMDK_LOG or RUST_LOG
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Override the palette hotkey, e.g. "Ctrl+P"
    #[arg(long, value_name = "KEY")]
    pub hotkey: Option<String>,

    /// Validate the config, print the grouped commands and exit
    #[arg(long)]
    pub check: bool,
}
