//! cmdk - terminal command launcher.
//!
//! Loads shell commands from a TOML file and offers them through the
//! command palette. The binary entry point lives in `main.rs`; everything
//! else is here so it can be tested.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod terminal;

use std::fmt::Write as _;

use anyhow::Result;
use cmdk_palette::{CommandGroups, CommandItem};
use tokio::sync::mpsc;

use crate::app::App;
use crate::cli::Cli;
use crate::commands::build_commands;
use crate::config::LauncherConfig;
use crate::terminal::LauncherTerminal;

/// Loads configuration and applies command-line overrides.
pub fn load_config(cli: &Cli) -> Result<LauncherConfig> {
    let mut config = LauncherConfig::resolve(cli.config.as_deref())?;
    if let Some(hotkey) = &cli.hotkey {
        config.palette.hotkey = hotkey.clone();
    }
    config.palette.parsed_hotkey()?;
    Ok(config)
}

/// Renders the grouped command list as plain text.
pub fn describe_commands(commands: &[CommandItem], config: &LauncherConfig) -> String {
    let groups = CommandGroups::build(commands, "", &config.palette.default_category);
    let mut out = String::new();
    let _ = writeln!(out, "hotkey: {}", config.palette.hotkey);
    for group in groups.groups() {
        let _ = writeln!(out, "{}", group.name);
        for entry in &group.entries {
            let command = &commands[entry.command_index];
            let _ = writeln!(out, "  {:>2}  {:<24} {}", entry.flat_index, command.title, command.id);
        }
    }
    out
}

/// Entry point shared by the binary.
pub async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    if cli.check {
        let (tx, _rx) = mpsc::unbounded_channel();
        let commands = build_commands(&config.commands, &tx);
        print!("{}", describe_commands(&commands, &config));
        return Ok(());
    }

    let mut app = App::new(config)?;
    let mut terminal = LauncherTerminal::new()?;
    app.run(&mut terminal).await
}
