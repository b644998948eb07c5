//! Palette commands offered by the launcher.
//!
//! Configured entries run shell-style command lines in the background;
//! built-ins talk to the host loop directly. Every outcome is reported on the
//! [`HostEvent`] channel.

use std::process::Stdio;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use cmdk_palette::{CommandAction, CommandItem};
use tokio::process::Command;
use tokio::sync::mpsc::UnboundedSender;

use crate::config::CommandEntry;

/// Messages from command actions to the host loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// A command started
    Started { id: String },
    /// A shell command exited
    Finished {
        id: String,
        success: bool,
        output: String,
    },
    /// A command could not run
    Failed { id: String, error: String },
    /// Clear the activity log
    ClearLog,
    /// Leave the application
    Quit,
}

/// Builds the full command list: configured entries followed by built-ins.
pub fn build_commands(
    entries: &[CommandEntry],
    events: &UnboundedSender<HostEvent>,
) -> Arc<[CommandItem]> {
    entries
        .iter()
        .map(|entry| shell_command(entry, events.clone()))
        .chain(builtin_commands(events))
        .collect()
}

fn shell_command(entry: &CommandEntry, events: UnboundedSender<HostEvent>) -> CommandItem {
    let id = entry.id.clone();
    let line = entry.run.clone();

    let action = CommandAction::from_async(move || {
        let id = id.clone();
        let line = line.clone();
        let events = events.clone();
        async move {
            let _ = events.send(HostEvent::Started { id: id.clone() });
            match run_line(&line).await {
                Ok((success, output)) => {
                    let _ = events.send(HostEvent::Finished {
                        id,
                        success,
                        output,
                    });
                    Ok(())
                }
                Err(err) => {
                    let _ = events.send(HostEvent::Failed {
                        id,
                        error: format!("{err:#}"),
                    });
                    Err(err)
                }
            }
        }
    });

    let mut item = CommandItem::new(&entry.id, &entry.title, action);
    if let Some(description) = &entry.description {
        item = item.with_description(description);
    } else {
        item = item.with_description(&entry.run);
    }
    if let Some(icon) = &entry.icon {
        item = item.with_icon(icon);
    }
    if let Some(category) = &entry.category {
        item = item.with_category(category);
    }
    item
}

fn builtin_commands(events: &UnboundedSender<HostEvent>) -> [CommandItem; 2] {
    let clear = events.clone();
    let quit = events.clone();
    [
        CommandItem::new(
            "cmdk.clear-log",
            "Clear Activity Log",
            CommandAction::sync(move || {
                clear.send(HostEvent::ClearLog).context("host loop is gone")
            }),
        )
        .with_description("Remove all entries from the activity log")
        .with_category("System"),
        CommandItem::new(
            "cmdk.quit",
            "Quit",
            CommandAction::sync(move || quit.send(HostEvent::Quit).context("host loop is gone")),
        )
        .with_description("Exit cmdk")
        .with_category("System"),
    ]
}

/// Splits `line` shell-style and runs it, capturing stdout and stderr.
///
/// Returns the exit status and the last non-empty output line.
pub async fn run_line(line: &str) -> Result<(bool, String)> {
    let Some(argv) = shlex::split(line) else {
        bail!("unbalanced quotes in `{line}`");
    };
    let Some((program, args)) = argv.split_first() else {
        bail!("empty command line");
    };

    tracing::debug!(%program, ?args, "spawning process");
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .with_context(|| format!("failed to start `{program}`"))?;

    let text = if output.stdout.is_empty() {
        String::from_utf8_lossy(&output.stderr).into_owned()
    } else {
        String::from_utf8_lossy(&output.stdout).into_owned()
    };
    let summary = text
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or_default()
        .trim_end()
        .to_string();

    Ok((output.status.success(), summary))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;

    use super::*;
    use cmdk_palette::{CommandGroups, DEFAULT_CATEGORY};

    fn entry(id: &str, category: Option<&str>, run: &str) -> CommandEntry {
        CommandEntry {
            id: id.to_string(),
            title: id.to_uppercase(),
            description: None,
            icon: None,
            category: category.map(str::to_string),
            run: run.to_string(),
        }
    }

    #[test]
    fn test_builtins_follow_configured_commands() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let commands = build_commands(&[entry("a", Some("Files"), "ls"), entry("b", None, "date")], &tx);

        let ids: Vec<&str> = commands.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "cmdk.clear-log", "cmdk.quit"]);
        assert_eq!(commands[1].description.as_deref(), Some("date"));

        let groups = CommandGroups::build(&commands, "", DEFAULT_CATEGORY);
        let names: Vec<&str> = groups.groups().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Files", "Other", "System"]);
    }

    #[test]
    fn test_quit_builtin_sends_event() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let commands = build_commands(&[], &tx);
        let quit = commands.iter().find(|c| c.id == "cmdk.quit").unwrap();

        let CommandAction::Sync(action) = &quit.action else {
            panic!("quit should be synchronous");
        };
        action().unwrap();
        assert_eq!(rx.try_recv().unwrap(), HostEvent::Quit);
    }

    #[tokio::test]
    async fn test_run_line_rejects_bad_input() {
        assert!(run_line("").await.is_err());
        assert!(run_line("echo 'unterminated").await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_line_captures_output() {
        let (success, output) = run_line("echo 'hello world'").await.unwrap();
        assert!(success);
        assert_eq!(output, "hello world");

        let (success, _) = run_line("false").await.unwrap();
        assert!(!success);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_command_reports_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let commands = build_commands(&[entry("greet", None, "echo hi")], &tx);

        let CommandAction::Async(action) = &commands[0].action else {
            panic!("shell commands should be asynchronous");
        };
        action().await.unwrap();

        assert_eq!(
            rx.recv().await,
            Some(HostEvent::Started {
                id: "greet".to_string()
            })
        );
        assert_eq!(
            rx.recv().await,
            Some(HostEvent::Finished {
                id: "greet".to_string(),
                success: true,
                output: "hi".to_string(),
            })
        );
    }
}
