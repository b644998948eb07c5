//! Launcher host: an activity log screen with the palette on top.

use std::collections::VecDeque;
use std::time::Instant;

use anyhow::{Context, Result};
use cmdk_palette::style::{CYAN_PRIMARY, ERROR, SURFACE_0, TEXT, TEXT_DIM, TEXT_MUTED};
use cmdk_palette::{CommandPalette, HotkeyRouter, PaletteAction};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::commands::{HostEvent, build_commands};
use crate::config::LauncherConfig;
use crate::terminal::LauncherTerminal;

/// Oldest log lines are dropped past this many.
const LOG_CAPACITY: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogKind {
    Info,
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LogLine {
    kind: LogKind,
    text: String,
}

/// Launcher application state.
pub struct App {
    router: HotkeyRouter,
    palette: CommandPalette,
    events: UnboundedReceiver<HostEvent>,
    log: VecDeque<LogLine>,
    quit: bool,
}

impl App {
    /// Builds the command list and mounts the palette.
    pub fn new(config: LauncherConfig) -> Result<Self> {
        let (tx, events) = mpsc::unbounded_channel();
        let commands = build_commands(&config.commands, &tx);
        let router = HotkeyRouter::new();
        let palette = CommandPalette::mount(commands, config.palette, &router)
            .context("Failed to mount command palette")?;

        let mut app = Self {
            router,
            palette,
            events,
            log: VecDeque::new(),
            quit: false,
        };
        app.push(
            LogKind::Info,
            format!("Press {} to open the command palette", app.palette.hotkey()),
        );
        Ok(app)
    }

    /// Returns true once the user asked to leave.
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// The mounted palette.
    pub fn palette(&self) -> &CommandPalette {
        &self.palette
    }

    /// Runs until quit or until the terminal event stream ends.
    pub async fn run(&mut self, term: &mut LauncherTerminal) -> Result<()> {
        let mut input = EventStream::new();
        self.draw(term)?;

        while !self.quit {
            tokio::select! {
                maybe_event = input.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_terminal_event(event),
                    Some(Err(err)) => return Err(err).context("Failed to read terminal input"),
                    None => break,
                },
                Some(event) = self.events.recv() => self.handle_host_event(event),
            }
            self.draw(term)?;
        }

        tracing::info!("launcher exiting");
        Ok(())
    }

    fn draw(&mut self, term: &mut LauncherTerminal) -> Result<()> {
        term.terminal.draw(|frame| self.render(frame))?;
        Ok(())
    }

    // ============================================================
    // EVENTS
    // ============================================================

    /// Routes one terminal event: global hotkeys first, then the palette,
    /// then the host's own keys.
    pub fn handle_terminal_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => {
                self.palette.handle_mouse(mouse);
            }
            Event::Paste(text) if self.palette.is_visible() => {
                let now = Instant::now();
                for c in text.chars().filter(|c| !c.is_control()) {
                    self.palette.apply(PaletteAction::InsertChar(c), now);
                }
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.router.route(&key).is_consumed() {
            self.palette.sync();
            return;
        }
        if self.palette.handle_key(key).is_consumed() {
            return;
        }
        if key.kind == KeyEventKind::Release {
            return;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit = true,
            KeyCode::Char('q') if key.modifiers.is_empty() => self.quit = true,
            _ => {}
        }
    }

    /// Applies a message from a command action.
    pub fn handle_host_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::Started { id } => self.push(LogKind::Info, format!("> {id}")),
            HostEvent::Finished {
                id,
                success,
                output,
            } => {
                let kind = if success {
                    LogKind::Success
                } else {
                    LogKind::Failure
                };
                let status = if success { "ok" } else { "failed" };
                let text = if output.is_empty() {
                    format!("{id}: {status}")
                } else {
                    format!("{id}: {status}: {output}")
                };
                self.push(kind, text);
            }
            HostEvent::Failed { id, error } => self.push(LogKind::Failure, format!("{id}: {error}")),
            HostEvent::ClearLog => self.log.clear(),
            HostEvent::Quit => self.quit = true,
        }
    }

    fn push(&mut self, kind: LogKind, text: String) {
        if self.log.len() == LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(LogLine { kind, text });
    }

    // ============================================================
    // RENDERING
    // ============================================================

    /// Draws the host screen and, when open, the palette over it.
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let [body, footer] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        let visible = body.height.saturating_sub(2) as usize;
        let lines: Vec<Line> = self
            .log
            .iter()
            .skip(self.log.len().saturating_sub(visible))
            .map(|line| {
                let color = match line.kind {
                    LogKind::Info => TEXT_DIM,
                    LogKind::Success => CYAN_PRIMARY,
                    LogKind::Failure => ERROR,
                };
                Line::from(Span::styled(line.text.as_str(), Style::default().fg(color)))
            })
            .collect();

        let block = Block::default()
            .title(" cmdk ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(TEXT_MUTED))
            .style(Style::default().bg(SURFACE_0).fg(TEXT));
        frame.render_widget(Paragraph::new(lines).block(block), body);

        let hint = format!(" {}  commands   q  quit", self.palette.hotkey());
        frame.render_widget(
            Paragraph::new(hint).style(Style::default().fg(TEXT_MUTED)),
            footer,
        );

        frame.render_widget(&mut self.palette, area);
        if let Some(position) = self.palette.cursor_position() {
            frame.set_cursor_position(position);
        }
    }

    #[cfg(test)]
    fn log_texts(&self) -> Vec<&str> {
        self.log.iter().map(|l| l.text.as_str()).collect()
    }
}
