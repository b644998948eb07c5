//! The mounted command palette component.
//!
//! [`CommandPalette`] ties the pieces together: it owns the selection state,
//! the grouped view of the caller's commands, the hotkey subscription and the
//! visibility binding shared with the host.
//!
//! ## Usage
//!
//! ```ignore
//! let router = HotkeyRouter::new();
//! let mut palette = CommandPalette::mount(commands, PaletteConfig::default(), &router)?;
//!
//! // For every key event:
//! if router.route(&key).is_consumed() {
//!     palette.sync();
//! } else if !palette.handle_key(key).is_consumed() {
//!     // host handles the key
//! }
//!
//! // In render loop:
//! frame.render_widget(&mut palette, frame.area());
//! ```

use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;
use ratatui::prelude::*;
use tokio::sync::watch;

use crate::command::CommandItem;
use crate::config::PaletteConfig;
use crate::dispatcher::{EventOutcome, PaletteAction, map_key};
use crate::error::Result;
use crate::execute::{Invocation, invoke};
use crate::groups::CommandGroups;
use crate::hotkey::{Hotkey, HotkeySubscription, HotkeyRouter};
use crate::state::PaletteState;
use crate::widget::{PaletteLayout, PaletteWidget};

// ============================================================
// VISIBILITY BINDING
// ============================================================

/// Two-way visibility handle shared between the host and the palette.
///
/// The host may read, watch or set the value; the palette publishes every
/// open/close transition through it and applies host writes on
/// [`CommandPalette::sync`].
#[derive(Debug, Clone)]
pub struct VisibilityBinding {
    tx: Arc<watch::Sender<bool>>,
}

impl VisibilityBinding {
    fn new(initial: bool) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Current visibility.
    pub fn get(&self) -> bool {
        *self.tx.borrow()
    }

    /// Requests a visibility change.
    pub fn set(&self, visible: bool) {
        self.tx.send_replace(visible);
    }

    /// Returns a receiver that observes every change.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

// ============================================================
// COMMAND PALETTE
// ============================================================

/// A command palette attached to a host's hotkey router.
///
/// Dropping the palette detaches its hotkey listener.
#[derive(Debug)]
pub struct CommandPalette {
    commands: Arc<[CommandItem]>,
    config: PaletteConfig,
    hotkey: Hotkey,
    hotkey_label: String,
    state: PaletteState,
    groups: CommandGroups,
    layout: PaletteLayout,
    binding: VisibilityBinding,
    binding_rx: watch::Receiver<bool>,
    subscription: HotkeySubscription,
}

impl CommandPalette {
    /// Mounts a palette over `commands`, registering its toggle hotkey on `router`.
    pub fn mount(
        commands: impl Into<Arc<[CommandItem]>>,
        config: PaletteConfig,
        router: &HotkeyRouter,
    ) -> Result<Self> {
        let hotkey = config.parsed_hotkey()?;
        let commands = commands.into();
        let groups = CommandGroups::build(&commands, "", &config.default_category);
        let binding = VisibilityBinding::new(false);
        let binding_rx = binding.subscribe();
        let subscription = router.subscribe(hotkey);

        tracing::debug!(commands = commands.len(), %hotkey, "command palette mounted");

        Ok(Self {
            state: PaletteState::new(config.keyboard_nav_grace()),
            hotkey_label: hotkey.label(),
            commands,
            config,
            hotkey,
            groups,
            layout: PaletteLayout::default(),
            binding,
            binding_rx,
            subscription,
        })
    }

    // ============================================================
    // ACCESSORS
    // ============================================================

    /// Returns true while the panel is open.
    pub fn is_visible(&self) -> bool {
        self.state.is_visible()
    }

    /// Read-only view of the selection state.
    pub fn state(&self) -> &PaletteState {
        &self.state
    }

    /// Current grouping of the visible commands.
    pub fn groups(&self) -> &CommandGroups {
        &self.groups
    }

    /// Caller-supplied command list.
    pub fn commands(&self) -> &Arc<[CommandItem]> {
        &self.commands
    }

    /// Active configuration.
    pub fn config(&self) -> &PaletteConfig {
        &self.config
    }

    /// The toggle hotkey.
    pub fn hotkey(&self) -> Hotkey {
        self.hotkey
    }

    /// Layout recorded by the most recent render.
    pub fn layout(&self) -> &PaletteLayout {
        &self.layout
    }

    /// Terminal cursor position for the search field, if focused.
    pub fn cursor_position(&self) -> Option<Position> {
        if self.state.is_visible() {
            self.layout.cursor
        } else {
            None
        }
    }

    /// Returns the visibility binding for the host.
    pub fn visibility(&self) -> VisibilityBinding {
        self.binding.clone()
    }

    /// Command under the selection, if any.
    pub fn selected(&self) -> Option<&CommandItem> {
        self.groups
            .command_index(self.state.selected_index)
            .and_then(|idx| self.commands.get(idx))
    }

    // ============================================================
    // COMMAND LIST
    // ============================================================

    /// Replaces the command list.
    ///
    /// Passing the same `Arc` again keeps the current grouping.
    pub fn set_commands(&mut self, commands: Arc<[CommandItem]>) {
        if Arc::ptr_eq(&self.commands, &commands) {
            return;
        }
        self.commands = commands;
        self.regroup();
        self.state.clamp_selection(self.groups.len());
    }

    fn regroup(&mut self) {
        let query = if self.config.filter_on_query {
            self.state.query.as_str()
        } else {
            ""
        };
        self.groups = CommandGroups::build(&self.commands, query, &self.config.default_category);
        // Row zones describe the old list until the next render.
        self.layout.items.clear();
    }

    // ============================================================
    // VISIBILITY
    // ============================================================

    /// Opens the panel.
    pub fn open_panel(&mut self) {
        if self.state.open() {
            tracing::debug!("command palette opened");
            self.after_transition();
        }
    }

    /// Closes the panel.
    pub fn close_panel(&mut self) {
        if self.state.close() {
            tracing::debug!("command palette closed");
            self.after_transition();
        }
    }

    /// Opens the panel if closed, closes it if open.
    pub fn toggle(&mut self) {
        if self.state.is_visible() {
            self.close_panel();
        } else {
            self.open_panel();
        }
    }

    /// Host-side visibility write.
    pub fn set_visible(&mut self, visible: bool) {
        if visible {
            self.open_panel();
        } else {
            self.close_panel();
        }
    }

    fn after_transition(&mut self) {
        // Query was reset; rebuild before the next render.
        self.regroup();
        self.layout = PaletteLayout::default();
        let visible = self.state.is_visible();
        self.binding.set(visible);
        self.binding_rx.mark_unchanged();
    }

    /// Applies pending hotkey presses and host writes to the visibility binding.
    pub fn sync(&mut self) {
        while self.subscription.try_next().is_some() {
            self.toggle();
        }

        if self.binding_rx.has_changed().unwrap_or(false) {
            let wanted = *self.binding_rx.borrow_and_update();
            if wanted != self.state.is_visible() {
                self.set_visible(wanted);
            }
        }
    }

    // ============================================================
    // INPUT
    // ============================================================

    /// Handles a key event while the panel is open.
    ///
    /// Returns [`EventOutcome::Ignored`] when closed or for keys the palette
    /// does not use.
    pub fn handle_key(&mut self, key: KeyEvent) -> EventOutcome {
        if !self.state.is_visible() {
            return EventOutcome::Ignored;
        }
        let Some(action) = map_key(&key) else {
            return EventOutcome::Ignored;
        };
        self.apply(action, Instant::now());
        EventOutcome::Consumed
    }

    /// Applies a palette action at time `now`.
    pub fn apply(&mut self, action: PaletteAction, now: Instant) {
        let count = self.groups.len();
        let page = self.layout.page_size.max(1);

        match action {
            PaletteAction::Close => self.close_panel(),
            PaletteAction::SelectPrev => self.state.select_prev(count, now),
            PaletteAction::SelectNext => self.state.select_next(count, now),
            PaletteAction::PageUp => self.state.page_up(count, page, now),
            PaletteAction::PageDown => self.state.page_down(count, page, now),
            PaletteAction::Execute => {
                if let Some(Err(err)) = self.execute_selected() {
                    tracing::warn!(error = %err, "command could not be started");
                }
            }
            PaletteAction::InsertChar(c) => {
                self.state.insert_char(c);
                self.regroup();
            }
            PaletteAction::Backspace => {
                if self.state.backspace() {
                    self.regroup();
                }
            }
            PaletteAction::Delete => {
                if self.state.delete() {
                    self.regroup();
                }
            }
            PaletteAction::ClearQuery => {
                if self.state.clear_query() {
                    self.regroup();
                }
            }
            PaletteAction::CursorLeft => self.state.cursor_left(),
            PaletteAction::CursorRight => self.state.cursor_right(),
            PaletteAction::CursorHome => self.state.cursor_home(),
            PaletteAction::CursorEnd => self.state.cursor_end(),
        }
    }

    /// Handles a mouse event while the panel is open.
    ///
    /// The open panel is modal: every mouse event is consumed. Hover selects,
    /// clicking a row runs it, clicking outside the panel closes it.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> EventOutcome {
        if !self.state.is_visible() {
            return EventOutcome::Ignored;
        }
        self.handle_mouse_at(mouse, Instant::now());
        EventOutcome::Consumed
    }

    fn handle_mouse_at(&mut self, mouse: MouseEvent, now: Instant) {
        let (x, y) = (mouse.column, mouse.row);
        let count = self.groups.len();

        match mouse.kind {
            MouseEventKind::Moved => {
                if let Some(index) = self.layout.item_at(x, y) {
                    self.state.hover(index, count, now);
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(index) = self.layout.item_at(x, y) {
                    if self.state.select(index, count)
                        && let Some(Err(err)) = self.execute_selected()
                    {
                        tracing::warn!(error = %err, "command could not be started");
                    }
                } else if !self.layout.contains(x, y) {
                    self.close_panel();
                }
            }
            MouseEventKind::ScrollDown if self.layout.contains(x, y) => {
                self.state.scroll_down(self.layout.max_scroll());
            }
            MouseEventKind::ScrollUp if self.layout.contains(x, y) => {
                self.state.scroll_up();
            }
            _ => {}
        }
    }

    // ============================================================
    // EXECUTION
    // ============================================================

    /// Runs the selected command and closes the panel.
    ///
    /// Returns `None` (and stays open) when nothing is selectable.
    pub fn execute_selected(&mut self) -> Option<Result<Invocation>> {
        let item = self.selected()?.clone();
        tracing::debug!(command = %item.id, "executing command");
        let result = invoke(&item);
        self.close_panel();
        Some(result)
    }
}

impl Widget for &mut CommandPalette {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.state.is_visible() {
            return;
        }
        self.layout = PaletteWidget::new(&self.commands, &self.groups)
            .size(self.config.width, self.config.height)
            .placeholder(&self.config.placeholder)
            .hint(&self.hotkey_label)
            .render_with_layout(area, buf, &mut self.state);
    }
}
