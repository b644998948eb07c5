//! Command palette widget.
//!
//! Renders the overlay and records where each row landed so that mouse
//! events can be mapped back to commands. Pending focus and scroll requests
//! from the state are resolved here, during the render pass.

use ratatui::layout::Position;
use ratatui::prelude::*;
use ratatui::widgets::StatefulWidget;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::command::CommandItem;
use crate::groups::{CommandGroups, GroupEntry};
use crate::state::PaletteState;
use crate::style::{
    BORDER, BORDER_FOCUS, CYAN_PRIMARY, SKY_BLUE, SURFACE_0, SURFACE_2, TEXT, TEXT_DIM, VOID,
    muted, row, row_selected,
};

/// Smallest panel that is still drawn.
const MIN_WIDTH: u16 = 20;
const MIN_HEIGHT: u16 = 8;

const FOOTER_HINTS: &str = "[Up/Down] Navigate  [Enter] Run  [Esc] Close";

// ============================================================
// LAYOUT
// ============================================================

/// Screen region of one command row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemZone {
    /// Row bounds
    pub area: Rect,
    /// Index into the flattened list
    pub flat_index: usize,
}

/// Where the last render put things.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaletteLayout {
    /// Whole panel including border
    pub panel: Rect,
    /// Command rows currently on screen
    pub items: Vec<ItemZone>,
    /// Terminal cursor inside the search field, once focused
    pub cursor: Option<Position>,
    /// Number of list rows that fit in the viewport
    pub page_size: usize,
    /// Number of list rows (headers included)
    pub total_rows: usize,
}

impl PaletteLayout {
    /// Returns the flat index of the command row at `(x, y)`.
    pub fn item_at(&self, x: u16, y: u16) -> Option<usize> {
        let pos = Position::new(x, y);
        self.items
            .iter()
            .find(|zone| zone.area.contains(pos))
            .map(|zone| zone.flat_index)
    }

    /// Returns true if `(x, y)` lies on the panel.
    pub fn contains(&self, x: u16, y: u16) -> bool {
        self.panel.contains(Position::new(x, y))
    }

    /// Largest valid scroll offset.
    pub fn max_scroll(&self) -> usize {
        self.total_rows.saturating_sub(self.page_size)
    }
}

#[derive(Debug, Clone, Copy)]
enum ListRow<'a> {
    Header(&'a str),
    Item(GroupEntry),
}

fn list_rows(groups: &CommandGroups) -> Vec<ListRow<'_>> {
    let mut rows = Vec::with_capacity(groups.len() + groups.groups().len());
    for group in groups.groups() {
        rows.push(ListRow::Header(&group.name));
        rows.extend(group.entries.iter().copied().map(ListRow::Item));
    }
    rows
}

/// Returns the scroll offset that puts the selected row in view.
///
/// The first item of a category pulls its header into view with it.
fn scroll_into_view(rows: &[ListRow<'_>], selected: usize, offset: usize, page: usize) -> usize {
    let Some(row) = rows
        .iter()
        .position(|r| matches!(r, ListRow::Item(e) if e.flat_index == selected))
    else {
        return offset;
    };
    let top = if row > 0 && matches!(rows[row - 1], ListRow::Header(_)) {
        row - 1
    } else {
        row
    };

    if top < offset {
        top
    } else if row >= offset + page {
        row + 1 - page
    } else {
        offset
    }
}

/// Truncates `text` to at most `max_width` terminal cells.
fn truncate(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max_width {
            break;
        }
        width += w;
        out.push(c);
    }
    out
}

// ============================================================
// WIDGET
// ============================================================

/// Widget for rendering the command palette.
pub struct PaletteWidget<'a> {
    commands: &'a [CommandItem],
    groups: &'a CommandGroups,
    placeholder: &'a str,
    hint: &'a str,
    /// Max widget width
    width: u16,
    /// Max widget height
    height: u16,
}

impl<'a> PaletteWidget<'a> {
    /// Creates a palette widget over `commands` grouped as `groups`.
    pub fn new(commands: &'a [CommandItem], groups: &'a CommandGroups) -> Self {
        Self {
            commands,
            groups,
            placeholder: "",
            hint: "",
            width: 70,
            height: 20,
        }
    }

    /// Sets the maximum size of the palette.
    pub fn size(mut self, width: u16, height: u16) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the text shown while the query is empty.
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Sets the hotkey hint shown at the right of the search field.
    pub fn hint(mut self, hint: &'a str) -> Self {
        self.hint = hint;
        self
    }

    /// Centers the panel in `area`, or `None` if it does not fit.
    fn panel_area(&self, area: Rect) -> Option<Rect> {
        let width = self.width.min(area.width.saturating_sub(4));
        let height = self.height.min(area.height.saturating_sub(4));
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            return None;
        }
        let x = area.x + (area.width - width) / 2;
        let y = area.y + (area.height - height) / 2;
        Some(Rect::new(x, y, width, height))
    }

    /// Renders the palette and returns the resulting layout.
    pub fn render_with_layout(
        self,
        area: Rect,
        buf: &mut Buffer,
        state: &mut PaletteState,
    ) -> PaletteLayout {
        let Some(panel) = self.panel_area(area) else {
            return PaletteLayout::default();
        };

        let mut layout = PaletteLayout {
            panel,
            ..PaletteLayout::default()
        };

        state.take_focus_request();

        self.render_background(panel, buf);
        self.render_border(panel, buf);
        layout.cursor = self.render_input(panel, buf, state);
        self.render_items(panel, buf, state, &mut layout);
        self.render_footer(panel, buf);

        layout
    }

    fn render_background(&self, area: Rect, buf: &mut Buffer) {
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_char(' ').set_style(Style::default().bg(SURFACE_0));
                }
            }
        }
    }

    fn render_border(&self, area: Rect, buf: &mut Buffer) {
        let border_style = Style::default().fg(BORDER_FOCUS).bg(SURFACE_0);
        let right = area.right() - 1;
        let bottom = area.bottom() - 1;

        for x in (area.x + 1)..right {
            buf.set_string(x, area.y, "-", border_style);
            buf.set_string(x, bottom, "-", border_style);
        }
        for y in (area.y + 1)..bottom {
            buf.set_string(area.x, y, "|", border_style);
            buf.set_string(right, y, "|", border_style);
        }
        for (x, y) in [(area.x, area.y), (right, area.y), (area.x, bottom), (right, bottom)] {
            buf.set_string(x, y, "+", border_style);
        }
    }

    /// Draws the search field; returns the cursor position once focused.
    fn render_input(
        &self,
        area: Rect,
        buf: &mut Buffer,
        state: &PaletteState,
    ) -> Option<Position> {
        let y = area.y + 1;
        let text_x = area.x + 4;

        buf.set_string(
            area.x + 2,
            y,
            "> ",
            Style::default().fg(CYAN_PRIMARY).bg(SURFACE_0),
        );

        let hint = if self.hint.is_empty() {
            String::new()
        } else {
            format!("[{}]", self.hint)
        };
        let hint_width = hint.width() as u16;
        let hint_x = area.right().saturating_sub(hint_width + 2);
        let show_hint = !hint.is_empty() && hint_x > text_x + 10;

        let field_end = if show_hint {
            hint_x.saturating_sub(1)
        } else {
            area.right() - 2
        };
        let field_width = field_end.saturating_sub(text_x) as usize;

        if state.query.is_empty() {
            buf.set_string(text_x, y, truncate(self.placeholder, field_width), muted());
        } else {
            buf.set_string(
                text_x,
                y,
                truncate(&state.query, field_width),
                Style::default().fg(TEXT).bg(SURFACE_0),
            );
        }

        if show_hint {
            buf.set_string(hint_x, y, &hint, muted());
        }

        let sep_y = area.y + 2;
        for x in (area.x + 1)..(area.right() - 1) {
            buf.set_string(x, sep_y, "-", Style::default().fg(BORDER).bg(SURFACE_0));
        }

        if !state.is_input_focused() {
            return None;
        }

        let before_cursor = state
            .query
            .get(..state.cursor_pos)
            .unwrap_or(&state.query)
            .width()
            .min(field_width) as u16;
        let cursor_x = (text_x + before_cursor).min(field_end);
        if let Some(cell) = buf.cell_mut((cursor_x, y)) {
            cell.set_style(Style::default().fg(VOID).bg(CYAN_PRIMARY));
        }
        Some(Position::new(cursor_x, y))
    }

    fn render_items(
        &self,
        area: Rect,
        buf: &mut Buffer,
        state: &mut PaletteState,
        layout: &mut PaletteLayout,
    ) {
        let start_y = area.y + 3;
        let end_y = area.bottom().saturating_sub(2);
        if start_y >= end_y {
            return;
        }
        let item_width = area.width.saturating_sub(4);
        let page = (end_y - start_y) as usize;

        let rows = list_rows(self.groups);
        layout.page_size = page;
        layout.total_rows = rows.len();

        if rows.is_empty() {
            let message = if state.query.is_empty() {
                "No commands"
            } else {
                "No matching commands"
            };
            buf.set_string(area.x + 2, start_y, message, muted());
            return;
        }

        if state.take_scroll_request() {
            state.scroll_offset =
                scroll_into_view(&rows, state.selected_index, state.scroll_offset, page);
        }
        state.scroll_offset = state.scroll_offset.min(layout.max_scroll());

        for (row, y) in rows.iter().skip(state.scroll_offset).zip(start_y..end_y) {
            match row {
                ListRow::Header(name) => {
                    buf.set_string(
                        area.x + 2,
                        y,
                        truncate(name, item_width as usize),
                        muted(),
                    );
                }
                ListRow::Item(entry) => {
                    let Some(item) = self.commands.get(entry.command_index) else {
                        continue;
                    };
                    let selected = entry.flat_index == state.selected_index;
                    let zone = Rect::new(area.x + 2, y, item_width, 1);
                    self.render_item(zone, item, selected, buf);
                    layout.items.push(ItemZone {
                        area: zone,
                        flat_index: entry.flat_index,
                    });
                }
            }
        }
    }

    fn render_item(&self, zone: Rect, item: &CommandItem, selected: bool, buf: &mut Buffer) {
        let style = if selected { row_selected() } else { row() };

        for x in zone.left()..zone.right() {
            if let Some(cell) = buf.cell_mut((x, zone.y)) {
                cell.set_char(' ').set_style(style);
            }
        }

        let mut x = zone.x + 1;
        let right = zone.right().saturating_sub(1);

        if let Some(icon) = item.icon.as_deref() {
            let icon_style = if selected {
                style
            } else {
                Style::default().fg(SKY_BLUE).bg(SURFACE_0)
            };
            let icon = truncate(icon, 2);
            buf.set_string(x, zone.y, &icon, icon_style);
            x += icon.width() as u16 + 1;
        }

        let title = truncate(&item.title, right.saturating_sub(x) as usize);
        buf.set_string(x, zone.y, &title, style);
        x += title.width() as u16;

        if let Some(description) = item.description.as_deref() {
            let detail_style = if selected {
                Style::default().fg(SURFACE_2).bg(CYAN_PRIMARY)
            } else {
                Style::default().fg(TEXT_DIM).bg(SURFACE_0)
            };
            let detail_x = x + 2;
            let max_detail = right.saturating_sub(detail_x) as usize;
            if max_detail > 3 {
                buf.set_string(detail_x, zone.y, truncate(description, max_detail), detail_style);
            }
        }
    }

    fn render_footer(&self, area: Rect, buf: &mut Buffer) {
        let hint_y = area.bottom().saturating_sub(2);
        let inner = area.width.saturating_sub(2) as usize;
        let hints = truncate(FOOTER_HINTS, inner);
        let x = area.x + (area.width.saturating_sub(hints.width() as u16)) / 2;
        buf.set_string(x, hint_y, hints, muted());
    }
}

impl StatefulWidget for PaletteWidget<'_> {
    type State = PaletteState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        self.render_with_layout(area, buf, state);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::command::CommandAction;
    use crate::groups::DEFAULT_CATEGORY;

    fn commands(n: usize) -> Vec<CommandItem> {
        (0..n)
            .map(|i| {
                CommandItem::new(format!("cmd{i}"), format!("Command {i}"), CommandAction::noop())
                    .with_category(if i % 2 == 0 { "Even" } else { "Odd" })
                    .with_description(format!("Does thing {i}"))
            })
            .collect()
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (buf.area.left()..buf.area.right())
            .map(|x| buf[(x, y)].symbol())
            .collect()
    }

    fn screen(buf: &Buffer) -> String {
        (buf.area.top()..buf.area.bottom())
            .map(|y| row_text(buf, y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn open_state() -> PaletteState {
        let mut state = PaletteState::default();
        state.open();
        state
    }

    #[test]
    fn test_renders_groups_and_items() {
        let commands = commands(3);
        let groups = CommandGroups::build(&commands, "", DEFAULT_CATEGORY);
        let mut state = open_state();
        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 24));

        let layout = PaletteWidget::new(&commands, &groups)
            .placeholder("Search")
            .hint("Ctrl+K")
            .render_with_layout(buf.area, &mut buf, &mut state);

        let text = screen(&buf);
        assert!(text.contains("Even"));
        assert!(text.contains("Odd"));
        assert!(text.contains("Command 2"));
        assert!(text.contains("Does thing 1"));
        assert!(text.contains("Search"));
        assert!(text.contains("[Ctrl+K]"));
        assert!(text.contains("[Enter] Run"));
        assert_eq!(layout.items.len(), 3);
        assert_eq!(layout.total_rows, 5);
    }

    #[test]
    fn test_layout_maps_rows_to_flat_indices() {
        let commands = commands(3);
        let groups = CommandGroups::build(&commands, "", DEFAULT_CATEGORY);
        let mut state = open_state();
        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 24));

        let layout = PaletteWidget::new(&commands, &groups)
            .render_with_layout(buf.area, &mut buf, &mut state);

        for zone in &layout.items {
            assert_eq!(
                layout.item_at(zone.area.x + 1, zone.area.y),
                Some(zone.flat_index)
            );
        }
        // Display order: Even(0, 2) then Odd(1)
        let order: Vec<usize> = layout.items.iter().map(|z| z.flat_index).collect();
        assert_eq!(order, vec![0, 1, 2]);
        assert!(layout.contains(layout.panel.x, layout.panel.y));
        assert!(!layout.contains(0, 0));
        assert_eq!(layout.item_at(0, 0), None);
    }

    #[test]
    fn test_focus_resolved_on_render() {
        let commands = commands(1);
        let groups = CommandGroups::build(&commands, "", DEFAULT_CATEGORY);
        let mut state = open_state();
        assert!(!state.is_input_focused());

        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 24));
        let layout = PaletteWidget::new(&commands, &groups)
            .render_with_layout(buf.area, &mut buf, &mut state);

        assert!(state.is_input_focused());
        let cursor = layout.cursor.expect("cursor placed in search field");
        assert_eq!(cursor.y, layout.panel.y + 1);
    }

    #[test]
    fn test_cursor_after_multibyte_query() {
        let commands = commands(1);
        let groups = CommandGroups::build(&commands, "", DEFAULT_CATEGORY);
        let mut state = open_state();
        state.insert_char('日');
        state.insert_char('x');
        state.cursor_left();
        assert_eq!(state.cursor_pos(), '日'.len_utf8());

        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 24));
        let layout = PaletteWidget::new(&commands, &groups)
            .render_with_layout(buf.area, &mut buf, &mut state);
        let cursor = layout.cursor.expect("cursor placed in search field");
        assert_eq!(cursor.x, layout.panel.x + 4 + 2);

        // An offset inside a character falls back to the end of the query.
        state.cursor_pos = 1;
        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 24));
        let layout = PaletteWidget::new(&commands, &groups)
            .render_with_layout(buf.area, &mut buf, &mut state);
        let cursor = layout.cursor.expect("cursor placed in search field");
        assert_eq!(cursor.x, layout.panel.x + 4 + 3);
    }

    #[test]
    fn test_scroll_follows_keyboard_selection() {
        let commands = commands(30);
        let groups = CommandGroups::build(&commands, "", DEFAULT_CATEGORY);
        let mut state = open_state();
        let area = Rect::new(0, 0, 80, 16);
        let widget = || PaletteWidget::new(&commands, &groups).size(60, 12);

        let mut buf = Buffer::empty(area);
        let layout = widget().render_with_layout(area, &mut buf, &mut state);
        let page = layout.page_size;
        assert!(page < groups.len());

        let now = Instant::now();
        for _ in 0..groups.len() {
            state.select_next(groups.len(), now);
            let mut buf = Buffer::empty(area);
            let layout = widget().render_with_layout(area, &mut buf, &mut state);
            assert!(
                layout
                    .items
                    .iter()
                    .any(|z| z.flat_index == state.selected_index),
                "selection {} scrolled out of view",
                state.selected_index
            );
        }
        assert_eq!(state.selected_index, groups.len() - 1);
        assert!(state.scroll_offset > 0);

        for _ in 0..groups.len() {
            state.select_prev(groups.len(), now);
            let mut buf = Buffer::empty(area);
            widget().render_with_layout(area, &mut buf, &mut state);
        }
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn test_empty_results_message() {
        let commands = commands(2);
        let groups = CommandGroups::build(&commands, "zzz", DEFAULT_CATEGORY);
        let mut state = open_state();
        state.insert_char('z');

        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 24));
        let layout = PaletteWidget::new(&commands, &groups)
            .render_with_layout(buf.area, &mut buf, &mut state);

        assert!(screen(&buf).contains("No matching commands"));
        assert!(layout.items.is_empty());
    }

    #[test]
    fn test_too_small_area_renders_nothing() {
        let commands = commands(2);
        let groups = CommandGroups::build(&commands, "", DEFAULT_CATEGORY);
        let mut state = open_state();
        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 6));

        let layout = PaletteWidget::new(&commands, &groups)
            .render_with_layout(buf.area, &mut buf, &mut state);

        assert_eq!(layout, PaletteLayout::default());
        assert!(screen(&buf).trim().is_empty());
    }

    #[test]
    fn test_truncate_respects_cell_width() {
        assert_eq!(truncate("hello", 3), "hel");
        assert_eq!(truncate("日本語", 4), "日本");
        assert_eq!(truncate("ok", 10), "ok");
    }

    #[test]
    fn test_scroll_into_view_keeps_header() {
        let commands = commands(4);
        let groups = CommandGroups::build(&commands, "", DEFAULT_CATEGORY);
        let rows = list_rows(&groups);
        // rows: Even, 0, 2, Odd, 1, 3 ; flat: 0,1 | 2,3
        assert_eq!(scroll_into_view(&rows, 2, 5, 2), 3);
        assert_eq!(scroll_into_view(&rows, 3, 0, 2), 4);
        assert_eq!(scroll_into_view(&rows, 1, 1, 2), 1);
    }
}
