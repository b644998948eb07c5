//! Command palette state management.
//!
//! Visibility, query editing and selection. The state never sees the command
//! list itself; callers pass the current number of visible commands so the
//! selection can be clamped against it.

use std::time::{Duration, Instant};

/// State for the command palette widget.
#[derive(Debug, Clone)]
pub struct PaletteState {
    /// Whether the panel is open
    visible: bool,
    /// Current search query
    pub(crate) query: String,
    /// Cursor position within query (byte offset)
    pub(crate) cursor_pos: usize,
    /// Currently selected index into the flattened list
    pub(crate) selected_index: usize,
    /// First list row shown in the viewport
    pub(crate) scroll_offset: usize,
    /// Hover is ignored until this instant
    keyboard_nav_until: Option<Instant>,
    /// Length of the keyboard navigation window
    nav_grace: Duration,
    /// Focus the search field on the next render
    focus_pending: bool,
    /// Bring the selection into view on the next render
    scroll_pending: bool,
    /// Search field owns the cursor
    input_focused: bool,
}

impl Default for PaletteState {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

impl PaletteState {
    /// Creates a closed palette state.
    pub fn new(nav_grace: Duration) -> Self {
        Self {
            visible: false,
            query: String::new(),
            cursor_pos: 0,
            selected_index: 0,
            scroll_offset: 0,
            keyboard_nav_until: None,
            nav_grace,
            focus_pending: false,
            scroll_pending: false,
            input_focused: false,
        }
    }

    /// Returns true while the panel is open.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Current search query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Cursor position within the query, as a byte offset on a char boundary.
    pub fn cursor_pos(&self) -> usize {
        self.cursor_pos
    }

    /// Selected index into the flattened list.
    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// First list row shown in the viewport.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Opens the panel. Returns false if it was already open.
    pub fn open(&mut self) -> bool {
        if self.visible {
            return false;
        }
        self.visible = true;
        self.reset();
        self.focus_pending = true;
        true
    }

    /// Closes the panel. Returns false if it was already closed.
    pub fn close(&mut self) -> bool {
        if !self.visible {
            return false;
        }
        self.visible = false;
        self.reset();
        self.input_focused = false;
        true
    }

    /// Flips visibility; returns the new value.
    pub fn toggle(&mut self) -> bool {
        if self.visible {
            self.close();
        } else {
            self.open();
        }
        self.visible
    }

    fn reset(&mut self) {
        self.query.clear();
        self.cursor_pos = 0;
        self.selected_index = 0;
        self.scroll_offset = 0;
        self.keyboard_nav_until = None;
        self.scroll_pending = false;
    }

    // ============================================================
    // SELECTION
    // ============================================================

    /// Moves selection down, stopping at the last item.
    pub fn select_next(&mut self, count: usize, now: Instant) {
        if count == 0 {
            return;
        }
        self.move_to((self.selected_index + 1).min(count - 1), now);
    }

    /// Moves selection up, stopping at the first item.
    pub fn select_prev(&mut self, count: usize, now: Instant) {
        if count == 0 {
            return;
        }
        self.move_to(self.selected_index.saturating_sub(1).min(count - 1), now);
    }

    /// Moves selection down by `page` items.
    pub fn page_down(&mut self, count: usize, page: usize, now: Instant) {
        if count == 0 {
            return;
        }
        let target = self.selected_index.saturating_add(page.max(1));
        self.move_to(target.min(count - 1), now);
    }

    /// Moves selection up by `page` items.
    pub fn page_up(&mut self, count: usize, page: usize, now: Instant) {
        if count == 0 {
            return;
        }
        let target = self.selected_index.saturating_sub(page.max(1));
        self.move_to(target.min(count - 1), now);
    }

    fn move_to(&mut self, index: usize, now: Instant) {
        self.selected_index = index;
        self.keyboard_nav_until = Some(now + self.nav_grace);
        self.scroll_pending = true;
    }

    /// Selects `index` in response to pointer hover.
    ///
    /// Ignored while a keyboard move is still inside its grace window.
    /// Returns true if the selection changed.
    pub fn hover(&mut self, index: usize, count: usize, now: Instant) -> bool {
        if !self.visible || index >= count || self.is_keyboard_nav(now) {
            return false;
        }
        let changed = self.selected_index != index;
        self.selected_index = index;
        changed
    }

    /// Selects `index` in response to a click. Returns false if out of range.
    pub fn select(&mut self, index: usize, count: usize) -> bool {
        if !self.visible || index >= count {
            return false;
        }
        self.selected_index = index;
        true
    }

    /// Scrolls the viewport one row down, up to `max`.
    pub fn scroll_down(&mut self, max: usize) {
        self.scroll_offset = (self.scroll_offset + 1).min(max);
    }

    /// Scrolls the viewport one row up.
    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    /// Returns true while hover must not override a keyboard move.
    pub fn is_keyboard_nav(&self, now: Instant) -> bool {
        self.keyboard_nav_until.is_some_and(|until| now < until)
    }

    /// Pulls `selected_index` back into `[0, count-1]`.
    pub fn clamp_selection(&mut self, count: usize) {
        if count == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= count {
            self.selected_index = count - 1;
        }
    }

    // ============================================================
    // QUERY EDITING
    // ============================================================

    /// Inserts a character at the cursor position.
    pub fn insert_char(&mut self, c: char) {
        self.query.insert(self.cursor_pos, c);
        self.cursor_pos += c.len_utf8();
        self.on_query_changed();
    }

    /// Deletes the character before the cursor. Returns true if the query changed.
    pub fn backspace(&mut self) -> bool {
        if self.cursor_pos == 0 {
            return false;
        }
        let prev_pos = self.query[..self.cursor_pos]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0);
        self.query.remove(prev_pos);
        self.cursor_pos = prev_pos;
        self.on_query_changed();
        true
    }

    /// Deletes the character at the cursor. Returns true if the query changed.
    pub fn delete(&mut self) -> bool {
        if self.cursor_pos >= self.query.len() {
            return false;
        }
        self.query.remove(self.cursor_pos);
        self.on_query_changed();
        true
    }

    /// Clears the query. Returns true if it was non-empty.
    pub fn clear_query(&mut self) -> bool {
        if self.query.is_empty() {
            return false;
        }
        self.query.clear();
        self.cursor_pos = 0;
        self.on_query_changed();
        true
    }

    /// Moves the cursor left.
    pub fn cursor_left(&mut self) {
        if self.cursor_pos > 0 {
            self.cursor_pos = self.query[..self.cursor_pos]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    /// Moves the cursor right.
    pub fn cursor_right(&mut self) {
        if self.cursor_pos < self.query.len() {
            self.cursor_pos = self.query[self.cursor_pos..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_pos + i)
                .unwrap_or(self.query.len());
        }
    }

    /// Moves the cursor to the start.
    pub fn cursor_home(&mut self) {
        self.cursor_pos = 0;
    }

    /// Moves the cursor to the end.
    pub fn cursor_end(&mut self) {
        self.cursor_pos = self.query.len();
    }

    fn on_query_changed(&mut self) {
        self.selected_index = 0;
        self.scroll_offset = 0;
        self.scroll_pending = false;
    }

    // ============================================================
    // RENDER HANDSHAKE
    // ============================================================

    /// Consumes a pending focus request.
    pub(crate) fn take_focus_request(&mut self) -> bool {
        if self.focus_pending {
            self.focus_pending = false;
            self.input_focused = true;
            true
        } else {
            false
        }
    }

    /// Consumes a pending scroll-into-view request.
    pub(crate) fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_pending)
    }

    /// Returns true once the search field has received focus.
    pub fn is_input_focused(&self) -> bool {
        self.input_focused
    }

    /// Returns true if a scroll-into-view is waiting for the next render.
    pub fn has_scroll_request(&self) -> bool {
        self.scroll_pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_state() -> PaletteState {
        let mut state = PaletteState::default();
        state.open();
        state
    }

    #[test]
    fn test_state_new() {
        let state = PaletteState::default();
        assert!(!state.is_visible());
        assert!(state.query.is_empty());
        assert_eq!(state.cursor_pos, 0);
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn test_open_resets_query_and_selection() {
        let mut state = open_state();
        state.insert_char('x');
        state.select_next(5, Instant::now());
        state.close();

        state.query = "stale".to_string();
        state.selected_index = 3;
        assert!(state.open());
        assert!(state.query.is_empty());
        assert_eq!(state.selected_index, 0);
        assert!(!state.open());
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut state = open_state();
        state.insert_char('q');
        assert!(state.close());
        assert!(state.query.is_empty());
        assert!(!state.close());
        assert!(!state.is_visible());
    }

    #[test]
    fn test_toggle_twice_restores_visibility() {
        let mut state = PaletteState::default();
        assert!(state.toggle());
        assert!(!state.toggle());
        assert!(!state.is_visible());
    }

    #[test]
    fn test_selection_clamps_at_bounds() {
        let mut state = open_state();
        let now = Instant::now();

        for _ in 0..10 {
            state.select_next(3, now);
            assert!(state.selected_index <= 2);
        }
        assert_eq!(state.selected_index, 2);

        for _ in 0..10 {
            state.select_prev(3, now);
        }
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn test_selection_on_empty_list() {
        let mut state = open_state();
        state.select_next(0, Instant::now());
        state.select_prev(0, Instant::now());
        state.page_down(0, 5, Instant::now());
        assert_eq!(state.selected_index, 0);
        assert!(!state.has_scroll_request());
    }

    #[test]
    fn test_paging() {
        let mut state = open_state();
        let now = Instant::now();
        state.page_down(12, 5, now);
        assert_eq!(state.selected_index, 5);
        state.page_down(12, 5, now);
        state.page_down(12, 5, now);
        assert_eq!(state.selected_index, 11);
        state.page_up(12, 5, now);
        assert_eq!(state.selected_index, 6);
        state.page_up(12, 50, now);
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn test_hover_suppressed_during_keyboard_nav() {
        let mut state = open_state();
        let now = Instant::now();

        state.select_next(5, now);
        assert!(state.is_keyboard_nav(now));
        assert!(!state.hover(4, 5, now + Duration::from_millis(50)));
        assert_eq!(state.selected_index, 1);

        let later = now + Duration::from_millis(150);
        assert!(!state.is_keyboard_nav(later));
        assert!(state.hover(4, 5, later));
        assert_eq!(state.selected_index, 4);
    }

    #[test]
    fn test_select_rejects_out_of_range() {
        let mut state = open_state();
        assert!(state.select(2, 3));
        assert_eq!(state.selected_index(), 2);
        assert!(!state.select(3, 3));
        assert_eq!(state.selected_index(), 2);

        state.close();
        assert!(!state.select(0, 3));
    }

    #[test]
    fn test_scroll_up_and_down_stay_in_range() {
        let mut state = open_state();
        state.scroll_up();
        assert_eq!(state.scroll_offset(), 0);
        for _ in 0..5 {
            state.scroll_down(2);
        }
        assert_eq!(state.scroll_offset(), 2);
    }

    #[test]
    fn test_hover_out_of_range_or_closed() {
        let mut state = PaletteState::default();
        assert!(!state.hover(0, 3, Instant::now()));

        state.open();
        assert!(!state.hover(3, 3, Instant::now()));
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn test_keyboard_move_requests_scroll() {
        let mut state = open_state();
        state.select_next(3, Instant::now());
        assert!(state.has_scroll_request());
        assert!(state.take_scroll_request());
        assert!(!state.take_scroll_request());
    }

    #[test]
    fn test_open_requests_focus() {
        let mut state = PaletteState::default();
        assert!(!state.take_focus_request());
        state.open();
        assert!(!state.is_input_focused());
        assert!(state.take_focus_request());
        assert!(state.is_input_focused());
        state.close();
        assert!(!state.is_input_focused());
    }

    #[test]
    fn test_query_edit_resets_selection() {
        let mut state = open_state();
        state.select_next(5, Instant::now());
        state.select_next(5, Instant::now());
        state.insert_char('a');
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn test_state_backspace() {
        let mut state = open_state();
        for c in "help".chars() {
            state.insert_char(c);
        }

        assert!(state.backspace());
        assert_eq!(state.query, "hel");
        assert_eq!(state.cursor_pos, 3);

        state.cursor_home();
        assert!(!state.backspace());
        assert_eq!(state.query, "hel");
    }

    #[test]
    fn test_state_delete() {
        let mut state = open_state();
        for c in "help".chars() {
            state.insert_char(c);
        }
        state.cursor_home();
        assert!(state.delete());
        assert_eq!(state.query, "elp");
        state.cursor_end();
        assert!(!state.delete());
    }

    #[test]
    fn test_cursor_movement_is_utf8_aware() {
        let mut state = open_state();
        for c in "aé✓".chars() {
            state.insert_char(c);
        }
        assert_eq!(state.cursor_pos, "aé✓".len());

        state.cursor_left();
        assert_eq!(state.cursor_pos, "aé".len());
        state.cursor_left();
        assert_eq!(state.cursor_pos, 1);
        state.cursor_right();
        assert_eq!(state.cursor_pos, "aé".len());

        assert!(state.backspace());
        assert_eq!(state.query, "a✓");
    }

    #[test]
    fn test_clear_query() {
        let mut state = open_state();
        assert!(!state.clear_query());
        state.insert_char('z');
        assert!(state.clear_query());
        assert!(state.query.is_empty());
        assert_eq!(state.cursor_pos, 0);
    }

    #[test]
    fn test_clamp_selection() {
        let mut state = open_state();
        state.selected_index = 7;
        state.clamp_selection(3);
        assert_eq!(state.selected_index, 2);
        state.clamp_selection(0);
        assert_eq!(state.selected_index, 0);
    }
}
