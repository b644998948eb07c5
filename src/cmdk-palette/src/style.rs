//! Palette colors.
//!
//! Ocean/cyan palette shared by the overlay and the host chrome.

use ratatui::style::{Color, Modifier, Style};

// ============================================================
// ACCENTS
// ============================================================

/// Primary accent (selection background, prompt)
pub const CYAN_PRIMARY: Color = Color::Rgb(0, 255, 163); // #00FFA3

/// Secondary accent (icons)
pub const SKY_BLUE: Color = Color::Rgb(100, 255, 180); // #64FFB4

// ============================================================
// SURFACES
// ============================================================

/// Deepest background, used as text color on the selection bar
pub const VOID: Color = Color::Rgb(10, 22, 40); // #0A1628

/// Panel background
pub const SURFACE_0: Color = Color::Rgb(13, 27, 42); // #0D1B2A

/// Dimmed detail text on the selection bar
pub const SURFACE_2: Color = Color::Rgb(36, 59, 83); // #243B53

// ============================================================
// TEXT
// ============================================================

/// Primary text
pub const TEXT: Color = Color::Rgb(255, 255, 255); // #FFFFFF

/// Descriptions
pub const TEXT_DIM: Color = Color::Rgb(130, 154, 177); // #829AB1

/// Category headers, hints, placeholder
pub const TEXT_MUTED: Color = Color::Rgb(72, 101, 129); // #486581

/// Error and warning text
pub const ERROR: Color = Color::Rgb(255, 107, 107); // #FF6B6B

// ============================================================
// BORDERS
// ============================================================

/// Separator lines
pub const BORDER: Color = Color::Rgb(27, 73, 101); // #1B4965

/// Panel frame
pub const BORDER_FOCUS: Color = Color::Rgb(0, 255, 163); // #00FFA3

// ============================================================
// COMPOSED STYLES
// ============================================================

/// Style of an unselected row.
pub fn row() -> Style {
    Style::default().fg(TEXT).bg(SURFACE_0)
}

/// Style of the selected row.
pub fn row_selected() -> Style {
    Style::default()
        .fg(VOID)
        .bg(CYAN_PRIMARY)
        .add_modifier(Modifier::BOLD)
}

/// Style of category headers and hints.
pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED).bg(SURFACE_0)
}
