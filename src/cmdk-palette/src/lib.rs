//! # cmdk palette
//!
//! A keyboard-driven command palette overlay for ratatui applications.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cmdk_palette::{CommandAction, CommandItem, CommandPalette, HotkeyRouter, PaletteConfig};
//!
//! let router = HotkeyRouter::new();
//! let commands = vec![
//!     CommandItem::new("open", "Open File", CommandAction::sync(|| Ok(())))
//!         .with_category("File"),
//! ];
//! let mut palette = CommandPalette::mount(commands, PaletteConfig::default(), &router)?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    Host event loop                       │
//! │                          │                               │
//! │   ┌──────────────────────▼────────────────────────────┐  │
//! │   │ HotkeyRouter   Ctrl/Cmd+K ─▶ HotkeySubscription   │  │
//! │   └──────────────────────┬────────────────────────────┘  │
//! │                          │ sync()                        │
//! │   ┌──────────────────────▼────────────────────────────┐  │
//! │   │ CommandPalette                                    │  │
//! │   │   PaletteState ◀── map_key / hover                │  │
//! │   │   CommandGroups (category order, flat indices)    │  │
//! │   │   invoke() ─▶ sync inline / async spawned         │  │
//! │   └──────────────────────┬────────────────────────────┘  │
//! │                          │ render                        │
//! │                   PaletteWidget                          │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Main Components
//!
//! - [`CommandPalette`] - Mounted component owning state and subscriptions
//! - [`CommandItem`] / [`CommandAction`] - Caller-supplied commands
//! - [`CommandGroups`] - Category grouping with stable flat indices
//! - [`PaletteState`] - Open/closed and selection state machine
//! - [`HotkeyRouter`] - Global hotkey fan-out with RAII subscriptions
//! - [`PaletteWidget`] - Overlay renderer

pub mod command;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod execute;
pub mod groups;
pub mod hotkey;
pub mod keys;
pub mod palette;
pub mod state;
pub mod style;
pub mod widget;

pub use command::{ActionFuture, CommandAction, CommandItem};
pub use config::PaletteConfig;
pub use dispatcher::{EventOutcome, PaletteAction, map_key};
pub use error::{PaletteError, Result};
pub use execute::{Invocation, invoke};
pub use groups::{CommandGroup, CommandGroups, DEFAULT_CATEGORY, GroupEntry};
pub use hotkey::{Hotkey, HotkeyRouter, HotkeySubscription};
pub use keys::{format_key, parse_key_string};
pub use palette::{CommandPalette, VisibilityBinding};
pub use state::PaletteState;
pub use widget::{ItemZone, PaletteLayout, PaletteWidget};
