//! Command descriptors.
//!
//! A [`CommandItem`] is owned by the host application; the palette only reads
//! it. The attached [`CommandAction`] may be synchronous or asynchronous.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

// ============================================================
// COMMAND ACTION
// ============================================================

/// Future returned by an asynchronous command action.
pub type ActionFuture = BoxFuture<'static, anyhow::Result<()>>;

type SyncFn = dyn Fn() -> anyhow::Result<()> + Send + Sync;
type AsyncFn = dyn Fn() -> ActionFuture + Send + Sync;

/// Zero-argument handler invoked when a command is executed.
#[derive(Clone)]
pub enum CommandAction {
    /// Runs to completion on the UI task.
    Sync(Arc<SyncFn>),
    /// Produces a future that is spawned and not awaited.
    Async(Arc<AsyncFn>),
}

impl CommandAction {
    /// Wraps a synchronous closure.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::Sync(Arc::new(f))
    }

    /// Wraps a closure returning a future.
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self::Async(Arc::new(move || f().boxed()))
    }

    /// An action that does nothing.
    pub fn noop() -> Self {
        Self::sync(|| Ok(()))
    }

    /// Returns true for asynchronous actions.
    pub fn is_async(&self) -> bool {
        matches!(self, Self::Async(_))
    }
}

impl fmt::Debug for CommandAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync(_) => f.write_str("CommandAction::Sync(..)"),
            Self::Async(_) => f.write_str("CommandAction::Async(..)"),
        }
    }
}

// ============================================================
// COMMAND ITEM
// ============================================================

/// A user-invokable command shown in the palette.
#[derive(Debug, Clone)]
pub struct CommandItem {
    /// Identifier, expected to be unique (not enforced)
    pub id: String,
    /// Main display text
    pub title: String,
    /// Secondary text shown next to the title
    pub description: Option<String>,
    /// Short glyph rendered before the title
    pub icon: Option<String>,
    /// Grouping label; falls back to the configured default category
    pub category: Option<String>,
    /// Handler run on execution
    pub action: CommandAction,
}

impl CommandItem {
    /// Creates a command with only the required fields.
    pub fn new(id: impl Into<String>, title: impl Into<String>, action: CommandAction) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            icon: None,
            category: None,
            action,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the icon.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Sets the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Returns the category, or `default` when none was given.
    pub fn category_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.category.as_deref().unwrap_or(default)
    }

    /// Case-insensitive substring match against title, description and category.
    ///
    /// `query_lower` must already be lower-cased.
    pub fn matches(&self, query_lower: &str) -> bool {
        if query_lower.is_empty() {
            return true;
        }
        let hit = |text: &str| text.to_lowercase().contains(query_lower);
        hit(&self.title)
            || self.description.as_deref().is_some_and(hit)
            || self.category.as_deref().is_some_and(hit)
    }
}
