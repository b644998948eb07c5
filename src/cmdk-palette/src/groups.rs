//! Category grouping and the flattened navigation list.
//!
//! Commands are grouped by category in first-seen order, keeping input order
//! inside each category. Flat indices are handed out while grouping, so the
//! flattened list and the grouped view always agree and duplicate command ids
//! never make an index ambiguous.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::command::CommandItem;

/// Category used when a command does not declare one.
pub const DEFAULT_CATEGORY: &str = "Other";

/// One visible command inside a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupEntry {
    /// Position in the flattened list (display order)
    pub flat_index: usize,
    /// Position in the caller's command slice
    pub command_index: usize,
}

/// A category and its visible commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandGroup {
    /// Category name
    pub name: String,
    /// Commands in this category, in input order
    pub entries: Vec<GroupEntry>,
}

/// Grouped and flattened view of a command list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandGroups {
    groups: Vec<CommandGroup>,
    /// flat index -> command index
    flat: Vec<usize>,
}

impl CommandGroups {
    /// Groups `commands`, keeping only those matching `query`.
    ///
    /// An empty query keeps everything.
    pub fn build(commands: &[CommandItem], query: &str, default_category: &str) -> Self {
        let query_lower = query.trim().to_lowercase();

        let mut by_category: IndexMap<&str, Vec<usize>> = IndexMap::new();
        let mut seen_ids = HashSet::new();
        for (idx, item) in commands.iter().enumerate() {
            if !seen_ids.insert(item.id.as_str()) {
                tracing::debug!(id = %item.id, "duplicate command id");
            }
            if !item.matches(&query_lower) {
                continue;
            }
            by_category
                .entry(item.category_or(default_category))
                .or_default()
                .push(idx);
        }

        let mut groups = Vec::with_capacity(by_category.len());
        let mut flat = Vec::new();
        for (name, indices) in by_category {
            let entries = indices
                .into_iter()
                .map(|command_index| {
                    let flat_index = flat.len();
                    flat.push(command_index);
                    GroupEntry {
                        flat_index,
                        command_index,
                    }
                })
                .collect();
            groups.push(CommandGroup {
                name: name.to_string(),
                entries,
            });
        }

        Self { groups, flat }
    }

    /// Returns the groups in display order.
    pub fn groups(&self) -> &[CommandGroup] {
        &self.groups
    }

    /// Returns command indices in display order.
    pub fn flattened(&self) -> &[usize] {
        &self.flat
    }

    /// Number of visible commands.
    pub fn len(&self) -> usize {
        self.flat.len()
    }

    /// Returns true if no command is visible.
    pub fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }

    /// Maps a flat index to the caller's command index.
    pub fn command_index(&self, flat_index: usize) -> Option<usize> {
        self.flat.get(flat_index).copied()
    }
}
