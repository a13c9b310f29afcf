//! Bookmark outline as a flat arena.
//!
//! Backends hand over a nested [`OutlineNode`] tree; the panel walks the
//! flattened form iteratively, skipping collapsed subtrees by index.

use super::backend::OutlineNode;

/// A single outline entry in pre-order position
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineEntry {
    pub title: String,
    /// Target page (0-indexed)
    pub page: Option<usize>,
    /// Nesting level (0 = top level)
    pub depth: usize,
    /// One past the last descendant of this entry
    pub subtree_end: usize,
}

impl OutlineEntry {
    #[must_use]
    pub fn has_children(&self, index: usize) -> bool {
        self.subtree_end > index + 1
    }
}

#[derive(Clone, Debug, Default)]
pub struct OutlineTree {
    entries: Vec<OutlineEntry>,
}

impl OutlineTree {
    #[must_use]
    pub fn from_nodes(nodes: &[OutlineNode]) -> Self {
        let mut entries: Vec<OutlineEntry> = Vec::new();
        // (node, depth, index of the entry pushed for it once its children are done)
        let mut stack: Vec<(&OutlineNode, usize, Option<usize>)> = nodes
            .iter()
            .rev()
            .map(|node| (node, 0, None))
            .collect();

        while let Some((node, depth, pushed)) = stack.pop() {
            if let Some(index) = pushed {
                let end = entries.len();
                if let Some(entry) = entries.get_mut(index) {
                    entry.subtree_end = end;
                }
                continue;
            }

            let index = entries.len();
            entries.push(OutlineEntry {
                title: node.title.trim().to_string(),
                page: node.page,
                depth,
                subtree_end: index + 1,
            });
            stack.push((node, depth, Some(index)));
            for child in node.children.iter().rev() {
                stack.push((child, depth + 1, None));
            }
        }

        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[OutlineEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&OutlineEntry> {
        self.entries.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Indices of the entries shown when only `is_expanded` entries open
    pub fn visible(&self, is_expanded: impl Fn(usize) -> bool) -> Vec<usize> {
        let mut rows = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            rows.push(i);
            let entry = &self.entries[i];
            i = if is_expanded(i) {
                i + 1
            } else {
                entry.subtree_end
            };
        }
        rows
    }
}
