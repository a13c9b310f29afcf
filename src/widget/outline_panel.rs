//! Bookmark outline panel

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::pdf::OutlineTree;
use crate::theme::Base16Palette;

/// Expansion and selection state over an [`OutlineTree`].
///
/// Entries start collapsed. `selected_index` is a position in the visible
/// rows, not in the tree.
pub struct OutlinePanel {
    tree: OutlineTree,
    expanded: Vec<bool>,
    pub selected_index: usize,
    pub list_state: ListState,
}

impl OutlinePanel {
    pub fn new(tree: OutlineTree) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));

        Self {
            expanded: vec![false; tree.len()],
            tree,
            selected_index: 0,
            list_state,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Tree indices of the rows currently shown, top to bottom
    pub fn visible_rows(&self) -> Vec<usize> {
        self.tree
            .visible(|index| self.expanded.get(index).copied().unwrap_or(false))
    }

    fn selected_entry(&self) -> Option<usize> {
        self.visible_rows().get(self.selected_index).copied()
    }

    pub fn select_next(&mut self) {
        let rows = self.visible_rows().len();
        if self.selected_index + 1 < rows {
            self.selected_index += 1;
            self.list_state.select(Some(self.selected_index));
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.list_state.select(Some(self.selected_index));
        }
    }

    /// Expand or collapse the selected entry
    pub fn toggle(&mut self) {
        if let Some(index) = self.selected_entry() {
            self.set_expanded(index, !self.is_expanded(index));
        }
    }

    pub fn expand(&mut self) {
        if let Some(index) = self.selected_entry() {
            self.set_expanded(index, true);
        }
    }

    /// Collapse the selected entry, or jump to its parent when it is
    /// already collapsed
    pub fn collapse(&mut self) {
        let Some(index) = self.selected_entry() else {
            return;
        };
        if self.is_expanded(index) {
            self.set_expanded(index, false);
            return;
        }

        let rows = self.visible_rows();
        let depth = self.tree.get(index).map_or(0, |e| e.depth);
        if depth == 0 {
            return;
        }
        if let Some(parent_row) = rows[..self.selected_index]
            .iter()
            .rposition(|&i| self.tree.get(i).is_some_and(|e| e.depth < depth))
        {
            self.selected_index = parent_row;
            self.list_state.select(Some(parent_row));
        }
    }

    fn is_expanded(&self, index: usize) -> bool {
        self.expanded.get(index).copied().unwrap_or(false)
    }

    fn set_expanded(&mut self, index: usize, expanded: bool) {
        let has_children = self
            .tree
            .get(index)
            .is_some_and(|e| e.has_children(index));
        if let Some(flag) = self.expanded.get_mut(index) {
            *flag = expanded && has_children;
        }
    }

    /// Target page of the selected entry
    pub fn activate(&self) -> Option<usize> {
        self.selected_entry()
            .and_then(|index| self.tree.get(index))
            .and_then(|entry| entry.page)
    }

    pub fn render(
        &mut self,
        f: &mut Frame,
        area: Rect,
        is_focused: bool,
        palette: &Base16Palette,
        current_page: usize,
    ) {
        let (text_color, border_color, _bg_color) = palette.get_panel_colors(is_focused);
        let (selection_bg, selection_fg) = palette.get_selection_colors(is_focused);

        let items: Vec<ListItem> = self
            .visible_rows()
            .into_iter()
            .filter_map(|index| {
                let entry = self.tree.get(index)?;
                let icon = if !entry.has_children(index) {
                    " "
                } else if self.is_expanded(index) {
                    "▼"
                } else {
                    "▶"
                };
                let style = if entry.page == Some(current_page) {
                    Style::default().fg(palette.base_08)
                } else if entry.page.is_none() {
                    Style::default().fg(palette.base_03)
                } else {
                    Style::default().fg(text_color)
                };
                let indent = "  ".repeat(entry.depth);
                Some(ListItem::new(Line::from(vec![Span::styled(
                    format!("{indent}{icon} {}", entry.title),
                    style,
                )])))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Bookmarks")
                    .border_style(Style::default().fg(border_color))
                    .style(Style::default().bg(palette.base_00)),
            )
            .highlight_style(Style::default().bg(selection_bg).fg(selection_fg))
            .style(Style::default().bg(palette.base_00));

        f.render_stateful_widget(list, area, &mut self.list_state);
    }
}
