//! Entity list panels
//!
//! One widget draws the file, branch, commit and stash panels; the row
//! builders below turn each entity into a styled line.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, List, ListItem, ListState, StatefulWidget, Widget},
};

use crate::git::{Branch, Commit, Stash, WorkspaceFile};
use crate::tui::animation::{SyncAnimation, SyncKind};
use crate::tui::theme::Theme;

/// Bordered list of entity rows with one highlighted selection
pub struct EntityList<'a> {
    rows: Vec<ListItem<'a>>,
    selected: usize,
    focused: bool,
    theme: &'a Theme,
    block: Option<Block<'a>>,
}

impl<'a> EntityList<'a> {
    pub fn new(rows: Vec<ListItem<'a>>, selected: usize, theme: &'a Theme) -> Self {
        Self {
            rows,
            selected,
            focused: false,
            theme,
            block: None,
        }
    }

    /// Set the block
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Background-only highlight, so a row's own foreground survives
    fn highlight_style(&self) -> Style {
        let style = Style::default().bg(self.theme.selection_bg);
        if self.focused {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }
}

impl Widget for EntityList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let has_rows = !self.rows.is_empty();
        let mut list_state = ListState::default();
        if has_rows {
            list_state.select(Some(self.selected));
        }

        let highlight = self.highlight_style();
        let mut list = List::new(self.rows).highlight_style(highlight);
        if let Some(block) = self.block {
            list = list.block(block);
        }

        StatefulWidget::render(list, area, buf, &mut list_state);
    }
}

pub fn file_rows<'a>(files: &'a [WorkspaceFile], theme: &Theme) -> Vec<ListItem<'a>> {
    files
        .iter()
        .map(|file| {
            let status_style = match file.status {
                'A' | '?' => Style::default().fg(theme.diff_added),
                'D' => Style::default().fg(theme.diff_removed),
                _ => Style::default().fg(theme.text_accent),
            };
            let path_style = if file.marked {
                Style::default()
                    .fg(theme.marked_file)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text_primary)
            };
            let mark = if file.marked { "● " } else { "  " };

            ListItem::new(Line::from(vec![
                Span::styled(mark, Style::default().fg(theme.marked_file)),
                Span::styled(file.status.to_string(), status_style),
                Span::raw(" "),
                Span::styled(file.path.as_str(), path_style),
            ]))
        })
        .collect()
}

/// Branch rows; `active` mirrors the push/pull animation on one row
pub fn branch_rows<'a>(
    branches: &'a [Branch],
    active: Option<usize>,
    sync: &SyncAnimation,
    theme: &Theme,
) -> Vec<ListItem<'a>> {
    let mirrored = matches!(
        sync.kind(),
        SyncKind::Pushing | SyncKind::Pushed | SyncKind::Pulling | SyncKind::Pulled
    );

    branches
        .iter()
        .enumerate()
        .map(|(i, branch)| {
            let (marker, name_style) = if branch.is_current {
                (
                    "* ",
                    Style::default()
                        .fg(theme.text_branch)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ("  ", Style::default().fg(theme.text_primary))
            };

            let mut spans = vec![
                Span::styled(marker, name_style),
                Span::styled(branch.name.as_str(), name_style),
            ];
            if branch.ahead > 0 {
                spans.push(Span::styled(
                    format!(" ↑{}", branch.ahead),
                    Style::default().fg(theme.diff_added),
                ));
            }
            if branch.behind > 0 {
                spans.push(Span::styled(
                    format!(" ↓{}", branch.behind),
                    Style::default().fg(theme.diff_removed),
                ));
            }
            if mirrored && active == Some(i) {
                let text = sync.display_text();
                if !text.is_empty() {
                    spans.push(Span::styled(format!(" {}", text), theme.sync(sync.kind())));
                }
            }

            ListItem::new(Line::from(spans))
        })
        .collect()
}

pub fn commit_rows<'a>(commits: &'a [Commit], theme: &Theme) -> Vec<ListItem<'a>> {
    commits
        .iter()
        .map(|commit| {
            // unpushed hashes stand out
            let hash_style = if commit.pushed {
                Style::default().fg(theme.text_secondary)
            } else {
                Style::default().fg(theme.sync_progress)
            };
            ListItem::new(Line::from(vec![
                Span::styled(commit.hash.as_str(), hash_style),
                Span::raw(" "),
                Span::styled(commit.initials.as_str(), Style::default().fg(theme.text_accent)),
                Span::raw(" "),
                Span::raw(commit.title.as_str()),
            ]))
        })
        .collect()
}

pub fn stash_rows<'a>(stashes: &'a [Stash], theme: &Theme) -> Vec<ListItem<'a>> {
    stashes
        .iter()
        .map(|stash| {
            ListItem::new(Line::from(Span::styled(
                stash.description.as_str(),
                Style::default().fg(theme.text_primary),
            )))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn test_selected_marked_row_keeps_foreground() {
        let theme = Theme::basic();
        let mut files = vec![
            WorkspaceFile::new("a.txt", 'M'),
            WorkspaceFile::new("b.txt", 'A'),
        ];
        files[1].marked = true;

        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        EntityList::new(file_rows(&files, &theme), 1, &theme)
            .focused(true)
            .render(area, &mut buf);

        // path column of the selected, marked row
        let cell = &buf[(4, 1)];
        assert_eq!(cell.symbol(), "b");
        assert_eq!(cell.bg, theme.selection_bg);
        assert_eq!(cell.fg, theme.marked_file);
        assert!(cell.modifier.contains(Modifier::BOLD));

        let unselected = &buf[(4, 0)];
        assert_eq!(unselected.symbol(), "a");
        assert_ne!(unselected.bg, theme.selection_bg);
        assert_eq!(unselected.fg, Color::Reset);
    }
}
