//! Title and status bars

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::animation::SyncAnimation;
use crate::tui::state::ViewMode;
use crate::tui::theme::Theme;

/// Key hints for a mode
pub fn key_hints(mode: ViewMode) -> &'static str {
    match mode {
        ViewMode::FileList => {
            "Space: mark | a: mark all | c: commit | s: stash | Enter: view | Tab: commits | ?: help | q: quit"
        }
        ViewMode::BranchList => {
            "Enter: view | c: checkout | n: new | r: rename | d: delete | p: pull | Esc: back"
        }
        ViewMode::CommitList => {
            "Enter: view | P: push | p: pull | r: soft reset | R: hard reset | a: amend | Esc: back"
        }
        ViewMode::StashList => "Space: apply | g: pop | d: drop | Enter: view | Esc: back",
        _ => "j/k: move | Ctrl+u/d: half page | PgUp/PgDn: page | Esc: back",
    }
}

/// Bottom line: key hints left, sync animation right
pub struct StatusBar<'a> {
    mode: ViewMode,
    sync: &'a SyncAnimation,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(mode: ViewMode, sync: &'a SyncAnimation, theme: &'a Theme) -> Self {
        Self { mode, sync, theme }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let sync_text = self.sync.display_text();
        // spinner slot included so the text does not shift
        let sync_width = self.sync.kind().text().chars().count() as u16 + 3;

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(sync_width)])
            .split(area);

        Paragraph::new(format!(" {}", key_hints(self.mode)))
            .style(self.theme.status_bar())
            .render(chunks[0], buf);

        Paragraph::new(Span::styled(
            format!("{} ", sync_text),
            self.theme.sync(self.sync.kind()),
        ))
        .alignment(Alignment::Right)
        .style(self.theme.status_bar())
        .render(chunks[1], buf);
    }
}

/// Top line: repository and current branch
pub struct TitleBar<'a> {
    repo: &'a str,
    branch: &'a str,
    theme: &'a Theme,
}

impl<'a> TitleBar<'a> {
    pub fn new(repo: &'a str, branch: &'a str, theme: &'a Theme) -> Self {
        Self { repo, branch, theme }
    }
}

impl Widget for TitleBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::styled(
            format!(" {} ", self.repo),
            Style::default()
                .fg(self.theme.text_accent)
                .add_modifier(Modifier::BOLD),
        )];
        if !self.branch.is_empty() {
            spans.push(Span::styled(
                format!("[{}]", self.branch),
                Style::default().fg(self.theme.text_branch),
            ));
        }
        Paragraph::new(Line::from(spans))
            .style(self.theme.status_bar())
            .render(area, buf);
    }
}
