//! Content panel widget
//!
//! Displays classified diff and detail lines from the current scroll offset,
//! with the cursor row shaded while a view mode is active.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

use crate::git::ContentLine;
use crate::tui::theme::Theme;

/// Content widget
pub struct ContentPanel<'a> {
    lines: &'a [ContentLine],
    theme: &'a Theme,
    block: Option<Block<'a>>,
    scroll: usize,
    /// Highlighted line, if the cursor is shown
    cursor: Option<usize>,
}

impl<'a> ContentPanel<'a> {
    pub fn new(lines: &'a [ContentLine], theme: &'a Theme) -> Self {
        Self {
            lines,
            theme,
            block: None,
            scroll: 0,
            cursor: None,
        }
    }

    /// Set the block
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Set the scroll offset
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn cursor(mut self, cursor: Option<usize>) -> Self {
        self.cursor = cursor;
        self
    }
}

impl Widget for ContentPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let height = match &self.block {
            Some(block) => block.inner(area).height,
            None => area.height,
        };

        // Only the rows that fit are built
        let visible: Vec<Line> = self
            .lines
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(usize::from(height))
            .map(|(i, line)| {
                let span = Span::styled(line.text.as_str(), self.theme.line(line.kind));
                let row = Line::from(span);
                if self.cursor == Some(i) {
                    // shade the whole row, not just the text
                    row.style(Style::default().bg(self.theme.selection_bg))
                } else {
                    row
                }
            })
            .collect();

        let mut paragraph = Paragraph::new(visible);
        if let Some(block) = self.block {
            paragraph = paragraph.block(block);
        }
        paragraph.render(area, buf);
    }
}
