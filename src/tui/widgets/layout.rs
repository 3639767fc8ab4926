//! Panel geometry
//!
//! Regions are derived from the terminal size on every frame, so a resize
//! rebuilds all of them.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Regions of the five-panel screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelLayout {
    pub title: Rect,
    pub files: Rect,
    pub branches: Rect,
    pub commits: Rect,
    pub stash: Rect,
    pub content: Rect,
    pub status: Rect,
}

impl PanelLayout {
    pub fn compute(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(rows[1]);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Percentage(20),
                Constraint::Percentage(30),
                Constraint::Fill(1),
            ])
            .split(columns[0]);

        Self {
            title: rows[0],
            files: left[0],
            branches: left[1],
            commits: left[2],
            stash: left[3],
            content: columns[1],
            status: rows[2],
        }
    }

    /// Rows available for text inside the bordered content panel
    pub fn content_viewport(&self) -> usize {
        usize::from(self.content.height.saturating_sub(2))
    }
}

/// Helper to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// A fixed-height rect centered horizontally by percentage
pub fn centered_fixed(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_splits() {
        let layout = PanelLayout::compute(Rect::new(0, 0, 100, 42));
        assert_eq!(layout.title.height, 1);
        assert_eq!(layout.status.y, 41);
        assert_eq!(layout.files.width, 40);
        assert_eq!(layout.content.x, 40);
        assert_eq!(layout.content.height, 40);
        assert_eq!(layout.content_viewport(), 38);
        assert_eq!(
            layout.files.height + layout.branches.height + layout.commits.height + layout.stash.height,
            40
        );
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        let centered = centered_rect(50, 50, area);

        // Should be roughly centered
        assert!(centered.x > 0);
        assert!(centered.y > 0);
        assert!(centered.width < area.width);
        assert!(centered.height < area.height);
    }

    #[test]
    fn test_centered_fixed_clamps_height() {
        let area = Rect::new(0, 0, 80, 6);
        let rect = centered_fixed(50, 10, area);
        assert_eq!(rect.height, 6);
        assert_eq!(rect.width, 40);
        assert_eq!(rect.x, 20);
    }
}
