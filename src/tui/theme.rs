//! TUI Theme configuration
//!
//! Centralized colors for panels, content lines and the sync indicator.
//! Supports multiple color depths for terminal compatibility.

use ratatui::style::{Color, Modifier, Style};

use super::animation::SyncKind;
use crate::git::LineKind;

/// Terminal color capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// 16 ANSI colors
    Basic,
    /// 256 color palette
    #[default]
    Indexed,
    /// 24-bit RGB
    TrueColor,
}

impl ColorMode {
    /// Pick a color depth from `NO_COLOR`, `COLORTERM` and `TERM`
    pub fn detect() -> Self {
        let var = |name: &str| std::env::var(name).unwrap_or_default();
        Self::from_env(!var("NO_COLOR").is_empty(), &var("COLORTERM"), &var("TERM"))
    }

    fn from_env(no_color: bool, colorterm: &str, term: &str) -> Self {
        if no_color {
            return Self::Basic;
        }
        if matches!(colorterm, "truecolor" | "24bit")
            || term.contains("kitty")
            || term.contains("alacritty")
        {
            Self::TrueColor
        } else if term.contains("256color") {
            Self::Indexed
        } else {
            Self::Basic
        }
    }
}

/// Base swatches a theme is derived from, one set per color depth
struct Palette {
    text: Color,
    subtle: Color,
    muted: Color,
    sky: Color,
    lavender: Color,
    mauve: Color,
    green: Color,
    sage: Color,
    red: Color,
    yellow: Color,
    orange: Color,
    surface: Color,
    overlay: Color,
    bright: Color,
    bar_text: Color,
}

impl Palette {
    const BASIC: Palette = Palette {
        text: Color::Reset,
        subtle: Color::DarkGray,
        muted: Color::DarkGray,
        sky: Color::Cyan,
        lavender: Color::Blue,
        mauve: Color::Cyan,
        green: Color::Green,
        sage: Color::Green,
        red: Color::Red,
        yellow: Color::Yellow,
        orange: Color::Magenta,
        surface: Color::Blue,
        overlay: Color::Blue,
        bright: Color::White,
        bar_text: Color::White,
    };

    const INDEXED: Palette = Palette {
        text: Color::Reset,
        subtle: Color::Indexed(250),
        muted: Color::Indexed(243),
        sky: Color::Indexed(117),
        lavender: Color::Indexed(147),
        mauve: Color::Indexed(183),
        green: Color::Indexed(156),
        sage: Color::Indexed(108),
        red: Color::Indexed(210),
        yellow: Color::Indexed(222),
        orange: Color::Indexed(215),
        surface: Color::Indexed(236),
        overlay: Color::Indexed(60),
        bright: Color::Indexed(255),
        bar_text: Color::Indexed(252),
    };

    const TRUECOLOR: Palette = Palette {
        text: Color::Rgb(245, 245, 250),
        subtle: Color::Rgb(166, 173, 200),
        muted: Color::Rgb(88, 91, 112),
        sky: Color::Rgb(137, 180, 250),
        lavender: Color::Rgb(180, 190, 254),
        mauve: Color::Rgb(203, 166, 247),
        green: Color::Rgb(166, 227, 161),
        sage: Color::Rgb(129, 178, 134),
        red: Color::Rgb(243, 139, 168),
        yellow: Color::Rgb(249, 226, 175),
        orange: Color::Rgb(250, 179, 135),
        surface: Color::Rgb(49, 50, 68),
        overlay: Color::Rgb(69, 71, 90),
        bright: Color::Rgb(245, 245, 250),
        bar_text: Color::Rgb(205, 214, 244),
    };
}

/// Colors by role
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    pub border_focused: Color,
    pub border_unfocused: Color,

    // List highlight (background only in lists)
    pub selection_bg: Color,
    pub selection_fg: Color,

    /// Files marked for the next commit
    pub marked_file: Color,

    // Sync indicator
    pub sync_progress: Color,
    pub sync_done: Color,

    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_accent: Color,
    pub text_branch: Color,

    // Content lines
    pub diff_added: Color,
    pub diff_removed: Color,
    pub diff_hunk_header: Color,
    pub diff_commit_header: Color,
    pub diff_commit_info: Color,
    pub diff_stat: Color,
    pub diff_context: Color,

    // Dialog borders
    pub modal_info: Color,
    pub modal_warning: Color,
    pub modal_error: Color,

    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_color_mode(ColorMode::detect())
    }
}

impl Theme {
    pub fn for_color_mode(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Basic => Self::basic(),
            ColorMode::Indexed => Self::indexed(),
            ColorMode::TrueColor => Self::truecolor(),
        }
    }

    pub fn basic() -> Self {
        Self::from_palette(&Palette::BASIC)
    }

    pub fn indexed() -> Self {
        Self::from_palette(&Palette::INDEXED)
    }

    pub fn truecolor() -> Self {
        Self::from_palette(&Palette::TRUECOLOR)
    }

    fn from_palette(p: &Palette) -> Self {
        Self {
            border_focused: p.sky,
            border_unfocused: p.muted,
            selection_bg: p.overlay,
            selection_fg: p.bright,
            marked_file: p.orange,
            sync_progress: p.yellow,
            sync_done: p.green,
            text_primary: p.text,
            text_secondary: p.subtle,
            text_accent: p.lavender,
            text_branch: p.sage,
            diff_added: p.green,
            diff_removed: p.red,
            diff_hunk_header: p.mauve,
            diff_commit_header: p.yellow,
            diff_commit_info: p.sky,
            diff_stat: p.lavender,
            diff_context: Color::Reset,
            modal_info: p.sky,
            modal_warning: p.yellow,
            modal_error: p.red,
            status_bar_bg: p.surface,
            status_bar_fg: p.bar_text,
        }
    }

    /// Style for focused pane borders
    pub fn border_focused(&self) -> Style {
        Style::default().fg(self.border_focused)
    }

    /// Style for unfocused pane borders
    pub fn border_unfocused(&self) -> Style {
        Style::default().fg(self.border_unfocused)
    }

    /// Highlight for dialog choices
    pub fn selection(&self) -> Style {
        Style::default().bg(self.selection_bg).fg(self.selection_fg)
    }

    /// Style for status bar
    pub fn status_bar(&self) -> Style {
        Style::default().bg(self.status_bar_bg).fg(self.status_bar_fg)
    }

    /// Style for a content line of the given kind
    pub fn line(&self, kind: LineKind) -> Style {
        let color = match kind {
            LineKind::Context => self.diff_context,
            LineKind::Addition => self.diff_added,
            LineKind::Deletion => self.diff_removed,
            LineKind::HunkHeader => self.diff_hunk_header,
            LineKind::CommitHeader => self.diff_commit_header,
            LineKind::CommitInfo => self.diff_commit_info,
            LineKind::StatLine => self.diff_stat,
        };
        let style = Style::default().fg(color);
        match kind {
            LineKind::HunkHeader | LineKind::CommitHeader => style.add_modifier(Modifier::BOLD),
            _ => style,
        }
    }

    /// Style for the status line animation text
    pub fn sync(&self, kind: SyncKind) -> Style {
        if kind.in_progress() {
            Style::default().fg(self.sync_progress)
        } else {
            Style::default().fg(self.sync_done).add_modifier(Modifier::BOLD)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_mode_from_env() {
        assert_eq!(ColorMode::from_env(false, "truecolor", "xterm"), ColorMode::TrueColor);
        assert_eq!(ColorMode::from_env(false, "", "xterm-kitty"), ColorMode::TrueColor);
        assert_eq!(ColorMode::from_env(false, "", "screen-256color"), ColorMode::Indexed);
        assert_eq!(ColorMode::from_env(false, "", "vt100"), ColorMode::Basic);
        assert_eq!(ColorMode::from_env(true, "truecolor", "xterm-256color"), ColorMode::Basic);
    }

    #[test]
    fn test_marked_differs_from_selection_in_every_mode() {
        for mode in [ColorMode::Basic, ColorMode::Indexed, ColorMode::TrueColor] {
            let theme = Theme::for_color_mode(mode);
            assert_ne!(theme.marked_file, theme.selection_bg, "{mode:?}");
            assert_ne!(theme.sync_progress, theme.sync_done, "{mode:?}");
        }
    }

    #[test]
    fn test_palette_roles() {
        let basic = Theme::basic();
        assert_eq!(basic.border_focused, Color::Cyan);
        assert_eq!(basic.marked_file, Color::Magenta);

        let indexed = Theme::indexed();
        assert_eq!(indexed.selection(), Style::default().bg(Color::Indexed(60)).fg(Color::Indexed(255)));

        let truecolor = Theme::truecolor();
        assert_eq!(truecolor.border_focused, Color::Rgb(137, 180, 250));
        assert_eq!(truecolor.diff_added, truecolor.sync_done);
    }

    #[test]
    fn test_line_and_sync_styles() {
        let theme = Theme::basic();
        assert_eq!(theme.line(LineKind::Addition).fg, Some(Color::Green));
        assert_eq!(theme.line(LineKind::Deletion).fg, Some(Color::Red));
        assert!(theme.line(LineKind::HunkHeader).add_modifier.contains(Modifier::BOLD));
        assert_eq!(theme.sync(SyncKind::Pushing).fg, Some(Color::Yellow));
        assert_eq!(theme.sync(SyncKind::Pushed).fg, Some(Color::Green));
    }
}
