//! TUI widgets
//!
//! [`render`] is the whole panel renderer: a pure projection of `AppState`
//! onto the frame. Pieces:
//! - `EntityList` - File, branch, commit and stash panels
//! - `ContentPanel` - Diff and detail lines with cursor
//! - `StatusBar` / `TitleBar` - One-line bars
//! - `dialogs` - Stateless modal renderers

mod content_view;
pub mod dialogs;
mod entity_list;
mod layout;
mod status_bar;

pub use content_view::*;
pub use entity_list::*;
pub use layout::*;
pub use status_bar::*;

use ratatui::{
    Frame,
    widgets::{Block, Borders},
};

use super::state::{AppState, ViewMode};
use super::theme::Theme;

fn panel_block<'a>(title: &'a str, focused: bool, theme: &Theme) -> Block<'a> {
    let border = if focused {
        theme.border_focused()
    } else {
        theme.border_unfocused()
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border)
}

/// Draw every panel, the bars and the open modal
pub fn render(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let layout = PanelLayout::compute(frame.area());
    let mode = state.mode;

    frame.render_widget(TitleBar::new(&state.repo_name, &state.head_name, theme), layout.title);

    let files = EntityList::new(file_rows(&state.files, theme), state.selected_file, theme)
        .focused(mode == ViewMode::FileList)
        .block(panel_block(" 1. Files ", mode == ViewMode::FileList, theme));
    frame.render_widget(files, layout.files);

    let branches = EntityList::new(
        branch_rows(&state.branches, state.active_branch, &state.sync, theme),
        state.selected_branch,
        theme,
    )
    .focused(mode == ViewMode::BranchList)
    .block(panel_block(" 3. Branches ", mode == ViewMode::BranchList, theme));
    frame.render_widget(branches, layout.branches);

    let commits = EntityList::new(commit_rows(&state.commits, theme), state.selected_commit, theme)
        .focused(mode == ViewMode::CommitList)
        .block(panel_block(" 4. Commits ", mode == ViewMode::CommitList, theme));
    frame.render_widget(commits, layout.commits);

    let stashes = EntityList::new(stash_rows(&state.stashes, theme), state.selected_stash, theme)
        .focused(mode == ViewMode::StashList)
        .block(panel_block(" 5. Stash ", mode == ViewMode::StashList, theme));
    frame.render_widget(stashes, layout.stash);

    let in_view = mode.is_view();
    let content = ContentPanel::new(&state.content.lines, theme)
        .scroll(state.content.scroll)
        .cursor(in_view.then_some(state.content.cursor))
        .block(panel_block(" 2. Content ", in_view, theme));
    frame.render_widget(content, layout.content);

    frame.render_widget(StatusBar::new(mode, &state.sync, theme), layout.status);

    dialogs::render_modal(frame, &state.modal, theme);
}
