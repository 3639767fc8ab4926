//! Application state
//!
//! `AppState` is the one owned structure holding every panel's contents,
//! the selection cursors, the current mode and the animation state. It is
//! created when the TUI starts, passed explicitly into every component and
//! dropped when the TUI exits.

use std::collections::HashSet;

use tracing::debug;

use super::animation::SyncAnimation;
use super::modal::Modal;
use crate::git::{Branch, Commit, ContentLine, RepoQuery, Stash, WorkspaceFile};

/// Lines kept between the cursor and the viewport edge
pub const SCROLL_PADDING: usize = 3;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    FileList,
    FileView,
    BranchList,
    BranchView,
    CommitList,
    CommitView,
    StashList,
    StashView,
}

impl ViewMode {
    pub fn is_view(self) -> bool {
        matches!(
            self,
            ViewMode::FileView | ViewMode::BranchView | ViewMode::CommitView | ViewMode::StashView
        )
    }

    /// List mode paired with a view mode (list modes map to themselves)
    pub fn list(self) -> ViewMode {
        match self {
            ViewMode::FileList | ViewMode::FileView => ViewMode::FileList,
            ViewMode::BranchList | ViewMode::BranchView => ViewMode::BranchList,
            ViewMode::CommitList | ViewMode::CommitView => ViewMode::CommitList,
            ViewMode::StashList | ViewMode::StashView => ViewMode::StashList,
        }
    }

    /// View mode paired with a list mode
    pub fn view(self) -> ViewMode {
        match self.list() {
            ViewMode::FileList => ViewMode::FileView,
            ViewMode::BranchList => ViewMode::BranchView,
            ViewMode::CommitList => ViewMode::CommitView,
            _ => ViewMode::StashView,
        }
    }
}

/// Clamp `index` into `[0, len - 1]`, or 0 for an empty list
pub fn clamp_index(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}

/// Move `index` by `delta` within a list of `len` items
pub fn step_index(index: usize, delta: isize, len: usize) -> usize {
    clamp_index(index.saturating_add_signed(delta), len)
}

/// What the content panel is showing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContentSource {
    #[default]
    Empty,
    File(String),
    Commit(String),
    Stash(usize),
    Branch(String),
}

/// Lines in the content panel plus its cursor and scroll offset
#[derive(Debug, Clone, Default)]
pub struct ContentView {
    pub source: ContentSource,
    pub lines: Vec<ContentLine>,
    pub cursor: usize,
    pub scroll: usize,
    /// Visible rows, updated by the main loop on resize
    pub viewport: usize,
}

impl ContentView {
    /// Replace the content, resetting cursor and scroll
    pub fn replace(&mut self, source: ContentSource, lines: Vec<ContentLine>) {
        self.source = source;
        self.lines = lines;
        self.cursor = 0;
        self.scroll = 0;
    }

    /// Replace the content, keeping cursor and scroll where still valid
    pub fn replace_preserving(&mut self, source: ContentSource, lines: Vec<ContentLine>) {
        let same_source = self.source == source;
        let (cursor, scroll) = (self.cursor, self.scroll);
        self.replace(source, lines);
        if same_source {
            if cursor < self.lines.len() {
                self.cursor = cursor;
            }
            if scroll < self.lines.len() {
                self.scroll = scroll;
            }
            self.clamp_scroll();
        }
    }

    pub fn set_viewport(&mut self, rows: usize) {
        self.viewport = rows;
        self.keep_cursor_visible();
    }

    fn max_scroll(&self) -> usize {
        self.lines.len().saturating_sub(self.viewport.max(1))
    }

    fn clamp_scroll(&mut self) {
        self.scroll = self.scroll.min(self.max_scroll());
    }

    fn padding(&self) -> usize {
        SCROLL_PADDING.min(self.viewport.saturating_sub(1) / 2)
    }

    /// Scroll so the cursor sits at least `SCROLL_PADDING` lines from either edge
    pub fn keep_cursor_visible(&mut self) {
        if self.lines.is_empty() {
            self.cursor = 0;
            self.scroll = 0;
            return;
        }
        self.cursor = clamp_index(self.cursor, self.lines.len());
        let viewport = self.viewport.max(1);
        let pad = self.padding();

        if self.cursor < self.scroll + pad {
            self.scroll = self.cursor.saturating_sub(pad);
        } else if self.cursor + pad >= self.scroll + viewport {
            self.scroll = (self.cursor + pad + 1).saturating_sub(viewport);
        }
        self.clamp_scroll();
    }

    /// Move one line, skipping blank lines
    pub fn move_cursor(&mut self, direction: isize) {
        if self.lines.is_empty() {
            return;
        }
        let last = self.lines.len() - 1;
        let mut target = self.cursor;
        loop {
            let next = step_index(target, direction, self.lines.len());
            if next == target {
                break;
            }
            target = next;
            if !self.lines[target].is_blank() || target == 0 || target == last {
                break;
            }
        }
        self.cursor = target;
        self.keep_cursor_visible();
    }

    /// Move half a viewport
    pub fn half_page(&mut self, direction: isize) {
        let step = (self.viewport / 2).max(1) as isize;
        self.cursor = step_index(self.cursor, direction * step, self.lines.len());
        self.keep_cursor_visible();
    }

    /// Move a full viewport, scrolling with the cursor
    pub fn page(&mut self, direction: isize) {
        let step = self.viewport.max(1) as isize;
        self.scroll = self.scroll.saturating_add_signed(direction * step);
        self.clamp_scroll();
        self.cursor = step_index(self.cursor, direction * step, self.lines.len());
        self.keep_cursor_visible();
    }
}

/// The single owned state of a TUI session
#[derive(Debug, Default)]
pub struct AppState {
    pub mode: ViewMode,

    pub files: Vec<WorkspaceFile>,
    pub selected_file: usize,

    pub branches: Vec<Branch>,
    pub selected_branch: usize,

    pub commits: Vec<Commit>,
    pub selected_commit: usize,

    pub stashes: Vec<Stash>,
    pub selected_stash: usize,

    pub content: ContentView,

    pub modal: Modal,

    /// Status line animation
    pub sync: SyncAnimation,
    /// Branch row whose push/pull the status animation describes
    pub active_branch: Option<usize>,

    /// Repository header shown in the title bar
    pub repo_name: String,
    pub head_name: String,

    pub should_quit: bool,
}

impl AppState {
    pub fn new(repo_name: impl Into<String>) -> Self {
        Self {
            repo_name: repo_name.into(),
            ..Self::default()
        }
    }

    pub fn selected_file(&self) -> Option<&WorkspaceFile> {
        self.files.get(self.selected_file)
    }

    pub fn selected_branch(&self) -> Option<&Branch> {
        self.branches.get(self.selected_branch)
    }

    pub fn selected_commit(&self) -> Option<&Commit> {
        self.commits.get(self.selected_commit)
    }

    pub fn current_branch_index(&self) -> Option<usize> {
        self.branches.iter().position(|b| b.is_current)
    }

    /// Paths marked for the next commit
    pub fn marked_paths(&self) -> Vec<String> {
        self.files
            .iter()
            .filter(|f| f.marked)
            .map(|f| f.path.clone())
            .collect()
    }

    pub fn toggle_mark(&mut self) {
        if let Some(file) = self.files.get_mut(self.selected_file) {
            file.marked = !file.marked;
        }
    }

    /// Unmark everything when all files are marked, otherwise mark everything
    pub fn mark_all(&mut self) {
        let all_marked = !self.files.is_empty() && self.files.iter().all(|f| f.marked);
        for file in &mut self.files {
            file.marked = !all_marked;
        }
    }

    /// Length of the list behind a list mode
    pub fn list_len(&self, mode: ViewMode) -> usize {
        match mode.list() {
            ViewMode::FileList => self.files.len(),
            ViewMode::BranchList => self.branches.len(),
            ViewMode::CommitList => self.commits.len(),
            _ => self.stashes.len(),
        }
    }

    pub fn selection(&self, mode: ViewMode) -> usize {
        match mode.list() {
            ViewMode::FileList => self.selected_file,
            ViewMode::BranchList => self.selected_branch,
            ViewMode::CommitList => self.selected_commit,
            _ => self.selected_stash,
        }
    }

    fn selection_mut(&mut self, mode: ViewMode) -> &mut usize {
        match mode.list() {
            ViewMode::FileList => &mut self.selected_file,
            ViewMode::BranchList => &mut self.selected_branch,
            ViewMode::CommitList => &mut self.selected_commit,
            _ => &mut self.selected_stash,
        }
    }

    /// Move the selection of the mode's list, returning true if it changed
    pub fn move_selection(&mut self, mode: ViewMode, delta: isize) -> bool {
        let len = self.list_len(mode);
        let selection = self.selection_mut(mode);
        let next = step_index(*selection, delta, len);
        let changed = next != *selection;
        *selection = next;
        changed
    }

    pub fn set_selection(&mut self, mode: ViewMode, index: usize) {
        let len = self.list_len(mode);
        *self.selection_mut(mode) = clamp_index(index, len);
    }

    fn clamp_selections(&mut self) {
        self.selected_file = clamp_index(self.selected_file, self.files.len());
        self.selected_branch = clamp_index(self.selected_branch, self.branches.len());
        self.selected_commit = clamp_index(self.selected_commit, self.commits.len());
        self.selected_stash = clamp_index(self.selected_stash, self.stashes.len());
    }

    /// Replace the file list, carrying marks over for paths still present
    pub fn set_files(&mut self, mut files: Vec<WorkspaceFile>) {
        let marked: HashSet<&str> = self
            .files
            .iter()
            .filter(|f| f.marked)
            .map(|f| f.path.as_str())
            .collect();
        for file in &mut files {
            file.marked = marked.contains(file.path.as_str());
        }
        self.files = files;
        self.clamp_selections();
    }

    pub fn set_branches(&mut self, branches: Vec<Branch>) {
        self.head_name = branches
            .iter()
            .find(|b| b.is_current)
            .map(|b| b.name.clone())
            .unwrap_or_else(|| self.head_name.clone());
        self.branches = branches;
        self.clamp_selections();
    }

    pub fn set_commits(&mut self, commits: Vec<Commit>) {
        self.commits = commits;
        self.clamp_selections();
    }

    pub fn set_stashes(&mut self, stashes: Vec<Stash>) {
        self.stashes = stashes;
        self.clamp_selections();
    }

    pub async fn refresh_files(&mut self, query: &RepoQuery) {
        let files = query.list_changed_files().await;
        self.set_files(files);
    }

    pub async fn refresh_branches(&mut self, query: &RepoQuery) {
        let branches = query.list_branches().await;
        self.set_branches(branches);
    }

    pub async fn refresh_commits(&mut self, query: &RepoQuery) {
        let commits = query.list_commits(query.limits().max_commits).await;
        self.set_commits(commits);
    }

    pub async fn refresh_stashes(&mut self, query: &RepoQuery) {
        let stashes = query.list_stashes().await;
        self.set_stashes(stashes);
    }

    /// Re-query every list and the content pane, keeping the user's place
    pub async fn refresh_all(&mut self, query: &RepoQuery) {
        self.refresh_files(query).await;
        self.refresh_stashes(query).await;
        self.refresh_branches(query).await;
        self.refresh_commits(query).await;
        self.reload_content(query, true).await;
    }

    /// Content source implied by the current mode and selection
    pub fn content_source_for_mode(&self) -> ContentSource {
        match self.mode.list() {
            ViewMode::FileList => self
                .selected_file()
                .map(|f| ContentSource::File(f.path.clone()))
                .unwrap_or_default(),
            ViewMode::BranchList => self
                .selected_branch()
                .map(|b| ContentSource::Branch(b.name.clone()))
                .unwrap_or_default(),
            ViewMode::CommitList => self
                .selected_commit()
                .map(|c| ContentSource::Commit(c.hash.clone()))
                .unwrap_or_default(),
            _ => {
                if self.stashes.is_empty() {
                    ContentSource::Empty
                } else {
                    ContentSource::Stash(self.selected_stash)
                }
            }
        }
    }

    /// Load the content for the current selection.
    ///
    /// With `preserve`, cursor and scroll survive if the source is unchanged
    /// and they still fit the new lines.
    pub async fn reload_content(&mut self, query: &RepoQuery, preserve: bool) {
        let source = self.content_source_for_mode();
        let lines = load_content(query, &source).await;
        debug!("loaded {} content lines for {:?}", lines.len(), source);
        if preserve {
            self.content.replace_preserving(source, lines);
        } else {
            self.content.replace(source, lines);
        }
        self.content.keep_cursor_visible();
    }
}

async fn load_content(query: &RepoQuery, source: &ContentSource) -> Vec<ContentLine> {
    match source {
        ContentSource::Empty => Vec::new(),
        ContentSource::File(path) => query.load_diff_for_file(path).await,
        ContentSource::Commit(hash) => query.load_commit_detail(hash).await,
        ContentSource::Stash(index) => query.load_stash_detail(*index).await,
        ContentSource::Branch(name) => query.load_branch_commits(name).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::LineKind;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn files(statuses: &[char]) -> Vec<WorkspaceFile> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, s)| WorkspaceFile::new(format!("file{}", i), *s))
            .collect()
    }

    fn lines(texts: &[&str]) -> Vec<ContentLine> {
        texts.iter().map(|t| ContentLine::new(*t, LineKind::Context)).collect()
    }

    #[test]
    fn test_mode_pairs() {
        assert_eq!(ViewMode::CommitView.list(), ViewMode::CommitList);
        assert_eq!(ViewMode::StashList.view(), ViewMode::StashView);
        assert_eq!(ViewMode::FileView.view(), ViewMode::FileView);
        assert!(ViewMode::BranchView.is_view());
        assert!(!ViewMode::FileList.is_view());
    }

    #[test]
    fn test_clamp_empty_list() {
        assert_eq!(clamp_index(5, 0), 0);
        assert_eq!(step_index(0, -1, 0), 0);
        assert_eq!(step_index(2, 1, 3), 2);
    }

    #[test]
    fn test_mark_all_idempotent() {
        let mut state = AppState::default();
        state.set_files(files(&['M', 'A', 'D']));

        state.mark_all();
        assert!(state.files.iter().all(|f| f.marked));
        state.mark_all();
        assert!(state.files.iter().all(|f| !f.marked));

        // mixed marks: first application marks all
        state.files[1].marked = true;
        state.mark_all();
        assert!(state.files.iter().all(|f| f.marked));
    }

    #[test]
    fn test_set_files_keeps_marks_and_clamps() {
        let mut state = AppState::default();
        state.set_files(files(&['M', 'A', 'D']));
        state.selected_file = 2;
        state.files[0].marked = true;

        state.set_files(files(&['M']));
        assert_eq!(state.selected_file, 0);
        assert!(state.files[0].marked);
        assert_eq!(state.marked_paths(), vec!["file0".to_string()]);
    }

    #[test]
    fn test_move_cursor_skips_blank_lines() {
        let mut view = ContentView::default();
        view.replace(ContentSource::Empty, lines(&["a", "", "   ", "b", ""]));
        view.set_viewport(10);

        view.move_cursor(1);
        assert_eq!(view.cursor, 3);
        // trailing blank line is the last line, cursor may rest there
        view.move_cursor(1);
        assert_eq!(view.cursor, 4);
        view.move_cursor(-1);
        assert_eq!(view.cursor, 3);
        view.move_cursor(-1);
        assert_eq!(view.cursor, 0);
        view.move_cursor(-1);
        assert_eq!(view.cursor, 0);
    }

    #[test]
    fn test_scroll_keeps_padding() {
        let texts: Vec<String> = (0..100).map(|i| format!("line {}", i)).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let mut view = ContentView::default();
        view.replace(ContentSource::Empty, lines(&refs));
        view.set_viewport(20);

        for _ in 0..17 {
            view.move_cursor(1);
        }
        assert_eq!(view.cursor, 17);
        assert_eq!(view.scroll, 1);

        view.half_page(1);
        assert_eq!(view.cursor, 27);
        assert!(view.cursor + SCROLL_PADDING < view.scroll + 20);

        view.page(1);
        assert_eq!(view.cursor, 47);

        view.page(1);
        view.page(1);
        view.page(1);
        assert_eq!(view.cursor, 99);
        assert_eq!(view.scroll, 80);

        view.page(-1);
        view.page(-1);
        view.page(-1);
        view.page(-1);
        view.page(-1);
        view.page(-1);
        assert_eq!(view.cursor, 0);
        assert_eq!(view.scroll, 0);
    }

    #[test]
    fn test_replace_preserving_keeps_valid_position() {
        let texts: Vec<String> = (0..50).map(|i| format!("line {}", i)).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let source = ContentSource::File("a.rs".to_string());

        let mut view = ContentView::default();
        view.set_viewport(10);
        view.replace(source.clone(), lines(&refs));
        view.cursor = 30;
        view.keep_cursor_visible();
        let scroll = view.scroll;

        view.replace_preserving(source.clone(), lines(&refs));
        assert_eq!(view.cursor, 30);
        assert_eq!(view.scroll, scroll);

        // different source resets
        view.replace_preserving(ContentSource::File("b.rs".to_string()), lines(&refs));
        assert_eq!(view.cursor, 0);
        assert_eq!(view.scroll, 0);
    }

    #[test]
    fn test_content_source_follows_mode() {
        let mut state = AppState::default();
        state.set_files(files(&['M', '?']));
        state.selected_file = 1;
        assert_eq!(
            state.content_source_for_mode(),
            ContentSource::File("file1".to_string())
        );
        state.mode = ViewMode::StashView;
        assert_eq!(state.content_source_for_mode(), ContentSource::Empty);
    }

    proptest! {
        #[test]
        fn prop_selection_stays_in_bounds(
            len in 0usize..20,
            moves in proptest::collection::vec(-3isize..=3, 0..60),
        ) {
            let mut state = AppState::default();
            state.set_files(files(&vec!['M'; len]));
            for delta in moves {
                state.move_selection(ViewMode::FileList, delta);
                prop_assert!(state.selected_file <= len.saturating_sub(1));
            }
        }

        #[test]
        fn prop_cursor_stays_in_bounds(
            len in 0usize..80,
            viewport in 1usize..30,
            moves in proptest::collection::vec(0u8..6, 0..80),
        ) {
            let texts: Vec<String> = (0..len).map(|i| if i % 4 == 0 { String::new() } else { format!("l{}", i) }).collect();
            let mut view = ContentView::default();
            view.replace(ContentSource::Empty, texts.iter().map(|t| ContentLine::context(t.clone())).collect());
            view.set_viewport(viewport);
            for m in moves {
                match m {
                    0 => view.move_cursor(1),
                    1 => view.move_cursor(-1),
                    2 => view.half_page(1),
                    3 => view.half_page(-1),
                    4 => view.page(1),
                    _ => view.page(-1),
                }
                prop_assert!(view.cursor <= len.saturating_sub(1));
                prop_assert!(view.scroll <= len.saturating_sub(viewport));
                if len > 0 {
                    prop_assert!(view.cursor >= view.scroll);
                    prop_assert!(view.cursor < view.scroll + viewport);
                }
            }
        }
    }
}
