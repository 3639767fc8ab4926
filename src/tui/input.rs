//! Key dispatch
//!
//! Maps (mode, key) to a state transition or a git call. Modals get the
//! key first; otherwise the key is turned into a [`UserCommand`] and handled
//! by the current mode. Mutations run inside a critical section of the
//! task manager and surface failures as an error modal.

use crossterm::event::KeyEvent;
use tracing::{debug, info};

use super::event::UserCommand;
use super::modal::{ConfirmAction, InputAction, Modal, ModalOutcome, ModalSubmit};
use super::state::{AppState, ViewMode};
use super::tasks::{AsyncTaskManager, WorkerJob};
use crate::error::{Error, GitError, Result};
use crate::git::{PushMode, PushReadiness, RepoMutator, RepoQuery};

pub const NO_FILES_MARKED: &str = "No files marked for commit";
pub const CANNOT_DELETE_CURRENT: &str = "Cannot delete current branch!";
pub const NOTHING_TO_PULL: &str = "No commits to pull from remote";
pub const NO_UPSTREAM_TO_DELETE: &str =
    "The selected branch has no upstream (tip: delete the branch locally)";

/// What the main loop should do after a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Continue,
    Quit,
    /// Supervise a push or pull worker
    Run(WorkerJob),
}

/// The (mode, key) state machine
#[derive(Debug, Clone)]
pub struct InputDispatcher {
    query: RepoQuery,
    mutator: RepoMutator,
}

impl InputDispatcher {
    pub fn new(query: RepoQuery, mutator: RepoMutator) -> Self {
        Self { query, mutator }
    }

    pub fn query(&self) -> &RepoQuery {
        &self.query
    }

    pub async fn handle_key(
        &self,
        state: &mut AppState,
        tasks: &mut AsyncTaskManager,
        key: KeyEvent,
    ) -> Dispatch {
        if state.modal.is_open() {
            return self.handle_modal_key(state, tasks, key).await;
        }

        let Some(cmd) = UserCommand::from_key(key) else {
            return Dispatch::Continue;
        };
        debug!("{:?} in {:?}", cmd, state.mode);

        match cmd {
            UserCommand::ForceQuit => return Dispatch::Quit,
            UserCommand::ShowHelp => {
                state.modal = Modal::Help;
                return Dispatch::Continue;
            }
            UserCommand::Jump(panel) => {
                self.jump(state, panel).await;
                return Dispatch::Continue;
            }
            _ => {}
        }

        if state.mode.is_view() {
            self.handle_view(state, cmd);
            Dispatch::Continue
        } else {
            self.handle_list(state, tasks, cmd).await
        }
    }

    async fn jump(&self, state: &mut AppState, panel: u8) {
        let mode = match panel {
            1 => ViewMode::FileList,
            2 => ViewMode::FileView,
            3 => ViewMode::BranchList,
            4 => ViewMode::CommitList,
            _ => ViewMode::StashList,
        };
        self.enter_mode(state, mode).await;
    }

    /// Switch mode, reloading the content pane from the new selection
    async fn enter_mode(&self, state: &mut AppState, mode: ViewMode) {
        let source_changes = state.mode.list() != mode.list();
        state.mode = mode;
        if source_changes || state.content.lines.is_empty() {
            state.reload_content(&self.query, false).await;
        }
    }

    fn handle_view(&self, state: &mut AppState, cmd: UserCommand) {
        let content = &mut state.content;
        match cmd {
            UserCommand::NavigateUp => content.move_cursor(-1),
            UserCommand::NavigateDown => content.move_cursor(1),
            UserCommand::HalfPageUp => content.half_page(-1),
            UserCommand::HalfPageDown => content.half_page(1),
            UserCommand::PageUp => content.page(-1),
            UserCommand::PageDown => content.page(1),
            UserCommand::Back | UserCommand::Tab | UserCommand::Quit => {
                state.mode = state.mode.list();
            }
            _ => {}
        }
    }

    async fn handle_list(
        &self,
        state: &mut AppState,
        tasks: &mut AsyncTaskManager,
        cmd: UserCommand,
    ) -> Dispatch {
        let mode = state.mode;
        match cmd {
            UserCommand::NavigateUp | UserCommand::NavigateDown => {
                let delta = if cmd == UserCommand::NavigateUp { -1 } else { 1 };
                if state.move_selection(mode, delta) {
                    state.reload_content(&self.query, false).await;
                }
            }
            UserCommand::HalfPageUp => state.content.half_page(-1),
            UserCommand::HalfPageDown => state.content.half_page(1),
            UserCommand::PageUp => state.content.page(-1),
            UserCommand::PageDown => state.content.page(1),
            UserCommand::Select => {
                if state.list_len(mode) > 0 {
                    state.mode = mode.view();
                    state.reload_content(&self.query, false).await;
                }
            }
            UserCommand::Back | UserCommand::Quit if mode == ViewMode::FileList => {
                return Dispatch::Quit;
            }
            UserCommand::Back => self.enter_mode(state, ViewMode::FileList).await,
            UserCommand::Tab => {
                let next = if mode == ViewMode::FileList {
                    ViewMode::CommitList
                } else {
                    ViewMode::FileList
                };
                self.enter_mode(state, next).await;
            }
            UserCommand::Action(c) => {
                return match mode {
                    ViewMode::FileList => self.file_action(state, tasks, c).await,
                    ViewMode::BranchList => self.branch_action(state, tasks, c).await,
                    ViewMode::CommitList => self.commit_action(state, tasks, c).await,
                    _ => self.stash_action(state, tasks, c).await,
                };
            }
            _ => {}
        }
        Dispatch::Continue
    }

    async fn file_action(
        &self,
        state: &mut AppState,
        tasks: &mut AsyncTaskManager,
        c: char,
    ) -> Dispatch {
        match c {
            ' ' => state.toggle_mark(),
            'a' => state.mark_all(),
            'c' => {
                if state.marked_paths().is_empty() {
                    state.modal = Modal::error(NO_FILES_MARKED);
                } else {
                    state.modal = Modal::commit_editor("", "", false);
                }
            }
            's' => {
                if !state.files.is_empty() {
                    state.modal = Modal::input("Stash Name", "", InputAction::CreateStash);
                }
            }
            'P' => return self.begin_push(state, tasks).await,
            _ => {}
        }
        Dispatch::Continue
    }

    async fn commit_action(
        &self,
        state: &mut AppState,
        tasks: &mut AsyncTaskManager,
        c: char,
    ) -> Dispatch {
        match c {
            'P' => return self.begin_push(state, tasks).await,
            'p' => return Dispatch::Run(WorkerJob::Pull),
            'r' => {
                let index = state.selected_commit;
                let result = self.critical(tasks, self.mutator.reset_soft(index)).await;
                self.after_reset(state, result).await;
            }
            'R' => {
                if state.selected_commit == 0 && !state.commits.is_empty() {
                    state.modal = Modal::HardReset {
                        typed: String::new(),
                    };
                }
            }
            'a' => {
                if !state.commits.is_empty() {
                    let (title, message) = self.query.head_message().await;
                    state.modal = Modal::commit_editor(title, message, true);
                }
            }
            _ => {}
        }
        Dispatch::Continue
    }

    async fn branch_action(
        &self,
        state: &mut AppState,
        tasks: &mut AsyncTaskManager,
        c: char,
    ) -> Dispatch {
        let Some(branch) = state.selected_branch().cloned() else {
            if c == 'n' {
                state.modal = Modal::input("New Branch", "", InputAction::CreateBranch);
            }
            return Dispatch::Continue;
        };

        match c {
            'c' => {
                if !branch.is_current {
                    let result = self.critical(tasks, self.mutator.checkout(&branch.name)).await;
                    self.after_branch_edit(state, result, None).await;
                }
            }
            'n' => state.modal = Modal::input("New Branch", "", InputAction::CreateBranch),
            'r' => {
                state.modal = Modal::input(
                    "Rename Branch",
                    branch.name.clone(),
                    InputAction::RenameBranch { old: branch.name },
                )
            }
            'd' => {
                if branch.is_current {
                    state.modal = Modal::error(CANNOT_DELETE_CURRENT);
                } else {
                    state.modal = Modal::delete_branch(branch.name);
                }
            }
            'p' => {
                if branch.behind == 0 {
                    state.modal = Modal::error(NOTHING_TO_PULL);
                } else {
                    return Dispatch::Run(WorkerJob::Pull);
                }
            }
            'P' => return self.begin_push(state, tasks).await,
            _ => {}
        }
        Dispatch::Continue
    }

    async fn stash_action(
        &self,
        state: &mut AppState,
        tasks: &mut AsyncTaskManager,
        c: char,
    ) -> Dispatch {
        if state.stashes.is_empty() {
            return Dispatch::Continue;
        }
        let index = state.selected_stash;
        let result = match c {
            ' ' => self.critical(tasks, self.mutator.stash_apply(index)).await,
            'g' => self.critical(tasks, self.mutator.stash_pop(index)).await,
            'd' => self.critical(tasks, self.mutator.stash_drop(index)).await,
            _ => return Dispatch::Continue,
        };
        self.after_stash_edit(state, result).await;
        Dispatch::Continue
    }

    /// Decide how to push; the upstream check always comes first
    async fn begin_push(&self, state: &mut AppState, tasks: &mut AsyncTaskManager) -> Dispatch {
        tasks.begin_critical();
        let readiness = self.query.push_readiness().await;
        tasks.end_critical();

        match readiness {
            None => {
                state.modal = Modal::error("Push failed. Could not determine the current branch.");
                Dispatch::Continue
            }
            Some(PushReadiness::NeedsUpstream { branch, remotes }) => {
                state.modal = Modal::upstream(&branch, &remotes);
                Dispatch::Continue
            }
            Some(PushReadiness::Diverged { ahead, behind }) => {
                state.modal = Modal::Confirm {
                    title: "Force Push".to_string(),
                    message: format!(
                        "Branch has diverged! {} local and {} remote commit(s) differ.\nForce push anyway? (y/N)",
                        ahead, behind
                    ),
                    on_confirm: ConfirmAction::ForcePush,
                };
                Dispatch::Continue
            }
            Some(PushReadiness::Ready) => Dispatch::Run(WorkerJob::Push(PushMode::Normal)),
        }
    }

    async fn handle_modal_key(
        &self,
        state: &mut AppState,
        tasks: &mut AsyncTaskManager,
        key: KeyEvent,
    ) -> Dispatch {
        let submit = match state.modal.handle_key(key) {
            ModalOutcome::Pending => return Dispatch::Continue,
            ModalOutcome::Closed => {
                state.modal = Modal::None;
                return Dispatch::Continue;
            }
            ModalOutcome::Submit(submit) => submit,
        };
        state.modal = Modal::None;

        match submit {
            ModalSubmit::Input { action, value } => self.submit_input(state, tasks, action, value).await,
            ModalSubmit::Commit {
                title,
                message,
                amend,
            } => {
                let files = state.marked_paths();
                let result = if amend {
                    self.critical(tasks, self.mutator.amend(&title, &message, &files))
                        .await
                } else {
                    self.critical(tasks, self.mutator.commit(&title, &message, &files))
                        .await
                };
                match result {
                    Ok(()) => {
                        for file in &mut state.files {
                            file.marked = false;
                        }
                        state.refresh_files(&self.query).await;
                        state.refresh_commits(&self.query).await;
                        state.refresh_branches(&self.query).await;
                        state.reload_content(&self.query, true).await;
                    }
                    Err(e) => state.modal = Modal::error(e.to_string()),
                }
            }
            ModalSubmit::HardReset => {
                let index = state.selected_commit;
                let result = self.critical(tasks, self.mutator.reset_hard(index)).await;
                self.after_reset(state, result).await;
            }
            ModalSubmit::Upstream { remote, branch } => {
                return Dispatch::Run(WorkerJob::Push(PushMode::SetUpstream { remote, branch }));
            }
            ModalSubmit::Confirm(ConfirmAction::ForcePush) => {
                return Dispatch::Run(WorkerJob::Push(PushMode::ForceWithLease));
            }
            ModalSubmit::DeleteBranch { branch, scope } => {
                match self
                    .critical(tasks, self.mutator.delete_branch(&branch, scope))
                    .await
                {
                    Err(Error::Git(GitError::NoUpstream(_))) => {
                        state.modal = Modal::error(NO_UPSTREAM_TO_DELETE);
                    }
                    result => self.after_branch_edit(state, result, None).await,
                }
            }
        }
        Dispatch::Continue
    }

    async fn submit_input(
        &self,
        state: &mut AppState,
        tasks: &mut AsyncTaskManager,
        action: InputAction,
        value: String,
    ) {
        match action {
            InputAction::CreateStash => {
                let result = self.critical(tasks, self.mutator.stash_create(&value)).await;
                self.after_stash_edit(state, result).await;
            }
            InputAction::CreateBranch => {
                let result = self.critical(tasks, self.mutator.create_branch(&value)).await;
                match result {
                    Ok(name) => self.after_branch_edit(state, Ok(()), Some(name)).await,
                    Err(e) => self.after_branch_edit(state, Err(e), None).await,
                }
            }
            InputAction::RenameBranch { old } => {
                let result = self
                    .critical(tasks, self.mutator.rename_branch(&old, &value))
                    .await;
                match result {
                    Ok(name) => self.after_branch_edit(state, Ok(()), Some(name)).await,
                    Err(e) => self.after_branch_edit(state, Err(e), None).await,
                }
            }
        }
    }

    /// Run a mutation with background refreshes held off
    async fn critical<T>(
        &self,
        tasks: &mut AsyncTaskManager,
        op: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        tasks.begin_critical();
        let result = op.await;
        tasks.end_critical();
        result
    }

    async fn after_reset(&self, state: &mut AppState, result: Result<bool>) {
        match result {
            Ok(true) => {
                info!("Reset applied");
                state.refresh_files(&self.query).await;
                state.refresh_commits(&self.query).await;
                state.refresh_branches(&self.query).await;
                state.reload_content(&self.query, true).await;
            }
            Ok(false) => debug!("Reset ignored for commit {}", state.selected_commit),
            Err(e) => state.modal = Modal::error(e.to_string()),
        }
    }

    /// Refresh after a branch edit, selecting `select` if given
    async fn after_branch_edit(&self, state: &mut AppState, result: Result<()>, select: Option<String>) {
        if let Err(e) = result {
            state.modal = Modal::error(e.to_string());
            return;
        }
        state.refresh_branches(&self.query).await;
        if let Some(name) = select {
            if let Some(index) = state.branches.iter().position(|b| b.name == name) {
                state.set_selection(ViewMode::BranchList, index);
            }
        }
        state.refresh_files(&self.query).await;
        state.refresh_commits(&self.query).await;
        state.reload_content(&self.query, true).await;
    }

    async fn after_stash_edit(&self, state: &mut AppState, result: Result<()>) {
        if let Err(e) = result {
            state.modal = Modal::error(e.to_string());
            return;
        }
        state.refresh_stashes(&self.query).await;
        state.refresh_files(&self.query).await;
        state.reload_content(&self.query, true).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Limits};
    use crate::git::{Branch, Commit, GitExecutor, Stash, WorkspaceFile};
    use crossterm::event::{KeyCode, KeyModifiers};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    struct Harness {
        _temp: TempDir,
        dispatcher: InputDispatcher,
        tasks: AsyncTaskManager,
        state: AppState,
    }

    impl Harness {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let git = GitExecutor::new(temp.path());
            let query = RepoQuery::new(git.clone(), Limits::default());
            let mutator = RepoMutator::new(git.clone(), query.clone());
            let config = Config {
                fetch_interval_secs: 0,
                ..Config::default()
            };
            Self {
                dispatcher: InputDispatcher::new(query, mutator),
                tasks: AsyncTaskManager::new(git, &config),
                state: AppState::default(),
                _temp: temp,
            }
        }

        async fn press(&mut self, code: KeyCode) -> Dispatch {
            self.press_with(code, KeyModifiers::NONE).await
        }

        async fn press_with(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Dispatch {
            self.dispatcher
                .handle_key(&mut self.state, &mut self.tasks, KeyEvent::new(code, modifiers))
                .await
        }
    }

    fn branch(name: &str, is_current: bool, behind: u32) -> Branch {
        Branch {
            name: name.to_string(),
            is_current,
            ahead: 0,
            behind,
        }
    }

    #[tokio::test]
    async fn test_quit_only_from_file_list() {
        let mut h = Harness::new();
        h.state.mode = ViewMode::CommitList;
        assert_eq!(h.press(KeyCode::Char('q')).await, Dispatch::Continue);
        assert_eq!(h.press(KeyCode::Esc).await, Dispatch::Continue);
        assert_eq!(h.state.mode, ViewMode::FileList);
        assert_eq!(h.press(KeyCode::Char('q')).await, Dispatch::Quit);
    }

    #[tokio::test]
    async fn test_ctrl_c_quits_from_anywhere() {
        let mut h = Harness::new();
        h.state.mode = ViewMode::StashView;
        assert_eq!(
            h.press_with(KeyCode::Char('c'), KeyModifiers::CONTROL).await,
            Dispatch::Quit
        );
    }

    #[tokio::test]
    async fn test_mode_transitions() {
        let mut h = Harness::new();
        h.state.set_commits(vec![Commit {
            hash: "abc1234".to_string(),
            initials: "JD".to_string(),
            title: "init".to_string(),
            pushed: false,
        }]);

        h.press(KeyCode::Tab).await;
        assert_eq!(h.state.mode, ViewMode::CommitList);
        h.press(KeyCode::Enter).await;
        assert_eq!(h.state.mode, ViewMode::CommitView);
        h.press(KeyCode::Esc).await;
        assert_eq!(h.state.mode, ViewMode::CommitList);
        h.press(KeyCode::Tab).await;
        assert_eq!(h.state.mode, ViewMode::FileList);

        h.press(KeyCode::Char('3')).await;
        assert_eq!(h.state.mode, ViewMode::BranchList);
        h.press(KeyCode::Char('5')).await;
        assert_eq!(h.state.mode, ViewMode::StashList);
        h.press(KeyCode::Char('2')).await;
        assert_eq!(h.state.mode, ViewMode::FileView);
    }

    #[tokio::test]
    async fn test_enter_on_empty_list_stays() {
        let mut h = Harness::new();
        h.state.mode = ViewMode::StashList;
        h.press(KeyCode::Enter).await;
        assert_eq!(h.state.mode, ViewMode::StashList);
    }

    #[tokio::test]
    async fn test_commit_requires_marked_files() {
        let mut h = Harness::new();
        h.state.set_files(vec![WorkspaceFile::new("a.txt", 'M')]);
        h.press(KeyCode::Char('c')).await;
        assert_eq!(h.state.modal, Modal::error(NO_FILES_MARKED));

        // any key closes the error
        h.press(KeyCode::Char('x')).await;
        assert!(!h.state.modal.is_open());

        h.press(KeyCode::Char(' ')).await;
        h.press(KeyCode::Char('c')).await;
        assert!(matches!(h.state.modal, Modal::CommitEditor { amend: false, .. }));
    }

    #[tokio::test]
    async fn test_navigation_clamps() {
        let mut h = Harness::new();
        h.state.set_files(vec![WorkspaceFile::new("a", 'M'), WorkspaceFile::new("b", 'A')]);
        for _ in 0..5 {
            h.press(KeyCode::Char('j')).await;
        }
        assert_eq!(h.state.selected_file, 1);
        for _ in 0..5 {
            h.press(KeyCode::Up).await;
        }
        assert_eq!(h.state.selected_file, 0);
    }

    #[tokio::test]
    async fn test_branch_guards() {
        let mut h = Harness::new();
        h.state.set_branches(vec![branch("main", true, 0), branch("topic", false, 2)]);
        h.state.mode = ViewMode::BranchList;

        h.press(KeyCode::Char('d')).await;
        assert_eq!(h.state.modal, Modal::error(CANNOT_DELETE_CURRENT));
        h.press(KeyCode::Esc).await;

        h.press(KeyCode::Char('p')).await;
        assert_eq!(h.state.modal, Modal::error(NOTHING_TO_PULL));
        h.press(KeyCode::Esc).await;

        h.press(KeyCode::Down).await;
        assert_eq!(h.press(KeyCode::Char('p')).await, Dispatch::Run(WorkerJob::Pull));
        h.press(KeyCode::Char('d')).await;
        assert_eq!(h.state.modal, Modal::delete_branch("topic"));
    }

    #[tokio::test]
    async fn test_hard_reset_only_offered_for_latest_commit() {
        let mut h = Harness::new();
        let commit = |hash: &str| Commit {
            hash: hash.to_string(),
            initials: "AB".to_string(),
            title: "t".to_string(),
            pushed: true,
        };
        h.state.set_commits(vec![commit("a"), commit("b")]);
        h.state.mode = ViewMode::CommitList;
        h.state.selected_commit = 1;

        h.press(KeyCode::Char('R')).await;
        assert!(!h.state.modal.is_open());

        h.state.selected_commit = 0;
        h.press(KeyCode::Char('R')).await;
        assert!(matches!(h.state.modal, Modal::HardReset { .. }));
    }

    #[tokio::test]
    async fn test_stash_keys_ignored_without_stashes() {
        let mut h = Harness::new();
        h.state.mode = ViewMode::StashList;
        assert_eq!(h.press(KeyCode::Char('g')).await, Dispatch::Continue);
        assert!(!h.state.modal.is_open());

        // failing drop outside a repository raises an error modal
        h.state.set_stashes(vec![Stash {
            description: "stash@{0}: On main: wip".to_string(),
        }]);
        h.press(KeyCode::Char('d')).await;
        assert!(matches!(h.state.modal, Modal::Error { .. }));
        assert!(!h.tasks.is_critical());
    }
}
