//! Main TUI application
//!
//! Event-driven loop that coordinates:
//! - Terminal setup, rendering and restore
//! - Per-tick fetch supervision and animation
//! - Key dispatch, including supervised push/pull workers

use std::io::{self, Stdout};
use std::path::Path;

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use tracing::{debug, info, warn};

use super::event::{AppEvent, EventLoop, InputEvent};
use super::input::{Dispatch, InputDispatcher};
use super::state::AppState;
use super::tasks::{AsyncTaskManager, WorkerJob};
use super::theme::Theme;
use super::widgets::{self, PanelLayout};
use crate::config::Config;
use crate::error::{Result, TuiError};
use crate::git::{GitBackend, GitExecutor, RepoMutator, RepoQuery};

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Main TUI application
pub struct App {
    /// Configuration
    config: Config,
    dispatcher: InputDispatcher,
    tasks: AsyncTaskManager,
    /// Owned for the lifetime of one TUI session
    state: AppState,
    theme: Theme,
    event_loop: EventLoop,
}

impl App {
    /// Create an application for the repository containing `dir`.
    ///
    /// Outside a repository the panels simply stay empty.
    pub fn new(config: Config, dir: &Path) -> Self {
        let (root, repo_name, head) = match GitBackend::discover(dir) {
            Ok(backend) => (
                backend.root().to_path_buf(),
                backend.repo_name(),
                backend.current_branch().ok(),
            ),
            Err(e) => {
                warn!("{}", e);
                let name = dir
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| dir.display().to_string());
                (dir.to_path_buf(), name, None)
            }
        };

        let git = GitExecutor::new(root).with_timeout(config.command_timeout());
        let query = RepoQuery::new(git.clone(), config.limits.clone());
        let mutator = RepoMutator::new(git.clone(), query.clone());

        let mut state = AppState::new(repo_name);
        state.head_name = head.unwrap_or_default();

        Self {
            tasks: AsyncTaskManager::new(git, &config),
            dispatcher: InputDispatcher::new(query, mutator),
            state,
            theme: Theme::default(),
            event_loop: EventLoop::new(),
            config,
        }
    }

    /// Run the application until the user quits
    pub async fn run(&mut self) -> Result<()> {
        GitExecutor::check_installed().await?;

        let mut terminal = self.setup_terminal()?;
        let result = self.session(&mut terminal).await;
        info!("Main loop exited with result: {:?}", result.is_ok());

        self.tasks.shutdown().await;

        // Restore even when the loop failed
        let restored = self.restore_terminal(&mut terminal);
        result.and(restored)
    }

    async fn session(&mut self, terminal: &mut Term) -> Result<()> {
        self.load_initial(terminal).await?;
        self.event_loop.start(self.config.tick_rate());

        info!("Entering main loop");
        self.main_loop(terminal).await
    }

    /// Files, stashes, branches, commits, then the first file's diff
    async fn load_initial(&mut self, terminal: &Term) -> Result<()> {
        self.update_viewport(terminal)?;
        let query = self.dispatcher.query();
        self.state.refresh_files(query).await;
        self.state.refresh_stashes(query).await;
        self.state.refresh_branches(query).await;
        self.state.refresh_commits(query).await;
        self.state.reload_content(query, false).await;
        Ok(())
    }

    /// Setup terminal for TUI
    fn setup_terminal(&self) -> Result<Term> {
        enable_raw_mode().map_err(|e| TuiError::InitFailed(e.to_string()))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|e| TuiError::InitFailed(e.to_string()))?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).map_err(|e| TuiError::InitFailed(e.to_string()))?;

        Ok(terminal)
    }

    /// Restore terminal to normal state
    fn restore_terminal(&self, terminal: &mut Term) -> Result<()> {
        disable_raw_mode().map_err(|e| TuiError::RestoreFailed(e.to_string()))?;

        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .map_err(|e| TuiError::RestoreFailed(e.to_string()))?;

        terminal
            .show_cursor()
            .map_err(|e| TuiError::RestoreFailed(e.to_string()))?;

        info!("Terminal restore complete");
        Ok(())
    }

    /// Size the content viewport from the current terminal size
    fn update_viewport(&mut self, terminal: &Term) -> Result<()> {
        let size = terminal
            .size()
            .map_err(|e| TuiError::RenderError(e.to_string()))?;
        let layout = PanelLayout::compute(Rect::new(0, 0, size.width, size.height));
        self.state.content.set_viewport(layout.content_viewport());
        Ok(())
    }

    fn draw(terminal: &mut Term, state: &AppState, theme: &Theme) -> Result<()> {
        terminal
            .draw(|f| widgets::render(f, state, theme))
            .map_err(|e| TuiError::RenderError(e.to_string()))?;
        Ok(())
    }

    /// Main event loop
    async fn main_loop(&mut self, terminal: &mut Term) -> Result<()> {
        loop {
            Self::draw(terminal, &self.state, &self.theme)?;

            let Some(event) = self.event_loop.next().await else {
                break;
            };

            match event {
                AppEvent::Tick => {
                    self.tasks.maybe_start_fetch(&mut self.state);
                    self.tasks
                        .poll_fetch(&mut self.state, self.dispatcher.query())
                        .await;
                    self.state.sync.tick();
                }
                AppEvent::Input(InputEvent::Resize(w, h)) => {
                    debug!("Resized to {}x{}", w, h);
                    terminal
                        .clear()
                        .map_err(|e| TuiError::RenderError(e.to_string()))?;
                    self.update_viewport(terminal)?;
                }
                AppEvent::Input(InputEvent::Key(key)) => {
                    let dispatch = self
                        .dispatcher
                        .handle_key(&mut self.state, &mut self.tasks, key)
                        .await;
                    match dispatch {
                        Dispatch::Continue => {}
                        Dispatch::Quit => self.state.should_quit = true,
                        Dispatch::Run(job) => self.run_job(terminal, job).await?,
                    }
                }
            }

            if self.state.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Supervise a push or pull, redrawing while it runs
    async fn run_job(&mut self, terminal: &mut Term, job: WorkerJob) -> Result<()> {
        self.event_loop.pause_input();
        let theme = &self.theme;
        let result = self
            .tasks
            .supervise(job, &mut self.state, self.dispatcher.query(), |state| {
                Self::draw(terminal, state, theme)
            })
            .await;
        self.event_loop.resume_input();
        result.map(|_| ())
    }
}
