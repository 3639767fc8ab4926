//! Background git workers
//!
//! Two kinds of worker process exist:
//! - A periodic `git fetch`, spawned at most once per interval and polled
//!   with a non-blocking `try_wait` on every tick
//! - A push or pull, supervised by a loop that keeps animating and
//!   redrawing until the process exits
//!
//! A critical flag keeps a finished fetch from refreshing the panels while
//! a user-initiated mutation is running.

use std::process::ExitStatus;
use std::time::{Duration, Instant};

use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use tokio::process::Child;
use tracing::{debug, info, warn};

use super::animation::SyncKind;
use super::modal::Modal;
use super::state::AppState;
use crate::config::Config;
use crate::error::Result;
use crate::git::{GitExecutor, PushMode, RepoQuery, pull_args};

/// How long a terminated fetch gets to exit before it is killed
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// A user-initiated network operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerJob {
    Push(PushMode),
    Pull,
}

impl WorkerJob {
    pub fn args(&self) -> Vec<String> {
        match self {
            WorkerJob::Push(mode) => mode.args(),
            WorkerJob::Pull => pull_args(),
        }
    }

    /// Animation shown while the worker runs
    pub fn animation(&self) -> SyncKind {
        match self {
            WorkerJob::Push(_) => SyncKind::Pushing,
            WorkerJob::Pull => SyncKind::Pulling,
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            WorkerJob::Push(_) => "Push failed. Check your network connection and authentication.",
            WorkerJob::Pull => "Pull failed. Check your network connection.",
        }
    }
}

/// Supervisor for fetch, push and pull worker processes
pub struct AsyncTaskManager {
    git: GitExecutor,
    /// Outstanding fetch, at most one
    fetch: Option<Child>,
    last_fetch: Option<Instant>,
    /// `None` disables periodic fetch
    fetch_interval: Option<Duration>,
    tick_rate: Duration,
    poll_interval: Duration,
    critical: bool,
}

impl AsyncTaskManager {
    pub fn new(git: GitExecutor, config: &Config) -> Self {
        Self {
            git,
            fetch: None,
            last_fetch: None,
            fetch_interval: config.fetch_interval(),
            tick_rate: config.tick_rate(),
            poll_interval: config.worker_poll_interval(),
            critical: false,
        }
    }

    pub fn begin_critical(&mut self) {
        self.critical = true;
    }

    pub fn end_critical(&mut self) {
        self.critical = false;
    }

    pub fn is_critical(&self) -> bool {
        self.critical
    }

    pub fn fetch_in_progress(&self) -> bool {
        self.fetch.is_some()
    }

    fn fetch_due(&self, now: Instant) -> bool {
        let Some(interval) = self.fetch_interval else {
            return false;
        };
        match self.last_fetch {
            Some(last) => now.duration_since(last) >= interval,
            None => true,
        }
    }

    /// Spawn a background fetch if one is due and nothing conflicts with it
    pub fn maybe_start_fetch(&mut self, state: &mut AppState) {
        let now = Instant::now();
        if self.fetch.is_some() || self.critical || !self.fetch_due(now) {
            return;
        }
        self.last_fetch = Some(now);

        match self.git.spawn(&["fetch", "--all", "--quiet"]) {
            Ok(child) => {
                debug!("Background fetch started");
                self.fetch = Some(child);
                if state.sync.is_idle() {
                    state.sync.start(SyncKind::Fetching);
                }
            }
            // The user never asked for this fetch, so failures stay silent
            Err(e) => debug!("Background fetch not started: {}", e),
        }
    }

    /// Non-blocking completion check for the background fetch.
    ///
    /// On success the file, commit and branch lists are re-queried without
    /// moving the user's selection, cursor or scroll.
    pub async fn poll_fetch(&mut self, state: &mut AppState, query: &RepoQuery) {
        if self.critical {
            return;
        }
        let Some(child) = self.fetch.as_mut() else {
            return;
        };

        let succeeded = match child.try_wait() {
            Ok(None) => return,
            Ok(Some(status)) => status.success(),
            Err(e) => {
                debug!("Background fetch could not be polled: {}", e);
                false
            }
        };
        self.fetch = None;

        if succeeded {
            debug!("Background fetch finished");
            state.refresh_files(query).await;
            state.refresh_commits(query).await;
            state.refresh_branches(query).await;
            state.reload_content(query, true).await;
            if state.sync.kind() == SyncKind::Fetching {
                state.sync.finish();
            }
        } else if state.sync.kind() == SyncKind::Fetching {
            state.sync.reset();
        }
    }

    /// Run a push or pull to completion while animating.
    ///
    /// `redraw` is called after every animation step. Returns whether the
    /// worker succeeded; a failure is reported through an error modal.
    pub async fn supervise<F>(
        &mut self,
        job: WorkerJob,
        state: &mut AppState,
        query: &RepoQuery,
        redraw: F,
    ) -> Result<bool>
    where
        F: FnMut(&AppState) -> Result<()>,
    {
        self.begin_critical();
        let result = self.run_worker(&job, state, redraw).await;
        self.end_critical();

        let succeeded = match result? {
            Some(status) => status.success(),
            None => false,
        };

        if succeeded {
            info!("{:?} finished", job);
            state.sync.finish();
            state.refresh_all(query).await;
            state.active_branch = state.current_branch_index();
        } else {
            warn!("{:?} failed", job);
            state.sync.reset();
            state.active_branch = None;
            state.modal = Modal::error(job.failure_message());
        }
        Ok(succeeded)
    }

    async fn run_worker<F>(
        &self,
        job: &WorkerJob,
        state: &mut AppState,
        mut redraw: F,
    ) -> Result<Option<ExitStatus>>
    where
        F: FnMut(&AppState) -> Result<()>,
    {
        let args = job.args();
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        state.sync.start(job.animation());
        state.active_branch = state.current_branch_index();

        let mut child = match self.git.spawn(&args) {
            Ok(child) => child,
            Err(e) => {
                warn!("Could not start {:?}: {}", job, e);
                return Ok(None);
            }
        };

        let mut last_poll = Instant::now();
        loop {
            if last_poll.elapsed() >= self.poll_interval {
                last_poll = Instant::now();
                match child.try_wait() {
                    Ok(Some(status)) => return Ok(Some(status)),
                    Ok(None) => {}
                    Err(e) => {
                        warn!("Could not poll {:?}: {}", job, e);
                        return Ok(None);
                    }
                }
            }

            state.sync.tick();
            redraw(state)?;
            tokio::time::sleep(self.tick_rate).await;
        }
    }

    /// Terminate an outstanding fetch and reap it
    pub async fn shutdown(&mut self) {
        let Some(mut child) = self.fetch.take() else {
            return;
        };

        if let Some(pid) = child.id().and_then(|id| i32::try_from(id).ok()) {
            if let Err(e) = kill(Pid::from_raw(pid), Signal::SIGTERM) {
                debug!("SIGTERM to fetch {} failed: {}", pid, e);
            }
        }

        match tokio::time::timeout(SHUTDOWN_GRACE, child.wait()).await {
            Ok(Ok(status)) => debug!("Background fetch exited with {}", status),
            Ok(Err(e)) => debug!("Background fetch could not be reaped: {}", e),
            Err(_) => {
                debug!("Background fetch outlived SIGTERM, killing it");
                if let Err(e) = child.kill().await {
                    debug!("Background fetch could not be killed: {}", e);
                }
            }
        }
    }
}
