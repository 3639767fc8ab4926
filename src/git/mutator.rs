//! State-changing git operations
//!
//! Each operation reports success or a [`GitError`]. Refreshing the
//! panels afterwards is the caller's job.

use tracing::{info, instrument};

use super::executor::GitExecutor;
use super::model::DeleteScope;
use super::query::RepoQuery;
use crate::error::{GitError, Result};

/// How a push worker should invoke git
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushMode {
    /// Plain push to the configured upstream
    Normal,
    /// `--force-with-lease` after the user confirmed a divergence
    ForceWithLease,
    /// First push of a branch, setting its upstream
    SetUpstream { remote: String, branch: String },
}

impl PushMode {
    /// Arguments for the background push worker
    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["push".to_string()];
        match self {
            PushMode::Normal => {}
            PushMode::ForceWithLease => args.push("--force-with-lease".to_string()),
            PushMode::SetUpstream { remote, branch } => {
                args.push("--set-upstream".to_string());
                args.push(remote.clone());
                args.push(branch.clone());
            }
        }
        args
    }
}

/// Arguments for the background pull worker
pub fn pull_args() -> Vec<String> {
    vec!["pull".to_string()]
}

/// Replace whitespace runs in a branch name with dashes
pub fn sanitize_branch_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("-")
}

/// State-changing git invocations
#[derive(Debug, Clone)]
pub struct RepoMutator {
    git: GitExecutor,
    query: RepoQuery,
}

impl RepoMutator {
    pub fn new(git: GitExecutor, query: RepoQuery) -> Self {
        Self { git, query }
    }

    /// Stage each path individually
    async fn stage(&self, paths: &[String]) -> Result<()> {
        for path in paths {
            self.git.execute(&["add", "--", path]).await?;
        }
        Ok(())
    }

    fn message_args<'a>(title: &'a str, message: &'a str) -> Vec<&'a str> {
        let mut args = vec!["-m", title];
        if !message.trim().is_empty() {
            args.push("-m");
            args.push(message);
        }
        args
    }

    /// Stage the marked files and commit them
    #[instrument(skip(self, message))]
    pub async fn commit(&self, title: &str, message: &str, files: &[String]) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(GitError::InvalidInput("commit title is empty".to_string()).into());
        }

        self.stage(files).await?;

        let mut args = vec!["commit"];
        args.extend(Self::message_args(title, message));
        self.git.execute(&args).await?;

        info!("Committed {} file(s)", files.len());
        Ok(())
    }

    /// Re-stage newly marked files and rewrite HEAD with a new message
    #[instrument(skip(self, message))]
    pub async fn amend(&self, title: &str, message: &str, files: &[String]) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(GitError::InvalidInput("commit title is empty".to_string()).into());
        }

        self.stage(files).await?;

        let mut args = vec!["commit", "--amend"];
        args.extend(Self::message_args(title, message));
        self.git.execute(&args).await?;

        info!("Amended HEAD");
        Ok(())
    }

    /// Undo the latest commit keeping its changes staged.
    ///
    /// Only the most recent commit (index 0) may be reset; any other index
    /// is a no-op and returns `false`.
    #[instrument(skip(self))]
    pub async fn reset_soft(&self, commit_index: usize) -> Result<bool> {
        if commit_index != 0 {
            return Ok(false);
        }
        self.git.execute(&["reset", "--soft", "HEAD~1"]).await?;
        info!("Soft reset HEAD~1");
        Ok(true)
    }

    /// Discard the latest commit and its changes. Same index rule as
    /// [`RepoMutator::reset_soft`].
    #[instrument(skip(self))]
    pub async fn reset_hard(&self, commit_index: usize) -> Result<bool> {
        if commit_index != 0 {
            return Ok(false);
        }
        self.git.execute(&["reset", "--hard", "HEAD~1"]).await?;
        info!("Hard reset HEAD~1");
        Ok(true)
    }

    /// Create and switch to a new branch, returning the sanitized name
    #[instrument(skip(self))]
    pub async fn create_branch(&self, name: &str) -> Result<String> {
        let name = sanitize_branch_name(name);
        if name.is_empty() {
            return Err(GitError::InvalidInput("branch name is empty".to_string()).into());
        }
        self.git.execute(&["checkout", "-b", &name]).await?;
        info!("Created branch {}", name);
        Ok(name)
    }

    #[instrument(skip(self))]
    pub async fn rename_branch(&self, old: &str, new: &str) -> Result<String> {
        let new = sanitize_branch_name(new);
        if new.is_empty() || new == old {
            return Err(GitError::InvalidInput(format!(
                "'{}' is not a new name for '{}'",
                new, old
            ))
            .into());
        }
        self.git.execute(&["branch", "-m", old, &new]).await?;
        info!("Renamed branch {} to {}", old, new);
        Ok(new)
    }

    /// Delete a branch locally, on `origin`, or both.
    ///
    /// Remote deletion is refused when the branch has no upstream.
    #[instrument(skip(self))]
    pub async fn delete_branch(&self, name: &str, scope: DeleteScope) -> Result<()> {
        if scope.includes_remote() && !self.query.has_upstream(name).await {
            return Err(GitError::NoUpstream(name.to_string()).into());
        }

        if matches!(scope, DeleteScope::Local | DeleteScope::Both) {
            self.git.execute(&["branch", "-D", name]).await?;
        }
        if scope.includes_remote() {
            self.git
                .execute(&["push", "origin", "--delete", name])
                .await?;
        }

        info!("Deleted branch {} ({:?})", name, scope);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn checkout(&self, name: &str) -> Result<()> {
        self.git.execute(&["checkout", name]).await?;
        info!("Checked out {}", name);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn stash_create(&self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GitError::InvalidInput("stash name is empty".to_string()).into());
        }
        self.git.execute(&["stash", "push", "-m", name]).await?;
        info!("Created stash '{}'", name);
        Ok(())
    }

    /// Apply a stash and keep it in the list
    #[instrument(skip(self))]
    pub async fn stash_apply(&self, index: usize) -> Result<()> {
        let stash_ref = format!("stash@{{{}}}", index);
        self.git.execute(&["stash", "apply", &stash_ref]).await?;
        Ok(())
    }

    /// Apply a stash and remove it
    #[instrument(skip(self))]
    pub async fn stash_pop(&self, index: usize) -> Result<()> {
        let stash_ref = format!("stash@{{{}}}", index);
        self.git.execute(&["stash", "pop", &stash_ref]).await?;
        Ok(())
    }

    /// Remove a stash without applying it
    #[instrument(skip(self))]
    pub async fn stash_drop(&self, index: usize) -> Result<()> {
        let stash_ref = format!("stash@{{{}}}", index);
        self.git.execute(&["stash", "drop", &stash_ref]).await?;
        Ok(())
    }
}
