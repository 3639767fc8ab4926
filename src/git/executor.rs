//! Async git command executor
//!
//! Every git invocation goes through here:
//! - Runs against a fixed repository root (`git -C <root>`)
//! - Disables prompts, pagers and editors so nothing blocks the TUI
//! - Timeout handling for synchronous commands
//! - Detached spawning for background workers

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use crate::error::{GitError, Result};

/// Default command timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Environment applied to every git process
const GIT_ENV: &[(&str, &str)] = &[
    ("GIT_TERMINAL_PROMPT", "0"),
    ("GCM_INTERACTIVE", "never"),
    ("GIT_PAGER", "cat"),
    ("PAGER", "cat"),
    ("GIT_EDITOR", ":"),
    ("EDITOR", ":"),
    ("GIT_SEQUENCE_EDITOR", ":"),
    ("GIT_MERGE_AUTOEDIT", "no"),
    ("LC_ALL", "C"),
];

/// Async git command executor
#[derive(Debug, Clone)]
pub struct GitExecutor {
    /// Repository root every command runs in
    root: PathBuf,
    /// Command timeout
    timeout: Duration,
}

impl GitExecutor {
    /// Create an executor rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the command timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Repository root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check if git is installed and accessible
    pub async fn check_installed() -> Result<()> {
        let output = Command::new("git")
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|_| GitError::NotInstalled)?;

        if output.status.success() {
            let version = String::from_utf8_lossy(&output.stdout);
            debug!("git version: {}", version.trim());
            Ok(())
        } else {
            Err(GitError::NotInstalled.into())
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C")
            .arg(&self.root)
            // paths printed verbatim instead of octal-escaped
            .args(["-c", "core.quotePath=false"])
            .args(args)
            .stdin(Stdio::null());
        for (key, value) in GIT_ENV {
            cmd.env(key, value);
        }
        cmd
    }

    /// Execute a git command and return its stdout
    #[instrument(skip(self), fields(args = ?args))]
    pub async fn execute(&self, args: &[&str]) -> Result<String> {
        let mut cmd = self.command(args);
        cmd.stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        match timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => {
                if output.status.success() {
                    Ok(String::from_utf8_lossy(&output.stdout).to_string())
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                    debug!("git exited with {}: {}", output.status, stderr);
                    Err(GitError::CommandFailed {
                        command: format!("git {}", args.join(" ")),
                        stderr,
                    }
                    .into())
                }
            }
            Ok(Err(e)) => {
                warn!("failed to run git: {}", e);
                if e.kind() == std::io::ErrorKind::NotFound {
                    return Err(GitError::NotInstalled.into());
                }
                Err(GitError::CommandFailed {
                    command: format!("git {}", args.join(" ")),
                    stderr: e.to_string(),
                }
                .into())
            }
            Err(_) => Err(GitError::Timeout(self.timeout).into()),
        }
    }

    /// Run a command and report only whether it exited successfully
    pub async fn succeeds(&self, args: &[&str]) -> bool {
        self.execute(args).await.is_ok()
    }

    /// Spawn a detached worker process with output discarded
    ///
    /// The caller polls the returned child with `try_wait`.
    #[instrument(skip(self), fields(args = ?args))]
    pub fn spawn(&self, args: &[&str]) -> Result<Child> {
        let mut cmd = self.command(args);
        cmd.stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GitError::NotInstalled.into()
            } else {
                GitError::CommandFailed {
                    command: format!("git {}", args.join(" ")),
                    stderr: e.to_string(),
                }
                .into()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_executor_creation() {
        let executor = GitExecutor::new("/tmp");
        assert_eq!(executor.timeout, DEFAULT_TIMEOUT);
        assert_eq!(executor.root(), Path::new("/tmp"));
    }

    #[test]
    fn test_executor_with_custom_timeout() {
        let executor = GitExecutor::new("/tmp").with_timeout(Duration::from_secs(3));
        assert_eq!(executor.timeout, Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_failed_command_reports_command_line() {
        let temp = TempDir::new().unwrap();
        let executor = GitExecutor::new(temp.path());

        // Not a repository, so status fails
        let err = executor.execute(&["status", "--porcelain"]).await.unwrap_err();
        let message = err.to_string();
        assert!(
            message.contains("git status --porcelain") || message.contains("not installed"),
            "unexpected error: {message}"
        );
        assert!(!executor.succeeds(&["status"]).await);
    }
}
