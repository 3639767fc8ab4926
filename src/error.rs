//! Error types for gitdeck
//!
//! Uses `thiserror` for ergonomic error definitions with automatic `Display` and `Error` impls.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Top-level error type for gitdeck
#[derive(Error, Debug)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TUI error: {0}")]
    Tui(#[from] TuiError),
}

/// Git invocation errors
#[derive(Error, Debug)]
pub enum GitError {
    #[error("git is not installed or not in PATH")]
    NotInstalled,

    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    #[error("git command failed: {command} - {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("git command timed out after {0:?}")]
    Timeout(Duration),

    #[error("Branch '{0}' has no upstream")]
    NoUpstream(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Gitoxide error: {0}")]
    Gix(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Failed to create config directory: {0}")]
    DirectoryCreationFailed(PathBuf),
}

/// TUI-related errors
#[derive(Error, Debug)]
pub enum TuiError {
    #[error("Failed to initialize terminal: {0}")]
    InitFailed(String),

    #[error("Failed to restore terminal: {0}")]
    RestoreFailed(String),

    #[error("Render error: {0}")]
    RenderError(String),
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GitError::NotInstalled;
        assert!(err.to_string().contains("not installed"));

        let err = GitError::NotARepository(PathBuf::from("/tmp/foo"));
        assert!(err.to_string().contains("/tmp/foo"));

        let err = GitError::CommandFailed {
            command: "git push".to_string(),
            stderr: "rejected".to_string(),
        };
        assert!(err.to_string().contains("git push"));
        assert!(err.to_string().contains("rejected"));
    }

    #[test]
    fn test_error_conversion() {
        let git_err = GitError::NoUpstream("feature".to_string());
        let top_err: Error = git_err.into();
        assert!(matches!(top_err, Error::Git(GitError::NoUpstream(_))));

        let config_err = ConfigError::LoadFailed("bad toml".to_string());
        let _top_err: Error = config_err.into();
    }
}
