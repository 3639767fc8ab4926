//! gitdeck - A multi-panel terminal workspace for driving a git repository
//!
//! This crate renders a five-panel view of a repository (changed files,
//! branches, commits, stashes and a content pane) and drives the `git` CLI
//! for every read and write.
//!
//! # Architecture
//!
//! The application is a single cooperative loop built from:
//! - **RepoQuery** - Read-only git invocations parsed into entities
//! - **RepoMutator** - State-changing git invocations
//! - **AsyncTaskManager** - Background fetch and push/pull workers
//! - **AppState** - The single owned UI/data state
//! - **InputDispatcher** - (mode, key) state machine
//! - **AnimationEngine** - Status line animations
//! - **PanelRenderer** - Pure projection of AppState to the terminal
//!
//! # Modules
//!
//! - [`git`] - git executor, parsers and repository operations
//! - [`tui`] - Event-driven terminal UI with ratatui
//! - [`config`] - Layered configuration
//! - [`error`] - Error types

pub mod config;
pub mod error;
pub mod git;
pub mod tui;

pub use config::{Config, Limits};
pub use error::{Error, Result};
pub use git::{Branch, Commit, ContentLine, LineKind, RepoMutator, RepoQuery, Stash, WorkspaceFile};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
