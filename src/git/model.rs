//! Repository entities shown in the panels

/// A file differing from the last commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceFile {
    /// Path relative to the repository root
    pub path: String,
    /// One-letter change status (`M`, `A`, `D`, `R`, `?`, ...)
    pub status: char,
    /// Marked for the next commit (UI state only)
    pub marked: bool,
}

impl WorkspaceFile {
    pub fn new(path: impl Into<String>, status: char) -> Self {
        Self {
            path: path.into(),
            status,
            marked: false,
        }
    }
}

/// A commit as listed by `git log`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Abbreviated hash
    pub hash: String,
    /// Two-letter author initials
    pub initials: String,
    /// Subject line
    pub title: String,
    /// Reachable from the remote tracking ref at query time
    pub pushed: bool,
}

/// A local branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
    pub is_current: bool,
    /// Commits on the branch missing from its remote counterpart
    pub ahead: u32,
    /// Commits on the remote counterpart missing locally
    pub behind: u32,
}

/// One `git stash list` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stash {
    pub description: String,
}

/// Semantic kind of a content line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Context,
    Addition,
    Deletion,
    HunkHeader,
    CommitHeader,
    CommitInfo,
    StatLine,
}

/// A line in the content panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    pub text: String,
    pub kind: LineKind,
}

impl ContentLine {
    pub fn new(text: impl Into<String>, kind: LineKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    pub fn context(text: impl Into<String>) -> Self {
        Self::new(text, LineKind::Context)
    }

    /// Whitespace-only lines are skipped by cursor movement
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Which remote scope a branch deletion targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteScope {
    Local,
    Remote,
    Both,
}

impl DeleteScope {
    pub const ALL: [DeleteScope; 3] = [DeleteScope::Local, DeleteScope::Remote, DeleteScope::Both];

    pub fn label(self) -> &'static str {
        match self {
            DeleteScope::Local => "Local",
            DeleteScope::Remote => "Remote",
            DeleteScope::Both => "Both",
        }
    }

    pub fn includes_remote(self) -> bool {
        matches!(self, DeleteScope::Remote | DeleteScope::Both)
    }
}
