//! Read-only repository queries
//!
//! Every operation is independently fallible, and every failure (git
//! missing, not a repository, a command exiting non-zero) collapses to an
//! empty value. Callers cannot and must not tell that apart from a
//! legitimately empty result.

use std::collections::HashSet;

use tracing::{debug, instrument};

use super::content::{classify_branch_log, classify_detail, classify_diff, untracked_preview};
use super::executor::GitExecutor;
use super::model::{Branch, Commit, ContentLine, Stash, WorkspaceFile};
use super::parse;
use crate::config::Limits;

/// Remote refs tried, in order, when computing the unpushed set
const REMOTE_BASES: &[&str] = &["origin/HEAD", "origin/main", "origin/master"];

/// Upstream state of the current branch before a push
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushReadiness {
    /// No upstream configured; the user has to pick one
    NeedsUpstream { branch: String, remotes: Vec<String> },
    /// Local and remote both have commits the other lacks
    Diverged { ahead: u32, behind: u32 },
    /// A plain push is enough
    Ready,
}

/// Read-only queries against the git CLI
#[derive(Debug, Clone)]
pub struct RepoQuery {
    git: GitExecutor,
    limits: Limits,
}

fn cap<T>(mut items: Vec<T>, max: usize, what: &str) -> Vec<T> {
    if items.len() > max {
        debug!("{} list truncated from {} to {}", what, items.len(), max);
        items.truncate(max);
    }
    items
}

impl RepoQuery {
    pub fn new(git: GitExecutor, limits: Limits) -> Self {
        Self { git, limits }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Run a read command, mapping any failure to `None`
    async fn read(&self, args: &[&str]) -> Option<String> {
        match self.git.execute(args).await {
            Ok(output) => Some(output),
            Err(e) => {
                debug!("query failed: {}", e);
                None
            }
        }
    }

    async fn read_or_empty(&self, args: &[&str]) -> String {
        self.read(args).await.unwrap_or_default()
    }

    /// Files differing from HEAD, untracked files listed individually
    #[instrument(skip(self))]
    pub async fn list_changed_files(&self) -> Vec<WorkspaceFile> {
        let output = self
            .read_or_empty(&["status", "--porcelain", "--untracked-files=all"])
            .await;
        cap(parse::parse_status(&output), self.limits.max_files, "file")
    }

    /// Hashes reachable from HEAD but not from the best available remote ref
    async fn unpushed_hashes(&self) -> HashSet<String> {
        for base in REMOTE_BASES {
            let range = format!("{}..HEAD", base);
            if let Some(output) = self.read(&["log", &range, "--format=%h"]).await {
                let hashes = parse::parse_hash_set(&output);
                if !hashes.is_empty() {
                    return hashes;
                }
            }
        }
        HashSet::new()
    }

    /// The most recent `limit` commits on HEAD
    #[instrument(skip(self))]
    pub async fn list_commits(&self, limit: usize) -> Vec<Commit> {
        let count = format!("-n{}", limit);
        let Some(output) = self.read(&["log", &count, "--format=%h|%an|%s"]).await else {
            return Vec::new();
        };
        let unpushed = self.unpushed_hashes().await;
        parse::parse_log(&output, &unpushed)
    }

    /// Local branches with ahead/behind counts against their upstream
    #[instrument(skip(self))]
    pub async fn list_branches(&self) -> Vec<Branch> {
        let output = self.read_or_empty(&["branch", "--no-color"]).await;
        let names = cap(
            parse::parse_branch_list(&output),
            self.limits.max_branches,
            "branch",
        );

        let mut branches = Vec::with_capacity(names.len());
        for (name, is_current) in names {
            let (ahead, behind) = self.ahead_behind(&name).await.unwrap_or((0, 0));
            branches.push(Branch {
                name,
                is_current,
                ahead,
                behind,
            });
        }
        branches
    }

    /// `(ahead, behind)` relative to the branch's configured upstream,
    /// falling back to `origin/<branch>`. `None` when neither exists.
    pub async fn ahead_behind(&self, branch: &str) -> Option<(u32, u32)> {
        let tracking = if self.has_upstream(branch).await {
            format!("{}@{{upstream}}", branch)
        } else {
            let remote_ref = format!("refs/remotes/origin/{}", branch);
            if !self
                .git
                .succeeds(&["show-ref", "--verify", "--quiet", &remote_ref])
                .await
            {
                return None;
            }
            format!("origin/{}", branch)
        };

        let range = format!("{}...{}", branch, tracking);
        let output = self
            .read_or_empty(&["rev-list", "--left-right", "--count", &range])
            .await;
        Some(parse::parse_left_right(&output))
    }

    #[instrument(skip(self))]
    pub async fn list_stashes(&self) -> Vec<Stash> {
        let output = self.read_or_empty(&["stash", "list"]).await;
        cap(parse::parse_stash_list(&output), self.limits.max_stashes, "stash")
    }

    pub async fn list_remotes(&self) -> Vec<String> {
        parse::parse_remotes(&self.read_or_empty(&["remote"]).await)
    }

    /// Whether git knows the path at all (tracked or staged)
    pub async fn is_tracked(&self, path: &str) -> bool {
        self.git
            .succeeds(&["ls-files", "--error-unmatch", "--", path])
            .await
    }

    /// Working copy diff against HEAD, or a preview of an untracked file
    #[instrument(skip(self))]
    pub async fn load_diff_for_file(&self, path: &str) -> Vec<ContentLine> {
        if !self.is_tracked(path).await {
            let full_path = self.git.root().join(path);
            match tokio::fs::read(&full_path).await {
                Ok(bytes) => {
                    return untracked_preview(
                        &String::from_utf8_lossy(&bytes),
                        self.limits.untracked_preview_lines,
                    );
                }
                // staged deletions are unknown to ls-files but still diff against HEAD
                Err(e) => debug!("cannot read untracked file {:?}: {}", full_path, e),
            }
        }

        let output = self
            .read_or_empty(&["diff", "--no-color", "HEAD", "--", path])
            .await;
        classify_diff(&output, self.limits.max_content_lines)
    }

    pub async fn load_commit_detail(&self, hash: &str) -> Vec<ContentLine> {
        let output = self
            .read_or_empty(&["show", "--no-color", "--stat", "--patch", hash])
            .await;
        classify_detail(&output, self.limits.max_content_lines)
    }

    pub async fn load_stash_detail(&self, index: usize) -> Vec<ContentLine> {
        let stash_ref = format!("stash@{{{}}}", index);
        let output = self
            .read_or_empty(&["stash", "show", "--no-color", "--stat", "--patch", &stash_ref])
            .await;
        classify_detail(&output, self.limits.max_content_lines)
    }

    pub async fn load_branch_commits(&self, name: &str) -> Vec<ContentLine> {
        let count = format!("-n{}", self.limits.max_commits);
        let output = self
            .read_or_empty(&["log", "--no-color", &count, name, "--"])
            .await;
        classify_branch_log(&output, self.limits.max_content_lines)
    }

    /// Current branch name, `None` when detached or unavailable
    pub async fn current_branch(&self) -> Option<String> {
        let output = self.read(&["rev-parse", "--abbrev-ref", "HEAD"]).await?;
        let name = output.trim();
        (!name.is_empty() && name != "HEAD").then(|| name.to_string())
    }

    pub async fn has_upstream(&self, branch: &str) -> bool {
        let upstream = format!("{}@{{upstream}}", branch);
        self.git
            .succeeds(&["rev-parse", "--abbrev-ref", &upstream])
            .await
    }

    /// Subject and body of the HEAD commit
    pub async fn head_message(&self) -> (String, String) {
        let subject = self
            .read_or_empty(&["log", "-1", "--pretty=format:%s"])
            .await;
        let body = self
            .read_or_empty(&["log", "-1", "--pretty=format:%b"])
            .await;
        parse::split_message(&subject, &body)
    }

    /// Decide how the current branch should be pushed.
    ///
    /// The upstream check always comes first.
    pub async fn push_readiness(&self) -> Option<PushReadiness> {
        let branch = self.current_branch().await?;
        if !self.has_upstream(&branch).await {
            let remotes = self.list_remotes().await;
            return Some(PushReadiness::NeedsUpstream { branch, remotes });
        }

        match self.ahead_behind(&branch).await {
            Some((ahead, behind)) if ahead > 0 && behind > 0 => {
                Some(PushReadiness::Diverged { ahead, behind })
            }
            _ => Some(PushReadiness::Ready),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn query_in(dir: &TempDir) -> RepoQuery {
        RepoQuery::new(GitExecutor::new(dir.path()), Limits::default())
    }

    #[tokio::test]
    async fn test_outside_repository_yields_empty() {
        let temp = TempDir::new().unwrap();
        let query = query_in(&temp);

        assert!(query.list_changed_files().await.is_empty());
        assert!(query.list_commits(20).await.is_empty());
        assert!(query.list_branches().await.is_empty());
        assert!(query.list_stashes().await.is_empty());
        assert!(query.current_branch().await.is_none());
        assert!(query.push_readiness().await.is_none());
    }

    #[test]
    fn test_cap_truncates() {
        let items: Vec<u32> = (0..10).collect();
        assert_eq!(cap(items, 4, "test"), vec![0, 1, 2, 3]);
    }
}
