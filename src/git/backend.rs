//! Repository discovery using gitoxide
//!
//! Resolves the working tree root the git CLI is run against and supplies
//! the cheap header facts (repository name, HEAD) without spawning git.

use std::fmt;
use std::path::{Path, PathBuf};

use gix::Repository;
use tracing::{debug, instrument};

use crate::error::{GitError, Result};

/// Repository handle opened through gitoxide
pub struct GitBackend {
    /// The gitoxide repository handle
    repo: Repository,
    /// Working tree root
    root: PathBuf,
}

impl fmt::Debug for GitBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitBackend")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl GitBackend {
    /// Discover repository from a path (searches parent directories)
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn discover(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let repo = gix::discover(path).map_err(|_e| GitError::NotARepository(path.to_path_buf()))?;

        let root = repo
            .path()
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| GitError::NotARepository(path.to_path_buf()))?;

        debug!("Discovered repository at {:?}", root);

        Ok(Self { repo, root })
    }

    /// Working tree root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Short name of the current branch, or a detached HEAD description
    pub fn current_branch(&self) -> Result<String> {
        let head = self.repo.head().map_err(|e| GitError::Gix(e.to_string()))?;
        let head_id = head.id().map(|id| id.to_string());

        match head.kind {
            gix::head::Kind::Symbolic(reference) => Ok(reference.name.shorten().to_string()),
            gix::head::Kind::Detached { .. } => match head_id {
                Some(id) => {
                    let short = id.get(..7).unwrap_or(&id);
                    Ok(format!("HEAD detached at {}", short))
                }
                None => Ok("HEAD (no commits)".to_string()),
            },
            gix::head::Kind::Unborn(full_name) => Ok(full_name.shorten().to_string()),
        }
    }

    /// Get the repository name (directory name)
    pub fn repo_name(&self) -> String {
        self.root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discover_from_subdirectory() {
        let temp_dir = TempDir::new().unwrap();
        gix::init(temp_dir.path()).unwrap();
        let nested = temp_dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let backend = GitBackend::discover(&nested).unwrap();
        assert_eq!(
            backend.root().canonicalize().unwrap(),
            temp_dir.path().canonicalize().unwrap()
        );
        assert!(!backend.repo_name().is_empty());
    }

    #[test]
    fn test_unborn_branch_name() {
        let temp_dir = TempDir::new().unwrap();
        gix::init(temp_dir.path()).unwrap();

        let backend = GitBackend::discover(temp_dir.path()).unwrap();
        // Newly initialized repo has an unborn default branch
        let branch = backend.current_branch().unwrap();
        assert!(!branch.is_empty());
    }
}
