//! git integration
//!
//! Every read and write goes through the `git` CLI and its text output:
//! - `GitExecutor` - Spawns git with a fixed root and a prompt-free environment
//! - `GitBackend` - gitoxide discovery of the repository root
//! - `RepoQuery` - Read-only queries parsed into entities
//! - `RepoMutator` - State-changing operations

mod backend;
pub mod content;
mod executor;
mod model;
mod mutator;
pub mod parse;
mod query;

pub use backend::*;
pub use executor::*;
pub use model::*;
pub use mutator::*;
pub use query::*;
