//! The repository collaborator used by the commit pipeline.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::change::ChangeRecord;
use crate::error::RepositoryError;

/// Read and mutate a repository's staged/unstaged state.
///
/// This abstraction allows mocking the repository in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryAccess: Send + Sync {
    /// Repository root; selections are made relative to it.
    fn root_path(&self) -> PathBuf;

    /// Current HEAD-to-index changes.
    async fn staged_changes(&self) -> Result<Vec<ChangeRecord>, RepositoryError>;

    /// Current index-to-working-tree changes, untracked files included.
    async fn unstaged_changes(&self) -> Result<Vec<ChangeRecord>, RepositoryError>;

    /// Add the given absolute paths to the index. An empty list is a no-op.
    async fn stage(&self, paths: &[PathBuf]) -> Result<(), RepositoryError>;

    /// Commit the index with `message`, returning the new commit id.
    async fn commit(&self, message: &str) -> Result<String, RepositoryError>;
}
