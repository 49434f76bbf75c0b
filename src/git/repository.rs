//! [`RepositoryAccess`] backed by git2.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use git2::{Commit, ErrorCode, IndexAddOption, Repository, StatusEntry, StatusOptions};
use tracing::debug;

use crate::change::{ChangeRecord, NativeStatus};
use crate::error::RepositoryError;
use crate::git::access::RepositoryAccess;
use crate::git::status::{index_status, worktree_status};

/// A non-bare repository on disk.
///
/// The repository is reopened for every operation so each read reflects the
/// current on-disk state. git2 calls run inline on the calling task; a run
/// makes a handful of short, sequential calls.
#[derive(Debug, Clone)]
pub struct Git2Repository {
    root: PathBuf,
}

impl Git2Repository {
    /// Discover the repository containing `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let repo = Repository::discover(path.as_ref()).map_err(RepositoryError::OpenRepository)?;
        let root = repo
            .workdir()
            .ok_or_else(|| RepositoryError::BareRepository(repo.path().to_path_buf()))?
            .to_path_buf();
        debug!("Opened repository at {}", root.display());
        Ok(Self { root })
    }

    fn repo(&self) -> Result<Repository, RepositoryError> {
        Repository::open(&self.root).map_err(RepositoryError::OpenRepository)
    }

    /// Collect records for one side of `git status`.
    fn read_changes(
        &self,
        side: fn(&StatusEntry<'_>) -> Option<(NativeStatus, Option<PathBuf>)>,
    ) -> Result<Vec<ChangeRecord>, RepositoryError> {
        let repo = self.repo()?;
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false)
            .renames_head_to_index(true);

        let statuses = repo
            .statuses(Some(&mut opts))
            .map_err(RepositoryError::StatusFailed)?;

        let mut records = Vec::new();
        for entry in statuses.iter() {
            let Some((status, delta_path)) = side(&entry) else {
                continue;
            };
            let Some(relative) = delta_path.or_else(|| entry.path().map(PathBuf::from)) else {
                continue;
            };
            records.push(ChangeRecord::new(self.root.join(relative), status));
        }

        Ok(records)
    }

    fn stage_paths(&self, paths: &[PathBuf]) -> Result<(), RepositoryError> {
        let repo = self.repo()?;
        let mut index = repo.index().map_err(RepositoryError::StagingFailed)?;

        let relative: Vec<&Path> = paths
            .iter()
            .map(|path| {
                path.strip_prefix(&self.root).map_err(|_| {
                    RepositoryError::StagingFailed(git2::Error::from_str(&format!(
                        "{} is outside the repository",
                        path.display()
                    )))
                })
            })
            .collect::<Result<_, _>>()?;

        // Same as `git add -A <paths>`: directories expand to their contents,
        // and tracked files gone from disk are staged as deletions.
        index
            .add_all(relative.iter(), IndexAddOption::DEFAULT, None)
            .map_err(RepositoryError::StagingFailed)?;
        index
            .update_all(relative.iter(), None)
            .map_err(RepositoryError::StagingFailed)?;

        index.write().map_err(RepositoryError::StagingFailed)?;
        debug!("Staged {} path(s)", paths.len());
        Ok(())
    }

    fn commit_index(&self, message: &str) -> Result<String, RepositoryError> {
        let repo = self.repo()?;

        // Write the index as a tree
        let mut index = repo.index().map_err(RepositoryError::CommitFailed)?;
        let tree_id = index.write_tree().map_err(RepositoryError::CommitFailed)?;
        let tree = repo.find_tree(tree_id).map_err(RepositoryError::CommitFailed)?;

        // Get the signature from git config
        let sig = repo.signature().map_err(RepositoryError::ConfigError)?;

        let parent = head_commit(&repo)?;
        let parents: Vec<&Commit<'_>> = parent.iter().collect();

        let oid = repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .map_err(RepositoryError::CommitFailed)?;

        Ok(oid.to_string())
    }
}

/// Resolve the HEAD commit, distinguishing empty-repo errors from real failures.
///
/// Returns `Ok(None)` for repos with no commits (unborn branch / not found).
fn head_commit(repo: &Repository) -> Result<Option<Commit<'_>>, RepositoryError> {
    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(RepositoryError::CommitFailed(e)),
    };

    let commit = head_ref
        .peel_to_commit()
        .map_err(RepositoryError::CommitFailed)?;
    Ok(Some(commit))
}

fn staged_side(entry: &StatusEntry<'_>) -> Option<(NativeStatus, Option<PathBuf>)> {
    let status = index_status(entry.status())?;
    let path = entry
        .head_to_index()
        .and_then(|d| d.new_file().path().map(Path::to_path_buf));
    Some((status, path))
}

fn unstaged_side(entry: &StatusEntry<'_>) -> Option<(NativeStatus, Option<PathBuf>)> {
    let status = worktree_status(entry.status())?;
    let path = entry
        .index_to_workdir()
        .and_then(|d| d.new_file().path().map(Path::to_path_buf));
    Some((status, path))
}

#[async_trait]
impl RepositoryAccess for Git2Repository {
    fn root_path(&self) -> PathBuf {
        self.root.clone()
    }

    async fn staged_changes(&self) -> Result<Vec<ChangeRecord>, RepositoryError> {
        self.read_changes(staged_side)
    }

    async fn unstaged_changes(&self) -> Result<Vec<ChangeRecord>, RepositoryError> {
        self.read_changes(unstaged_side)
    }

    async fn stage(&self, paths: &[PathBuf]) -> Result<(), RepositoryError> {
        if paths.is_empty() {
            return Ok(());
        }
        self.stage_paths(paths)
    }

    async fn commit(&self, message: &str) -> Result<String, RepositoryError> {
        self.commit_index(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Signature;

    fn init_repo() -> (tempfile::TempDir, Repository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();

        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@test.com").unwrap();

        (dir, repo)
    }

    fn commit_file(repo: &Repository, dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = Signature::now("Test User", "test@test.com").unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&Commit<'_>> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, "init", &tree, &parents)
            .unwrap();
    }

    #[test]
    fn test_open_discovers_from_subdirectory() {
        let (dir, _repo) = init_repo();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let git = Git2Repository::open(dir.path().join("nested")).unwrap();
        assert!(git.root_path().join("nested").is_dir());
    }

    #[test]
    fn test_open_outside_repository_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = Git2Repository::open(dir.path());
        assert!(matches!(result, Err(RepositoryError::OpenRepository(_))));
    }

    #[test]
    fn test_open_bare_repository_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init_bare(dir.path()).unwrap();
        let result = Git2Repository::open(dir.path());
        assert!(matches!(result, Err(RepositoryError::BareRepository(_))));
    }

    #[tokio::test]
    async fn test_untracked_file_is_unstaged_only() {
        let (dir, repo) = init_repo();
        commit_file(&repo, dir.path(), "base.txt", "base\n");
        std::fs::write(dir.path().join("new.txt"), "hello\n").unwrap();

        let git = Git2Repository::open(dir.path()).unwrap();
        let staged = git.staged_changes().await.unwrap();
        let unstaged = git.unstaged_changes().await.unwrap();

        assert!(staged.is_empty());
        assert_eq!(unstaged.len(), 1);
        assert_eq!(unstaged[0].path, git.root_path().join("new.txt"));
        assert_eq!(unstaged[0].status, NativeStatus::Untracked);
    }

    #[tokio::test]
    async fn test_partially_staged_file_appears_in_both_pools() {
        let (dir, repo) = init_repo();
        commit_file(&repo, dir.path(), "file.txt", "one\n");

        std::fs::write(dir.path().join("file.txt"), "two\n").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("file.txt")).unwrap();
        index.write().unwrap();
        std::fs::write(dir.path().join("file.txt"), "three\n").unwrap();

        let git = Git2Repository::open(dir.path()).unwrap();
        let staged = git.staged_changes().await.unwrap();
        let unstaged = git.unstaged_changes().await.unwrap();

        assert_eq!(staged, vec![ChangeRecord::new(git.root_path().join("file.txt"), NativeStatus::IndexModified)]);
        assert_eq!(unstaged, vec![ChangeRecord::new(git.root_path().join("file.txt"), NativeStatus::Modified)]);
    }

    #[tokio::test]
    async fn test_stage_adds_and_removes() {
        let (dir, repo) = init_repo();
        commit_file(&repo, dir.path(), "old.txt", "old\n");
        std::fs::remove_file(dir.path().join("old.txt")).unwrap();
        std::fs::write(dir.path().join("new.txt"), "new\n").unwrap();

        let git = Git2Repository::open(dir.path()).unwrap();
        let root = git.root_path();
        git.stage(&[root.join("old.txt"), root.join("new.txt")])
            .await
            .unwrap();

        let mut staged = git.staged_changes().await.unwrap();
        staged.sort_by(|a, b| a.path.cmp(&b.path));
        assert_eq!(
            staged,
            vec![
                ChangeRecord::new(root.join("new.txt"), NativeStatus::IndexAdded),
                ChangeRecord::new(root.join("old.txt"), NativeStatus::IndexDeleted),
            ]
        );
        assert!(git.unstaged_changes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stage_directory_adds_its_files() {
        let (dir, repo) = init_repo();
        commit_file(&repo, dir.path(), "base.txt", "base\n");
        std::fs::create_dir(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/a.ts"), "a\n").unwrap();
        std::fs::write(dir.path().join("src/b.ts"), "b\n").unwrap();

        let git = Git2Repository::open(dir.path()).unwrap();
        let root = git.root_path();
        git.stage(&[root.join("src")]).await.unwrap();

        let mut staged = git.staged_changes().await.unwrap();
        staged.sort_by(|a, b| a.path.cmp(&b.path));
        assert_eq!(
            staged,
            vec![
                ChangeRecord::new(root.join("src/a.ts"), NativeStatus::IndexAdded),
                ChangeRecord::new(root.join("src/b.ts"), NativeStatus::IndexAdded),
            ]
        );
    }

    #[tokio::test]
    async fn test_stage_missing_untracked_path_is_noop() {
        let (dir, repo) = init_repo();
        commit_file(&repo, dir.path(), "base.txt", "base\n");

        let git = Git2Repository::open(dir.path()).unwrap();
        git.stage(&[git.root_path().join("never/existed.txt")])
            .await
            .unwrap();

        assert!(git.staged_changes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_staged_rename_carries_new_path() {
        let (dir, repo) = init_repo();
        commit_file(&repo, dir.path(), "old.txt", "same content\n");

        std::fs::rename(dir.path().join("old.txt"), dir.path().join("new.txt")).unwrap();
        let mut index = repo.index().unwrap();
        index.remove_path(Path::new("old.txt")).unwrap();
        index.add_path(Path::new("new.txt")).unwrap();
        index.write().unwrap();

        let git = Git2Repository::open(dir.path()).unwrap();
        let staged = git.staged_changes().await.unwrap();

        assert_eq!(
            staged,
            vec![ChangeRecord::new(git.root_path().join("new.txt"), NativeStatus::IndexRenamed)]
        );
        assert!(git.unstaged_changes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stage_empty_list_is_noop() {
        let (dir, _repo) = init_repo();
        let git = Git2Repository::open(dir.path()).unwrap();
        git.stage(&[]).await.unwrap();
    }

    #[tokio::test]
    async fn test_stage_path_outside_repository_fails() {
        let (dir, _repo) = init_repo();
        let git = Git2Repository::open(dir.path()).unwrap();
        let result = git.stage(&[PathBuf::from("/definitely/not/here.txt")]).await;
        assert!(matches!(result, Err(RepositoryError::StagingFailed(_))));
    }

    #[tokio::test]
    async fn test_commit_on_unborn_branch_creates_root_commit() {
        let (dir, _repo) = init_repo();
        std::fs::write(dir.path().join("README.md"), "# hi\n").unwrap();

        let git = Git2Repository::open(dir.path()).unwrap();
        git.stage(&[git.root_path().join("README.md")]).await.unwrap();
        let id = git.commit("Add README.md").await.unwrap();

        let repo = Repository::open(dir.path()).unwrap();
        let commit = repo.find_commit(git2::Oid::from_str(&id).unwrap()).unwrap();
        assert_eq!(commit.message().unwrap(), "Add README.md");
        assert_eq!(commit.parent_count(), 0);
    }

    #[tokio::test]
    async fn test_commit_parents_on_head() {
        let (dir, repo) = init_repo();
        commit_file(&repo, dir.path(), "a.txt", "a\n");
        let head = repo.head().unwrap().peel_to_commit().unwrap().id();
        std::fs::write(dir.path().join("a.txt"), "changed\n").unwrap();

        let git = Git2Repository::open(dir.path()).unwrap();
        git.stage(&[git.root_path().join("a.txt")]).await.unwrap();
        let id = git.commit("Update a.txt").await.unwrap();

        let commit = repo.find_commit(git2::Oid::from_str(&id).unwrap()).unwrap();
        assert_eq!(commit.parent_id(0).unwrap(), head);
    }
}
