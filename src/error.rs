//! Error types for instacommit modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the repository collaborator (status reads, staging, committing).
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Bare repository not supported: {0}")]
    BareRepository(PathBuf),

    #[error("Failed to read repository status: {0}")]
    StatusFailed(#[source] git2::Error),

    #[error("Failed to stage changes: {0}")]
    StagingFailed(#[source] git2::Error),

    #[error("Failed to create commit: {0}")]
    CommitFailed(#[source] git2::Error),

    #[error("Git config error (missing user.name or user.email): {0}")]
    ConfigError(#[source] git2::Error),
}

/// Errors from an instant-commit run.
#[derive(Error, Debug)]
pub enum InstantCommitError {
    #[error("No changes selected to commit")]
    NoSelection,

    #[error(
        "There are staged changes not covered by this selection ({}). Commit or unstage them first.",
        display_paths(.paths)
    )]
    UncleanStagedState { paths: Vec<PathBuf> },

    #[error("Unrecognized change group(s): {}", .0.join(", "))]
    UnrecognizedGroups(Vec<String>),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
