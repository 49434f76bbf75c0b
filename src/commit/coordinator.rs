//! Instant commit: resolve a selection, check the index, stage, and commit.
//!
//! One run moves through
//! `Idle → Snapshotting → Resolving → Validating → Staging → MessageGenerating → Committing`
//! and ends either committed or failed. Nothing is retried and nothing is
//! rolled back: if committing fails after staging, the staged paths stay staged.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::change::{ChangeGroup, CommitTarget, FileChange, RepositoryChangeSets};
use crate::commit::message::{CommitMessage, synthesize_message};
use crate::commit::resolve::ChangeResolver;
use crate::error::InstantCommitError;
use crate::git::RepositoryAccess;

/// Steps of a single instant-commit run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitPhase {
    Idle,
    Snapshotting,
    Resolving,
    Validating,
    Staging,
    MessageGenerating,
    Committing,
}

impl fmt::Display for CommitPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommitPhase::Idle => "idle",
            CommitPhase::Snapshotting => "snapshotting",
            CommitPhase::Resolving => "resolving",
            CommitPhase::Validating => "validating",
            CommitPhase::Staging => "staging",
            CommitPhase::MessageGenerating => "generating message",
            CommitPhase::Committing => "committing",
        };
        f.write_str(name)
    }
}

/// Result of a successful instant commit.
#[derive(Debug, Clone)]
pub struct CommitOutcome {
    pub commit_id: String,
    /// First line of the commit message.
    pub summary: String,
    pub message: String,
    /// Paths handed to the stage call (empty if the call was skipped).
    pub staged_paths: Vec<PathBuf>,
}

/// Commit exactly the selected changes with a synthesized message.
///
/// Fails without touching the repository when nothing resolves, when a
/// group name is unknown, or when the index holds staged changes the
/// selection does not cover.
pub async fn instant_commit<R>(
    repo: &R,
    targets: &[CommitTarget],
) -> Result<CommitOutcome, InstantCommitError>
where
    R: RepositoryAccess + ?Sized,
{
    let mut phase = CommitPhase::Idle;
    let result = run_instant_commit(repo, targets, &mut phase).await;

    match &result {
        Ok(outcome) => info!("Committed {}: {}", outcome.commit_id, outcome.summary),
        Err(e) => debug!("Instant commit failed while {}: {}", phase, e),
    }

    result
}

async fn run_instant_commit<R>(
    repo: &R,
    targets: &[CommitTarget],
    phase: &mut CommitPhase,
) -> Result<CommitOutcome, InstantCommitError>
where
    R: RepositoryAccess + ?Sized,
{
    enter(phase, CommitPhase::Snapshotting);
    let mut pools = snapshot(repo).await?;

    enter(phase, CommitPhase::Resolving);
    let root = repo.root_path();
    let changes = resolve(&root, &mut pools, targets)?;

    enter(phase, CommitPhase::Validating);
    ensure_clean_index(&changes, &pools)?;

    enter(phase, CommitPhase::Staging);
    let staged_paths: Vec<PathBuf> = changes
        .iter()
        .filter(|c| !c.is_staged_deletion())
        .map(|c| c.absolute_path().to_path_buf())
        .collect();
    if staged_paths.is_empty() {
        debug!("Nothing needs staging");
    } else {
        repo.stage(&staged_paths).await?;
    }

    // The message describes what is actually in the index now.
    enter(phase, CommitPhase::MessageGenerating);
    let mut staged = RepositoryChangeSets::new(repo.staged_changes().await?, Vec::new());
    let committed = ChangeResolver::new(&root, &mut staged).resolve_by_group(&ChangeGroup::Index);
    let message = synthesize_message(&committed);
    if message.is_empty() {
        return Err(InstantCommitError::NoSelection);
    }

    enter(phase, CommitPhase::Committing);
    let text = message.format();
    let commit_id = repo.commit(&text).await?;

    Ok(CommitOutcome {
        commit_id,
        summary: message.subject().to_string(),
        message: text,
        staged_paths,
    })
}

/// Resolve and validate a selection without staging or committing.
///
/// The message is built from the resolved selection rather than the index.
pub async fn preview<R>(
    repo: &R,
    targets: &[CommitTarget],
) -> Result<CommitMessage, InstantCommitError>
where
    R: RepositoryAccess + ?Sized,
{
    let mut pools = snapshot(repo).await?;
    let root = repo.root_path();
    let changes = resolve(&root, &mut pools, targets)?;
    ensure_clean_index(&changes, &pools)?;
    Ok(synthesize_message(&changes))
}

fn enter(phase: &mut CommitPhase, next: CommitPhase) {
    debug!("Instant commit: {} -> {}", phase, next);
    *phase = next;
}

async fn snapshot<R>(repo: &R) -> Result<RepositoryChangeSets, InstantCommitError>
where
    R: RepositoryAccess + ?Sized,
{
    let staged = repo.staged_changes().await?;
    let unstaged = repo.unstaged_changes().await?;
    debug!(
        "Snapshot: {} staged, {} unstaged",
        staged.len(),
        unstaged.len()
    );
    Ok(RepositoryChangeSets::new(staged, unstaged))
}

fn resolve(
    root: &Path,
    pools: &mut RepositoryChangeSets,
    targets: &[CommitTarget],
) -> Result<Vec<FileChange>, InstantCommitError> {
    let mut resolver = ChangeResolver::new(root, pools);
    let changes = resolver.resolve_targets(targets);
    let unrecognized = resolver.into_unrecognized_groups();

    if !unrecognized.is_empty() {
        return Err(InstantCommitError::UnrecognizedGroups(unrecognized));
    }
    if changes.is_empty() {
        return Err(InstantCommitError::NoSelection);
    }

    Ok(changes)
}

/// Refuse to commit when staged changes remain that the selection did not claim.
fn ensure_clean_index(
    changes: &[FileChange],
    pools: &RepositoryChangeSets,
) -> Result<(), InstantCommitError> {
    if pools.staged.is_empty() {
        return Ok(());
    }

    warn!(
        "{} staged change(s) not covered by a selection of {} file(s)",
        pools.staged.len(),
        changes.len()
    );
    Err(InstantCommitError::UncleanStagedState {
        paths: pools.staged.iter().map(|r| r.path.clone()).collect(),
    })
}
