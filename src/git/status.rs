//! Mapping of git2 status flags onto change records.

use git2::Status;

use crate::change::NativeStatus;

/// Index-side status of an entry, if it has staged changes.
pub fn index_status(status: Status) -> Option<NativeStatus> {
    if status.is_conflicted() {
        return None;
    }

    if status.is_index_new() {
        Some(NativeStatus::IndexAdded)
    } else if status.is_index_deleted() {
        Some(NativeStatus::IndexDeleted)
    } else if status.is_index_renamed() {
        Some(NativeStatus::IndexRenamed)
    } else if status.is_index_modified() {
        Some(NativeStatus::IndexModified)
    } else if status.is_index_typechange() {
        Some(NativeStatus::TypeChanged)
    } else {
        None
    }
}

/// Working-tree-side status of an entry, if it has unstaged changes.
///
/// Conflicted entries always land here.
pub fn worktree_status(status: Status) -> Option<NativeStatus> {
    if status.is_conflicted() {
        Some(NativeStatus::Conflicted)
    } else if status.is_wt_new() {
        Some(NativeStatus::Untracked)
    } else if status.is_wt_deleted() {
        Some(NativeStatus::Deleted)
    } else if status.is_wt_modified() || status.is_wt_renamed() {
        Some(NativeStatus::Modified)
    } else if status.is_wt_typechange() {
        Some(NativeStatus::TypeChanged)
    } else {
        None
    }
}
