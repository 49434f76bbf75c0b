//! Change statuses and the origin-aware normalization table.

use std::fmt;

/// Which change pool a record was claimed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// Staged changes (HEAD to index).
    Index,
    /// Unstaged changes (index to working tree).
    WorkingTree,
}

impl fmt::Display for ChangeOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeOrigin::Index => write!(f, "index"),
            ChangeOrigin::WorkingTree => write!(f, "workingTree"),
        }
    }
}

/// Status as reported by the repository, before normalization.
///
/// Index-flavoured variants describe staged content, the rest describe the
/// working tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeStatus {
    IndexAdded,
    IndexModified,
    IndexDeleted,
    IndexRenamed,
    IndexCopied,
    Untracked,
    Modified,
    Deleted,
    TypeChanged,
    Conflicted,
}

impl NativeStatus {
    /// Rewrite the status so it agrees with the pool it was claimed from.
    ///
    /// Combinations outside the table pass through unchanged.
    pub fn normalize_for(self, origin: ChangeOrigin) -> NativeStatus {
        use NativeStatus::*;

        match (origin, self) {
            (ChangeOrigin::Index, Modified) => IndexModified,
            (ChangeOrigin::Index, Untracked) => IndexAdded,
            (ChangeOrigin::Index, Deleted) => IndexDeleted,
            (ChangeOrigin::WorkingTree, IndexModified) => Modified,
            (ChangeOrigin::WorkingTree, IndexAdded) => Untracked,
            (ChangeOrigin::WorkingTree, IndexDeleted) => Deleted,
            (ChangeOrigin::WorkingTree, IndexRenamed) => Modified,
            (ChangeOrigin::WorkingTree, IndexCopied) => Modified,
            (_, status) => status,
        }
    }

    /// Collapse into the bucket used for message synthesis.
    pub fn collapse(self) -> ChangeStatus {
        match self {
            NativeStatus::IndexAdded | NativeStatus::Untracked => ChangeStatus::Added,
            NativeStatus::IndexDeleted | NativeStatus::Deleted => ChangeStatus::Deleted,
            NativeStatus::IndexRenamed => ChangeStatus::Renamed,
            NativeStatus::IndexCopied => ChangeStatus::Copied,
            NativeStatus::IndexModified
            | NativeStatus::Modified
            | NativeStatus::TypeChanged
            | NativeStatus::Conflicted => ChangeStatus::Updated,
        }
    }
}

/// Kind of modification a file has undergone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStatus {
    Added,
    Updated,
    Renamed,
    Deleted,
    Copied,
    /// No matching change record was found.
    Unknown,
}

impl ChangeStatus {
    /// Verb used for this status in commit messages.
    pub fn action(&self) -> &'static str {
        match self {
            ChangeStatus::Added => "Add",
            ChangeStatus::Deleted => "Delete",
            ChangeStatus::Renamed => "Rename",
            ChangeStatus::Copied => "Copy",
            ChangeStatus::Updated | ChangeStatus::Unknown => "Update",
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeStatus::Added => write!(f, "Added"),
            ChangeStatus::Updated => write!(f, "Updated"),
            ChangeStatus::Renamed => write!(f, "Renamed"),
            ChangeStatus::Deleted => write!(f, "Deleted"),
            ChangeStatus::Copied => write!(f, "Copied"),
            ChangeStatus::Unknown => write!(f, "Unknown"),
        }
    }
}
