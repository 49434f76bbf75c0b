//! Change records, resolved file changes, and commit targets.

use std::fmt;
use std::path::{Path, PathBuf};

use super::status::{ChangeOrigin, ChangeStatus, NativeStatus};

/// One file's modification as reported by the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub path: PathBuf,
    pub status: NativeStatus,
}

impl ChangeRecord {
    pub fn new(path: impl Into<PathBuf>, status: NativeStatus) -> Self {
        Self {
            path: path.into(),
            status,
        }
    }
}

/// A selected file resolved against the repository's change pools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    absolute_path: PathBuf,
    relative_path: String,
    status: ChangeStatus,
    origin: Option<ChangeOrigin>,
    record: Option<ChangeRecord>,
}

impl FileChange {
    /// Wrap a record claimed from the pool identified by `origin`.
    ///
    /// The record's status is normalized for that pool before collapsing.
    pub fn claimed(root: &Path, record: ChangeRecord, origin: ChangeOrigin) -> Self {
        let native = record.status.normalize_for(origin);
        let record = ChangeRecord {
            status: native,
            ..record
        };
        Self {
            relative_path: relative_path(root, &record.path),
            absolute_path: record.path.clone(),
            status: native.collapse(),
            origin: Some(origin),
            record: Some(record),
        }
    }

    /// A selection that matched nothing in either pool.
    pub fn unmatched(root: &Path, path: impl Into<PathBuf>) -> Self {
        let absolute_path = path.into();
        Self {
            relative_path: relative_path(root, &absolute_path),
            absolute_path,
            status: ChangeStatus::Unknown,
            origin: None,
            record: None,
        }
    }

    pub fn absolute_path(&self) -> &Path {
        &self.absolute_path
    }

    /// Path relative to the repository root, always with `/` separators.
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn status(&self) -> ChangeStatus {
        self.status
    }

    pub fn origin(&self) -> Option<ChangeOrigin> {
        self.origin
    }

    /// The normalized record this change was built from, if any.
    pub fn record(&self) -> Option<&ChangeRecord> {
        self.record.as_ref()
    }

    /// A deletion already recorded in the index needs no further staging.
    pub fn is_staged_deletion(&self) -> bool {
        self.origin == Some(ChangeOrigin::Index) && self.status == ChangeStatus::Deleted
    }
}

fn relative_path(root: &Path, absolute: &Path) -> String {
    let relative = absolute.strip_prefix(root).unwrap_or(absolute);
    relative.to_string_lossy().replace('\\', "/")
}

/// A named change group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeGroup {
    Index,
    WorkingTree,
    Other(String),
}

impl From<&str> for ChangeGroup {
    fn from(id: &str) -> Self {
        match id {
            "index" => ChangeGroup::Index,
            "workingTree" => ChangeGroup::WorkingTree,
            other => ChangeGroup::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ChangeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeGroup::Index => write!(f, "index"),
            ChangeGroup::WorkingTree => write!(f, "workingTree"),
            ChangeGroup::Other(id) => write!(f, "{id}"),
        }
    }
}

/// Something the user selected for an instant commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitTarget {
    /// An absolute file path.
    Path(PathBuf),
    /// A change record picked from a listing; resolved by its path.
    Record(ChangeRecord),
    /// Every change in a named group.
    Group(ChangeGroup),
}

/// Snapshot of the staged and unstaged pools for one resolution pass.
///
/// Pools are drained as records are claimed.
#[derive(Debug, Clone, Default)]
pub struct RepositoryChangeSets {
    pub staged: Vec<ChangeRecord>,
    pub unstaged: Vec<ChangeRecord>,
}

impl RepositoryChangeSets {
    pub fn new(staged: Vec<ChangeRecord>, unstaged: Vec<ChangeRecord>) -> Self {
        Self { staged, unstaged }
    }

    /// Remove and return the first record in `origin`'s pool whose path equals `path`.
    ///
    /// Paths are compared byte for byte, without normalization.
    pub fn claim(&mut self, origin: ChangeOrigin, path: &Path) -> Option<ChangeRecord> {
        let pool = self.pool_mut(origin);
        let idx = pool
            .iter()
            .position(|r| r.path.as_os_str() == path.as_os_str())?;
        Some(pool.remove(idx))
    }

    /// Remove and return every record left in `origin`'s pool.
    pub fn drain(&mut self, origin: ChangeOrigin) -> Vec<ChangeRecord> {
        std::mem::take(self.pool_mut(origin))
    }

    fn pool_mut(&mut self, origin: ChangeOrigin) -> &mut Vec<ChangeRecord> {
        match origin {
            ChangeOrigin::Index => &mut self.staged,
            ChangeOrigin::WorkingTree => &mut self.unstaged,
        }
    }
}
