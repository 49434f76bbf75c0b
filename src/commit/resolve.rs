//! Resolution of selected targets against the staged and unstaged pools.

use std::path::Path;

use tracing::debug;

use crate::change::{
    ChangeGroup, ChangeOrigin, CommitTarget, FileChange, RepositoryChangeSets,
};

/// Maps selections to [`FileChange`]s, draining each claimed record from its pool.
///
/// A record is claimed at most once per pass, so two selections naming the
/// same file yield one real change and one [`ChangeStatus::Unknown`] fallback.
///
/// [`ChangeStatus::Unknown`]: crate::change::ChangeStatus::Unknown
pub struct ChangeResolver<'a> {
    root: &'a Path,
    pools: &'a mut RepositoryChangeSets,
    unrecognized_groups: Vec<String>,
}

impl<'a> ChangeResolver<'a> {
    pub fn new(root: &'a Path, pools: &'a mut RepositoryChangeSets) -> Self {
        Self {
            root,
            pools,
            unrecognized_groups: Vec::new(),
        }
    }

    /// Resolve absolute paths in input order, staged pool first.
    pub fn resolve_by_paths<P: AsRef<Path>>(&mut self, paths: &[P]) -> Vec<FileChange> {
        self.resolve_paths(paths, true)
    }

    fn resolve_paths<P: AsRef<Path>>(&mut self, paths: &[P], search_staged: bool) -> Vec<FileChange> {
        paths
            .iter()
            .map(|p| self.resolve_path(p.as_ref(), search_staged))
            .collect()
    }

    fn resolve_path(&mut self, path: &Path, search_staged: bool) -> FileChange {
        let origins: &[ChangeOrigin] = if search_staged {
            &[ChangeOrigin::Index, ChangeOrigin::WorkingTree]
        } else {
            &[ChangeOrigin::WorkingTree]
        };

        for &origin in origins {
            if let Some(record) = self.pools.claim(origin, path) {
                debug!("Claimed {} from {} pool", path.display(), origin);
                return FileChange::claimed(self.root, record, origin);
            }
        }

        debug!("No change record for {}", path.display());
        FileChange::unmatched(self.root, path)
    }

    /// Claim every remaining record of a group.
    ///
    /// Unknown groups resolve to nothing and are remembered for reporting.
    pub fn resolve_by_group(&mut self, group: &ChangeGroup) -> Vec<FileChange> {
        let origin = match group {
            ChangeGroup::Index => ChangeOrigin::Index,
            ChangeGroup::WorkingTree => ChangeOrigin::WorkingTree,
            ChangeGroup::Other(id) => {
                debug!("Unrecognized change group '{}'", id);
                self.unrecognized_groups.push(id.clone());
                return Vec::new();
            }
        };

        let records = self.pools.drain(origin);
        debug!("Claimed {} record(s) from {} group", records.len(), origin);
        records
            .into_iter()
            .map(|record| FileChange::claimed(self.root, record, origin))
            .collect()
    }

    /// Resolve a mixed target list in input order.
    pub fn resolve_targets(&mut self, targets: &[CommitTarget]) -> Vec<FileChange> {
        let mut changes = Vec::new();
        for target in targets {
            match target {
                CommitTarget::Path(path) => changes.push(self.resolve_path(path, true)),
                CommitTarget::Record(record) => changes.push(self.resolve_path(&record.path, true)),
                CommitTarget::Group(group) => changes.extend(self.resolve_by_group(group)),
            }
        }
        changes
    }

    /// Group identifiers seen so far that name no known group.
    pub fn unrecognized_groups(&self) -> &[String] {
        &self.unrecognized_groups
    }

    pub fn into_unrecognized_groups(self) -> Vec<String> {
        self.unrecognized_groups
    }
}
