//! Change records, statuses, and the drainable staged/unstaged pools.

pub mod file;
pub mod status;

pub use file::{ChangeGroup, ChangeRecord, CommitTarget, FileChange, RepositoryChangeSets};
pub use status::{ChangeOrigin, ChangeStatus, NativeStatus};
