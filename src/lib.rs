//! instacommit - Commit selected files in one step with a synthesized message.
//!
//! # Overview
//!
//! instacommit takes a selection of files (explicit paths, whole change
//! groups, or records picked from a listing), reconciles it against the
//! repository's staged and unstaged changes, refuses to run when unrelated
//! content is already staged, then stages the selection and commits it with
//! a message describing each file.

pub mod change;
pub mod commit;
pub mod config;
pub mod error;
pub mod git;

// Re-export commonly used types
pub use change::{ChangeGroup, ChangeOrigin, ChangeRecord, ChangeStatus, CommitTarget, FileChange};
pub use commit::{CommitMessage, CommitOutcome, instant_commit, preview, synthesize_message};
pub use config::InstantCommitConfig;
pub use error::{InstantCommitError, RepositoryError};
pub use git::{Git2Repository, RepositoryAccess};
