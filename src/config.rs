//! Run configuration derived from CLI flags and the environment.

use std::env;
use std::path::PathBuf;

use tracing::warn;

/// Environment variable supplying the default repository path.
pub const REPO_ENV_VAR: &str = "INSTACOMMIT_REPO";

/// Configuration for one instacommit invocation.
#[derive(Debug, Clone)]
pub struct InstantCommitConfig {
    /// Any path inside the repository to operate on.
    pub repo: PathBuf,
    /// Print the message that would be used instead of committing.
    pub dry_run: bool,
    pub verbose: bool,
}

impl InstantCommitConfig {
    /// Build a config, taking the repository from `explicit_repo`, then
    /// `INSTACOMMIT_REPO`, then the current directory.
    pub fn new(explicit_repo: Option<PathBuf>, dry_run: bool, verbose: bool) -> Self {
        Self {
            repo: explicit_repo.unwrap_or_else(default_repo_path),
            dry_run,
            verbose,
        }
    }
}

/// Default `tracing` filter directive for this crate.
pub fn log_directive(verbose: bool) -> &'static str {
    if verbose {
        "instacommit=debug"
    } else {
        "instacommit=warn"
    }
}

/// Read the repository path from `INSTACOMMIT_REPO`.
///
/// Logs a warning and falls back to `.` if the variable is set but empty
/// or not valid unicode.
fn default_repo_path() -> PathBuf {
    match env::var(REPO_ENV_VAR) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v),
        Ok(_) => {
            warn!("{} is empty, using current directory", REPO_ENV_VAR);
            PathBuf::from(".")
        }
        Err(env::VarError::NotUnicode(_)) => {
            warn!("{} is not valid unicode, using current directory", REPO_ENV_VAR);
            PathBuf::from(".")
        }
        Err(env::VarError::NotPresent) => PathBuf::from("."),
    }
}
