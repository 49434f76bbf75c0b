//! Instant commits: selection resolution, message synthesis, and the commit pipeline.

pub mod coordinator;
pub mod message;
pub mod resolve;

pub use coordinator::{CommitOutcome, CommitPhase, instant_commit, preview};
pub use message::{CommitMessage, synthesize_message};
pub use resolve::ChangeResolver;
