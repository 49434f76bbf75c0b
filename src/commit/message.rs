//! Deterministic commit message synthesis from resolved file changes.

use crate::change::FileChange;

/// Marker a path degenerates to once it has no parent directory left.
const ROOT_MARKER: &str = "./";

/// Action used in the title when the files disagree.
const FALLBACK_ACTION: &str = "Update";

/// A synthesized commit message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitMessage {
    /// Summary line, present only when more than one file is involved.
    pub title: Option<String>,
    /// One `"<Action> <relative path>"` line per file, in input order.
    pub lines: Vec<String>,
}

impl CommitMessage {
    /// Format the commit message for git.
    ///
    /// Produces:
    /// ```text
    /// Update 2 files from src/
    ///
    /// Update src/a.rs
    /// Update src/b.rs
    /// ```
    pub fn format(&self) -> String {
        let mut parts = Vec::with_capacity(self.lines.len() + 2);

        if let Some(ref title) = self.title {
            parts.push(title.clone());
            parts.push(String::new()); // blank line
        }
        parts.extend(self.lines.iter().cloned());

        parts.join("\n")
    }

    /// First line of the formatted message.
    pub fn subject(&self) -> &str {
        self.title
            .as_deref()
            .or_else(|| self.lines.first().map(String::as_str))
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.lines.is_empty()
    }
}

/// Build the commit message for `changes`.
///
/// Every file gets its own line using its own status. With more than one
/// file, a title names the action they all share (or `Update`) and the
/// deepest directory they all live under, if any.
pub fn synthesize_message(changes: &[FileChange]) -> CommitMessage {
    let Some((first, rest)) = changes.split_first() else {
        return CommitMessage::default();
    };

    let lines = changes
        .iter()
        .map(|c| format!("{} {}", c.status().action(), c.relative_path()))
        .collect();

    if rest.is_empty() {
        return CommitMessage { title: None, lines };
    }

    // Both latches only ever move to None.
    let mut common_action = Some(first.status().action());
    let mut common_path = Some(first.relative_path().to_string());

    for change in rest {
        if common_action.is_some_and(|action| action != change.status().action()) {
            common_action = None;
        }

        if let Some(ref path) = common_path
            && path != change.relative_path()
        {
            common_path = common_directory(path, change.relative_path());
        }
    }

    let mut title = format!(
        "{} {} files",
        common_action.unwrap_or(FALLBACK_ACTION),
        changes.len()
    );
    if let Some(path) = common_path {
        title.push_str(&format!(" from {path}"));
    }

    CommitMessage {
        title: Some(title),
        lines,
    }
}

/// Longest directory both paths share, found by repeatedly cutting the
/// longer one back to its parent. `None` once either reaches the root.
fn common_directory(a: &str, b: &str) -> Option<String> {
    let mut a = a.to_string();
    let mut b = b.to_string();

    while a != b {
        if a.len() > b.len() {
            a = parent_dir(&a);
        } else {
            b = parent_dir(&b);
        }

        if a == ROOT_MARKER || b == ROOT_MARKER {
            return None;
        }
    }

    Some(a)
}

/// Parent directory of a `/`-separated path, with a trailing `/`.
fn parent_dir(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => trimmed[..=idx].to_string(),
        None => ROOT_MARKER.to_string(),
    }
}
