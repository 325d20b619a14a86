//! Parsers for the machine-readable output of the git commands `GitCli` runs.

use rebaseplan_core::{NotesMap, RawReflogEntry};

/// `git branch --format=%(refname)%09%(symref)` -> short branch names.
///
/// Symbolic refs (`origin/HEAD`) and pseudo entries such as a detached HEAD
/// are dropped.
pub fn branch_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|line| {
            let (refname, symref) = line.split_once('\t').unwrap_or((line, ""));
            if !symref.trim().is_empty() {
                return None;
            }
            let refname = refname.trim();
            refname
                .strip_prefix("refs/heads/")
                .or_else(|| refname.strip_prefix("refs/remotes/"))
                .map(str::to_string)
        })
        .collect()
}

/// `git reflog show --format=%H%x09%gd` -> entries, newest first.
pub fn reflog(stdout: &str) -> Vec<RawReflogEntry> {
    stdout
        .lines()
        .filter_map(|line| {
            let (commit, label) = line.split_once('\t')?;
            let commit = commit.trim();
            if commit.is_empty() {
                return None;
            }
            Some(RawReflogEntry::new(commit, label.trim()))
        })
        .collect()
}

/// `git notes list` -> annotated commit -> note object.
pub fn notes_list(stdout: &str) -> NotesMap {
    stdout
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let note = parts.next()?;
            let commit = parts.next()?;
            Some((commit.to_string(), note.to_string()))
        })
        .collect()
}

/// `git for-each-ref --format=%(refname) refs/tags/...` -> tag names.
pub fn tag_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|line| line.trim().strip_prefix("refs/tags/"))
        .map(str::to_string)
        .collect()
}
