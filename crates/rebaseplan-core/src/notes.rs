//! Carry notes forward when a branch moves.
//!
//! A note attached to a commit the branch used to point at (for example
//! before a rebase) is re-attached to the branch's current tip, referencing
//! the same note object.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::VcsError;
use crate::port::{RefSelection, VcsPort};
use crate::reflog::{ReflogEntry, ReflogHistory};

#[derive(Debug, Clone)]
pub struct NotesOptions {
    pub patterns: Vec<String>,
    pub selection: RefSelection,
    pub namespaces: Vec<String>,
    pub reflog_depth: usize,
    /// Overwrite a note already present on the tip.
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteCopy {
    pub namespace: String,
    pub branch: String,
    pub from: ReflogEntry,
    pub to_commit: String,
    pub note_id: String,
}

pub fn copy_message(from: &ReflogEntry) -> String {
    format!("copied from {} ({})", from.label, from.commit_id)
}

pub fn propagate_notes(
    port: &dyn VcsPort,
    opts: &NotesOptions,
) -> Result<Vec<NoteCopy>, VcsError> {
    let branches = port.list_refs(&opts.patterns, &opts.selection)?;
    if branches.is_empty() {
        warn!(
            "{}",
            VcsError::AmbiguousSelection {
                patterns: opts.patterns.clone()
            }
        );
        return Ok(Vec::new());
    }
    let mut histories = Vec::with_capacity(branches.len());
    for branch in &branches {
        histories.push(ReflogHistory::fetch(port, branch, opts.reflog_depth.checked_add(1))?);
    }

    let mut copies = Vec::new();
    for namespace in &opts.namespaces {
        let notes = port.list_annotations(namespace)?;
        if notes.is_empty() {
            debug!(namespace = %namespace, "no notes");
            continue;
        }
        for history in &histories {
            let branch = history.ref_name();
            let Some(found) = history.latest_of(notes.keys()) else {
                continue;
            };
            if found.is_current && !opts.force {
                debug!(branch, namespace = %namespace, "tip already annotated");
                continue;
            }
            let Some(tip) = history.current() else {
                continue;
            };
            let Some(note_id) = notes.get(&found.commit_id) else {
                continue;
            };
            info!(branch, namespace = %namespace, from = %found.label, "copying note");
            port.set_annotation(
                namespace,
                &tip.commit_id,
                note_id,
                &copy_message(found),
                opts.force,
            )?;
            copies.push(NoteCopy {
                namespace: namespace.clone(),
                branch: branch.to_string(),
                from: found.clone(),
                to_commit: tip.commit_id.clone(),
                note_id: note_id.clone(),
            });
        }
    }
    Ok(copies)
}
