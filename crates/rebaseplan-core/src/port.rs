//! The narrow interface between the engine and a version-control backend.
//!
//! Read-only queries (`list_refs`, `reflog`, `merge_base`, `resolve`,
//! `current_ref`, `list_tags`, `list_annotations`) always run. Mutations may be
//! replaced by a printed command when the backend runs under a dry-run policy;
//! the engine does not need to know which.

use std::collections::BTreeMap;

use crate::error::VcsError;

/// Commit id -> annotation (note) object id, snapshot of one notes namespace.
pub type NotesMap = BTreeMap<String, String>;

/// One line of a reference's positional history as the backend reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReflogEntry {
    pub commit_id: String,
    pub label: String,
}

impl RawReflogEntry {
    pub fn new(commit_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            commit_id: commit_id.into(),
            label: label.into(),
        }
    }
}

/// Options recognised by branch listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefSelection {
    /// List local and remote-tracking branches.
    pub include_all: bool,
    /// List remote-tracking branches only.
    pub remotes_only: bool,
    /// Skip branches already merged into this ref.
    pub no_merged_into: Option<String>,
    /// Passed through to the backend untouched.
    pub extra_args: Vec<String>,
}

impl RefSelection {
    pub fn local() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            include_all: true,
            ..Self::default()
        }
    }

    pub fn remote_unmerged(main: &str) -> Self {
        Self {
            remotes_only: true,
            no_merged_into: Some(main.to_string()),
            ..Self::default()
        }
    }
}

pub trait VcsPort {
    /// Short names of branches matching any of `patterns`, in backend order.
    fn list_refs(&self, patterns: &[String], selection: &RefSelection)
        -> Result<Vec<String>, VcsError>;

    /// Positional history of `ref_name`, newest first, at most `max_entries` lines.
    fn reflog(
        &self,
        ref_name: &str,
        max_entries: Option<usize>,
    ) -> Result<Vec<RawReflogEntry>, VcsError>;

    /// Nearest common ancestor, `None` when the histories are disjoint.
    fn merge_base(&self, ref_a: &str, ref_b: &str) -> Result<Option<String>, VcsError>;

    /// Fails with [`VcsError::UnknownReference`] when `ref_name` is absent.
    fn resolve(&self, ref_name: &str) -> Result<String, VcsError>;

    /// The checked-out branch, `None` when HEAD is detached.
    fn current_ref(&self) -> Result<Option<String>, VcsError>;

    /// Tag names (short form) starting with `prefix`.
    fn list_tags(&self, prefix: &str) -> Result<Vec<String>, VcsError>;

    fn create_or_replace_tag(&self, name: &str, commit_id: &str) -> Result<(), VcsError>;

    fn delete_tags(&self, names: &[String]) -> Result<(), VcsError>;

    fn create_tracking_branch(&self, local_name: &str, remote_name: &str)
        -> Result<(), VcsError>;

    fn checkout(&self, ref_name: &str) -> Result<(), VcsError>;

    fn reset_hard(&self, ref_name: &str) -> Result<(), VcsError>;

    fn push(&self, remote: &str, ref_names: &[String], force: bool) -> Result<(), VcsError>;

    fn fetch(&self, remote: &str, prune: bool) -> Result<(), VcsError>;

    fn list_annotations(&self, namespace: &str) -> Result<NotesMap, VcsError>;

    fn set_annotation(
        &self,
        namespace: &str,
        commit_id: &str,
        content_ref: &str,
        message: &str,
        force: bool,
    ) -> Result<(), VcsError>;
}
