use std::fmt;

use serde::Serialize;

use crate::reflog::ReflogEntry;

/// Relationship between a local branch and its upstream counterpart.
///
/// Declaration order is the canonical report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BranchSyncStatus {
    NewLocal,
    Unrelated,
    Uptodate,
    RemoteModified,
    LocalModified,
    Conflicted,
}

impl BranchSyncStatus {
    pub const ALL: [BranchSyncStatus; 6] = [
        BranchSyncStatus::NewLocal,
        BranchSyncStatus::Unrelated,
        BranchSyncStatus::Uptodate,
        BranchSyncStatus::RemoteModified,
        BranchSyncStatus::LocalModified,
        BranchSyncStatus::Conflicted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BranchSyncStatus::NewLocal => "NEW_LOCAL",
            BranchSyncStatus::Unrelated => "UNRELATED",
            BranchSyncStatus::Uptodate => "UPTODATE",
            BranchSyncStatus::RemoteModified => "REMOTE_MODIFIED",
            BranchSyncStatus::LocalModified => "LOCAL_MODIFIED",
            BranchSyncStatus::Conflicted => "CONFLICTED",
        }
    }
}

impl fmt::Display for BranchSyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Classification result for one (local, remote) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchSyncState {
    pub status: BranchSyncStatus,
    pub local_branch: String,
    pub remote_branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_found: Option<ReflogEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_found: Option<ReflogEntry>,
}

impl BranchSyncState {
    pub fn new(
        status: BranchSyncStatus,
        local_branch: impl Into<String>,
        remote_branch: impl Into<String>,
    ) -> Self {
        Self {
            status,
            local_branch: local_branch.into(),
            remote_branch: remote_branch.into(),
            local_found: None,
            remote_found: None,
        }
    }

    pub fn with_found(
        mut self,
        local_found: Option<ReflogEntry>,
        remote_found: Option<ReflogEntry>,
    ) -> Self {
        self.local_found = local_found;
        self.remote_found = remote_found;
        self
    }
}

impl fmt::Display for BranchSyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<15} {} <- {}",
            self.status, self.local_branch, self.remote_branch
        )?;
        match (&self.local_found, &self.remote_found) {
            (Some(l), Some(r)) => write!(f, "  ({} ~ {})", l.label, r.label),
            (Some(l), None) => write!(f, "  ({})", l.label),
            (None, Some(r)) => write!(f, "  ({})", r.label),
            (None, None) => Ok(()),
        }
    }
}
