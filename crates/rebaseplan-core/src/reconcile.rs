//! Six-way classification of a local branch against its upstream branch.
//!
//! Checks run in a fixed order and the first hit wins:
//!
//! 1. no local branch                                   -> `NewLocal`
//! 2. local tip is the remote's current position         -> `Uptodate`
//! 3. local tip is somewhere in the remote's history     -> `RemoteModified`
//! 4. remote tip is somewhere in the local history       -> `LocalModified`
//! 5. the two recorded histories share any commit        -> `Conflicted`
//! 6. otherwise                                         -> `Unrelated`
//!
//! `latest_of` scans newest first, so a current position always beats a
//! historical one.

use tracing::{debug, warn};

use crate::error::VcsError;
use crate::port::{RefSelection, VcsPort};
use crate::reflog::ReflogHistory;
use crate::status::{BranchSyncState, BranchSyncStatus};

/// Classify one pair from already fetched histories.
pub fn classify(
    local_branch: &str,
    remote_branch: &str,
    local: &ReflogHistory,
    remote: &ReflogHistory,
) -> BranchSyncState {
    let state = |status| BranchSyncState::new(status, local_branch, remote_branch);

    let Some(local_tip) = local.current() else {
        return state(BranchSyncStatus::NewLocal).with_found(None, remote.current().cloned());
    };

    if let Some(found) = remote.latest_of([&local_tip.commit_id]) {
        let status = if found.is_current {
            BranchSyncStatus::Uptodate
        } else {
            BranchSyncStatus::RemoteModified
        };
        return state(status).with_found(Some(local_tip.clone()), Some(found.clone()));
    }

    if let Some(remote_tip) = remote.current() {
        if let Some(found) = local.latest_of([&remote_tip.commit_id]) {
            return state(BranchSyncStatus::LocalModified)
                .with_found(Some(found.clone()), Some(remote_tip.clone()));
        }
    }

    let remote_hit = remote.latest_of(local.commit_ids());
    let local_hit = local.latest_of(remote.commit_ids());
    if remote_hit.is_some() || local_hit.is_some() {
        return state(BranchSyncStatus::Conflicted)
            .with_found(local_hit.cloned(), remote_hit.cloned());
    }

    state(BranchSyncStatus::Unrelated).with_found(Some(local_tip.clone()), remote.current().cloned())
}

/// Pairs every unmerged upstream branch with its local namesake.
#[derive(Debug, Clone)]
pub struct Reconciler {
    pub patterns: Vec<String>,
    pub main: String,
    pub upstream: String,
}

impl Reconciler {
    pub fn new(patterns: Vec<String>, main: impl Into<String>, upstream: impl Into<String>) -> Self {
        Self {
            patterns,
            main: main.into(),
            upstream: upstream.into(),
        }
    }

    fn remote_prefix(&self) -> String {
        format!("{}/", self.upstream)
    }

    /// Remote branches under the upstream matching the patterns and not merged into main.
    pub fn remote_branches(&self, port: &dyn VcsPort) -> Result<Vec<String>, VcsError> {
        let prefix = self.remote_prefix();
        let patterns: Vec<String> = self
            .patterns
            .iter()
            .map(|p| format!("{prefix}{p}"))
            .collect();
        let branches = port.list_refs(&patterns, &RefSelection::remote_unmerged(&self.main))?;
        if branches.is_empty() {
            warn!("{}", VcsError::AmbiguousSelection { patterns });
        }
        Ok(branches)
    }

    /// Classify one remote branch against the local branch of the same short name.
    pub fn classify_remote(
        &self,
        port: &dyn VcsPort,
        remote_branch: &str,
    ) -> Result<Option<BranchSyncState>, VcsError> {
        let Some(local_branch) = remote_branch.strip_prefix(&self.remote_prefix()) else {
            warn!(remote_branch, upstream = %self.upstream, "branch outside upstream, skipped");
            return Ok(None);
        };
        // Fully qualified reads, so a tag sharing a branch's short name is never mistaken for it.
        let remote = ReflogHistory::fetch_qualified(
            port,
            remote_branch,
            &format!("refs/remotes/{remote_branch}"),
            None,
        )?;
        if remote.is_empty() {
            return Err(VcsError::unknown(remote_branch));
        }
        let local = ReflogHistory::fetch_qualified(
            port,
            local_branch,
            &format!("refs/heads/{local_branch}"),
            None,
        )?;
        let state = classify(local_branch, remote_branch, &local, &remote);
        debug!(local_branch, remote_branch, status = %state.status, "classified");
        Ok(Some(state))
    }

    /// Classify every selected pair, in listing order. Any backend failure aborts the pass.
    pub fn reconcile(&self, port: &dyn VcsPort) -> Result<Vec<BranchSyncState>, VcsError> {
        let mut states = Vec::new();
        for remote_branch in self.remote_branches(port)? {
            if let Some(state) = self.classify_remote(port, &remote_branch)? {
                states.push(state);
            }
        }
        Ok(states)
    }
}
