//! Apply the reconciler's recommendations to the local or the remote side.

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::error::VcsError;
use crate::guard::CheckoutGuard;
use crate::port::VcsPort;
use crate::reconcile::Reconciler;
use crate::status::{BranchSyncState, BranchSyncStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    /// Local tracking branch created from the remote branch.
    Tracked,
    /// Local branch hard-reset to the remote branch.
    ResetToRemote,
    /// Local branch included in the force-push batch.
    ForcePushed,
    ReportOnly,
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyncAction::Tracked => "track",
            SyncAction::ResetToRemote => "reset --hard",
            SyncAction::ForcePushed => "force-push",
            SyncAction::ReportOnly => "report",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    pub state: BranchSyncState,
    pub action: SyncAction,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncRemoteReport {
    pub outcomes: Vec<SyncOutcome>,
    /// Local branches sent in the single force-push, empty when nothing qualified.
    pub pushed: Vec<String>,
}

fn classify_sorted(
    port: &dyn VcsPort,
    reconciler: &Reconciler,
    fetch: bool,
) -> Result<Vec<BranchSyncState>, VcsError> {
    if fetch {
        port.fetch(&reconciler.upstream, true)?;
    }
    let mut states = reconciler.reconcile(port)?;
    states.sort_by_key(|s| s.status);
    Ok(states)
}

/// Bring local branches in line with the upstream.
///
/// New upstream branches get a tracking branch; stale local branches are
/// hard-reset to the upstream. Everything else is only reported. The
/// checkout active before the run is restored afterwards.
pub fn sync_local(
    port: &dyn VcsPort,
    reconciler: &Reconciler,
    fetch: bool,
) -> Result<Vec<SyncOutcome>, VcsError> {
    let states = classify_sorted(port, reconciler, fetch)?;
    CheckoutGuard::scoped(port, |guard| {
        let mut outcomes = Vec::with_capacity(states.len());
        for state in states {
            let action = match state.status {
                BranchSyncStatus::NewLocal => {
                    info!(local = %state.local_branch, remote = %state.remote_branch, "tracking new branch");
                    port.create_tracking_branch(&state.local_branch, &state.remote_branch)?;
                    SyncAction::Tracked
                }
                BranchSyncStatus::RemoteModified => {
                    info!(local = %state.local_branch, remote = %state.remote_branch, "resetting stale branch");
                    guard.switch_to(&state.local_branch)?;
                    port.reset_hard(&state.remote_branch)?;
                    SyncAction::ResetToRemote
                }
                BranchSyncStatus::Unrelated
                | BranchSyncStatus::Uptodate
                | BranchSyncStatus::LocalModified
                | BranchSyncStatus::Conflicted => SyncAction::ReportOnly,
            };
            outcomes.push(SyncOutcome { state, action });
        }
        Ok(outcomes)
    })
}

/// Force-push every locally advanced branch to the upstream in one batch.
///
/// Diverged and remotely advanced branches are reported and never pushed.
pub fn sync_remote(
    port: &dyn VcsPort,
    reconciler: &Reconciler,
    fetch: bool,
) -> Result<SyncRemoteReport, VcsError> {
    let states = classify_sorted(port, reconciler, fetch)?;
    let mut report = SyncRemoteReport::default();
    for state in states {
        let action = if state.status == BranchSyncStatus::LocalModified {
            report.pushed.push(state.local_branch.clone());
            SyncAction::ForcePushed
        } else {
            SyncAction::ReportOnly
        };
        report.outcomes.push(SyncOutcome { state, action });
    }
    if report.pushed.is_empty() {
        info!("nothing to push");
    } else {
        info!(branches = report.pushed.len(), upstream = %reconciler.upstream, "force-pushing");
        port.push(&reconciler.upstream, &report.pushed, true)?;
    }
    Ok(report)
}

/// One line per outcome, a blank line between status groups.
pub fn render_grouped(outcomes: &[SyncOutcome]) -> String {
    let mut out = String::new();
    let mut last: Option<BranchSyncStatus> = None;
    for o in outcomes {
        if last.is_some_and(|s| s != o.state.status) {
            out.push('\n');
        }
        last = Some(o.state.status);
        out.push_str(&o.state.to_string());
        if o.action != SyncAction::ReportOnly {
            out.push_str(&format!("  [{}]", o.action));
        }
        out.push('\n');
    }
    out
}
