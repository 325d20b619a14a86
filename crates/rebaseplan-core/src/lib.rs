pub mod error;
pub mod guard;
pub mod notes;
pub mod port;
pub mod reconcile;
pub mod reflog;
pub mod status;
pub mod sync;
pub mod tags;

#[cfg(test)]
mod fake;

pub use error::VcsError;
pub use guard::CheckoutGuard;
pub use notes::{propagate_notes, NoteCopy, NotesOptions};
pub use port::{NotesMap, RawReflogEntry, RefSelection, VcsPort};
pub use reconcile::{classify, Reconciler};
pub use reflog::{ReflogEntry, ReflogHistory};
pub use status::{BranchSyncState, BranchSyncStatus};
pub use sync::{render_grouped, sync_local, sync_remote, SyncAction, SyncOutcome, SyncRemoteReport};
pub use tags::{cleanup_tags, Tag, TagPlan, TagPlanner, TAG_NAMESPACE};
