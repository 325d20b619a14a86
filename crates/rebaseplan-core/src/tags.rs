//! Marker tags that make previous branch positions and their bases visible
//! in a history graph.
//!
//! Layout under [`TAG_NAMESPACE`]:
//!
//! - `<branch>/<n>`        the branch's reflog entry `n` (1..=depth)
//! - `__base__/<i>`        distinct merge-bases of current branch tips with main
//! - `__last_base__/<i>`   distinct merge-bases of previous positions with main,
//!                         minus the ones already tagged as `__base__`
//!
//! Base markers are numbered in commit-id order, so an unchanged repository
//! always yields the same marker set.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::VcsError;
use crate::port::{RefSelection, VcsPort};
use crate::reflog::ReflogHistory;

pub const TAG_NAMESPACE: &str = "rebase/last/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub name: String,
    pub commit_id: String,
}

impl Tag {
    fn new(name: String, commit_id: impl Into<String>) -> Self {
        Self {
            name,
            commit_id: commit_id.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagPlan {
    pub branches: Vec<String>,
    pub tags: Vec<Tag>,
    pub base_tags: Vec<Tag>,
}

impl TagPlan {
    pub fn all_tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter().chain(self.base_tags.iter())
    }
}

#[derive(Debug, Clone)]
pub struct TagPlanner {
    pub patterns: Vec<String>,
    pub selection: RefSelection,
    pub main: String,
    pub reflog_depth: usize,
}

impl TagPlanner {
    /// Compute the marker set from repository state. Read-only.
    pub fn plan(&self, port: &dyn VcsPort) -> Result<TagPlan, VcsError> {
        let branches = port.list_refs(&self.patterns, &self.selection)?;
        if branches.is_empty() {
            warn!(
                "{}",
                VcsError::AmbiguousSelection {
                    patterns: self.patterns.clone()
                }
            );
        }

        let mut tags = Vec::new();
        let mut bases = BTreeSet::new();
        let mut last_bases = BTreeSet::new();
        for branch in &branches {
            if let Some(base) = port.merge_base(branch, &self.main)? {
                bases.insert(base);
            }
            let history = ReflogHistory::fetch(port, branch, self.reflog_depth.checked_add(1))?;
            for entry in history.historical() {
                let name = format!("{TAG_NAMESPACE}{branch}/{}", entry.position);
                tags.push(Tag::new(name, entry.commit_id.clone()));
                if let Some(base) = port.merge_base(&entry.commit_id, &self.main)? {
                    last_bases.insert(base);
                }
            }
        }

        let mut base_tags: Vec<Tag> = bases
            .iter()
            .enumerate()
            .map(|(i, c)| Tag::new(format!("{TAG_NAMESPACE}__base__/{i}"), c.clone()))
            .collect();
        base_tags.extend(
            last_bases
                .difference(&bases)
                .enumerate()
                .map(|(i, c)| Tag::new(format!("{TAG_NAMESPACE}__last_base__/{i}"), c.clone())),
        );
        debug!(
            branches = branches.len(),
            tags = tags.len(),
            base_tags = base_tags.len(),
            "planned markers"
        );

        Ok(TagPlan {
            branches,
            tags,
            base_tags,
        })
    }

    /// Replace every existing marker with the ones in `plan`.
    pub fn apply(&self, port: &dyn VcsPort, plan: &TagPlan) -> Result<(), VcsError> {
        cleanup_tags(port)?;
        for tag in plan.all_tags() {
            port.create_or_replace_tag(&tag.name, &tag.commit_id)?;
        }
        info!(markers = plan.tags.len() + plan.base_tags.len(), "markers written");
        Ok(())
    }

    pub fn run(&self, port: &dyn VcsPort) -> Result<TagPlan, VcsError> {
        let plan = self.plan(port)?;
        self.apply(port, &plan)?;
        Ok(plan)
    }
}

/// Delete every marker under [`TAG_NAMESPACE`]. Returns the deleted names.
pub fn cleanup_tags(port: &dyn VcsPort) -> Result<Vec<String>, VcsError> {
    let old = port.list_tags(TAG_NAMESPACE)?;
    if !old.is_empty() {
        debug!(count = old.len(), "removing old markers");
        port.delete_tags(&old)?;
    }
    Ok(old)
}
