use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::error::VcsError;
use crate::port::{RawReflogEntry, VcsPort};

/// One historical position of a reference. `position` 0 is the present one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReflogEntry {
    pub commit_id: String,
    /// Reporting only (e.g. `feature@{2}`); never compared.
    pub label: String,
    pub is_current: bool,
    pub position: usize,
}

/// The fetched positional history of exactly one reference, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflogHistory {
    ref_name: String,
    entries: Vec<ReflogEntry>,
}

impl ReflogHistory {
    /// Build from raw backend lines, assigning positions in the given order.
    pub fn from_raw(ref_name: impl Into<String>, raw: Vec<RawReflogEntry>) -> Self {
        let entries = raw
            .into_iter()
            .enumerate()
            .map(|(position, r)| ReflogEntry {
                commit_id: r.commit_id,
                label: r.label,
                is_current: position == 0,
                position,
            })
            .collect();
        Self {
            ref_name: ref_name.into(),
            entries,
        }
    }

    /// Fetch the history of `ref_name`.
    ///
    /// A reference that exists but has no reflog gets a single synthesized
    /// current entry. A reference that does not resolve yields an empty history.
    pub fn fetch(
        port: &dyn VcsPort,
        ref_name: &str,
        max_entries: Option<usize>,
    ) -> Result<Self, VcsError> {
        Self::fetch_qualified(port, ref_name, ref_name, max_entries)
    }

    /// Like [`fetch`](Self::fetch), but reads `full_ref` (e.g. `refs/heads/x`)
    /// while naming the history and any synthesized label after `name`.
    pub fn fetch_qualified(
        port: &dyn VcsPort,
        name: &str,
        full_ref: &str,
        max_entries: Option<usize>,
    ) -> Result<Self, VcsError> {
        let raw = port.reflog(full_ref, max_entries)?;
        if !raw.is_empty() {
            debug!(ref_name = full_ref, entries = raw.len(), "fetched reflog");
            return Ok(Self::from_raw(name, raw));
        }
        match port.resolve(full_ref) {
            Ok(commit_id) => {
                debug!(ref_name = full_ref, "no reflog, using resolved tip");
                Ok(Self::from_raw(
                    name,
                    vec![RawReflogEntry::new(commit_id, format!("{name}@{{0}}"))],
                ))
            }
            Err(e) if e.is_unknown_reference() => Ok(Self::from_raw(name, Vec::new())),
            Err(e) => Err(e),
        }
    }

    pub fn ref_name(&self) -> &str {
        &self.ref_name
    }

    pub fn entries(&self) -> &[ReflogEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn current(&self) -> Option<&ReflogEntry> {
        self.entries.first()
    }

    /// Entries past the present position.
    pub fn historical(&self) -> &[ReflogEntry] {
        self.entries.get(1..).unwrap_or(&[])
    }

    /// The most recent entry whose commit is in `commit_ids`.
    pub fn latest_of<S: AsRef<str>>(
        &self,
        commit_ids: impl IntoIterator<Item = S>,
    ) -> Option<&ReflogEntry> {
        let wanted: BTreeSet<String> = commit_ids
            .into_iter()
            .map(|c| c.as_ref().to_string())
            .collect();
        self.entries.iter().find(|e| wanted.contains(&e.commit_id))
    }

    /// Every commit this reference held within the fetched window.
    pub fn commit_ids(&self) -> BTreeSet<String> {
        self.entries.iter().map(|e| e.commit_id.clone()).collect()
    }
}
