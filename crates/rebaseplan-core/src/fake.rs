//! In-memory repository used by the engine's tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use globset::Glob;

use crate::error::VcsError;
use crate::port::{NotesMap, RawReflogEntry, RefSelection, VcsPort};

#[derive(Default)]
struct State {
    reflogs: BTreeMap<String, Vec<String>>,
    tips: BTreeMap<String, String>,
    locals: BTreeSet<String>,
    remotes: BTreeSet<String>,
    merged: BTreeSet<String>,
    merge_bases: BTreeMap<String, String>,
    tags: BTreeMap<String, String>,
    notes: BTreeMap<String, NotesMap>,
    head: Option<String>,
    detached: Option<String>,
    ops: Vec<String>,
    failing: BTreeSet<String>,
}

#[derive(Default)]
pub struct FakeRepo {
    state: RefCell<State>,
}

impl FakeRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reflog for `name`, newest first. The ref becomes resolvable.
    pub fn set_reflog(&self, name: &str, commits: &[&str]) {
        self.state.borrow_mut().reflogs.insert(
            name.to_string(),
            commits.iter().map(|c| c.to_string()).collect(),
        );
    }

    /// A resolvable ref without reflog.
    pub fn set_tip(&self, name: &str, commit: &str) {
        self.state
            .borrow_mut()
            .tips
            .insert(name.to_string(), commit.to_string());
    }

    pub fn add_local(&self, name: &str, commits: &[&str]) {
        self.set_reflog(name, commits);
        self.state.borrow_mut().locals.insert(name.to_string());
    }

    pub fn add_remote(&self, name: &str, commits: &[&str]) {
        self.set_reflog(name, commits);
        self.state.borrow_mut().remotes.insert(name.to_string());
    }

    pub fn mark_merged(&self, name: &str) {
        self.state.borrow_mut().merged.insert(name.to_string());
    }

    /// `merge_base(commit, <anything>)` answers `base`.
    pub fn set_merge_base(&self, commit: &str, base: &str) {
        self.state
            .borrow_mut()
            .merge_bases
            .insert(commit.to_string(), base.to_string());
    }

    pub fn set_tag(&self, name: &str, commit: &str) {
        self.state
            .borrow_mut()
            .tags
            .insert(name.to_string(), commit.to_string());
    }

    pub fn set_note(&self, namespace: &str, commit: &str, note: &str) {
        self.state
            .borrow_mut()
            .notes
            .entry(namespace.to_string())
            .or_default()
            .insert(commit.to_string(), note.to_string());
    }

    pub fn set_head(&self, branch: &str) {
        let mut s = self.state.borrow_mut();
        s.head = Some(branch.to_string());
        s.detached = None;
    }

    pub fn detach_head(&self, commit: &str) {
        let mut s = self.state.borrow_mut();
        s.head = None;
        s.detached = Some(commit.to_string());
    }

    /// Make the operation keyed `"<op> <arg>"` fail.
    pub fn fail_on(&self, key: &str) {
        self.state.borrow_mut().failing.insert(key.to_string());
    }

    pub fn ops(&self) -> Vec<String> {
        self.state.borrow().ops.clone()
    }

    pub fn tags(&self) -> BTreeMap<String, String> {
        self.state.borrow().tags.clone()
    }

    pub fn notes(&self, namespace: &str) -> NotesMap {
        self.state
            .borrow()
            .notes
            .get(namespace)
            .cloned()
            .unwrap_or_default()
    }

    pub fn head(&self) -> Option<String> {
        self.state.borrow().head.clone()
    }

    pub fn tip(&self, name: &str) -> Option<String> {
        self.resolve(name).ok()
    }

    /// Short name behind `ref_name`. Qualified branch refs only match a
    /// registered local or remote branch, never a tag.
    fn branch_name(&self, ref_name: &str) -> Option<String> {
        let s = self.state.borrow();
        if let Some(b) = ref_name.strip_prefix("refs/heads/") {
            return s.locals.contains(b).then(|| b.to_string());
        }
        if let Some(b) = ref_name.strip_prefix("refs/remotes/") {
            return s.remotes.contains(b).then(|| b.to_string());
        }
        Some(ref_name.to_string())
    }

    fn check(&self, key: String) -> Result<(), VcsError> {
        if self.state.borrow().failing.contains(&key) {
            return Err(VcsError::failed(key, "simulated failure"));
        }
        Ok(())
    }

    fn record(&self, key: String) -> Result<(), VcsError> {
        self.check(key.clone())?;
        self.state.borrow_mut().ops.push(key);
        Ok(())
    }
}

impl VcsPort for FakeRepo {
    fn list_refs(
        &self,
        patterns: &[String],
        selection: &RefSelection,
    ) -> Result<Vec<String>, VcsError> {
        self.check(format!("list_refs {}", patterns.join(" ")))?;
        let s = self.state.borrow();
        let candidates: Vec<&String> = if selection.remotes_only {
            s.remotes.iter().collect()
        } else if selection.include_all {
            s.locals.iter().chain(s.remotes.iter()).collect()
        } else {
            s.locals.iter().collect()
        };
        let mut matchers = Vec::new();
        for p in patterns {
            let glob = Glob::new(p).map_err(|e| VcsError::failed("list_refs", e.to_string()))?;
            matchers.push(glob.compile_matcher());
        }
        Ok(candidates
            .into_iter()
            .filter(|name| matchers.iter().any(|m| m.is_match(name.as_str())))
            .filter(|name| selection.no_merged_into.is_none() || !s.merged.contains(*name))
            .cloned()
            .collect())
    }

    fn reflog(
        &self,
        ref_name: &str,
        max_entries: Option<usize>,
    ) -> Result<Vec<RawReflogEntry>, VcsError> {
        let short = ref_name
            .strip_prefix("refs/heads/")
            .or_else(|| ref_name.strip_prefix("refs/remotes/"))
            .unwrap_or(ref_name);
        self.check(format!("reflog {short}"))?;
        let Some(name) = self.branch_name(ref_name) else {
            return Ok(Vec::new());
        };
        let s = self.state.borrow();
        let Some(commits) = s.reflogs.get(&name) else {
            return Ok(Vec::new());
        };
        Ok(commits
            .iter()
            .take(max_entries.unwrap_or(usize::MAX))
            .enumerate()
            .map(|(i, c)| RawReflogEntry::new(c.clone(), format!("{name}@{{{i}}}")))
            .collect())
    }

    fn merge_base(&self, ref_a: &str, ref_b: &str) -> Result<Option<String>, VcsError> {
        self.check(format!("merge_base {ref_a}"))?;
        let a = self.resolve(ref_a)?;
        self.resolve(ref_b)?;
        Ok(self.state.borrow().merge_bases.get(&a).cloned())
    }

    fn resolve(&self, ref_name: &str) -> Result<String, VcsError> {
        if ref_name.starts_with("refs/") {
            let name = self
                .branch_name(ref_name)
                .ok_or_else(|| VcsError::unknown(ref_name))?;
            let s = self.state.borrow();
            return s
                .reflogs
                .get(&name)
                .and_then(|l| l.first())
                .or_else(|| s.tips.get(&name))
                .cloned()
                .ok_or_else(|| VcsError::unknown(ref_name));
        }
        let s = self.state.borrow();
        if ref_name == "HEAD" {
            if let Some(commit) = &s.detached {
                return Ok(commit.clone());
            }
            if let Some(branch) = s.head.clone() {
                drop(s);
                return self.resolve(&branch);
            }
            return Err(VcsError::unknown(ref_name));
        }
        if let Some(c) = s.tags.get(ref_name) {
            return Ok(c.clone());
        }
        if let Some(c) = s.reflogs.get(ref_name).and_then(|l| l.first()) {
            return Ok(c.clone());
        }
        if let Some(c) = s.tips.get(ref_name) {
            return Ok(c.clone());
        }
        // Bare commit ids resolve to themselves.
        if s.reflogs.values().any(|l| l.iter().any(|c| c == ref_name))
            || s.tips.values().any(|c| c == ref_name)
        {
            return Ok(ref_name.to_string());
        }
        Err(VcsError::unknown(ref_name))
    }

    fn current_ref(&self) -> Result<Option<String>, VcsError> {
        Ok(self.state.borrow().head.clone())
    }

    fn list_tags(&self, prefix: &str) -> Result<Vec<String>, VcsError> {
        self.check(format!("list_tags {prefix}"))?;
        Ok(self
            .state
            .borrow()
            .tags
            .keys()
            .filter(|t| t.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn create_or_replace_tag(&self, name: &str, commit_id: &str) -> Result<(), VcsError> {
        self.record(format!("tag {name} {commit_id}"))?;
        self.set_tag(name, commit_id);
        Ok(())
    }

    fn delete_tags(&self, names: &[String]) -> Result<(), VcsError> {
        self.record(format!("delete_tags {}", names.join(" ")))?;
        let mut s = self.state.borrow_mut();
        for n in names {
            s.tags.remove(n);
        }
        Ok(())
    }

    fn create_tracking_branch(
        &self,
        local_name: &str,
        remote_name: &str,
    ) -> Result<(), VcsError> {
        self.record(format!("track {local_name} {remote_name}"))?;
        let tip = self.resolve(remote_name)?;
        self.add_local(local_name, &[&tip]);
        Ok(())
    }

    fn checkout(&self, ref_name: &str) -> Result<(), VcsError> {
        self.record(format!("checkout {ref_name}"))?;
        let is_branch = self.state.borrow().locals.contains(ref_name);
        if is_branch {
            self.set_head(ref_name);
        } else {
            let commit = self.resolve(ref_name)?;
            self.detach_head(&commit);
        }
        Ok(())
    }

    fn reset_hard(&self, ref_name: &str) -> Result<(), VcsError> {
        self.record(format!("reset_hard {ref_name}"))?;
        let target = self.resolve(ref_name)?;
        let mut s = self.state.borrow_mut();
        let head = s
            .head
            .clone()
            .ok_or_else(|| VcsError::failed("reset_hard", "HEAD is detached"))?;
        s.reflogs.entry(head).or_default().insert(0, target);
        Ok(())
    }

    fn push(&self, remote: &str, ref_names: &[String], force: bool) -> Result<(), VcsError> {
        let flag = if force { " --force" } else { "" };
        self.record(format!("push{flag} {remote} {}", ref_names.join(" ")))
    }

    fn fetch(&self, remote: &str, prune: bool) -> Result<(), VcsError> {
        let flag = if prune { " --prune" } else { "" };
        self.record(format!("fetch{flag} {remote}"))
    }

    fn list_annotations(&self, namespace: &str) -> Result<NotesMap, VcsError> {
        self.check(format!("list_annotations {namespace}"))?;
        Ok(self.notes(namespace))
    }

    fn set_annotation(
        &self,
        namespace: &str,
        commit_id: &str,
        content_ref: &str,
        message: &str,
        force: bool,
    ) -> Result<(), VcsError> {
        self.record(format!("note {namespace} {commit_id} {content_ref} {message}"))?;
        if !force && self.notes(namespace).contains_key(commit_id) {
            return Err(VcsError::failed("note", "note already exists"));
        }
        self.set_note(namespace, commit_id, content_ref);
        Ok(())
    }
}
