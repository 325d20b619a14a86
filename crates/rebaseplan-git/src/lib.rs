//! [`VcsPort`] backed by the `git` executable.
//!
//! Queries always run. Mutations run unless the client is in dry-run mode,
//! in which case the equivalent command line is printed to stdout instead.
//! A failing command has its invocation and captured output echoed to stderr
//! before the error is returned.

pub mod command;
pub mod parse;
pub mod view;

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use rebaseplan_core::{NotesMap, RawReflogEntry, RefSelection, VcsError, VcsPort};
use tracing::{debug, info};

pub use view::{LogView, Viewer};

#[derive(Debug, Clone)]
pub struct GitCli {
    repo_root: PathBuf,
    dry_run: bool,
}

impl GitCli {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
            dry_run: false,
        }
    }

    /// Open the repository containing `start`.
    pub fn discover(start: &Path) -> Result<Self, VcsError> {
        let probe = Self::new(start);
        let top = probe.query(&["rev-parse", "--show-toplevel"])?;
        Ok(Self::new(top.trim()))
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn spawn(&self, args: &[String]) -> Result<Output, VcsError> {
        let invocation = command::render("git", args);
        debug!(command = %invocation, "git");
        Command::new("git")
            .args(args)
            .current_dir(&self.repo_root)
            .output()
            .map_err(|e| VcsError::failed(invocation, format!("git not available: {e}")))
    }

    fn check(&self, args: &[String], output: Output) -> Result<String, VcsError> {
        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }
        let invocation = command::render("git", args);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        eprintln!("{invocation}");
        if !stdout.trim().is_empty() {
            eprintln!("{}", stdout.trim_end());
        }
        if !stderr.trim().is_empty() {
            eprintln!("{}", stderr.trim_end());
        }
        Err(VcsError::failed(invocation, stderr.trim().to_string()))
    }

    fn query(&self, args: &[&str]) -> Result<String, VcsError> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let output = self.spawn(&args)?;
        self.check(&args, output)
    }

    /// Run a query whose exit code 1 means "no answer" rather than failure.
    fn query_optional(&self, args: &[&str]) -> Result<Option<String>, VcsError> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let output = self.spawn(&args)?;
        if output.status.code() == Some(1) {
            return Ok(None);
        }
        self.check(&args, output).map(Some)
    }

    fn mutate(&self, args: Vec<String>) -> Result<(), VcsError> {
        if self.dry_run {
            println!("{}", command::render("git", &args));
            return Ok(());
        }
        let output = self.spawn(&args)?;
        self.check(&args, output).map(|_| ())
    }

    /// Open `view` attached to the terminal, or print it in dry-run mode.
    pub fn open_view(&self, view: &LogView) -> Result<(), VcsError> {
        let (program, args) = view.command();
        let invocation = command::render(program, &args);
        if self.dry_run {
            println!("{invocation}");
            return Ok(());
        }
        debug!(command = %invocation, "view");
        let status = Command::new(program)
            .args(&args)
            .current_dir(&self.repo_root)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| VcsError::failed(invocation.clone(), e.to_string()))?;
        if !status.success() {
            eprintln!("{invocation}");
            return Err(VcsError::failed(invocation, format!("exited with {status}")));
        }
        Ok(())
    }
}

impl VcsPort for GitCli {
    fn list_refs(
        &self,
        patterns: &[String],
        selection: &RefSelection,
    ) -> Result<Vec<String>, VcsError> {
        let mut args = vec!["branch", "--format=%(refname)%09%(symref)"];
        if selection.remotes_only {
            args.push("--remotes");
        } else if selection.include_all {
            args.push("--all");
        }
        if let Some(main) = &selection.no_merged_into {
            args.extend(["--no-merged", main.as_str()]);
        }
        args.extend(selection.extra_args.iter().map(String::as_str));
        args.push("--list");
        args.extend(patterns.iter().map(String::as_str));
        Ok(parse::branch_list(&self.query(&args)?))
    }

    fn reflog(
        &self,
        ref_name: &str,
        max_entries: Option<usize>,
    ) -> Result<Vec<RawReflogEntry>, VcsError> {
        if self
            .query_optional(&["rev-parse", "--verify", "--quiet", ref_name])?
            .is_none()
        {
            return Ok(Vec::new());
        }
        // Counts beyond what git parses mean "everything".
        let limit = max_entries
            .filter(|n| i32::try_from(*n).is_ok())
            .map(|n| format!("--max-count={n}"));
        let mut args = vec!["reflog", "show", "--format=%H%x09%gd"];
        if let Some(limit) = &limit {
            args.push(limit);
        }
        args.extend([ref_name, "--"]);
        Ok(parse::reflog(&self.query(&args)?))
    }

    fn merge_base(&self, ref_a: &str, ref_b: &str) -> Result<Option<String>, VcsError> {
        Ok(self
            .query_optional(&["merge-base", ref_a, ref_b])?
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()))
    }

    fn resolve(&self, ref_name: &str) -> Result<String, VcsError> {
        let spec = format!("{ref_name}^{{commit}}");
        match self.query_optional(&["rev-parse", "--verify", "--quiet", &spec])? {
            Some(commit) if !commit.trim().is_empty() => Ok(commit.trim().to_string()),
            _ => Err(VcsError::unknown(ref_name)),
        }
    }

    fn current_ref(&self) -> Result<Option<String>, VcsError> {
        Ok(self
            .query_optional(&["symbolic-ref", "--quiet", "--short", "HEAD"])?
            .map(|s| s.trim().to_string()))
    }

    fn list_tags(&self, prefix: &str) -> Result<Vec<String>, VcsError> {
        // for-each-ref only prefix-matches whole path components
        let out = self.query(&["for-each-ref", "--format=%(refname)", "refs/tags"])?;
        let tags = parse::tag_list(&out);
        Ok(tags.into_iter().filter(|t| t.starts_with(prefix)).collect())
    }

    fn create_or_replace_tag(&self, name: &str, commit_id: &str) -> Result<(), VcsError> {
        self.mutate(strings(&["tag", "-f", name, commit_id]))
    }

    fn delete_tags(&self, names: &[String]) -> Result<(), VcsError> {
        if names.is_empty() {
            return Ok(());
        }
        let mut args = strings(&["tag", "-d"]);
        args.extend(names.iter().cloned());
        self.mutate(args)
    }

    fn create_tracking_branch(
        &self,
        local_name: &str,
        remote_name: &str,
    ) -> Result<(), VcsError> {
        self.mutate(strings(&["branch", "--track", local_name, remote_name]))
    }

    fn checkout(&self, ref_name: &str) -> Result<(), VcsError> {
        self.mutate(strings(&["checkout", "--quiet", ref_name]))
    }

    fn reset_hard(&self, ref_name: &str) -> Result<(), VcsError> {
        self.mutate(strings(&["reset", "--quiet", "--hard", ref_name]))
    }

    fn push(&self, remote: &str, ref_names: &[String], force: bool) -> Result<(), VcsError> {
        let mut args = strings(&["push"]);
        if force {
            args.push("--force".to_string());
        }
        args.push(remote.to_string());
        args.extend(ref_names.iter().cloned());
        self.mutate(args)
    }

    fn fetch(&self, remote: &str, prune: bool) -> Result<(), VcsError> {
        let mut args = strings(&["fetch"]);
        if prune {
            args.push("--prune".to_string());
        }
        args.push(remote.to_string());
        self.mutate(args)
    }

    fn list_annotations(&self, namespace: &str) -> Result<NotesMap, VcsError> {
        Ok(parse::notes_list(&self.query(&[
            "notes", "--ref", namespace, "list",
        ])?))
    }

    fn set_annotation(
        &self,
        namespace: &str,
        commit_id: &str,
        content_ref: &str,
        message: &str,
        force: bool,
    ) -> Result<(), VcsError> {
        // `-m` alongside `-C` would write a new blob; the note object is reused as is.
        info!(namespace, commit_id, content_ref, "{message}");
        let mut args = strings(&["notes", "--ref", namespace, "add"]);
        if force {
            args.push("-f".to_string());
        }
        args.extend(strings(&["-C", content_ref, commit_id]));
        self.mutate(args)
    }
}

fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}
