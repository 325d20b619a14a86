use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File at the repository top level holding per-project defaults.
pub const CONFIG_FILE: &str = ".rebaseplan.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RebaseplanConfig {
    /// Branch-name patterns selecting the branches to work on.
    pub patterns: Vec<String>,
    /// Integration branch the feature branches are rebased onto.
    pub main: String,
    /// Remote holding the upstream branches.
    pub upstream: String,
    /// Number of previous reflog positions to consider.
    pub reflog_depth: usize,
    /// Notes namespaces carried forward by `notes`.
    pub notes_refs: Vec<String>,
}

impl Default for RebaseplanConfig {
    fn default() -> Self {
        Self {
            patterns: vec!["*".to_string()],
            main: "develop".to_string(),
            upstream: "origin".to_string(),
            reflog_depth: 1,
            notes_refs: vec!["commits".to_string()],
        }
    }
}

/// Values given on the command line; `None`/empty leaves the file value alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub patterns: Vec<String>,
    pub main: Option<String>,
    pub upstream: Option<String>,
    pub reflog_depth: Option<usize>,
    pub notes_refs: Vec<String>,
}

impl RebaseplanConfig {
    /// Read `.rebaseplan.json` under `repo_root`. Missing file gives the defaults.
    pub fn load(repo_root: &Path) -> anyhow::Result<Self> {
        let path = repo_root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn with_overrides(mut self, o: Overrides) -> Self {
        if !o.patterns.is_empty() {
            self.patterns = o.patterns;
        }
        if let Some(main) = o.main {
            self.main = main;
        }
        if let Some(upstream) = o.upstream {
            self.upstream = upstream;
        }
        if let Some(depth) = o.reflog_depth {
            self.reflog_depth = depth;
        }
        if !o.notes_refs.is_empty() {
            self.notes_refs = o.notes_refs;
        }
        self
    }
}
