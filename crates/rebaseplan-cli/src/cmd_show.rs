use rebaseplan_core::{cleanup_tags, RefSelection, TagPlanner};
use rebaseplan_git::{GitCli, LogView, Viewer};

use crate::config::RebaseplanConfig;

pub struct ShowParams<'a> {
    pub git: &'a GitCli,
    pub config: &'a RebaseplanConfig,
    pub all: bool,
    pub gitk: bool,
    pub verbose: bool,
    pub log_options: &'a [String],
}

/// `rebaseplan show`: refresh the markers, then open the history view.
pub fn execute(p: &ShowParams) -> anyhow::Result<()> {
    let planner = TagPlanner {
        patterns: p.config.patterns.clone(),
        selection: if p.all {
            RefSelection::all()
        } else {
            RefSelection::local()
        },
        main: p.config.main.clone(),
        reflog_depth: p.config.reflog_depth,
    };
    let plan = planner.run(p.git)?;
    if plan.branches.is_empty() {
        println!("No branches match {}", p.config.patterns.join(" "));
        return Ok(());
    }

    let view = LogView {
        viewer: if p.gitk { Viewer::Gitk } else { Viewer::Text },
        verbose: p.verbose,
        hide_remote: (!p.all).then(|| p.config.upstream.clone()),
        extra_args: p.log_options.to_vec(),
        main: p.config.main.clone(),
        upstream: p.config.upstream.clone(),
        branches: plan.branches,
    };
    p.git.open_view(&view)?;
    Ok(())
}

/// `rebaseplan cleanup`
pub fn cleanup(git: &GitCli) -> anyhow::Result<()> {
    let removed = cleanup_tags(git)?;
    if removed.is_empty() {
        println!("No markers to remove");
    } else {
        println!("Removed {} markers", removed.len());
    }
    Ok(())
}
