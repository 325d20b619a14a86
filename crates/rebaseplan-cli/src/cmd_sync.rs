use rebaseplan_core::{render_grouped, sync_local, sync_remote, Reconciler};
use rebaseplan_git::GitCli;

use crate::config::RebaseplanConfig;

fn reconciler(config: &RebaseplanConfig) -> Reconciler {
    Reconciler::new(
        config.patterns.clone(),
        config.main.clone(),
        config.upstream.clone(),
    )
}

/// `rebaseplan sync-local`
pub fn local(git: &GitCli, config: &RebaseplanConfig, fetch: bool) -> anyhow::Result<()> {
    let outcomes = sync_local(git, &reconciler(config), fetch)?;
    if outcomes.is_empty() {
        println!("No upstream branches to reconcile");
        return Ok(());
    }
    print!("{}", render_grouped(&outcomes));
    Ok(())
}

/// `rebaseplan sync-remote`
pub fn remote(git: &GitCli, config: &RebaseplanConfig, fetch: bool) -> anyhow::Result<()> {
    let report = sync_remote(git, &reconciler(config), fetch)?;
    if !report.outcomes.is_empty() {
        print!("{}", render_grouped(&report.outcomes));
        println!();
    }
    println!(
        "{}",
        push_summary(&report.pushed, &config.upstream, git.is_dry_run())
    );
    Ok(())
}

fn push_summary(pushed: &[String], upstream: &str, dry_run: bool) -> String {
    if pushed.is_empty() {
        "nothing to push".to_string()
    } else if dry_run {
        format!("Would force-push {} to {upstream}", pushed.join(" "))
    } else {
        format!("Force-pushed {} to {upstream}", pushed.join(" "))
    }
}
