use rebaseplan_core::{propagate_notes, NotesOptions, RefSelection};
use rebaseplan_git::GitCli;

use crate::config::RebaseplanConfig;

fn short(commit_id: &str) -> &str {
    &commit_id[..commit_id.len().min(12)]
}

/// `rebaseplan notes`: move notes from previous branch positions to the tips.
pub fn execute(git: &GitCli, config: &RebaseplanConfig, force: bool) -> anyhow::Result<()> {
    let opts = NotesOptions {
        patterns: config.patterns.clone(),
        selection: RefSelection::local(),
        namespaces: config.notes_refs.clone(),
        reflog_depth: config.reflog_depth,
        force,
    };
    let copies = propagate_notes(git, &opts)?;
    if copies.is_empty() {
        println!("No notes to carry forward");
        return Ok(());
    }
    for c in &copies {
        println!(
            "{} [{}] {} ({}) -> {}",
            c.branch,
            c.namespace,
            c.from.label,
            short(&c.from.commit_id),
            short(&c.to_commit)
        );
    }
    Ok(())
}
