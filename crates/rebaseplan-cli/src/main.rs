mod cmd_config;
mod cmd_notes;
mod cmd_show;
mod cmd_sync;
mod config;

use clap::{Args, Parser, Subcommand};
use rebaseplan_git::GitCli;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::{Overrides, RebaseplanConfig};

#[derive(Parser)]
#[command(
    name = "rebaseplan",
    version,
    about = "Track rebased branches and reconcile them with their upstream"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    /// Defaults to `show`
    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Args)]
struct GlobalArgs {
    /// Branch-name pattern (repeatable, default "*")
    #[arg(long = "pattern", short = 'p', global = true)]
    patterns: Vec<String>,
    /// Integration branch
    #[arg(long, global = true)]
    main: Option<String>,
    /// Upstream remote
    #[arg(long, global = true)]
    upstream: Option<String>,
    /// Previous reflog positions to consider
    #[arg(long = "depth", short = 'd', global = true)]
    reflog_depth: Option<usize>,
    /// Print mutating git commands instead of running them
    #[arg(long, visible_alias = "show-cmdline", global = true)]
    dry_run: bool,
    /// Show every commit in the history view and log actions
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Refresh rebase markers and open the history view
    Show {
        /// Include remote branches
        #[arg(long, short = 'a')]
        all: bool,
        /// Open gitk instead of the terminal log
        #[arg(long)]
        view: bool,
        /// Extra options passed to the log command (after --)
        #[arg(last = true)]
        log_options: Vec<String>,
    },
    /// Remove all rebase markers
    Cleanup,
    /// Bring local branches in line with the upstream
    SyncLocal {
        /// Skip the initial fetch
        #[arg(long)]
        no_fetch: bool,
    },
    /// Force-push locally modified branches to the upstream
    SyncRemote {
        /// Skip the initial fetch
        #[arg(long)]
        no_fetch: bool,
    },
    /// Carry notes from previous branch positions to the current tips
    Notes {
        /// Notes namespace (repeatable, default "commits")
        #[arg(long = "notes-ref")]
        notes_refs: Vec<String>,
        /// Overwrite notes already present on the tip
        #[arg(long, short = 'f')]
        force: bool,
    },
    /// Print the effective configuration
    Config,
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let g = cli.global;
    init_tracing(g.verbose);

    let cwd = std::env::current_dir()?;
    let git = GitCli::discover(&cwd)?.with_dry_run(g.dry_run);

    let notes_refs = match &cli.cmd {
        Some(Command::Notes { notes_refs, .. }) => notes_refs.clone(),
        _ => Vec::new(),
    };
    let config = RebaseplanConfig::load(git.repo_root())?.with_overrides(Overrides {
        patterns: g.patterns,
        main: g.main,
        upstream: g.upstream,
        reflog_depth: g.reflog_depth,
        notes_refs,
    });

    let cmd = cli.cmd.unwrap_or(Command::Show {
        all: false,
        view: false,
        log_options: Vec::new(),
    });
    match cmd {
        Command::Show {
            all,
            view,
            log_options,
        } => cmd_show::execute(&cmd_show::ShowParams {
            git: &git,
            config: &config,
            all,
            gitk: view,
            verbose: g.verbose,
            log_options: &log_options,
        }),
        Command::Cleanup => cmd_show::cleanup(&git),
        Command::SyncLocal { no_fetch } => cmd_sync::local(&git, &config, !no_fetch),
        Command::SyncRemote { no_fetch } => cmd_sync::remote(&git, &config, !no_fetch),
        Command::Notes { force, .. } => cmd_notes::execute(&git, &config, force),
        Command::Config => cmd_config::show(&config),
    }
}
