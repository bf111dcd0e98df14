use anyhow::{Context, Result};
use artifact_purge::error::EXIT_FAILURE;
use artifact_purge::purge::{ASSUME_YES_ENV, MAX_DIAGNOSTIC_LOGS};
use artifact_purge::{load_standards, output, run, GitCli, PurgeError, PurgeOptions, StdinPrompt};
use artifact_purge::DEFAULT_THRESHOLD_BYTES;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Untrack committed build artifacts and keep them out with a managed .gitignore block",
    long_about = None
)]
struct Args {
    /// Report actions without changing anything
    #[arg(long)]
    dry_run: bool,

    /// Allow running on a working tree with uncommitted changes
    #[arg(long)]
    allow_dirty: bool,

    /// Also purge artifacts from all history using git-filter-repo
    #[arg(long)]
    apply_history_rewrite: bool,

    /// Directory inside the repository to operate on
    #[arg(short = 'C', long = "repo", default_value = ".")]
    repo: PathBuf,

    /// Free-text list of extra removal patterns (relative to the repository root)
    #[arg(long, default_value = "rm.txt")]
    rm_list: PathBuf,

    /// Directory-tree dump used to find artifact directories (relative to the repository root)
    #[arg(long, default_value = "tree.txt")]
    tree: PathBuf,

    /// Diagnostic log to note if present (repeatable, at most two)
    #[arg(
        long = "diagnostic",
        default_values = ["current state of the repo.txt", "new 2.txt"]
    )]
    diagnostics: Vec<PathBuf>,

    /// Report history blobs at or above this many bytes
    #[arg(long, default_value_t = DEFAULT_THRESHOLD_BYTES)]
    large_blob_threshold: u64,
}

fn purge(args: Args) -> Result<()> {
    let assume_yes = std::env::var(ASSUME_YES_ENV).as_deref() == Ok("1");

    let options = PurgeOptions {
        dry_run: args.dry_run,
        allow_dirty: args.allow_dirty,
        history_rewrite: args.apply_history_rewrite,
        assume_yes,
        rm_list: args.rm_list,
        tree: args.tree,
        diagnostics: args.diagnostics,
        large_blob_threshold: args.large_blob_threshold,
    };

    let standards = load_standards().context("Failed to load standard artifact definitions")?;
    let mut git = GitCli::discover(&args.repo)?;
    run(&mut git, &mut StdinPrompt, &standards, &options)?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.diagnostics.len() > MAX_DIAGNOSTIC_LOGS {
        output::error(&format!(
            "--diagnostic may be given at most {} times",
            MAX_DIAGNOSTIC_LOGS
        ));
        return ExitCode::from(EXIT_FAILURE as u8);
    }

    match purge(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(&format!("{:#}", err));
            let code = err
                .downcast_ref::<PurgeError>()
                .map(PurgeError::exit_code)
                .unwrap_or(EXIT_FAILURE);
            ExitCode::from(code as u8)
        }
    }
}
