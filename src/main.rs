//! instacommit - CLI entry point.

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use dialoguer::MultiSelect;
use tracing_subscriber::EnvFilter;

use instacommit::config::log_directive;
use instacommit::{
    ChangeGroup, ChangeRecord, CommitTarget, Git2Repository, InstantCommitConfig,
    RepositoryAccess, instant_commit, preview,
};

/// Stage and commit selected files with a generated message.
#[derive(Parser, Debug)]
#[command(name = "instacommit")]
#[command(about = "Stage and commit selected files with a generated message")]
#[command(version)]
struct Cli {
    /// Files to commit
    paths: Vec<PathBuf>,

    /// Commit every change in a group ("index" or "workingTree"); repeatable
    #[arg(short, long = "group", value_name = "GROUP")]
    groups: Vec<String>,

    /// Choose files interactively from the current changes
    #[arg(long)]
    pick: bool,

    /// Repository to operate on (defaults to $INSTACOMMIT_REPO, then ".")
    #[arg(short = 'C', long)]
    repo: Option<PathBuf>,

    /// Print the commit message without staging or committing
    #[arg(long)]
    dry_run: bool,

    /// Show debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(log_directive(cli.verbose).parse()?))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = InstantCommitConfig::new(cli.repo.clone(), cli.dry_run, cli.verbose);

    let repo = Git2Repository::open(&config.repo)
        .context("Not a git repository. Run instacommit from within a git repository.")?;

    let mut targets = path_targets(&cli.paths)?;
    targets.extend(cli.groups.iter().map(|g| CommitTarget::Group(ChangeGroup::from(g.as_str()))));
    if cli.pick {
        targets.extend(pick_targets(&repo).await?);
    }

    if config.dry_run {
        let message = preview(&repo, &targets).await?;
        println!("{}", message.format());
        return Ok(());
    }

    let outcome = instant_commit(&repo, &targets).await?;

    if config.verbose {
        for path in &outcome.staged_paths {
            eprintln!("  staged {}", path.display());
        }
    }
    println!("✓ {} ({})", outcome.summary, short_id(&outcome.commit_id));

    Ok(())
}

/// Turn command-line paths into absolute path targets.
fn path_targets(paths: &[PathBuf]) -> Result<Vec<CommitTarget>> {
    if paths.is_empty() {
        return Ok(Vec::new());
    }

    let cwd = std::env::current_dir().context("Could not determine current directory")?;
    let cwd = std::fs::canonicalize(&cwd).unwrap_or(cwd);

    Ok(paths
        .iter()
        .map(|p| CommitTarget::Path(lexical_absolute(&cwd, p)))
        .collect())
}

/// Join `path` onto `base` and drop `.`/`..` components without touching the disk,
/// so deleted files can still be named.
fn lexical_absolute(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Let the user choose among the current staged and unstaged changes.
async fn pick_targets(repo: &Git2Repository) -> Result<Vec<CommitTarget>> {
    let root = repo.root_path();
    let mut records: Vec<(&str, ChangeRecord)> = Vec::new();
    for record in repo.staged_changes().await.context("Failed to read staged changes")? {
        records.push(("staged", record));
    }
    for record in repo.unstaged_changes().await.context("Failed to read unstaged changes")? {
        records.push(("unstaged", record));
    }

    if records.is_empty() {
        println!("No changes to pick from.");
        return Ok(Vec::new());
    }

    let labels: Vec<String> = records
        .iter()
        .map(|(pool, r)| {
            let relative = r.path.strip_prefix(&root).unwrap_or(&r.path);
            format!("[{}] {} ({:?})", pool, relative.display(), r.status)
        })
        .collect();

    let chosen = MultiSelect::new()
        .with_prompt("Select files to commit")
        .items(&labels)
        .interact()
        .context("Selection cancelled")?;

    Ok(chosen
        .into_iter()
        .map(|i| CommitTarget::Record(records[i].1.clone()))
        .collect())
}

fn short_id(id: &str) -> &str {
    &id[..id.len().min(7)]
}
