use anyhow::Result;
use clap::{Parser, Subcommand};
use gitlet::areas::repository::Repository;
use gitlet::artifacts::merge::MergeOutcome;
use gitlet::artifacts::objects::commit::Commit;
use gitlet::artifacts::objects::object_id::ObjectId;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "GITLET_LOG";

#[derive(Parser)]
#[command(
    name = "gitlet",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A small version-control system",
    long_about = "A small content-addressed version-control system with branches \
    and three-way merges, storing its data in a .gitlet directory.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[arg(short = 'C', global = true, help = "Run as if started in <DIR>")]
    dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "init", about = "Create a new repository in the current directory")]
    Init,
    #[command(name = "add", about = "Stage a file for the next commit")]
    Add {
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "commit", about = "Record the staged changes")]
    Commit {
        #[arg(index = 1, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "rm",
        about = "Unstage a file, or stage its removal and delete it if it is tracked"
    )]
    Rm {
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "log", about = "Show first-parent history from HEAD")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the ids of the commits with the given message")]
    Find {
        #[arg(index = 1)]
        message: String,
    },
    #[command(name = "status", about = "Show branches, staged changes and working tree state")]
    Status,
    #[command(name = "branch", about = "Create a branch at the current commit")]
    Branch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch")]
    RmBranch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(
        name = "checkout",
        about = "Switch branches, or restore a file from a commit",
        long_about = "checkout <branch> switches to a branch. \
        checkout [<commit>] -- <file> restores a file from a commit (HEAD by default)."
    )]
    Checkout {
        #[arg(index = 1, help = "Branch to switch to, or commit to restore from")]
        target: Option<String>,
        #[arg(index = 2, last = true, help = "File to restore")]
        file: Option<String>,
    },
    #[command(name = "reset", about = "Move the current branch to a commit")]
    Reset {
        #[arg(index = 1)]
        commit: String,
    },
    #[command(name = "merge", about = "Merge a branch into the current branch")]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let path = match cli.dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let repository = Repository::new(&path)?;
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Init => {
            repository.init()?;
        }
        Commands::Add { file } => {
            repository.add(&file)?;
        }
        Commands::Commit { message } => {
            repository.commit(&message)?;
        }
        Commands::Rm { file } => repository.rm(&file)?,
        Commands::Log => {
            for entry in repository.log()? {
                let (oid, commit) = entry?;
                write_commit(&mut stdout, &oid, &commit)?;
            }
        }
        Commands::GlobalLog => {
            for (oid, commit) in repository.global_log()? {
                write_commit(&mut stdout, &oid, &commit)?;
            }
        }
        Commands::Find { message } => {
            let matches = repository.find(&message)?;
            if matches.is_empty() {
                anyhow::bail!("Found no commit with that message.");
            }
            for oid in matches {
                writeln!(stdout, "{oid}")?;
            }
        }
        Commands::Status => {
            let status = repository.status()?;

            writeln!(stdout, "=== Branches ===")?;
            for branch in &status.branches {
                let marker = if status.active_branch.as_ref() == Some(branch) {
                    "*"
                } else {
                    ""
                };
                writeln!(stdout, "{marker}{branch}")?;
            }
            writeln!(stdout)?;

            writeln!(stdout, "=== Staged Files ===")?;
            for file in &status.staged_files {
                writeln!(stdout, "{file}")?;
            }
            writeln!(stdout)?;

            writeln!(stdout, "=== Removed Files ===")?;
            for file in &status.removed_files {
                writeln!(stdout, "{file}")?;
            }
            writeln!(stdout)?;

            writeln!(stdout, "=== Modifications Not Staged For Commit ===")?;
            for (file, change) in &status.unstaged_changes {
                writeln!(stdout, "{file} ({change})")?;
            }
            writeln!(stdout)?;

            writeln!(stdout, "=== Untracked Files ===")?;
            for file in &status.untracked_files {
                writeln!(stdout, "{file}")?;
            }
            writeln!(stdout)?;
        }
        Commands::Branch { name } => {
            repository.branch(&name)?;
        }
        Commands::RmBranch { name } => {
            repository.remove_branch(&name)?;
        }
        Commands::Checkout { target, file } => match (target, file) {
            (target, Some(file)) => repository.checkout_path(target.as_deref(), &file)?,
            (Some(branch), None) => {
                repository.checkout(&branch)?;
            }
            (None, None) => anyhow::bail!("Incorrect operands."),
        },
        Commands::Reset { commit } => {
            repository.reset(&commit)?;
        }
        Commands::Merge { branch } => match repository.merge(&branch)? {
            MergeOutcome::AlreadyUpToDate => {
                writeln!(stdout, "Given branch is an ancestor of the current branch.")?
            }
            MergeOutcome::FastForwarded(_) => writeln!(stdout, "Current branch fast-forwarded.")?,
            outcome @ MergeOutcome::Merged { .. } => {
                if outcome.has_conflicts() {
                    writeln!(stdout, "Encountered a merge conflict.")?;
                }
            }
        },
    }

    Ok(())
}

fn write_commit(out: &mut impl Write, oid: &ObjectId, commit: &Commit) -> Result<()> {
    writeln!(out, "===")?;
    writeln!(out, "commit {oid}")?;
    if commit.is_merge() {
        let parents = commit
            .parents()
            .iter()
            .map(|parent| parent.to_short_oid())
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "Merge: {parents}")?;
    }
    writeln!(out, "Date: {}", commit.readable_timestamp())?;
    writeln!(out, "{}", commit.message())?;
    writeln!(out)?;

    Ok(())
}
