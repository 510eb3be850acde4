//! pygit CLI - a minimal content-addressed version-control engine

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use pygit::ops::{self, CheckoutOptions, MergeOutcome};
use pygit::{read_blob, read_commit, read_tree, tree_delta, Hash, Head, ObjectKind, Repo};

#[derive(Parser)]
#[command(name = "pygit")]
#[command(about = "a minimal content-addressed version-control engine")]
#[command(version)]
struct Cli {
    /// repository path (searched upward for `.pygit`)
    #[arg(short, long, default_value = ".")]
    repo: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// initialize a new repository
    Init {
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// stage paths for the next commit ("." stages the whole working tree)
    Add { paths: Vec<String> },

    /// unstage paths, optionally leaving the working-tree copy in place
    Rm {
        paths: Vec<String>,
        #[arg(long)]
        cached: bool,
    },

    /// record the staged tree as a new commit
    Commit {
        #[arg(short, long)]
        message: String,
    },

    /// show staged, unstaged and untracked changes
    Status,

    /// show first-parent commit history
    Log {
        #[arg(default_value = "HEAD")]
        rev: String,
        #[arg(short = 'n', long)]
        max_count: Option<usize>,
    },

    /// create, delete or list branches
    Branch {
        name: Option<String>,
        #[arg(short, long)]
        delete: Option<String>,
    },

    /// switch HEAD (and the working tree) to a branch or revision
    Checkout {
        target: String,
        #[arg(short = 'b', long = "create")]
        create_branch: bool,
        #[arg(long)]
        force: bool,
    },

    /// create, delete or list annotated tags
    Tag {
        name: Option<String>,
        #[arg(short, long)]
        message: Option<String>,
        #[arg(short, long)]
        delete: Option<String>,
    },

    /// show changes between two revisions
    Diff { rev1: String, rev2: String },

    /// merge a branch into HEAD
    Merge { branch: String },

    /// replay HEAD's branch on top of another revision
    Rebase { onto: String },

    /// stash or restore uncommitted changes
    Stash {
        #[command(subcommand)]
        action: Option<StashAction>,
    },

    /// remove untracked files from the working tree
    Clean {
        #[arg(long = "dry-run")]
        dry_run: bool,
    },

    /// get, set or list configuration values
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// show a commit and the delta it introduced
    Show {
        #[arg(default_value = "HEAD")]
        rev: String,
    },

    /// add, remove or list configured remotes
    Remote {
        #[command(subcommand)]
        action: RemoteAction,
    },

    /// clone a repository by copying its objects and refs locally
    Clone { source: PathBuf, destination: PathBuf },
}

#[derive(Subcommand)]
enum StashAction {
    /// snapshot the working tree and reset it to HEAD (default)
    Push { message: Option<String> },
    /// list stash entries, most recent first
    List,
    /// apply and drop the most recent stash entry
    Pop,
    /// apply the most recent stash entry without dropping it
    Apply,
}

#[derive(Subcommand)]
enum ConfigAction {
    Get { key: String },
    Set { key: String, value: String },
    Unset { key: String },
    List,
}

#[derive(Subcommand)]
enum RemoteAction {
    Add { name: String, url: String },
    Remove { name: String },
    List,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: Cli) -> pygit::Result<()> {
    if let Commands::Init { path } = &cli.command {
        Repo::init(path)?;
        println!("initialized pygit repository at {}", path.display());
        return Ok(());
    }

    if let Commands::Clone { source, destination } = &cli.command {
        let src = Repo::discover(source)?;
        pygit::transport::clone_local(&src, destination)?;
        println!("cloned into {}", destination.display());
        return Ok(());
    }

    let repo = Repo::discover(&cli.repo)?;

    match cli.command {
        Commands::Init { .. } | Commands::Clone { .. } => unreachable!(),

        Commands::Add { paths } => {
            ops::add(&repo, &paths)?;
        }

        Commands::Rm { paths, cached } => {
            ops::rm(&repo, &paths, cached)?;
        }

        Commands::Commit { message } => {
            let id = ops::commit(&repo, &message)?;
            println!("{}", id);
        }

        Commands::Status => {
            let status = ops::status(&repo)?;
            if status.is_clean() {
                println!("nothing to commit, working tree clean");
            } else {
                if !status.staged.is_empty() {
                    println!("changes to be committed:");
                    for entry in &status.staged {
                        println!("  {}", entry);
                    }
                }
                if !status.unstaged.is_empty() {
                    println!("changes not staged for commit:");
                    for entry in &status.unstaged {
                        println!("  {}", entry);
                    }
                }
                if !status.untracked.is_empty() {
                    println!("untracked files:");
                    for path in &status.untracked {
                        println!("  {}", path);
                    }
                }
            }
        }

        Commands::Log { rev, max_count } => {
            for entry in ops::log(&repo, &rev, max_count)? {
                println!("{}", entry);
            }
        }

        Commands::Branch { name, delete } => {
            if let Some(name) = delete {
                pygit::delete_branch(&repo, &name)?;
                println!("deleted branch {}", name);
            } else if let Some(name) = name {
                let id = pygit::head_commit(&repo)?;
                pygit::write_branch(&repo, &name, &id)?;
                println!("created branch {}", name);
            } else {
                let current = match pygit::read_head(&repo)? {
                    Head::Attached(name) => Some(name),
                    Head::Detached(_) => None,
                };
                for branch in pygit::list_branches(&repo)? {
                    let marker = if Some(&branch) == current.as_ref() { "* " } else { "  " };
                    println!("{}{}", marker, branch);
                }
            }
        }

        Commands::Checkout {
            target,
            create_branch,
            force,
        } => {
            ops::checkout(
                &repo,
                &target,
                CheckoutOptions {
                    create_branch,
                    force,
                },
            )?;
            println!("switched to {}", target);
        }

        Commands::Tag { name, message, delete } => {
            if let Some(name) = delete {
                pygit::delete_tag(&repo, &name)?;
                println!("deleted tag {}", name);
            } else if let Some(name) = name {
                let target = pygit::head_commit(&repo)?;
                let identity = ops::current_identity(&repo)?;
                let now = unix_now();
                pygit::create_tag(
                    &repo,
                    &name,
                    target,
                    ObjectKind::Commit,
                    &identity,
                    now,
                    message.as_deref().unwrap_or(""),
                )?;
                println!("created tag {}", name);
            } else {
                for tag in pygit::list_tags(&repo)? {
                    println!("{}", tag);
                }
            }
        }

        Commands::Diff { rev1, rev2 } => {
            let tree1 = read_tree(&repo, &read_commit(&repo, &pygit::resolve_to_commit(&repo, &rev1)?)?.tree)?;
            let tree2 = read_tree(&repo, &read_commit(&repo, &pygit::resolve_to_commit(&repo, &rev2)?)?.tree)?;
            for entry in tree_delta(&tree1, &tree2) {
                println!("{}", entry);
                if entry.kind == pygit::ChangeKind::Modified {
                    if let (Some(old), Some(new)) = (tree1.get(&entry.path), tree2.get(&entry.path)) {
                        print_content_diff(&repo, old, new)?;
                    }
                }
            }
        }

        Commands::Merge { branch } => match ops::merge(&repo, &branch)? {
            MergeOutcome::UpToDate => println!("already up to date"),
            MergeOutcome::FastForward(id) => println!("fast-forwarded to {}", id),
            MergeOutcome::Merged(id) => println!("merged, new commit {}", id),
            MergeOutcome::Conflicts(paths) => {
                println!("conflicts in:");
                for path in paths {
                    println!("  {}", path);
                }
            }
        },

        Commands::Rebase { onto } => {
            let id = ops::rebase(&repo, &onto)?;
            println!("rebased onto {}", id);
        }

        Commands::Stash { action } => match action.unwrap_or(StashAction::Push { message: None }) {
            StashAction::Push { message } => {
                let id = ops::stash_push(&repo, message.as_deref())?;
                println!("{}", id);
            }
            StashAction::List => {
                for entry in ops::stash_list(&repo)? {
                    println!("{} {}", entry.id, entry.commit.message);
                }
            }
            StashAction::Pop => {
                let id = ops::stash_pop(&repo)?;
                println!("{}", id);
            }
            StashAction::Apply => {
                let id = ops::stash_apply(&repo)?;
                println!("{}", id);
            }
        },

        Commands::Clean { dry_run } => {
            let removed = ops::clean(&repo, dry_run)?;
            let verb = if dry_run { "would remove" } else { "removed" };
            for path in removed {
                println!("{} {}", verb, path);
            }
        }

        Commands::Config { action } => {
            let mut config = repo.config()?;
            match action {
                ConfigAction::Get { key } => {
                    if let Some(value) = config.get(&key) {
                        println!("{}", value);
                    }
                }
                ConfigAction::Set { key, value } => {
                    config.set(key, value);
                    repo.save_config(&config)?;
                }
                ConfigAction::Unset { key } => {
                    config.unset(&key)?;
                    repo.save_config(&config)?;
                }
                ConfigAction::List => {
                    for (key, value) in &config.settings {
                        println!("{}={}", key, value);
                    }
                }
            }
        }

        Commands::Show { rev } => {
            let (commit, delta) = ops::show(&repo, &rev)?;
            println!("commit {}", pygit::resolve_to_commit(&repo, &rev)?);
            println!("Author: {}", commit.author);
            println!();
            println!("    {}", commit.message);
            println!();
            for entry in delta {
                println!("{}", entry);
            }
        }

        Commands::Remote { action } => {
            let mut config = repo.config()?;
            match action {
                RemoteAction::Add { name, url } => {
                    config.add_remote(name, url)?;
                    repo.save_config(&config)?;
                }
                RemoteAction::Remove { name } => {
                    config.remove_remote(&name)?;
                    repo.save_config(&config)?;
                }
                RemoteAction::List => {
                    for remote in &config.remotes {
                        println!("{} {}", remote.name, remote.url);
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_content_diff(repo: &Repo, old: &Hash, new: &Hash) -> pygit::Result<()> {
    let old_content = read_blob(repo, old)?;
    let new_content = read_blob(repo, new)?;
    let (Ok(old_text), Ok(new_text)) = (
        String::from_utf8(old_content),
        String::from_utf8(new_content),
    ) else {
        println!("  (binary content differs)");
        return Ok(());
    };
    print!("{}", pygit::file_diff(&old_text, &new_text));
    Ok(())
}

fn unix_now() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
