use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use minus::Pager;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use twig::areas::repository::Repository;
use twig::artifacts::core::PagerWriter;
use twig::errors::{TwigError, user_error};

const LOG_ENV: &str = "TWIG_LOG";
const NO_PAGER_ENV: &str = "NO_PAGER";

#[derive(Parser)]
#[command(
    name = "twig",
    version = "0.1.0",
    about = "A small local version-control system",
    long_about = "Twig tracks a flat directory of files in a store under .twig/. \
    It supports branches, three-way merges and exchanging history with \
    other stores reachable through the filesystem.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[arg(
        short = 'C',
        global = true,
        value_name = "DIR",
        help = "Run as if twig was started in DIR"
    )]
    directory: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Create a new repository in the working directory"
    )]
    Init,
    #[command(name = "add", about = "Stage a file for the next commit")]
    Add {
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "commit",
        about = "Record the staged changes",
        long_about = "This command snapshots the head commit with the staging area applied \
        and moves the current branch to the new commit."
    )]
    Commit {
        #[arg(index = 1, help = "The commit message")]
        message: Option<String>,
    },
    #[command(
        name = "rm",
        about = "Unstage a file, or stop tracking it and delete it"
    )]
    Rm {
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "checkout",
        about = "Switch branches or restore a file",
        long_about = "checkout <branch> switches to a branch, checkout -- <file> restores a \
        file from the head commit, and checkout <commit-id> -- <file> restores it from \
        the given commit."
    )]
    Checkout {
        #[arg(index = 1, help = "A branch name, or a commit id when a file is given")]
        target: Option<String>,
        #[arg(index = 2, last = true, help = "The file to restore")]
        file: Option<String>,
    },
    #[command(name = "log", about = "Show the history of the current branch")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the ids of commits with the given message")]
    Find {
        #[arg(index = 1)]
        message: String,
    },
    #[command(name = "status", about = "Show branches, staged files and working tree changes")]
    Status,
    #[command(name = "branch", about = "Create a branch at the head commit")]
    Branch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch pointer")]
    RmBranch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(
        name = "reset",
        about = "Check out a commit and move the current branch to it"
    )]
    Reset {
        #[arg(index = 1)]
        commit: String,
    },
    #[command(name = "merge", about = "Merge a branch into the current branch")]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
    #[command(name = "add-remote", about = "Register a remote store by path")]
    AddRemote {
        #[arg(index = 1)]
        name: String,
        #[arg(index = 2, help = "Path to the remote .twig directory")]
        location: String,
    },
    #[command(name = "rm-remote", about = "Forget a remote")]
    RmRemote {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "push", about = "Append local commits to a remote branch")]
    Push {
        #[arg(index = 1)]
        remote: String,
        #[arg(index = 2)]
        branch: String,
    },
    #[command(
        name = "fetch",
        about = "Copy a remote branch into the tracking branch <remote>/<branch>"
    )]
    Fetch {
        #[arg(index = 1)]
        remote: String,
        #[arg(index = 2)]
        branch: String,
    },
    #[command(name = "pull", about = "Fetch a remote branch and merge it")]
    Pull {
        #[arg(index = 1)]
        remote: String,
        #[arg(index = 2)]
        branch: String,
    },
}

impl Commands {
    fn is_paged(&self) -> bool {
        matches!(self, Commands::Log | Commands::GlobalLog)
    }
}

fn main() -> ExitCode {
    init_tracing();

    let result = parse_cli().and_then(run);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => match user_error(&error) {
            Some(user_error) => {
                tracing::debug!(kind = ?user_error.kind(), "command refused");
                println!("{user_error}");
                ExitCode::SUCCESS
            }
            None => {
                eprintln!("fatal: {error:#}");
                ExitCode::FAILURE
            }
        },
    }
}

fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_cli() -> Result<Cli> {
    Cli::try_parse().map_err(|error| {
        let user_error = match error.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => error.exit(),
            ErrorKind::InvalidSubcommand => TwigError::UnknownCommand,
            ErrorKind::MissingSubcommand | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                TwigError::NoCommand
            }
            _ => TwigError::IncorrectOperands,
        };
        tracing::debug!(error = %error, "rejected command line");

        user_error.into()
    })
}

fn run(cli: Cli) -> Result<()> {
    let command = cli.command.ok_or(TwigError::NoCommand)?;
    let root = match cli.directory {
        Some(directory) => directory,
        None => std::env::current_dir()?,
    };

    let paged = command.is_paged()
        && std::io::stdout().is_terminal()
        && std::env::var_os(NO_PAGER_ENV).is_none();

    if paged {
        let pager = Pager::new();
        let repository =
            Repository::new(&root, Box::new(PagerWriter::new(pager.clone())))?.with_colors(true);
        dispatch(&repository, command)?;
        minus::page_all(pager)?;
    } else {
        let repository = Repository::new(&root, Box::new(std::io::stdout()))?;
        dispatch(&repository, command)?;
    }

    Ok(())
}

fn dispatch(repository: &Repository, command: Commands) -> Result<()> {
    if !matches!(command, Commands::Init) {
        repository.ensure_initialized()?;
    }

    match command {
        Commands::Init => repository.init(),
        Commands::Add { file } => repository.add(&file),
        Commands::Commit { message } => repository
            .commit(message.as_deref().unwrap_or_default())
            .map(drop),
        Commands::Rm { file } => repository.rm(&file).map(drop),
        Commands::Checkout { target, file } => match (target, file) {
            (Some(branch), None) => repository.checkout_branch(&branch),
            (commit, Some(file)) => repository.checkout_file(commit.as_deref(), &file),
            (None, None) => Err(TwigError::IncorrectOperands.into()),
        },
        Commands::Log => repository.log(),
        Commands::GlobalLog => repository.global_log(),
        Commands::Find { message } => repository.find(&message).map(drop),
        Commands::Status => repository.status().map(drop),
        Commands::Branch { name } => repository.branch(&name).map(drop),
        Commands::RmBranch { name } => repository.rm_branch(&name).map(drop),
        Commands::Reset { commit } => repository.reset(&commit),
        Commands::Merge { branch } => repository.merge(&branch).map(drop),
        Commands::AddRemote { name, location } => repository.add_remote(&name, &location),
        Commands::RmRemote { name } => repository.rm_remote(&name),
        Commands::Push { remote, branch } => repository.push(&remote, &branch),
        Commands::Fetch { remote, branch } => repository.fetch(&remote, &branch).map(drop),
        Commands::Pull { remote, branch } => repository.pull(&remote, &branch).map(drop),
    }
}
