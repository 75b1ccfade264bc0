//! Command-line interface definition.
use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the workstation setup tool.
#[derive(Parser, Debug)]
#[command(
    name = "dotfyles",
    about = "First-run macOS workstation setup: dotfile links, preferences, packages",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Also show debug lines on the console
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Flags shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Flags accepted before or after any subcommand.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Report what would change, change nothing
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Override the repository root directory (must contain `conf/`)
    #[arg(long, global = true)]
    pub root: Option<std::path::PathBuf>,

    /// Process links and downloads one at a time
    #[arg(long = "no-parallel", global = true, action = clap::ArgAction::SetFalse)]
    pub parallel: bool,
}

/// What to do.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run every setup task
    Install(InstallOpts),
    /// Rebuild the global gitignore from its remote lists
    Gitignore,
    /// Link one file or directory
    Link(LinkOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the log file of this command.
    #[must_use]
    pub const fn log_name(&self) -> &'static str {
        match self {
            Self::Install(_) => "install",
            Self::Gitignore => "gitignore",
            Self::Link(_) => "link",
            Self::Version => "version",
        }
    }
}

/// Task selection for `install`.
#[derive(Parser, Debug, Clone)]
pub struct InstallOpts {
    /// Skip tasks whose name contains any of these words
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,

    /// Run only tasks whose name contains any of these words
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,
}

/// Arguments of `link`.
#[derive(Parser, Debug, Clone)]
pub struct LinkOpts {
    /// What the link points to (`~` is expanded)
    pub source: String,

    /// Where the link is created (default: `~/<basename of SOURCE>`)
    pub destination: Option<String>,
}
